//! Calendar response messages for an Exchange-style groupware service.
//!
//! Accept, decline, or cancel a meeting, then save, send, or send-and-keep
//! the reply. Each disposition makes one remote create call and returns the
//! affected items as [`CalendarActionResults`].

pub mod client;
pub mod disposition;
pub mod error;
pub mod folder;
pub mod response;
pub mod results;
pub mod retry;
pub mod types;

pub use client::HttpItemService;
pub use disposition::{DispositionRequest, ResolvedDisposition, DESTINATION_FOLDER_ID};
pub use error::{ResponseError, ServiceError};
pub use folder::{FolderId, FolderTarget, WellKnownFolderName};
pub use response::{
    AcceptMessage, CalendarResponseMessage, CancelMeetingMessage, CreateItemRequest,
    CreateItemService, DeclineMessage, ResponseItem, ResponseObject,
};
pub use results::CalendarActionResults;
pub use retry::RetryConfig;
pub use types::{
    CalendarItem, ItemId, ItemKind, ItemRole, MessageDisposition, MessageFields, RemoteItem,
    ResponseKind,
};
