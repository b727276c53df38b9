//! Item-level types exchanged with the groupware service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a remote item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemId {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_key: Option<String>,
}

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_key: None,
        }
    }

    pub fn with_change_key(mut self, change_key: impl Into<String>) -> Self {
        self.change_key = Some(change_key.into());
        self
    }

    /// An item that has never been saved on the server has no id yet.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Concrete item type reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Message,
    #[serde(rename = "CalendarItem")]
    Appointment,
    MeetingRequest,
    MeetingResponse,
    MeetingCancellation,
    #[serde(other)]
    Other,
}

/// What a returned item represents relative to the response action.
///
/// The role is signalled by the service; it is never inferred from the
/// position of the item in the returned collection.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ItemRole {
    /// The reply (or cancellation) created from the response itself.
    ResponseCopy,
    /// The item the response was created from, as updated by the action.
    OriginalItem,
    /// A calendar entry created or updated in the user's calendar.
    CalendarItem,
    #[default]
    #[serde(other)]
    Unknown,
}

/// An item created or changed by a remote create operation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    pub item_id: ItemId,
    pub kind: ItemKind,
    #[serde(default)]
    pub role: ItemRole,
    pub subject: Option<String>,
    pub date_time_created: Option<DateTime<Utc>>,
}

impl RemoteItem {
    pub fn new(item_id: ItemId, kind: ItemKind, role: ItemRole) -> Self {
        Self {
            item_id,
            kind,
            role,
            subject: None,
            date_time_created: None,
        }
    }
}

/// How the service should materialize a created message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageDisposition {
    /// Save as a draft without sending.
    SaveOnly,
    /// Send without keeping a copy.
    SendOnly,
    /// Send and keep a copy.
    SendAndSaveCopy,
}

/// Which reply a response message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseKind {
    #[serde(rename = "AcceptItem")]
    Accept,
    #[serde(rename = "TentativelyAcceptItem")]
    TentativelyAccept,
    #[serde(rename = "DeclineItem")]
    Decline,
    #[serde(rename = "CancelCalendarItem")]
    CancelMeeting,
}

/// Outgoing message fields shared by every response variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc_recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc_recipients: Vec<String>,
}

/// A calendar item or meeting request the user can respond to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    pub item_id: ItemId,
    pub subject: Option<String>,
    /// Whether the current user organizes the meeting.
    #[serde(default)]
    pub is_organizer: bool,
}

impl CalendarItem {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            subject: None,
            is_organizer: false,
        }
    }
}
