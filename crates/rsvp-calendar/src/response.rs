//! Calendar response messages and their disposition operations.

use std::future::Future;

use serde::Serialize;
use tracing::instrument;

use crate::disposition::{DispositionRequest, ResolvedDisposition};
use crate::error::{ResponseError, ServiceError};
use crate::folder::{FolderId, FolderTarget};
use crate::results::CalendarActionResults;
use crate::types::{CalendarItem, ItemId, MessageDisposition, MessageFields, RemoteItem, ResponseKind};

/// The remote create primitive every disposition goes through.
///
/// Implementations own transport concerns (auth, retries, timeouts). A call
/// either returns every item the service reports as created or updated, or
/// fails as a whole.
pub trait CreateItemService {
    fn create_item(
        &self,
        request: CreateItemRequest,
    ) -> impl Future<Output = Result<Vec<RemoteItem>, ServiceError>> + Send;
}

/// A response item as submitted to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseItem {
    pub kind: ResponseKind,
    pub reference_item_id: ItemId,
    #[serde(flatten)]
    pub fields: MessageFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub item: ResponseItem,
    pub message_disposition: MessageDisposition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_item_folder_id: Option<FolderId>,
}

/// Capability shared by the concrete reply types: anything that can become
/// a response item for the service to create.
pub trait ResponseObject {
    fn response_kind(&self) -> ResponseKind;

    fn fields(&self) -> &MessageFields;

    fn fields_mut(&mut self) -> &mut MessageFields;
}

/// Accepts a meeting, or tentatively accepts it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptMessage {
    pub tentative: bool,
    pub fields: MessageFields,
}

impl ResponseObject for AcceptMessage {
    fn response_kind(&self) -> ResponseKind {
        if self.tentative {
            ResponseKind::TentativelyAccept
        } else {
            ResponseKind::Accept
        }
    }

    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut MessageFields {
        &mut self.fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclineMessage {
    pub fields: MessageFields,
}

impl ResponseObject for DeclineMessage {
    fn response_kind(&self) -> ResponseKind {
        ResponseKind::Decline
    }

    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut MessageFields {
        &mut self.fields
    }
}

/// Cancels a meeting the user organizes and notifies attendees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelMeetingMessage {
    pub fields: MessageFields,
}

impl ResponseObject for CancelMeetingMessage {
    fn response_kind(&self) -> ResponseKind {
        ResponseKind::CancelMeeting
    }

    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut MessageFields {
        &mut self.fields
    }
}

/// A reply bound to one calendar item.
///
/// Every disposition consumes the message, so each instance reaches the
/// service at most once.
pub struct CalendarResponseMessage<'a, S, M> {
    service: &'a S,
    reference_item: &'a CalendarItem,
    message: M,
}

impl<'a, S, M> CalendarResponseMessage<'a, S, M>
where
    S: CreateItemService,
    M: ResponseObject,
{
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the reference item was never saved.
    pub fn new(
        service: &'a S,
        reference_item: &'a CalendarItem,
        message: M,
    ) -> Result<Self, ResponseError> {
        if reference_item.item_id.is_empty() {
            return Err(ResponseError::InvalidOperation(
                "the reference item has not been saved to the server".to_string(),
            ));
        }

        Ok(Self {
            service,
            reference_item,
            message,
        })
    }

    pub fn reference_item(&self) -> &'a CalendarItem {
        self.reference_item
    }

    pub fn message(&self) -> &M {
        &self.message
    }

    pub fn message_mut(&mut self) -> &mut M {
        &mut self.message
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.message.fields_mut().subject = Some(subject.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.message.fields_mut().body = Some(body.into());
        self
    }

    pub fn with_to_recipient(mut self, address: impl Into<String>) -> Self {
        self.message.fields_mut().to_recipients.push(address.into());
        self
    }

    pub fn with_cc_recipient(mut self, address: impl Into<String>) -> Self {
        self.message.fields_mut().cc_recipients.push(address.into());
        self
    }

    pub fn with_bcc_recipient(mut self, address: impl Into<String>) -> Self {
        self.message.fields_mut().bcc_recipients.push(address.into());
        self
    }

    /// Save the response without sending it.
    ///
    /// `FolderTarget::Default` leaves the folder to the service (normally
    /// Drafts).
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a null folder id, or the service failure.
    pub async fn save(self, target: FolderTarget) -> Result<CalendarActionResults, ResponseError> {
        self.dispose(DispositionRequest::Save(target)).await
    }

    /// Send the response without keeping a copy.
    ///
    /// # Errors
    ///
    /// Returns the service failure unchanged.
    pub async fn send(self) -> Result<CalendarActionResults, ResponseError> {
        self.dispose(DispositionRequest::Send).await
    }

    /// Send the response and keep a copy.
    ///
    /// `FolderTarget::Default` leaves the folder to the service (normally
    /// Sent Items).
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a null folder id, or the service failure.
    pub async fn send_and_save_copy(
        self,
        target: FolderTarget,
    ) -> Result<CalendarActionResults, ResponseError> {
        self.dispose(DispositionRequest::SendAndSaveCopy(target))
            .await
    }

    /// Run any disposition request.
    ///
    /// # Errors
    ///
    /// Validation fails before the service is called; remote failures are
    /// returned as `RemoteOperationFailed` without a partial result.
    #[instrument(
        skip(self),
        level = "info",
        fields(kind = ?self.message.response_kind(), reference = %self.reference_item.item_id.id)
    )]
    pub async fn dispose(
        self,
        request: DispositionRequest,
    ) -> Result<CalendarActionResults, ResponseError> {
        let resolved = request.resolve()?;
        let items = self.internal_create(resolved).await?;
        Ok(CalendarActionResults::from_items(items))
    }

    async fn internal_create(
        &self,
        resolved: ResolvedDisposition,
    ) -> Result<Vec<RemoteItem>, ResponseError> {
        let request = CreateItemRequest {
            item: ResponseItem {
                kind: self.message.response_kind(),
                reference_item_id: self.reference_item.item_id.clone(),
                fields: self.message.fields().clone(),
            },
            message_disposition: resolved.message_disposition,
            saved_item_folder_id: resolved.saved_item_folder_id,
        };

        tracing::debug!(
            disposition = ?request.message_disposition,
            folder = ?request.saved_item_folder_id,
            "Creating response item"
        );

        let items = self.service.create_item(request).await?;
        Ok(items)
    }
}

impl CalendarItem {
    /// Start an accept (or tentative accept) reply to this meeting.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the user organizes the meeting or the item was
    /// never saved.
    pub fn create_accept_message<'a, S: CreateItemService>(
        &'a self,
        service: &'a S,
        tentative: bool,
    ) -> Result<CalendarResponseMessage<'a, S, AcceptMessage>, ResponseError> {
        self.ensure_attendee("accept")?;
        CalendarResponseMessage::new(
            service,
            self,
            AcceptMessage {
                tentative,
                ..Default::default()
            },
        )
    }

    /// # Errors
    ///
    /// `InvalidOperation` if the user organizes the meeting or the item was
    /// never saved.
    pub fn create_decline_message<'a, S: CreateItemService>(
        &'a self,
        service: &'a S,
    ) -> Result<CalendarResponseMessage<'a, S, DeclineMessage>, ResponseError> {
        self.ensure_attendee("decline")?;
        CalendarResponseMessage::new(service, self, DeclineMessage::default())
    }

    /// # Errors
    ///
    /// `InvalidOperation` unless the user organizes the meeting.
    pub fn create_cancel_meeting_message<'a, S: CreateItemService>(
        &'a self,
        service: &'a S,
    ) -> Result<CalendarResponseMessage<'a, S, CancelMeetingMessage>, ResponseError> {
        if !self.is_organizer {
            return Err(ResponseError::InvalidOperation(
                "only the organizer can cancel a meeting".to_string(),
            ));
        }
        CalendarResponseMessage::new(service, self, CancelMeetingMessage::default())
    }

    fn ensure_attendee(&self, action: &str) -> Result<(), ResponseError> {
        if self.is_organizer {
            return Err(ResponseError::InvalidOperation(format!(
                "the organizer cannot {action} their own meeting"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::WellKnownFolderName;
    use crate::types::{ItemKind, ItemRole};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubService {
        requests: Mutex<Vec<CreateItemRequest>>,
        reply: Vec<RemoteItem>,
    }

    impl CreateItemService for StubService {
        async fn create_item(
            &self,
            request: CreateItemRequest,
        ) -> Result<Vec<RemoteItem>, ServiceError> {
            self.requests.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    fn invitation() -> CalendarItem {
        CalendarItem::new(ItemId::new("AAMkInvite").with_change_key("DwAAAB"))
    }

    #[tokio::test]
    async fn test_accept_carries_kind_and_fields() {
        let service = StubService::default();
        let item = invitation();

        item.create_accept_message(&service, false)
            .unwrap()
            .with_body("See you there")
            .with_cc_recipient("lead@example.com")
            .send()
            .await
            .unwrap();

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.item.kind, ResponseKind::Accept);
        assert_eq!(sent.item.reference_item_id, item.item_id);
        assert_eq!(sent.item.fields.body.as_deref(), Some("See you there"));
        assert_eq!(sent.item.fields.cc_recipients, vec!["lead@example.com"]);
        assert_eq!(sent.message_disposition, MessageDisposition::SendOnly);
        assert!(sent.saved_item_folder_id.is_none());
    }

    #[tokio::test]
    async fn test_tentative_accept_kind() {
        let service = StubService::default();
        let item = invitation();

        item.create_accept_message(&service, true)
            .unwrap()
            .save(FolderTarget::WellKnown(WellKnownFolderName::Drafts))
            .await
            .unwrap();

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests[0].item.kind, ResponseKind::TentativelyAccept);
        assert_eq!(
            requests[0].saved_item_folder_id,
            Some(FolderId::from(WellKnownFolderName::Drafts))
        );
    }

    #[tokio::test]
    async fn test_decline_returns_classified_results() {
        let service = StubService {
            reply: vec![RemoteItem::new(
                ItemId::new("reply"),
                ItemKind::MeetingResponse,
                ItemRole::ResponseCopy,
            )],
            ..Default::default()
        };
        let item = invitation();

        let results = item
            .create_decline_message(&service)
            .unwrap()
            .send_and_save_copy(FolderTarget::Default)
            .await
            .unwrap();

        assert_eq!(results.response_copy().unwrap().item_id.id, "reply");
        assert_eq!(
            service.requests.lock().unwrap()[0].item.kind,
            ResponseKind::Decline
        );
    }

    #[test]
    fn test_organizer_cannot_accept_or_decline() {
        let service = StubService::default();
        let mut item = invitation();
        item.is_organizer = true;

        assert!(matches!(
            item.create_accept_message(&service, false),
            Err(ResponseError::InvalidOperation(_))
        ));
        assert!(matches!(
            item.create_decline_message(&service),
            Err(ResponseError::InvalidOperation(_))
        ));
        assert!(item.create_cancel_meeting_message(&service).is_ok());
    }

    #[test]
    fn test_attendee_cannot_cancel() {
        let service = StubService::default();
        let item = invitation();
        assert!(matches!(
            item.create_cancel_meeting_message(&service),
            Err(ResponseError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_unsaved_reference_item_rejected() {
        let service = StubService::default();
        let item = CalendarItem::new(ItemId::new(""));
        assert!(matches!(
            item.create_decline_message(&service),
            Err(ResponseError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = CreateItemRequest {
            item: ResponseItem {
                kind: ResponseKind::CancelMeeting,
                reference_item_id: ItemId::new("AAMk"),
                fields: MessageFields {
                    body: Some("Cancelled, sorry".into()),
                    ..Default::default()
                },
            },
            message_disposition: MessageDisposition::SendAndSaveCopy,
            saved_item_folder_id: Some(FolderId::from(WellKnownFolderName::SentItems)),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "item": {
                    "kind": "CancelCalendarItem",
                    "referenceItemId": {"id": "AAMk"},
                    "body": "Cancelled, sorry"
                },
                "messageDisposition": "SendAndSaveCopy",
                "savedItemFolderId": {"distinguishedFolderId": {"id": "sentitems"}}
            })
        );
    }
}
