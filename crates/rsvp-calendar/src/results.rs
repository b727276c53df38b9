//! Classified view over the items a response operation created or changed.

use crate::types::{ItemKind, ItemRole, RemoteItem};

/// Items created or modified by a calendar response, grouped by role.
///
/// Any slot may be empty: saving a draft usually yields only the response
/// copy, and a plain send may yield nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarActionResults {
    response_copy: Option<RemoteItem>,
    original_item: Option<RemoteItem>,
    calendar_item: Option<RemoteItem>,
    unclassified: Vec<RemoteItem>,
}

impl CalendarActionResults {
    /// Classify the items returned by the service.
    ///
    /// The result does not depend on the order of `items`. If the service
    /// reports the same role twice, the item that sorts first keeps the slot
    /// and the rest are kept as unclassified.
    pub fn from_items(items: impl IntoIterator<Item = RemoteItem>) -> Self {
        let mut items: Vec<RemoteItem> = items.into_iter().collect();
        items.sort();

        let mut results = Self::default();
        for item in items {
            let slot = match item.role {
                ItemRole::ResponseCopy => &mut results.response_copy,
                ItemRole::OriginalItem => &mut results.original_item,
                ItemRole::CalendarItem => &mut results.calendar_item,
                ItemRole::Unknown => {
                    results.unclassified.push(item);
                    continue;
                }
            };

            if slot.is_some() {
                tracing::warn!(
                    role = ?item.role,
                    item_id = %item.item_id.id,
                    "Service reported more than one item for the same role"
                );
                results.unclassified.push(item);
            } else {
                *slot = Some(item);
            }
        }

        tracing::debug!(
            response_copy = results.response_copy.is_some(),
            original_item = results.original_item.is_some(),
            calendar_item = results.calendar_item.is_some(),
            unclassified = results.unclassified.len(),
            "Classified response results"
        );

        results
    }

    /// The item created from the response itself (the reply or cancellation).
    pub fn response_copy(&self) -> Option<&RemoteItem> {
        self.response_copy.as_ref()
    }

    /// The item the response was created from, as modified by the action.
    pub fn original_item(&self) -> Option<&RemoteItem> {
        self.original_item.as_ref()
    }

    /// The calendar entry created or updated by the action.
    pub fn calendar_item(&self) -> Option<&RemoteItem> {
        self.calendar_item.as_ref()
    }

    /// Items whose role the service did not identify.
    pub fn unclassified(&self) -> &[RemoteItem] {
        &self.unclassified
    }

    /// All items, classified slots first.
    pub fn items(&self) -> impl Iterator<Item = &RemoteItem> {
        self.response_copy
            .iter()
            .chain(self.original_item.iter())
            .chain(self.calendar_item.iter())
            .chain(self.unclassified.iter())
    }

    pub fn len(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first_of_kind(&self, kind: ItemKind) -> Option<&RemoteItem> {
        self.items().find(|item| item.kind == kind)
    }

    pub fn appointment(&self) -> Option<&RemoteItem> {
        self.first_of_kind(ItemKind::Appointment)
    }

    pub fn meeting_request(&self) -> Option<&RemoteItem> {
        self.first_of_kind(ItemKind::MeetingRequest)
    }

    pub fn meeting_response(&self) -> Option<&RemoteItem> {
        self.first_of_kind(ItemKind::MeetingResponse)
    }

    pub fn meeting_cancellation(&self) -> Option<&RemoteItem> {
        self.first_of_kind(ItemKind::MeetingCancellation)
    }

    pub fn into_items(self) -> Vec<RemoteItem> {
        self.response_copy
            .into_iter()
            .chain(self.original_item)
            .chain(self.calendar_item)
            .chain(self.unclassified)
            .collect()
    }
}
