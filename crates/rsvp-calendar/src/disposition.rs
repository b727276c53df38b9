//! Mapping from a requested response operation to the disposition and
//! destination submitted with the remote create.

use crate::error::ResponseError;
use crate::folder::{FolderId, FolderTarget};
use crate::types::MessageDisposition;

/// Parameter name reported when an explicit folder id is null.
pub const DESTINATION_FOLDER_ID: &str = "destination_folder_id";

/// What the caller asked to do with a response message.
///
/// Sending without a copy has no destination, so `Send` carries no target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispositionRequest {
    Save(FolderTarget),
    Send,
    SendAndSaveCopy(FolderTarget),
}

/// Validated disposition and destination, ready for the create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDisposition {
    pub message_disposition: MessageDisposition,
    /// `None` lets the service choose its standard folder.
    pub saved_item_folder_id: Option<FolderId>,
}

impl DispositionRequest {
    pub fn message_disposition(&self) -> MessageDisposition {
        match self {
            Self::Save(_) => MessageDisposition::SaveOnly,
            Self::Send => MessageDisposition::SendOnly,
            Self::SendAndSaveCopy(_) => MessageDisposition::SendAndSaveCopy,
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` naming [`DESTINATION_FOLDER_ID`] when an
    /// explicit folder id is null.
    pub fn resolve(&self) -> Result<ResolvedDisposition, ResponseError> {
        let saved_item_folder_id = match self {
            Self::Save(target) | Self::SendAndSaveCopy(target) => resolve_target(target)?,
            Self::Send => None,
        };

        Ok(ResolvedDisposition {
            message_disposition: self.message_disposition(),
            saved_item_folder_id,
        })
    }
}

fn resolve_target(target: &FolderTarget) -> Result<Option<FolderId>, ResponseError> {
    match target {
        FolderTarget::Default => Ok(None),
        FolderTarget::Id(id) if id.is_null() => Err(ResponseError::invalid_argument(
            DESTINATION_FOLDER_ID,
            "folder id must not be null",
        )),
        FolderTarget::Id(id) => Ok(Some(id.clone())),
        FolderTarget::WellKnown(name) => Ok(Some(FolderId::from(*name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::WellKnownFolderName;

    #[test]
    fn test_disposition_kinds() {
        let cases = [
            (
                DispositionRequest::Save(FolderTarget::Default),
                MessageDisposition::SaveOnly,
            ),
            (DispositionRequest::Send, MessageDisposition::SendOnly),
            (
                DispositionRequest::SendAndSaveCopy(FolderTarget::Default),
                MessageDisposition::SendAndSaveCopy,
            ),
        ];

        for (request, expected) in cases {
            assert_eq!(request.resolve().unwrap().message_disposition, expected);
        }
    }

    #[test]
    fn test_explicit_id_passes_through() {
        let id = FolderId::with_change_key("AAMkADrafts", "AQAAAA");
        let resolved = DispositionRequest::Save(FolderTarget::Id(id.clone()))
            .resolve()
            .unwrap();
        assert_eq!(resolved.saved_item_folder_id, Some(id));
    }

    #[test]
    fn test_null_id_rejected_for_both_saving_operations() {
        for request in [
            DispositionRequest::Save(FolderTarget::Id(FolderId::new(""))),
            DispositionRequest::SendAndSaveCopy(FolderTarget::Id(FolderId::new(""))),
        ] {
            let err = request.resolve().unwrap_err();
            assert_eq!(err.param(), Some(DESTINATION_FOLDER_ID));
        }
    }

    #[test]
    fn test_whitespace_id_is_not_null() {
        let id = FolderId::new(" ");
        let resolved = DispositionRequest::Save(FolderTarget::Id(id.clone()))
            .resolve()
            .unwrap();
        assert_eq!(resolved.saved_item_folder_id, Some(id));
    }

    #[test]
    fn test_well_known_matches_explicit_equivalent() {
        let by_name = DispositionRequest::SendAndSaveCopy(FolderTarget::WellKnown(
            WellKnownFolderName::SentItems,
        ))
        .resolve()
        .unwrap();
        let by_id = DispositionRequest::SendAndSaveCopy(FolderTarget::Id(FolderId::from(
            WellKnownFolderName::SentItems,
        )))
        .resolve()
        .unwrap();

        assert_eq!(by_name, by_id);
    }

    #[test]
    fn test_default_target_is_no_destination() {
        for request in [
            DispositionRequest::Save(FolderTarget::Default),
            DispositionRequest::Send,
            DispositionRequest::SendAndSaveCopy(FolderTarget::Default),
        ] {
            assert_eq!(request.resolve().unwrap().saved_item_folder_id, None);
        }
    }
}
