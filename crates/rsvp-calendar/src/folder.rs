//! Folder identifiers and destination targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResponseError;

/// Distinguished folders every mailbox has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellKnownFolderName {
    Calendar,
    Contacts,
    DeletedItems,
    Drafts,
    Inbox,
    Journal,
    Notes,
    Outbox,
    SentItems,
    Tasks,
    MsgFolderRoot,
    PublicFoldersRoot,
    Root,
    JunkEmail,
    SearchFolders,
    VoiceMail,
    RecoverableItemsRoot,
    RecoverableItemsDeletions,
    ArchiveRoot,
    ArchiveMsgFolderRoot,
    ArchiveDeletedItems,
    Conflicts,
    SyncIssues,
}

impl WellKnownFolderName {
    pub const ALL: [WellKnownFolderName; 23] = [
        Self::Calendar,
        Self::Contacts,
        Self::DeletedItems,
        Self::Drafts,
        Self::Inbox,
        Self::Journal,
        Self::Notes,
        Self::Outbox,
        Self::SentItems,
        Self::Tasks,
        Self::MsgFolderRoot,
        Self::PublicFoldersRoot,
        Self::Root,
        Self::JunkEmail,
        Self::SearchFolders,
        Self::VoiceMail,
        Self::RecoverableItemsRoot,
        Self::RecoverableItemsDeletions,
        Self::ArchiveRoot,
        Self::ArchiveMsgFolderRoot,
        Self::ArchiveDeletedItems,
        Self::Conflicts,
        Self::SyncIssues,
    ];

    /// The distinguished folder id the service understands.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Contacts => "contacts",
            Self::DeletedItems => "deleteditems",
            Self::Drafts => "drafts",
            Self::Inbox => "inbox",
            Self::Journal => "journal",
            Self::Notes => "notes",
            Self::Outbox => "outbox",
            Self::SentItems => "sentitems",
            Self::Tasks => "tasks",
            Self::MsgFolderRoot => "msgfolderroot",
            Self::PublicFoldersRoot => "publicfoldersroot",
            Self::Root => "root",
            Self::JunkEmail => "junkemail",
            Self::SearchFolders => "searchfolders",
            Self::VoiceMail => "voicemail",
            Self::RecoverableItemsRoot => "recoverableitemsroot",
            Self::RecoverableItemsDeletions => "recoverableitemsdeletions",
            Self::ArchiveRoot => "archiveroot",
            Self::ArchiveMsgFolderRoot => "archivemsgfolderroot",
            Self::ArchiveDeletedItems => "archivedeleteditems",
            Self::Conflicts => "conflicts",
            Self::SyncIssues => "syncissues",
        }
    }
}

impl fmt::Display for WellKnownFolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellKnownFolderName {
    type Err = ResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ResponseError::invalid_argument(
                    "folder_name",
                    format!("unknown well-known folder: {s:?}"),
                )
            })
    }
}

/// An identifier for a remote folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FolderId {
    /// An arbitrary folder, identified by its server id.
    #[serde(rename = "folderId", rename_all = "camelCase")]
    Id {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        change_key: Option<String>,
    },

    /// A distinguished folder, optionally in another user's mailbox.
    #[serde(rename = "distinguishedFolderId", rename_all = "camelCase")]
    WellKnown {
        #[serde(rename = "id")]
        name: WellKnownFolderName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mailbox: Option<String>,
    },
}

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self::Id {
            id: id.into(),
            change_key: None,
        }
    }

    pub fn with_change_key(id: impl Into<String>, change_key: impl Into<String>) -> Self {
        Self::Id {
            id: id.into(),
            change_key: Some(change_key.into()),
        }
    }

    pub fn well_known_in_mailbox(name: WellKnownFolderName, mailbox: impl Into<String>) -> Self {
        Self::WellKnown {
            name,
            mailbox: Some(mailbox.into()),
        }
    }

    /// An explicit id with no value. This is what an unset folder id looks
    /// like once it reaches us. Any non-empty id, even one the server will
    /// not recognize, is passed through for the service to judge.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Id { id, .. } => id.is_empty(),
            Self::WellKnown { .. } => false,
        }
    }
}

impl From<WellKnownFolderName> for FolderId {
    fn from(name: WellKnownFolderName) -> Self {
        Self::WellKnown {
            name,
            mailbox: None,
        }
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id { id, .. } => write!(f, "folder {id}"),
            Self::WellKnown {
                name,
                mailbox: Some(mailbox),
            } => write!(f, "{name} ({mailbox})"),
            Self::WellKnown { name, mailbox: None } => write!(f, "{name}"),
        }
    }
}

/// Where a saved response (or its sent copy) should land.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FolderTarget {
    /// Let the service pick its standard folder for the disposition.
    #[default]
    Default,
    /// An explicit folder id.
    Id(FolderId),
    /// A distinguished folder of the user's own mailbox.
    WellKnown(WellKnownFolderName),
}

impl FolderTarget {
    /// Build a target from a configured folder name; unset means `Default`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the name is not a well-known folder.
    pub fn from_config(name: Option<&str>) -> Result<Self, ResponseError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(Self::Default),
            Some(name) => Ok(Self::WellKnown(name.parse()?)),
        }
    }
}

impl From<FolderId> for FolderTarget {
    fn from(id: FolderId) -> Self {
        Self::Id(id)
    }
}

impl From<WellKnownFolderName> for FolderTarget {
    fn from(name: WellKnownFolderName) -> Self {
        Self::WellKnown(name)
    }
}
