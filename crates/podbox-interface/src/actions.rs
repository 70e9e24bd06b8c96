//! # Feed Folder Actions
//!
//! A feed poll returns an ordered list of actions the client applies to its
//! local proof collection. Ticket feeds emit:
//!
//! ```text
//! [0] DeleteFolder   { folder, recursive: true }
//! [1] ReplaceInFolder { folder, pcds: [ticket, ...] }
//! ```
//!
//! Consumers that depend on that layout call [`expect_replace_in_folder_at`]
//! with index 1 and get a typed error if the layout changes; consumers that
//! only care about a folder use [`find_replace_in_folder`].

use podbox_pcd::{Pcd, PcdVerificationError, SerializedPcd, TicketPcd};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Replace the contents of a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceInFolder {
    pub folder: String,
    pub pcds: Vec<SerializedPcd>,
}

impl ReplaceInFolder {
    /// Decode every proof in this action as a ticket.
    pub fn tickets(&self) -> Result<Vec<TicketPcd>, PcdVerificationError> {
        self.pcds.iter().map(TicketPcd::deserialize_pcd).collect()
    }
}

/// A folder action, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PcdAction {
    #[serde(rename = "DeleteFolder_action")]
    DeleteFolder { folder: String, recursive: bool },
    #[serde(rename = "ReplaceInFolder_action")]
    ReplaceInFolder(ReplaceInFolder),
    #[serde(rename = "AppendToFolder_action")]
    AppendToFolder {
        folder: String,
        pcds: Vec<SerializedPcd>,
    },
}

impl PcdAction {
    /// Discriminator name, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeleteFolder { .. } => "DeleteFolder",
            Self::ReplaceInFolder(_) => "ReplaceInFolder",
            Self::AppendToFolder { .. } => "AppendToFolder",
        }
    }

    /// The folder this action targets.
    pub fn folder(&self) -> &str {
        match self {
            Self::DeleteFolder { folder, .. } | Self::AppendToFolder { folder, .. } => folder,
            Self::ReplaceInFolder(r) => &r.folder,
        }
    }
}

/// The action list did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionShapeError {
    #[error("expected an action at index {index}, but only {len} were returned")]
    Missing { index: usize, len: usize },

    #[error("expected ReplaceInFolder at index {index}, found {found}")]
    WrongKind { index: usize, found: &'static str },
}

/// The `ReplaceInFolder` action at `index`, or a typed error.
pub fn expect_replace_in_folder_at(
    actions: &[PcdAction],
    index: usize,
) -> Result<&ReplaceInFolder, ActionShapeError> {
    match actions.get(index) {
        None => Err(ActionShapeError::Missing {
            index,
            len: actions.len(),
        }),
        Some(PcdAction::ReplaceInFolder(r)) => Ok(r),
        Some(other) => Err(ActionShapeError::WrongKind {
            index,
            found: other.kind(),
        }),
    }
}

/// The first `ReplaceInFolder` action targeting `folder`.
pub fn find_replace_in_folder<'a>(
    actions: &'a [PcdAction],
    folder: &str,
) -> Option<&'a ReplaceInFolder> {
    actions.iter().find_map(|a| match a {
        PcdAction::ReplaceInFolder(r) if r.folder == folder => Some(r),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed_actions(folder: &str) -> Vec<PcdAction> {
        vec![
            PcdAction::DeleteFolder {
                folder: folder.to_string(),
                recursive: true,
            },
            PcdAction::ReplaceInFolder(ReplaceInFolder {
                folder: folder.to_string(),
                pcds: vec![],
            }),
        ]
    }

    #[test]
    fn wire_form_is_type_tagged() {
        let v = serde_json::to_value(feed_actions("Tickets")).unwrap();
        assert_eq!(
            v,
            json!([
                {"type": "DeleteFolder_action", "folder": "Tickets", "recursive": true},
                {"type": "ReplaceInFolder_action", "folder": "Tickets", "pcds": []}
            ])
        );
        let back: Vec<PcdAction> = serde_json::from_value(v).unwrap();
        assert_eq!(back, feed_actions("Tickets"));
    }

    #[test]
    fn position_one_is_the_replace_action() {
        let actions = feed_actions("Tickets");
        assert_eq!(expect_replace_in_folder_at(&actions, 1).unwrap().folder, "Tickets");
    }

    #[test]
    fn wrong_kind_at_position_is_reported() {
        let actions = feed_actions("Tickets");
        assert_eq!(
            expect_replace_in_folder_at(&actions, 0).unwrap_err(),
            ActionShapeError::WrongKind {
                index: 0,
                found: "DeleteFolder"
            }
        );
    }

    #[test]
    fn short_list_is_reported() {
        let actions = vec![PcdAction::DeleteFolder {
            folder: "x".to_string(),
            recursive: false,
        }];
        assert_eq!(
            expect_replace_in_folder_at(&actions, 1).unwrap_err(),
            ActionShapeError::Missing { index: 1, len: 1 }
        );
    }

    #[test]
    fn find_by_folder_ignores_position() {
        let mut actions = feed_actions("Other");
        actions.insert(
            0,
            PcdAction::ReplaceInFolder(ReplaceInFolder {
                folder: "Tickets".to_string(),
                pcds: vec![],
            }),
        );
        assert!(find_replace_in_folder(&actions, "Tickets").is_some());
        assert!(find_replace_in_folder(&actions, "Missing").is_none());
        assert_eq!(actions[2].folder(), "Other");
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let bad = json!({"type": "Explode_action", "folder": "x"});
        assert!(serde_json::from_value::<PcdAction>(bad).is_err());
    }
}
