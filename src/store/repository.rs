//! Repository listing slice (files of the node data path)

use super::{Reducer, StoreAction};
use crate::model::repository::{FileEntry, RepoPath, RepositoryListing};

#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryAction {
    /// Listing of a folder succeeded
    Listed(RepositoryListing),
    /// Listing failed; replaces the whole slice
    Error { message: String },
}

impl RepositoryAction {
    pub fn kind(&self) -> &'static str {
        match self {
            RepositoryAction::Listed(_) => "LIST_REPOSITORY",
            RepositoryAction::Error { .. } => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryState {
    pub files: Vec<FileEntry>,
    pub error: bool,
    pub message: Option<String>,
    /// Folder the files belong to
    pub path: RepoPath,
    /// Entries in the folder before the node's display cap
    pub total: usize,
}

impl Reducer for RepositoryState {
    fn reduce(self, action: &StoreAction) -> Self {
        match action {
            StoreAction::Repository(RepositoryAction::Listed(listing)) => Self {
                files: listing.files.clone(),
                error: false,
                message: None,
                path: listing.path.clone(),
                total: listing.number,
            },
            StoreAction::Repository(RepositoryAction::Error { message }) => Self {
                files: Vec::new(),
                error: true,
                message: Some(message.clone()),
                ..Self::default()
            },
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::repository::EntryKind;
    use crate::store::{AuthAction, StoreAction};

    fn entry(name: &str) -> FileEntry {
        FileEntry {
            kind: EntryKind::File,
            name: name.to_string(),
            path: vec![name.to_string()],
            extension: ".csv".to_string(),
            registered: None,
            includes: Vec::new(),
            created: None,
            size: None,
        }
    }

    #[test]
    fn test_error_replaces_state_wholesale() {
        let state = RepositoryState {
            files: vec![entry("a.csv")],
            error: false,
            message: None,
            path: vec!["data".to_string()],
            total: 1,
        };

        let next = state.reduce(&StoreAction::Repository(RepositoryAction::Error {
            message: "boom".to_string(),
        }));

        assert!(next.files.is_empty());
        assert!(next.error);
        assert_eq!(next.message.as_deref(), Some("boom"));
        assert!(next.path.is_empty());
    }

    #[test]
    fn test_listing_clears_previous_error() {
        let state = RepositoryState::default().reduce(&StoreAction::Repository(
            RepositoryAction::Error {
                message: "boom".to_string(),
            },
        ));

        let next = state.reduce(&StoreAction::Repository(RepositoryAction::Listed(
            RepositoryListing {
                files: vec![entry("b.csv")],
                number: 1,
                displays: 1,
                path: vec!["data".to_string()],
                ..RepositoryListing::default()
            },
        )));

        assert!(!next.error);
        assert!(next.message.is_none());
        assert_eq!(next.files.len(), 1);
        assert_eq!(next.path, vec!["data".to_string()]);
    }

    #[test]
    fn test_unrelated_action_returns_previous_state() {
        let state = RepositoryState {
            files: vec![entry("a.csv")],
            ..RepositoryState::default()
        };
        let next = state.clone().reduce(&StoreAction::Auth(AuthAction::LoggedOut));
        assert_eq!(next, state);
    }
}
