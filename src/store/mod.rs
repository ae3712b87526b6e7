//! Global UI state as independent slices
//!
//! Each slice is folded by a pure reducer `(state, action) -> state`. A
//! reducer only reacts to its own action namespace and hands back the
//! previous state for anything else. The [`Store`] runs every reducer on
//! every dispatched action, like a combined reducer.

pub mod admin;
pub mod auth;
pub mod bids;
pub mod datasets;
pub mod medical_folder;
pub mod node;
pub mod repository;

pub use admin::{AdminAction, AdminState};
pub use auth::{AuthAction, AuthState};
pub use bids::{BidsAction, BidsPreview, BidsPreviewAction, BidsState};
pub use datasets::{DatasetsAction, DatasetsState};
pub use medical_folder::{MedicalFolderAction, MedicalFolderState};
pub use node::{NodeAction, NodeState};
pub use repository::{RepositoryAction, RepositoryState};

use std::fmt;

/// Pure state transition for one slice
pub trait Reducer: Default {
    fn reduce(self, action: &StoreAction) -> Self;
}

/// Every action the store understands, namespaced by slice
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    Repository(RepositoryAction),
    Bids(BidsAction),
    BidsPreview(BidsPreviewAction),
    MedicalFolder(MedicalFolderAction),
    Auth(AuthAction),
    Datasets(DatasetsAction),
    Node(NodeAction),
    Admin(AdminAction),
}

impl fmt::Display for StoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreAction::Repository(a) => write!(f, "repository/{}", a.kind()),
            StoreAction::Bids(a) => write!(f, "bids/{}", a.kind()),
            StoreAction::BidsPreview(a) => write!(f, "bidsPreview/{}", a.kind()),
            StoreAction::MedicalFolder(a) => write!(f, "medicalFolderDataset/{}", a.kind()),
            StoreAction::Auth(a) => write!(f, "auth/{}", a.kind()),
            StoreAction::Datasets(a) => write!(f, "datasets/{}", a.kind()),
            StoreAction::Node(a) => write!(f, "node/{}", a.kind()),
            StoreAction::Admin(a) => write!(f, "admin/{}", a.kind()),
        }
    }
}

/// All state slices
#[derive(Debug, Default)]
pub struct Store {
    pub repository: RepositoryState,
    pub bids: BidsState,
    pub bids_preview: BidsPreview,
    pub medical_folder: MedicalFolderState,
    pub auth: AuthState,
    pub datasets: DatasetsState,
    pub node: NodeState,
    pub admin: AdminState,
}

fn fold<R: Reducer>(slot: &mut R, action: &StoreAction) {
    *slot = std::mem::take(slot).reduce(action);
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: StoreAction) {
        tracing::debug!(%action, "dispatch");
        fold(&mut self.repository, &action);
        fold(&mut self.bids, &action);
        fold(&mut self.bids_preview, &action);
        fold(&mut self.medical_folder, &action);
        fold(&mut self.auth, &action);
        fold(&mut self.datasets, &action);
        fold(&mut self.node, &action);
        fold(&mut self.admin, &action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::draft::{MetadataPatch, ReferenceColumn};
    use crate::model::repository::parse_path;

    /// One action from every namespace
    fn sample_actions() -> Vec<StoreAction> {
        vec![
            StoreAction::Repository(RepositoryAction::Error {
                message: "boom".to_string(),
            }),
            StoreAction::Bids(BidsAction::SetBidsRoot {
                root_path: parse_path("/data/x"),
                modalities: vec!["T1".to_string()],
            }),
            StoreAction::BidsPreview(BidsPreviewAction::Set(BidsPreview {
                dataset_id: Some("dataset_1".to_string()),
                ..BidsPreview::default()
            })),
            StoreAction::MedicalFolder(MedicalFolderAction::SetReferenceColumn(ReferenceColumn {
                index: Some(0),
                name: Some("id".to_string()),
            })),
            StoreAction::MedicalFolder(MedicalFolderAction::SetMetadata(MetadataPatch {
                name: Some("x".to_string()),
                ..MetadataPatch::default()
            })),
            StoreAction::Auth(AuthAction::LoggedIn {
                email: "admin@example.org".to_string(),
            }),
            StoreAction::Datasets(DatasetsAction::Error {
                message: "nope".to_string(),
            }),
            StoreAction::Node(NodeAction::Error {
                message: "down".to_string(),
            }),
            StoreAction::Admin(AdminAction::CreateFailed {
                message: "taken".to_string(),
            }),
        ]
    }

    fn same_namespace(a: &StoreAction, b: &StoreAction) -> bool {
        std::mem::discriminant(a) == std::mem::discriminant(b)
    }

    /// Run `reduce` against every action outside the slice's own namespace
    fn assert_ignores_foreign<R>(own: &StoreAction, start: R)
    where
        R: Reducer + Clone + PartialEq + fmt::Debug,
    {
        for action in sample_actions() {
            if same_namespace(own, &action) {
                continue;
            }
            let next = start.clone().reduce(&action);
            assert_eq!(next, start, "slice changed on foreign action {}", action);
        }
    }

    #[test]
    fn test_every_reducer_ignores_foreign_actions() {
        let actions = sample_actions();
        let mut store = Store::new();
        for action in &actions {
            store.dispatch(action.clone());
        }

        assert_ignores_foreign(&actions[0], store.repository.clone());
        assert_ignores_foreign(&actions[1], store.bids.clone());
        assert_ignores_foreign(&actions[2], store.bids_preview.clone());
        assert_ignores_foreign(&actions[3], store.medical_folder.clone());
        assert_ignores_foreign(&actions[5], store.auth.clone());
        assert_ignores_foreign(&actions[6], store.datasets.clone());
        assert_ignores_foreign(&actions[7], store.node.clone());
        assert_ignores_foreign(&actions[8], store.admin.clone());
    }

    #[test]
    fn test_dispatch_routes_to_owning_slice() {
        let mut store = Store::new();
        store.dispatch(StoreAction::Bids(BidsAction::SetBidsRoot {
            root_path: parse_path("/data/x"),
            modalities: vec!["T1".to_string()],
        }));

        assert_eq!(store.bids.bids_root, Some(parse_path("/data/x")));
        assert_eq!(store.medical_folder, MedicalFolderState::default());
        assert_eq!(store.repository, RepositoryState::default());
    }

    #[test]
    fn test_action_display_is_namespaced() {
        let action = StoreAction::Repository(RepositoryAction::Error {
            message: "boom".to_string(),
        });
        assert_eq!(action.to_string(), "repository/ERROR");
        assert_eq!(
            StoreAction::Admin(AdminAction::Loading).to_string(),
            "admin/LIST_USERS_PENDING"
        );
    }
}
