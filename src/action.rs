//! Action enum - All possible application actions
//!
//! Components emit Actions in response to key events; the App turns them
//! into route changes, store dispatches or background API jobs.

use crate::model::draft::ReferenceColumn;
use crate::model::modal::BrowseTarget;
use crate::model::repository::RepoPath;
use crate::model::route::Route;
use crate::services::admin::NewUser;
use crate::services::auth::PasswordChange;
use crate::services::datasets::{DatasetEdit, NewDataset};
use crate::store::StoreAction;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: drain API effects, expire notices
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Open a screen
    Navigate(Route),
    /// One step back in history
    Back,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Browse the node data path for a file or folder
    OpenFileBrowser(BrowseTarget),
    /// List a folder of the data path
    ListRepository { path: RepoPath, refresh: bool },
    /// A file or folder was picked in the browser
    BrowseSelected { target: BrowseTarget, path: RepoPath },

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    Login {
        server_url: String,
        email: String,
        password: String,
    },
    Logout,
    ChangePassword(PasswordChange),

    // ─────────────────────────────────────────────────────────────────────────
    // Datasets
    // ─────────────────────────────────────────────────────────────────────────
    RefreshDatasets,
    /// Open the preview screen of a dataset
    PreviewDataset(String),
    /// Ask before removing a dataset
    ConfirmRemoveDataset { dataset_id: String, name: String },
    RemoveDataset(String),
    /// Open the edit dialog of a dataset
    EditDataset(String),
    UpdateDataset(DatasetEdit),
    AddDataset(NewDataset),
    /// Register the node's bundled default dataset
    AddDefaultDataset,

    // ─────────────────────────────────────────────────────────────────────────
    // Wizards
    // ─────────────────────────────────────────────────────────────────────────
    /// Synchronous draft edit, dispatched straight into the store
    Dispatch(StoreAction),
    /// Toggle the "use existing DLP" switch; loading the catalog when on
    UseExistingDlp(bool),
    ValidateMedicalFolderReference(ReferenceColumn),
    SubmitMedicalFolder,
    ValidateBidsReference(ReferenceColumn),
    SubmitBids,

    // ─────────────────────────────────────────────────────────────────────────
    // Node
    // ─────────────────────────────────────────────────────────────────────────
    LoadNodeEnviron,

    // ─────────────────────────────────────────────────────────────────────────
    // User Management
    // ─────────────────────────────────────────────────────────────────────────
    /// Reload accounts and sign-up requests
    LoadAdmin,
    CreateUser(NewUser),
    ApproveRequest(String),
    RejectRequest(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::Navigate(route) => write!(f, "Navigate({})", route),
            Action::Back => write!(f, "Back"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::OpenFileBrowser(target) => write!(f, "OpenFileBrowser({:?})", target),
            Action::ListRepository { path, refresh } => {
                write!(f, "ListRepository(/{}, refresh={})", path.join("/"), refresh)
            }
            Action::BrowseSelected { target, path } => {
                write!(f, "BrowseSelected({:?}, /{})", target, path.join("/"))
            }
            // credentials stay out of logs
            Action::Login { email, .. } => write!(f, "Login({})", email),
            Action::Logout => write!(f, "Logout"),
            Action::ChangePassword(_) => write!(f, "ChangePassword"),
            Action::RefreshDatasets => write!(f, "RefreshDatasets"),
            Action::PreviewDataset(id) => write!(f, "PreviewDataset({})", id),
            Action::ConfirmRemoveDataset { dataset_id, .. } => {
                write!(f, "ConfirmRemoveDataset({})", dataset_id)
            }
            Action::RemoveDataset(id) => write!(f, "RemoveDataset({})", id),
            Action::EditDataset(id) => write!(f, "EditDataset({})", id),
            Action::UpdateDataset(edit) => write!(f, "UpdateDataset({})", edit.dataset_id),
            Action::AddDataset(dataset) => write!(f, "AddDataset({})", dataset.name),
            Action::AddDefaultDataset => write!(f, "AddDefaultDataset"),
            Action::Dispatch(action) => write!(f, "Dispatch({})", action),
            Action::UseExistingDlp(on) => write!(f, "UseExistingDlp({})", on),
            Action::ValidateMedicalFolderReference(column) => {
                write!(f, "ValidateMedicalFolderReference({:?})", column.name)
            }
            Action::SubmitMedicalFolder => write!(f, "SubmitMedicalFolder"),
            Action::ValidateBidsReference(column) => {
                write!(f, "ValidateBidsReference({:?})", column.name)
            }
            Action::SubmitBids => write!(f, "SubmitBids"),
            Action::LoadNodeEnviron => write!(f, "LoadNodeEnviron"),
            Action::LoadAdmin => write!(f, "LoadAdmin"),
            Action::CreateUser(user) => write!(f, "CreateUser({})", user.email),
            Action::ApproveRequest(id) => write!(f, "ApproveRequest({})", id),
            Action::RejectRequest(id) => write!(f, "RejectRequest({})", id),
        }
    }
}
