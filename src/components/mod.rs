//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.
//!
//! Screens (one per route) implement [`Screen`](crate::component::Screen);
//! dialogs are drawn on top of them by the app's modal stack.

pub mod add_dataset;
pub mod admin;
pub mod alert_dialog;
pub mod bids_wizard;
pub mod confirm_remove;
pub mod dataset_preview;
pub mod datasets;
pub mod draft_form;
pub mod edit_dataset;
pub mod file_browser;
pub mod help_dialog;
pub mod input;
pub mod layout;
pub mod login;
pub mod medical_folder_wizard;
pub mod node_config;
pub mod password_change;
pub mod quit_dialog;
pub mod shell;
pub mod table;

pub use add_dataset::AddDatasetComponent;
pub use admin::AdminComponent;
pub use alert_dialog::AlertDialog;
pub use bids_wizard::BidsWizardComponent;
pub use confirm_remove::ConfirmRemoveDialog;
pub use dataset_preview::DatasetPreviewComponent;
pub use datasets::DatasetsComponent;
pub use edit_dataset::EditDatasetDialog;
pub use file_browser::FileBrowserDialog;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_percent, centered_popup};
pub use login::LoginComponent;
pub use medical_folder_wizard::MedicalFolderWizardComponent;
pub use node_config::NodeConfigComponent;
pub use password_change::PasswordChangeComponent;
pub use quit_dialog::QuitDialog;
