//! Modal stack for overlays drawn on top of the current screen

/// What a file-browser selection will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseTarget {
    /// Data file or image folder of a plain dataset
    DatasetPath,
    MedicalFolderRoot,
    MedicalFolderReferenceCsv,
    BidsRoot,
    BidsReferenceCsv,
}

impl BrowseTarget {
    /// Only folders can be selected
    pub fn folders_only(&self) -> bool {
        matches!(self, BrowseTarget::MedicalFolderRoot | BrowseTarget::BidsRoot)
    }

    /// File extensions accepted for selection; empty means any
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            BrowseTarget::MedicalFolderReferenceCsv | BrowseTarget::BidsReferenceCsv => &[".csv"],
            _ => &[],
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BrowseTarget::DatasetPath => "Select Data File",
            BrowseTarget::MedicalFolderRoot | BrowseTarget::BidsRoot => "Select Folder",
            BrowseTarget::MedicalFolderReferenceCsv | BrowseTarget::BidsReferenceCsv => {
                "Select Reference CSV"
            }
        }
    }
}

/// An overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Message the user has to acknowledge
    Alert { title: String, message: String },
    /// Quit confirmation dialog
    QuitConfirm,
    /// Browse the node data path
    FileBrowser { target: BrowseTarget },
    /// Confirm dataset removal
    ConfirmRemove { dataset_id: String, name: String },
    /// Edit name/tags/description of a registered dataset
    EditDataset { dataset_id: String },
    /// Keyboard shortcuts
    Help,
}

/// A stack of modal overlays
///
/// Only the top modal receives input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Remove every overlay (route change after a forced logout)
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Remove the topmost file browser, wherever it sits in the stack
    pub fn remove_file_browser(&mut self) {
        if let Some(pos) = self
            .stack
            .iter()
            .rposition(|m| matches!(m, Modal::FileBrowser { .. }))
        {
            self.stack.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(message: &str) -> Modal {
        Modal::Alert {
            title: "Error".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        stack.push(alert("boom"));

        assert_eq!(stack.pop(), Some(alert("boom")));
        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_alert_over_browser_keeps_browser_removable() {
        let mut stack = ModalStack::new();
        stack.push(Modal::FileBrowser {
            target: BrowseTarget::BidsRoot,
        });
        stack.push(alert("Requested path does not exist"));

        stack.remove_file_browser();

        assert_eq!(stack.top(), Some(&alert("Requested path does not exist")));
        stack.pop();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_browse_target_filters() {
        assert!(BrowseTarget::MedicalFolderRoot.folders_only());
        assert!(!BrowseTarget::DatasetPath.folders_only());
        assert_eq!(BrowseTarget::BidsReferenceCsv.extensions(), &[".csv"]);
        assert!(BrowseTarget::DatasetPath.extensions().is_empty());
    }
}
