use super::{WizardFlow, WizardStep};
use crate::model::repository::RepoPath;
use crate::store::MedicalFolderState;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicalFolderStep {
    Root,
    DataLoadingPlan,
    ReferenceCsv,
    ReferenceColumn,
    Metadata,
    Add,
}

impl WizardStep for MedicalFolderStep {
    const ALL: &'static [Self] = &[
        MedicalFolderStep::Root,
        MedicalFolderStep::DataLoadingPlan,
        MedicalFolderStep::ReferenceCsv,
        MedicalFolderStep::ReferenceColumn,
        MedicalFolderStep::Metadata,
        MedicalFolderStep::Add,
    ];

    fn number(&self) -> usize {
        match self {
            MedicalFolderStep::Root => 1,
            MedicalFolderStep::DataLoadingPlan => 2,
            MedicalFolderStep::ReferenceCsv => 3,
            MedicalFolderStep::ReferenceColumn => 4,
            MedicalFolderStep::Metadata => 5,
            MedicalFolderStep::Add => 6,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            MedicalFolderStep::Root => "Please select the root folder of MedicalFolder dataset.",
            MedicalFolderStep::DataLoadingPlan => "Would you like to use an existing DLP?",
            MedicalFolderStep::ReferenceCsv => {
                "Please select reference/demographics CSV file where all subject folder names are stored"
            }
            MedicalFolderStep::ReferenceColumn => {
                "Please select the column that represents subject folders in the MedicalFolder root directory."
            }
            MedicalFolderStep::Metadata => "Please enter following information",
            MedicalFolderStep::Add => "Add/Register MedicalFolder Dataset",
        }
    }
}

impl WizardFlow for MedicalFolderState {
    type Step = MedicalFolderStep;

    fn is_visible(&self, step: MedicalFolderStep) -> bool {
        let has_root = self.medical_folder_root.is_some();
        match step {
            MedicalFolderStep::Root => true,
            MedicalFolderStep::DataLoadingPlan | MedicalFolderStep::ReferenceCsv => has_root,
            MedicalFolderStep::ReferenceColumn => {
                has_root && self.reference_csv.is_some() && !self.ignore_reference_csv
            }
            MedicalFolderStep::Metadata => {
                has_root
                    && (self.medical_folder_ref.reference.is_selected() || self.ignore_reference_csv)
            }
            MedicalFolderStep::Add => {
                self.is_visible(MedicalFolderStep::Metadata) && self.metadata.is_complete()
            }
        }
    }

    /// A new association must be saved before it can be sent
    fn can_submit(&self) -> bool {
        self.is_visible(MedicalFolderStep::Add)
            && !(self.use_new_dlp && self.modalities_to_folders.is_none())
    }
}

/// Module and class the node resolves the modality mapper block from
const LOADING_BLOCK_TYPES_MODULE: &str = "fedbiomed.common.data";
const LOADING_BLOCK_TYPES: &str = "MedicalFolderLoadingBlockTypes";
const MAPPER_BLOCK_MODULE: &str = "fedbiomed.common.data._data_loading_plan";
const MAPPER_BLOCK: &str = "MapperBlock";
const MODALITIES_TO_FOLDERS: &str = "modalities_to_folders";

/// Fresh serial id for a loading block built in the wizard
pub fn new_loading_block_id() -> String {
    format!("serialized_dlb_{}", uuid::Uuid::new_v4())
}

/// Loading blocks of the plan built in the wizard, keyed by block type
fn loading_blocks(state: &MedicalFolderState, block_id: &str) -> Value {
    match (state.use_new_dlp, &state.modalities_to_folders) {
        (true, Some(map)) => json!({
            MODALITIES_TO_FOLDERS: {
                "serial_id": block_id,
                "dlb_id": block_id,
                "module": LOADING_BLOCK_TYPES_MODULE,
                "qualname": LOADING_BLOCK_TYPES,
                "loading_block_module": MAPPER_BLOCK_MODULE,
                "loading_block_class": MAPPER_BLOCK,
                "map": map,
            }
        }),
        _ => json!({}),
    }
}

/// Body for the reference-column validation call
pub fn reference_column_request(state: &MedicalFolderState, index_col: usize) -> Option<Value> {
    let root = state.medical_folder_root.as_ref()?;
    let csv = state.reference_csv.as_ref()?;
    Some(json!({
        "medical_folder_root": root,
        "reference_csv_path": csv.path,
        "index_col": index_col,
    }))
}

/// Body for the add call; `None` until the draft can be submitted.
///
/// `block_id` names the loading block of a new folder-to-modality
/// association and is ignored otherwise.
pub fn add_request(state: &MedicalFolderState, block_id: &str) -> Option<Value> {
    if !state.can_submit() {
        return None;
    }
    let root: &RepoPath = state.medical_folder_root.as_ref()?;

    let (reference_csv_path, index_col) = if state.ignore_reference_csv {
        (Value::Null, Value::Null)
    } else {
        let csv = state.reference_csv.as_ref()?;
        (json!(csv.path), json!(state.medical_folder_ref.reference.index))
    };

    let (dlp_id, dlp_name) = match state.selected_dlp() {
        Some(dlp) => (Some(dlp.dlp_id), Some(dlp.name)),
        None if state.use_new_dlp => (None, state.new_dlp_name.clone()),
        None => (None, None),
    };

    let mut body = json!({
        "medical_folder_root": root,
        "reference_csv_path": reference_csv_path,
        "index_col": index_col,
        "name": state.metadata.name,
        "tags": state.metadata.tags,
        "desc": state.metadata.desc,
        "dlp_id": dlp_id,
        "dlp_loading_blocks": loading_blocks(state, block_id),
    });
    // the node renames the plan whenever the key is present
    if let Some(name) = dlp_name {
        body["dlp_name"] = json!(name);
    }
    Some(body)
}
