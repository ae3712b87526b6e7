//! MedicalFolder dataset draft slice
//!
//! Same shape as the BIDS draft plus the Data Loading Plan (DLP) choices:
//! either an existing plan picked from the node's catalog, or a new
//! folder-to-modality association built in the wizard.

use super::{Reducer, StoreAction};
use crate::model::dataset::{cell_to_string, CsvTable};
use crate::model::draft::{
    DatasetMetadata, MetadataPatch, ReferenceColumn, ReferenceCsv, ReferenceSelection,
    SubjectReport,
};
use crate::model::repository::RepoPath;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum MedicalFolderAction {
    SetRoot {
        root_path: RepoPath,
        modalities: Vec<String>,
    },
    ResetRoot,
    /// Replaces the reference CSV and forgets the column chosen in the old one
    SetReferenceCsv(ReferenceCsv),
    ResetReferenceCsv,
    SetReferenceColumn(ReferenceColumn),
    SetSubjects(SubjectReport),
    ResetReference,
    SetMetadata(MetadataPatch),
    SetIgnoreReferenceCsv(bool),
    SetUsePreexistingDlp(bool),
    SetExistingDlps(CsvTable),
    SelectDlp(usize),
    SetCreateNewDlp(bool),
    SetNewDlpName(String),
    SetDefaultModalityNames(Vec<String>),
    MapFolder { folder: String, modality: String },
    ClearFolderMapping { folder: String },
    /// Freeze the current folder mapping into modality -> folders
    SaveModalityAssociation,
    Reset,
}

impl MedicalFolderAction {
    pub fn kind(&self) -> &'static str {
        use MedicalFolderAction::*;
        match self {
            SetRoot { .. } => "SET_MEDICAL_FOLDER_ROOT",
            ResetRoot => "RESET_MEDICAL_FOLDER_ROOT",
            SetReferenceCsv(_) => "SET_REFERENCE_CSV",
            ResetReferenceCsv => "RESET_REFERENCE_CSV",
            SetReferenceColumn(_) => "SET_MEDICAL_FOLDER_REF",
            SetSubjects(_) => "SET_MEDICAL_FOLDER_SUBJECTS",
            ResetReference => "RESET_MEDICAL_FOLDER_REF",
            SetMetadata(_) => "SET_MEDICAL_FOLDER_METADATA",
            SetIgnoreReferenceCsv(_) => "SET_IGNORE_REFERENCE_CSV",
            SetUsePreexistingDlp(_) => "SET_USE_PREEXISTING_DLP",
            SetExistingDlps(_) => "SET_EXISTING_DLPS",
            SelectDlp(_) => "SET_SELECTED_DLP",
            SetCreateNewDlp(_) => "SET_USE_NEW_DLP",
            SetNewDlpName(_) => "SET_NEW_DLP_NAME",
            SetDefaultModalityNames(_) => "SET_DEFAULT_MODALITY_NAMES",
            MapFolder { .. } => "UPDATE_MODALITIES_MAPPING",
            ClearFolderMapping { .. } => "CLEAR_MODALITY_MAPPING",
            SaveModalityAssociation => "SET_MODALITIES_TO_FOLDERS",
            Reset => "RESET_MEDICAL_FOLDER",
        }
    }
}

/// Entry of the node's DLP catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlpSummary {
    pub dlp_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicalFolderState {
    pub medical_folder_root: Option<RepoPath>,
    /// Folder names found under each subject (one per modality)
    pub modalities: Option<Vec<String>>,
    pub reference_csv: Option<ReferenceCsv>,
    pub medical_folder_ref: ReferenceSelection,
    pub metadata: DatasetMetadata,
    pub ignore_reference_csv: bool,

    pub use_preexisting_dlp: bool,
    pub existing_dlps: Option<CsvTable>,
    pub selected_dlp_index: Option<usize>,
    pub use_new_dlp: bool,
    /// Description given to the plan built in the wizard
    pub new_dlp_name: Option<String>,
    pub default_modality_names: Vec<String>,
    /// folder -> modality, as edited
    pub modalities_mapping: BTreeMap<String, String>,
    /// modality -> folders, set once the association is saved
    pub modalities_to_folders: Option<BTreeMap<String, Vec<String>>>,
}

impl MedicalFolderState {
    /// Catalog row currently selected, resolved to id and name
    pub fn selected_dlp(&self) -> Option<DlpSummary> {
        if !self.use_preexisting_dlp {
            return None;
        }
        let table = self.existing_dlps.as_ref()?;
        let row = table.data.get(self.selected_dlp_index?)?;

        let position = |names: &[&str]| {
            table
                .columns
                .iter()
                .position(|c| names.contains(&c.as_str()))
        };
        let id_col = position(&["dlp_id", "_id", "id"]).unwrap_or(0);
        let name_col = position(&["name", "desc", "dlp_name"]).unwrap_or(id_col);

        Some(DlpSummary {
            dlp_id: cell_to_string(row.get(id_col)?),
            name: row.get(name_col).map(cell_to_string).unwrap_or_default(),
        })
    }
}

/// folder -> modality into modality -> [folders], folders in name order
pub fn invert_mapping(mapping: &BTreeMap<String, String>) -> BTreeMap<String, Vec<String>> {
    let mut inverted: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (folder, modality) in mapping {
        inverted
            .entry(modality.clone())
            .or_default()
            .push(folder.clone());
    }
    inverted
}

impl Reducer for MedicalFolderState {
    fn reduce(self, action: &StoreAction) -> Self {
        let StoreAction::MedicalFolder(action) = action else {
            return self;
        };

        use MedicalFolderAction::*;
        match action {
            SetRoot {
                root_path,
                modalities,
            } => Self {
                medical_folder_root: Some(root_path.clone()),
                modalities: Some(modalities.clone()),
                // folder names belong to the previous root
                modalities_mapping: BTreeMap::new(),
                modalities_to_folders: None,
                ..self
            },
            ResetRoot => Self {
                medical_folder_root: None,
                modalities: None,
                ..self
            },
            SetReferenceCsv(csv) => Self {
                reference_csv: Some(csv.clone()),
                medical_folder_ref: ReferenceSelection::default(),
                ..self
            },
            ResetReferenceCsv => Self {
                reference_csv: None,
                medical_folder_ref: ReferenceSelection::default(),
                ..self
            },
            SetReferenceColumn(reference) => Self {
                medical_folder_ref: ReferenceSelection {
                    reference: reference.clone(),
                    subjects: SubjectReport::default(),
                },
                ..self
            },
            SetSubjects(subjects) => Self {
                medical_folder_ref: ReferenceSelection {
                    subjects: subjects.clone(),
                    ..self.medical_folder_ref
                },
                ..self
            },
            ResetReference => Self {
                medical_folder_ref: ReferenceSelection::default(),
                ..self
            },
            SetMetadata(patch) => Self {
                metadata: self.metadata.apply(patch),
                ..self
            },
            SetIgnoreReferenceCsv(ignore) => Self {
                ignore_reference_csv: *ignore,
                ..self
            },
            SetUsePreexistingDlp(true) => Self {
                use_preexisting_dlp: true,
                use_new_dlp: false,
                new_dlp_name: None,
                modalities_mapping: BTreeMap::new(),
                modalities_to_folders: None,
                ..self
            },
            SetUsePreexistingDlp(false) => Self {
                use_preexisting_dlp: false,
                selected_dlp_index: None,
                ..self
            },
            SetExistingDlps(table) => Self {
                existing_dlps: Some(table.clone()),
                selected_dlp_index: None,
                ..self
            },
            SelectDlp(index) => {
                let in_range = self
                    .existing_dlps
                    .as_ref()
                    .is_some_and(|t| *index < t.data.len());
                if !in_range {
                    return self;
                }
                Self {
                    selected_dlp_index: Some(*index),
                    ..self
                }
            }
            SetCreateNewDlp(true) => Self {
                use_new_dlp: true,
                ..self
            },
            SetCreateNewDlp(false) => Self {
                use_new_dlp: false,
                new_dlp_name: None,
                modalities_mapping: BTreeMap::new(),
                modalities_to_folders: None,
                ..self
            },
            SetNewDlpName(name) => {
                let name = name.trim();
                Self {
                    new_dlp_name: (!name.is_empty()).then(|| name.to_string()),
                    ..self
                }
            }
            SetDefaultModalityNames(names) => Self {
                default_modality_names: names.clone(),
                ..self
            },
            MapFolder { folder, modality } => {
                let mut modalities_mapping = self.modalities_mapping;
                modalities_mapping.insert(folder.clone(), modality.clone());
                Self {
                    modalities_mapping,
                    ..self
                }
            }
            ClearFolderMapping { folder } => {
                let mut modalities_mapping = self.modalities_mapping;
                modalities_mapping.remove(folder);
                Self {
                    modalities_mapping,
                    ..self
                }
            }
            SaveModalityAssociation => Self {
                modalities_to_folders: Some(invert_mapping(&self.modalities_mapping)),
                ..self
            },
            Reset => Self {
                // the modality catalog does not depend on the draft
                default_modality_names: self.default_modality_names,
                ..Self::default()
            },
        }
    }
}
