//! BIDS dataset draft and BIDS preview slices

use super::{Reducer, StoreAction};
use crate::model::dataset::CsvTable;
use crate::model::draft::{
    DatasetMetadata, MetadataPatch, ReferenceColumn, ReferenceCsv, ReferenceSelection,
    SubjectReport,
};
use crate::model::repository::RepoPath;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub enum BidsAction {
    SetBidsRoot {
        root_path: RepoPath,
        modalities: Vec<String>,
    },
    ResetBidsRoot,
    /// Subject folders found under the root
    SetFormat(Vec<String>),
    SetReferenceCsv(ReferenceCsv),
    SetMetadata(MetadataPatch),
    SetIdentifiers(Vec<String>),
    SetBidsRef {
        reference: ReferenceColumn,
        subjects: SubjectReport,
    },
    ResetBidsRef,
    /// Drop both the reference CSV and the column chosen in it
    ResetReferenceCsv,
    SetIgnoreReferenceCsv(bool),
    Reset,
}

impl BidsAction {
    pub fn kind(&self) -> &'static str {
        match self {
            BidsAction::SetBidsRoot { .. } => "SET_BIDS_ROOT",
            BidsAction::ResetBidsRoot => "RESET_BIDS_ROOT",
            BidsAction::SetFormat(_) => "SET_FORMAT",
            BidsAction::SetReferenceCsv(_) => "SET_REFERENCE_CSV",
            BidsAction::SetMetadata(_) => "SET_BIDS_METADATA",
            BidsAction::SetIdentifiers(_) => "SET_IDENTIFIERS",
            BidsAction::SetBidsRef { .. } => "SET_BIDS_REF",
            BidsAction::ResetBidsRef => "RESET_BIDS_REF",
            BidsAction::ResetReferenceCsv => "RESET_BIDS_REFERENCE_CSV",
            BidsAction::SetIgnoreReferenceCsv(_) => "SET_IGNORE_REFERENCE_CSV",
            BidsAction::Reset => "RESET_BIDS",
        }
    }
}

/// BIDS dataset being registered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidsState {
    pub bids_root: Option<RepoPath>,
    pub patient_folders: Option<Vec<String>>,
    pub modalities: Option<Vec<String>>,
    pub bids_ref: ReferenceSelection,
    pub metadata: DatasetMetadata,
    pub reference_csv: Option<ReferenceCsv>,
    pub ignore_reference_csv: bool,
    pub identifiers: Option<Vec<String>>,
}

impl Reducer for BidsState {
    fn reduce(self, action: &StoreAction) -> Self {
        let StoreAction::Bids(action) = action else {
            return self;
        };

        match action {
            BidsAction::SetBidsRoot {
                root_path,
                modalities,
            } => Self {
                bids_root: Some(root_path.clone()),
                modalities: Some(modalities.clone()),
                ..self
            },
            BidsAction::ResetBidsRoot => Self {
                bids_root: None,
                modalities: None,
                ..self
            },
            BidsAction::SetFormat(folders) => Self {
                patient_folders: Some(folders.clone()),
                ..self
            },
            BidsAction::SetReferenceCsv(csv) => Self {
                reference_csv: Some(csv.clone()),
                ..self
            },
            BidsAction::SetMetadata(patch) => Self {
                metadata: self.metadata.apply(patch),
                ..self
            },
            BidsAction::SetIdentifiers(identifiers) => Self {
                identifiers: Some(identifiers.clone()),
                ..self
            },
            BidsAction::SetBidsRef {
                reference,
                subjects,
            } => Self {
                bids_ref: ReferenceSelection {
                    reference: reference.clone(),
                    subjects: subjects.clone(),
                },
                ..self
            },
            BidsAction::ResetBidsRef => Self {
                bids_ref: ReferenceSelection::default(),
                ..self
            },
            BidsAction::ResetReferenceCsv => Self {
                bids_ref: ReferenceSelection::default(),
                reference_csv: None,
                ..self
            },
            BidsAction::SetIgnoreReferenceCsv(ignore) => Self {
                ignore_reference_csv: *ignore,
                ..self
            },
            BidsAction::Reset => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BidsPreviewAction {
    Set(BidsPreview),
}

impl BidsPreviewAction {
    pub fn kind(&self) -> &'static str {
        match self {
            BidsPreviewAction::Set(_) => "SET_BIDS_PREVIEW",
        }
    }
}

/// Subject table of a registered imaging dataset
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BidsPreview {
    #[serde(default)]
    pub subject_table: Option<CsvTable>,
    #[serde(default)]
    pub modalities: Option<Vec<String>>,
    #[serde(default)]
    pub dataset_id: Option<String>,
}

impl Reducer for BidsPreview {
    fn reduce(self, action: &StoreAction) -> Self {
        match action {
            StoreAction::BidsPreview(BidsPreviewAction::Set(preview)) => preview.clone(),
            _ => self,
        }
    }
}
