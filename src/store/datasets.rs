//! Registered datasets and the one being previewed

use super::{Reducer, StoreAction};
use crate::model::dataset::{Dataset, DatasetPreview};

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetsAction {
    Loading,
    Listed(Vec<Dataset>),
    Previewed(DatasetPreview),
    ClearPreview,
    Removed { dataset_id: String },
    Updated(Dataset),
    Error { message: String },
}

impl DatasetsAction {
    pub fn kind(&self) -> &'static str {
        match self {
            DatasetsAction::Loading => "LIST_DATASETS_PENDING",
            DatasetsAction::Listed(_) => "LIST_DATASETS",
            DatasetsAction::Previewed(_) => "PREVIEW_DATASET",
            DatasetsAction::ClearPreview => "CLEAR_PREVIEW",
            DatasetsAction::Removed { .. } => "REMOVE_DATASET",
            DatasetsAction::Updated(_) => "UPDATE_DATASET",
            DatasetsAction::Error { .. } => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetsState {
    pub list: Vec<Dataset>,
    pub loading: bool,
    pub preview: Option<DatasetPreview>,
    pub error: Option<String>,
}

impl DatasetsState {
    pub fn find(&self, dataset_id: &str) -> Option<&Dataset> {
        self.list.iter().find(|d| d.dataset_id == dataset_id)
    }
}

impl Reducer for DatasetsState {
    fn reduce(self, action: &StoreAction) -> Self {
        let StoreAction::Datasets(action) = action else {
            return self;
        };

        match action {
            DatasetsAction::Loading => Self {
                loading: true,
                ..self
            },
            DatasetsAction::Listed(list) => Self {
                list: list.clone(),
                loading: false,
                error: None,
                ..self
            },
            DatasetsAction::Previewed(preview) => Self {
                preview: Some(preview.clone()),
                error: None,
                ..self
            },
            DatasetsAction::ClearPreview => Self {
                preview: None,
                ..self
            },
            DatasetsAction::Removed { dataset_id } => {
                let list = self
                    .list
                    .into_iter()
                    .filter(|d| &d.dataset_id != dataset_id)
                    .collect();
                let preview = self
                    .preview
                    .filter(|p| &p.dataset.dataset_id != dataset_id);
                Self {
                    list,
                    preview,
                    ..self
                }
            }
            DatasetsAction::Updated(dataset) => {
                let list = self
                    .list
                    .into_iter()
                    .map(|d| {
                        if d.dataset_id == dataset.dataset_id {
                            dataset.clone()
                        } else {
                            d
                        }
                    })
                    .collect();
                let preview = self.preview.map(|mut p| {
                    if p.dataset.dataset_id == dataset.dataset_id {
                        p.dataset = dataset.clone();
                    }
                    p
                });
                Self {
                    list,
                    preview,
                    ..self
                }
            }
            DatasetsAction::Error { message } => Self {
                loading: false,
                error: Some(message.clone()),
                ..self
            },
        }
    }
}
