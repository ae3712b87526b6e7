//! Registered datasets and tabular previews

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dataset registered on the node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shape: Option<Value>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub dtypes: Option<Value>,
    #[serde(default)]
    pub dataset_parameters: Option<Value>,
}

impl Dataset {
    pub fn tags_label(&self) -> String {
        self.tags.join(", ")
    }

    /// Datasets backed by a subject-folder layout get the imaging preview
    pub fn is_imaging(&self) -> bool {
        matches!(self.data_type.as_str(), "medical-folder" | "bids")
    }

    pub fn shape_label(&self) -> String {
        match &self.shape {
            Some(Value::Array(dims)) => dims
                .iter()
                .map(cell_to_string)
                .collect::<Vec<_>>()
                .join(" x "),
            Some(other) => cell_to_string(other),
            None => "-".to_string(),
        }
    }
}

/// Dataset with the first rows of its data, as returned by the preview endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetPreview {
    #[serde(flatten)]
    pub dataset: Dataset,
    #[serde(default)]
    pub data_preview: Option<CsvTable>,
}

/// Table in pandas "split" orientation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvTable {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub index: Vec<Value>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl CsvTable {
    /// Rows rendered as display strings
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.data
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect()
    }
}

/// Render a JSON cell without quotes around strings
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
