//! Building blocks shared by the imaging dataset drafts (BIDS, MedicalFolder)

use super::dataset::CsvTable;
use super::repository::RepoPath;
use serde::{Deserialize, Serialize};

/// Column of the reference CSV that names the subject folders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceColumn {
    pub index: Option<usize>,
    pub name: Option<String>,
}

impl ReferenceColumn {
    pub fn is_selected(&self) -> bool {
        self.name.is_some()
    }
}

/// Which subjects exist in both the reference CSV and the folder tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectReport {
    #[serde(default, alias = "intersection")]
    pub available_subjects: Option<Vec<String>>,
    /// Listed in the CSV but no folder
    #[serde(default)]
    pub missing_folders: Option<Vec<String>>,
    /// Folder present but not in the CSV
    #[serde(default)]
    pub missing_entries: Option<Vec<String>>,
}

/// Selected reference column and the resulting subject report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSelection {
    pub reference: ReferenceColumn,
    pub subjects: SubjectReport,
}

/// Reference/demographics CSV chosen by the operator
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCsv {
    pub path: RepoPath,
    pub data: CsvTable,
}

/// Name, tags and description entered in the metadata step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetMetadata {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub desc: Option<String>,
}

/// Partial metadata update; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub desc: Option<String>,
}

impl DatasetMetadata {
    pub fn apply(self, patch: &MetadataPatch) -> Self {
        Self {
            name: patch.name.clone().or(self.name),
            tags: patch.tags.clone().or(self.tags),
            desc: patch.desc.clone().or(self.desc),
        }
    }

    /// All three fields filled with something other than blanks
    pub fn is_complete(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.name)
            && filled(&self.desc)
            && self.tags.as_ref().is_some_and(|tags| !tags.is_empty())
    }
}

/// Split a comma-separated tag line, honouring quoted tags that contain commas
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    reader
        .records()
        .filter_map(Result::ok)
        .flat_map(|record| {
            record
                .iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|tag| !tag.is_empty())
        .collect()
}
