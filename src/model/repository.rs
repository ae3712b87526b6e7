//! Node data-path listing as returned by the repository endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A path inside the node's data directory, as hierarchical segments
pub type RepoPath = Vec<String>;

/// Render a repository path for display (`/` when empty)
pub fn display_path(path: &[String]) -> String {
    format!("/{}", path.join("/"))
}

/// Split a display path back into segments
pub fn parse_path(path: &str) -> RepoPath {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One file or folder in a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: RepoPath,
    #[serde(default)]
    pub extension: String,
    /// Dataset registered at exactly this path, if any
    #[serde(default)]
    pub registered: Option<Value>,
    /// Datasets registered somewhere below this folder
    #[serde(default)]
    pub includes: Vec<Value>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub size: Option<Value>,
}

impl FileEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_registered(&self) -> bool {
        self.registered.as_ref().is_some_and(|v| !v.is_null())
    }

    /// Whether the entry's extension is one of `extensions` (e.g. `.csv`)
    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        extensions
            .iter()
            .any(|ext| self.extension.eq_ignore_ascii_case(ext))
    }
}

/// Result of listing one folder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryListing {
    #[serde(default)]
    pub level: usize,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Total entries in the folder
    #[serde(default)]
    pub number: usize,
    /// Entries actually returned (capped by the node)
    #[serde(default)]
    pub displays: usize,
    #[serde(default)]
    pub path: RepoPath,
}
