//! Status snapshots reported by the backend.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// How a file's diff is presented and fetched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Text,
    Image,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// Authoritative status of a single path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    #[serde(rename = "type", default)]
    pub file_type: FileType,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub conflict: bool,
}

impl FileStatus {
    /// A modified text file.
    pub fn text() -> Self {
        Self::default()
    }

    /// A modified image file.
    pub fn image() -> Self {
        Self {
            file_type: FileType::Image,
            ..Self::default()
        }
    }

    pub fn with_new(mut self) -> Self {
        self.is_new = true;
        self
    }

    pub fn with_removed(mut self) -> Self {
        self.removed = true;
        self
    }

    pub fn with_conflict(mut self) -> Self {
        self.conflict = true;
        self
    }
}

/// One path of a snapshot, in the order the backend listed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotFile {
    pub path: String,
    pub status: FileStatus,
}

/// One poll's worth of authoritative status data.
///
/// `files` keeps the iteration order of the backend's document; that order
/// becomes the order of the staging area after reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(with = "ordered_files", default)]
    pub files: Vec<SnapshotFile>,
    #[serde(default)]
    pub in_rebase: bool,
    #[serde(default)]
    pub in_merge: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

impl StatusSnapshot {
    /// An empty snapshot: clean working tree, no rebase or merge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(path, status)` pairs in order. A repeated path
    /// keeps its first position and takes its last status.
    pub fn from_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, FileStatus)>,
        P: Into<String>,
    {
        let mut collector = FileCollector::default();
        for (path, status) in files {
            collector.push(path.into(), status);
        }
        Self {
            files: collector.files,
            ..Self::default()
        }
    }

    /// Append a path. A path that is already present has its status replaced
    /// in place. Use [`StatusSnapshot::from_files`] for many paths.
    pub fn with_file(mut self, path: impl Into<String>, status: FileStatus) -> Self {
        push_or_replace(&mut self.files, path.into(), status);
        self
    }

    pub fn with_rebase(mut self) -> Self {
        self.in_rebase = true;
        self
    }

    /// Mark the snapshot as mid-merge with the backend's prepared message.
    pub fn with_merge(mut self, commit_message: impl Into<String>) -> Self {
        self.in_merge = true;
        self.commit_message = Some(commit_message.into());
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FileStatus> {
        self.files.iter().find(|f| f.path == path).map(|f| &f.status)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    pub fn from_json(json: &str) -> Result<Self, TypeError> {
        serde_json::from_str(json).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, TypeError> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

/// Ordered file list with a path index, so repeated paths are found without
/// scanning.
#[derive(Default)]
struct FileCollector {
    files: Vec<SnapshotFile>,
    positions: HashMap<String, usize>,
}

impl FileCollector {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    fn push(&mut self, path: String, status: FileStatus) {
        match self.positions.get(&path) {
            Some(&idx) => self.files[idx].status = status,
            None => {
                self.positions.insert(path.clone(), self.files.len());
                self.files.push(SnapshotFile { path, status });
            }
        }
    }
}

fn push_or_replace(files: &mut Vec<SnapshotFile>, path: String, status: FileStatus) {
    match files.iter_mut().find(|f| f.path == path) {
        Some(existing) => existing.status = status,
        None => files.push(SnapshotFile { path, status }),
    }
}

/// `files` travels as a JSON object keyed by path; this keeps document order.
mod ordered_files {
    use super::*;

    pub fn serialize<S: Serializer>(files: &[SnapshotFile], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(files.len()))?;
        for file in files {
            map.serialize_entry(&file.path, &file.status)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SnapshotFile>, D::Error> {
        struct FilesVisitor;

        impl<'de> Visitor<'de> for FilesVisitor {
            type Value = Vec<SnapshotFile>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of path to file status")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut collector = FileCollector::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((path, status)) = access.next_entry::<String, FileStatus>()? {
                    collector.push(path, status);
                }
                Ok(collector.files)
            }
        }

        deserializer.deserialize_map(FilesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_document_order() {
        let json = r#"{
            "files": {
                "zeta.txt": { "type": "text", "isNew": true },
                "alpha.png": { "type": "image", "removed": true },
                "mid.rs": { "type": "text", "conflict": true }
            },
            "inRebase": false,
            "inMerge": false
        }"#;
        let snapshot = StatusSnapshot::from_json(json).unwrap();
        let paths: Vec<&str> = snapshot.paths().collect();
        assert_eq!(paths, vec!["zeta.txt", "alpha.png", "mid.rs"]);
        assert!(snapshot.get("zeta.txt").unwrap().is_new);
        assert_eq!(snapshot.get("alpha.png").unwrap().file_type, FileType::Image);
        assert!(snapshot.get("mid.rs").unwrap().conflict);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let snapshot = StatusSnapshot::from_json(r#"{ "files": { "a.txt": {} } }"#).unwrap();
        assert_eq!(snapshot.get("a.txt"), Some(&FileStatus::text()));
        assert!(!snapshot.in_rebase);
        assert!(!snapshot.in_merge);
        assert!(snapshot.commit_message.is_none());

        let empty = StatusSnapshot::from_json("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn duplicate_path_keeps_first_position_last_value() {
        let json = r#"{ "files": { "a": {}, "b": {}, "a": { "conflict": true } } }"#;
        let snapshot = StatusSnapshot::from_json(json).unwrap();
        let paths: Vec<&str> = snapshot.paths().collect();
        assert_eq!(paths, vec!["a", "b"]);
        assert!(snapshot.get("a").unwrap().conflict);
    }

    #[test]
    fn merge_snapshot_carries_message() {
        let json = r#"{ "files": {}, "inMerge": true, "commitMessage": "Merge X\nnotes" }"#;
        let snapshot = StatusSnapshot::from_json(json).unwrap();
        assert!(snapshot.in_merge);
        assert_eq!(snapshot.commit_message.as_deref(), Some("Merge X\nnotes"));
    }

    #[test]
    fn serializes_files_as_object() {
        let snapshot = StatusSnapshot::new()
            .with_file("b.txt", FileStatus::text().with_new())
            .with_file("a.png", FileStatus::image());
        let json = snapshot.to_json().unwrap();
        assert!(json.find("b.txt").unwrap() < json.find("a.png").unwrap());
        assert_eq!(StatusSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn invalid_json_is_a_serialization_error() {
        let err = StatusSnapshot::from_json("{ files: nope").unwrap_err();
        assert!(matches!(err, TypeError::Serialization(_)));
    }

    #[test]
    fn large_snapshot_keeps_order_and_dedups() {
        let mut json = String::from("{ \"files\": {");
        for i in 0..50_000 {
            json.push_str(&format!("\"dir/file{i}.txt\": {{ \"isNew\": true }},"));
        }
        json.push_str("\"dir/file7.txt\": { \"conflict\": true } } }");

        let snapshot = StatusSnapshot::from_json(&json).unwrap();
        assert_eq!(snapshot.len(), 50_000);
        assert_eq!(snapshot.files[0].path, "dir/file0.txt");
        assert_eq!(snapshot.files[49_999].path, "dir/file49999.txt");
        assert_eq!(snapshot.files[7].path, "dir/file7.txt");
        assert!(snapshot.files[7].status.conflict);
        assert!(!snapshot.files[7].status.is_new);
    }

    #[test]
    fn from_files_dedups_like_json() {
        let snapshot = StatusSnapshot::from_files([
            ("a", FileStatus::text()),
            ("b", FileStatus::image()),
            ("a", FileStatus::text().with_removed()),
        ]);
        let paths: Vec<&str> = snapshot.paths().collect();
        assert_eq!(paths, vec!["a", "b"]);
        assert!(snapshot.get("a").unwrap().removed);
    }

    #[test]
    fn builder_replaces_existing_path() {
        let snapshot = StatusSnapshot::new()
            .with_file("a", FileStatus::text())
            .with_file("a", FileStatus::text().with_removed());
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("a").unwrap().removed);
    }
}
