//! Directory entry type and identity key assignment.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::api::types::RawEntry;

/// One entry in a container's directory tree.
///
/// The stat fields mirror what the backend reports; `children` is `None`
/// until the entry has been expanded, and `Some` (possibly empty) after.
/// Serializes with the camelCase field names tree renderers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Base name of the entry
    pub name: String,
    /// Entry type as reported by the backend, e.g. "file", "dir", "link"
    #[serde(rename = "type")]
    pub kind: String,
    /// Permission string, e.g. "-rw-r--r--"
    pub permissions: String,
    /// Owning user
    pub owner: String,
    /// Owning group
    pub group: String,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Modification time as reported, not parsed
    pub mod_time: String,
    /// Absolute path inside the container
    pub path: String,
    /// Whether the entry can be expanded
    pub is_dir: bool,
    /// Loaded children; `None` means not fetched yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileEntry>>,
    /// Stable reconciliation key derived from the path
    pub identity_key: String,
}

impl FileEntry {
    /// Minimal constructor for programmatic trees: derives the identity
    /// key and the kind, leaves the stat strings empty.
    pub fn new(name: impl Into<String>, path: impl Into<String>, is_dir: bool) -> Self {
        let path = path.into();
        let identity_key = identity_key_for(&path);
        let kind = if is_dir { "dir" } else { "file" };
        FileEntry {
            name: name.into(),
            kind: kind.to_string(),
            permissions: String::new(),
            owner: String::new(),
            group: String::new(),
            size: 0,
            mod_time: String::new(),
            path,
            is_dir,
            children: None,
            identity_key,
        }
    }

    /// Build an entry from a raw backend row, assigning its identity key.
    pub(crate) fn from_raw(raw: RawEntry) -> Self {
        let identity_key = identity_key_for(&raw.path);
        FileEntry {
            name: raw.name,
            kind: raw.kind,
            permissions: raw.permissions,
            owner: raw.owner,
            group: raw.group,
            size: raw.size,
            mod_time: raw.mod_time,
            path: raw.path,
            is_dir: raw.is_dir,
            children: None,
            identity_key,
        }
    }

    /// Normalize a fetched batch: backend order is kept, and identity keys
    /// are made unique within the batch by suffixing repeats.
    pub(crate) fn from_rows(rows: Vec<RawEntry>) -> Vec<FileEntry> {
        let mut seen: HashMap<String, u32> = HashMap::new();
        rows.into_iter()
            .map(|raw| {
                let mut entry = FileEntry::from_raw(raw);
                let count = seen.entry(entry.identity_key.clone()).or_insert(0);
                *count += 1;
                if *count > 1 {
                    entry.identity_key = format!("{}-{}", entry.identity_key, *count - 1);
                }
                entry
            })
            .collect()
    }

    /// Check if this entry is exactly a file. Links, sockets and the other
    /// special kinds report `false` even though they are not directories.
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }

    /// Check if this entry renders as a leaf (cannot be expanded).
    pub fn is_leaf(&self) -> bool {
        !self.is_dir
    }

    /// Check if this entry's children have been fetched. An expanded empty
    /// directory counts as loaded.
    pub fn children_loaded(&self) -> bool {
        self.children.is_some()
    }
}

/// Deterministic identity key for a path: the first 9 bytes of its
/// SHA-256 digest, URL-safe base64 without padding (12 characters).
pub(crate) fn identity_key_for(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..9])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, path: &str, is_dir: bool) -> RawEntry {
        let kind = if is_dir { "dir" } else { "file" };
        RawEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            path: path.to_string(),
            is_dir,
            ..RawEntry::default()
        }
    }

    #[test]
    fn test_identity_key_is_deterministic() {
        let a = identity_key_for("/etc/passwd");
        let b = identity_key_for("/etc/passwd");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(!a.contains('='));
    }

    #[test]
    fn test_identity_key_differs_per_path() {
        assert_ne!(identity_key_for("/etc"), identity_key_for("/etc/passwd"));
        assert_ne!(identity_key_for("/a"), identity_key_for("/b"));
    }

    #[test]
    fn test_from_rows_keeps_order() {
        let entries = FileEntry::from_rows(vec![
            raw("etc", "/etc", true),
            raw("init", "/init", false),
            raw("var", "/var", true),
        ]);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["etc", "init", "var"]);
    }

    #[test]
    fn test_from_rows_suffixes_duplicate_keys() {
        let entries = FileEntry::from_rows(vec![
            raw("passwd", "/etc/passwd", false),
            raw("passwd", "/etc/passwd", false),
            raw("passwd", "/etc/passwd", false),
        ]);
        let base = identity_key_for("/etc/passwd");
        assert_eq!(entries[0].identity_key, base);
        assert_eq!(entries[1].identity_key, format!("{}-1", base));
        assert_eq!(entries[2].identity_key, format!("{}-2", base));
    }

    #[test]
    fn test_entry_predicates() {
        let file = FileEntry::new("init", "/init", false);
        assert!(file.is_file());
        assert!(file.is_leaf());
        assert!(!file.children_loaded());

        let dir = FileEntry::new("etc", "/etc", true);
        assert!(!dir.is_file());
        assert!(!dir.is_leaf());

        let mut link = FileEntry::new("lib64", "/lib64", false);
        link.kind = "link".to_string();
        assert!(!link.is_file());
        assert!(link.is_leaf());
    }

    #[test]
    fn test_loaded_empty_dir_counts_as_loaded() {
        let mut dir = FileEntry::new("empty", "/empty", true);
        assert!(!dir.children_loaded());
        dir.children = Some(vec![]);
        assert!(dir.children_loaded());
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let entry = FileEntry::new("etc", "/etc", true);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "dir");
        assert_eq!(value["isDir"], true);
        assert_eq!(value["identityKey"], identity_key_for("/etc"));
        // Unloaded children stay off the wire entirely.
        assert!(value.get("children").is_none());
    }
}
