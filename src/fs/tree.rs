//! The in-memory directory tree and its path-addressed updates.

use serde::Serialize;

use crate::fs::entry::FileEntry;

/// A partially-populated snapshot of one container's filesystem.
///
/// Every update consumes the tree and returns the replacement, so a clone
/// taken before an update is never touched by it. Paths are matched
/// exactly as the backend reported them; no normalization happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileTree {
    roots: Vec<FileEntry>,
}

impl FileTree {
    /// Empty tree, the state before any root listing has been applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of the container root listing, in backend order.
    pub fn roots(&self) -> &[FileEntry] {
        &self.roots
    }

    /// Check whether nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of root entries.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Replace the children of the directory at `at_path` wholesale.
    ///
    /// Siblings and loaded branches elsewhere stay untouched. When the
    /// path is absent (a late response for a tree that has moved on) or
    /// names a non-directory, the tree comes back unchanged.
    pub fn replace_subtree(mut self, at_path: &str, children: Vec<FileEntry>) -> Self {
        let mut payload = Some(children);
        replace_in(&mut self.roots, at_path, &mut payload);
        self
    }

    /// Remove the entry at `path` along with its loaded descendants.
    /// No-op when the path is absent.
    pub fn remove_subtree(mut self, path: &str) -> Self {
        remove_in(&mut self.roots, path);
        self
    }

    /// Find the entry at an exact path anywhere in the loaded tree.
    pub fn find(&self, path: &str) -> Option<&FileEntry> {
        find_in(&self.roots, path)
    }

    /// Check whether an exact path is present in the loaded tree.
    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }
}

impl From<Vec<FileEntry>> for FileTree {
    /// A fresh tree from a root listing.
    fn from(roots: Vec<FileEntry>) -> Self {
        Self { roots }
    }
}

/// Walk `nodes` looking for `at_path`; `payload` is taken by the first
/// match (or dropped if the match is not a directory), which also stops
/// the walk.
fn replace_in(nodes: &mut [FileEntry], at_path: &str, payload: &mut Option<Vec<FileEntry>>) {
    for node in nodes.iter_mut() {
        if payload.is_none() {
            return;
        }
        if node.path == at_path {
            let children = payload.take();
            if node.is_dir {
                node.children = children;
            }
            return;
        }
        if let Some(ref mut kids) = node.children {
            replace_in(kids, at_path, payload);
        }
    }
}

fn remove_in(nodes: &mut Vec<FileEntry>, path: &str) -> bool {
    if let Some(idx) = nodes.iter().position(|n| n.path == path) {
        nodes.remove(idx);
        return true;
    }
    for node in nodes.iter_mut() {
        if let Some(ref mut kids) = node.children {
            if remove_in(kids, path) {
                return true;
            }
        }
    }
    false
}

fn find_in<'a>(nodes: &'a [FileEntry], path: &str) -> Option<&'a FileEntry> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if let Some(ref kids) = node.children {
            if let Some(found) = find_in(kids, path) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, path: &str, is_dir: bool) -> FileEntry {
        FileEntry::new(name, path, is_dir)
    }

    /// Root listing with /etc and /var directories plus the /init file.
    fn sample_tree() -> FileTree {
        FileTree::from(vec![
            entry("etc", "/etc", true),
            entry("var", "/var", true),
            entry("init", "/init", false),
        ])
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree = FileTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.find("/etc").is_none());
    }

    #[test]
    fn test_replace_subtree_populates_children() {
        let tree = sample_tree().replace_subtree(
            "/etc",
            vec![
                entry("passwd", "/etc/passwd", false),
                entry("rc.d", "/etc/rc.d", true),
            ],
        );

        let etc = tree.find("/etc").unwrap();
        let names: Vec<&str> = etc
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["passwd", "rc.d"]);
    }

    #[test]
    fn test_replace_subtree_leaves_siblings_alone() {
        let tree = sample_tree()
            .replace_subtree("/var", vec![entry("log", "/var/log", true)])
            .replace_subtree("/etc", vec![entry("passwd", "/etc/passwd", false)]);

        // The /var branch keeps its loaded children after /etc is merged.
        let var = tree.find("/var").unwrap();
        assert!(var.children_loaded());
        assert!(tree.contains("/var/log"));

        let init = tree.find("/init").unwrap();
        assert!(init.children.is_none());
    }

    #[test]
    fn test_replace_subtree_overwrites_previous_children() {
        let tree = sample_tree()
            .replace_subtree("/etc", vec![entry("old", "/etc/old", false)])
            .replace_subtree("/etc", vec![entry("new", "/etc/new", false)]);

        assert!(!tree.contains("/etc/old"));
        assert!(tree.contains("/etc/new"));
    }

    #[test]
    fn test_replace_subtree_nested_target() {
        let tree = sample_tree()
            .replace_subtree("/etc", vec![entry("rc.d", "/etc/rc.d", true)])
            .replace_subtree("/etc/rc.d", vec![entry("rc.local", "/etc/rc.d/rc.local", false)]);

        assert!(tree.contains("/etc/rc.d/rc.local"));
    }

    #[test]
    fn test_replace_subtree_missing_path_is_noop() {
        let before = sample_tree().replace_subtree("/etc", vec![entry("passwd", "/etc/passwd", false)]);
        let after = before
            .clone()
            .replace_subtree("/proc", vec![entry("1", "/proc/1", true)]);
        assert_eq!(before, after);
    }

    #[test]
    fn test_replace_subtree_on_file_is_noop() {
        let before = sample_tree();
        let after = before
            .clone()
            .replace_subtree("/init", vec![entry("ghost", "/init/ghost", false)]);
        assert_eq!(before, after);
        assert!(after.find("/init").unwrap().children.is_none());
    }

    #[test]
    fn test_replace_subtree_empty_children_marks_loaded() {
        let tree = sample_tree().replace_subtree("/etc", vec![]);
        let etc = tree.find("/etc").unwrap();
        assert!(etc.children_loaded());
        assert_eq!(etc.children.as_ref().unwrap().len(), 0);
    }

    #[test]
    fn test_remove_subtree_root_entry() {
        let tree = sample_tree().remove_subtree("/init");
        assert!(!tree.contains("/init"));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_subtree_nested_drops_descendants() {
        let tree = sample_tree()
            .replace_subtree("/etc", vec![entry("rc.d", "/etc/rc.d", true)])
            .replace_subtree("/etc/rc.d", vec![entry("rc.local", "/etc/rc.d/rc.local", false)])
            .remove_subtree("/etc/rc.d");

        assert!(!tree.contains("/etc/rc.d"));
        assert!(!tree.contains("/etc/rc.d/rc.local"));
        assert!(tree.contains("/etc"));
    }

    #[test]
    fn test_remove_subtree_missing_path_is_noop() {
        let before = sample_tree();
        let after = before.clone().remove_subtree("/nope");
        assert_eq!(before, after);
    }

    #[test]
    fn test_find_reaches_into_loaded_branches() {
        let tree = sample_tree()
            .replace_subtree("/var", vec![entry("log", "/var/log", true)])
            .replace_subtree("/var/log", vec![entry("syslog", "/var/log/syslog", false)]);

        assert_eq!(tree.find("/var/log/syslog").unwrap().name, "syslog");
        // Exact match only, no prefix matching.
        assert!(tree.find("/var/log/sys").is_none());
    }

    #[test]
    fn test_clone_is_isolated_from_updates() {
        let before = sample_tree();
        let snapshot = before.clone();
        let _after = before.replace_subtree("/etc", vec![entry("passwd", "/etc/passwd", false)]);
        assert!(!snapshot.contains("/etc/passwd"));
    }
}
