//! Filesystem view module: entries and the lazy tree.

pub(crate) mod entry;
pub(crate) mod tree;

pub use entry::FileEntry;
pub use tree::FileTree;
