//! The transport seam between the explorer engine and the remote API.

use async_trait::async_trait;

use crate::error::Result;
use crate::explorer::ContainerContext;
use crate::fs::FileEntry;

/// Remote surface the explorer drives: directory listing plus the two
/// selection-scoped actions.
///
/// [`ApiClient`](crate::ApiClient) is the HTTP implementation. Tests and
/// embedders with their own transport provide `FileSource` implementations
/// of their own; the engine never assumes anything beyond this contract.
#[async_trait]
pub trait FileSource: Send + Sync + 'static {
    /// List the entries of `path` inside the container named by `ctx`.
    ///
    /// `is_dir` is the caller's claim that `path` names a directory; the
    /// backend relies on it instead of re-statting. Entries come back in
    /// backend order with no children attached.
    async fn list(&self, ctx: &ContainerContext, path: &str, is_dir: bool)
        -> Result<Vec<FileEntry>>;

    /// Delete the file or directory at `path`. Returns the backend's
    /// confirmation message, which may be empty.
    async fn delete(&self, ctx: &ContainerContext, path: &str) -> Result<String>;

    /// Fetch the raw bytes of the file at `path`.
    async fn download(&self, ctx: &ContainerContext, path: &str) -> Result<Vec<u8>>;
}
