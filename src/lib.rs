//! # podbrowse
//!
//! Rust client library for browsing the filesystem of a running
//! Kubernetes container through a dashboard file API.
//!
//! ## Features
//!
//! - **Lazy tree loading**: the view starts at the container root and
//!   fetches each directory the first time it is expanded; everything
//!   already loaded elsewhere in the tree stays as it was.
//! - **Context switching**: point the same explorer at another container
//!   (or pod, or namespace) at any time. The tree resets immediately and
//!   responses still in flight for the old container are recognized and
//!   dropped, never merged into the new view.
//! - **Selection & actions**:
//!   - Delete the selected file or directory.
//!   - Download the selected file's bytes, with the name to save under.
//!   - Both are guarded locally, so an ineligible selection fails before
//!     any network call.
//! - **Pluggable transport**: the engine drives any [`FileSource`];
//!   [`ApiClient`] is the HTTP implementation with bearer-token auth and
//!   typed errors for expired sessions and disconnected clusters.
//!
//! Deleting on the backend does not prune the tree by itself; call
//! [`ExplorerHandle::remove_path`] with the deleted path once the
//! confirmation has been surfaced.
//!
//! ## Example
//!
//! ```no_run
//! use podbrowse::{ApiClient, ContainerContext, ExplorerHandle};
//!
//! # async fn example() -> podbrowse::Result<()> {
//! let api = ApiClient::new("http://localhost:3618").with_token("eyJhbGciOi...");
//! let explorer = ExplorerHandle::new(api);
//!
//! // Pick a container; this loads the root listing.
//! let ctx = ContainerContext::new("web-0", "default", "nginx");
//! explorer.switch_context(ctx).await?;
//!
//! // Expand a directory and walk the snapshot.
//! explorer.expand("/etc").await?;
//! for entry in explorer.tree().await?.roots() {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod explorer;
pub mod fs;
pub mod http;
pub mod source;

// Re-export commonly used types
pub use api::ApiClient;
pub use error::{ExplorerError, Result};
pub use explorer::{
    ContainerContext, Download, ExplorerHandle, ExplorerStatus, MergeOutcome, Phase,
};
pub use fs::{FileEntry, FileTree};
pub use source::FileSource;
