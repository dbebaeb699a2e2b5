//! Actor-based explorer runtime.
//!
//! All state lives in one task; the cloneable [`ExplorerHandle`] sends it
//! commands and awaits replies. Listing fetches run as separate tasks and
//! re-enter the actor tagged with the generation they were issued under,
//! so a context switch never waits on the network and stale results are
//! recognized on arrival.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::error::{ExplorerError, Result};
use crate::explorer::context::ContainerContext;
use crate::explorer::core::{Explorer, MergeOutcome, MergeWaiter, Phase};
use crate::fs::{FileEntry, FileTree};
use crate::source::FileSource;

/// Path listed on every context switch.
const ROOT_PATH: &str = "/";

/// Name used for a download whose entry has no name.
const FALLBACK_DOWNLOAD_NAME: &str = "download";

/// Snapshot of the controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerStatus {
    pub phase: Phase,
    pub context: Option<ContainerContext>,
}

/// A completed download: the file bytes plus the name to save them under.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Cloneable handle to a running explorer actor.
#[derive(Clone)]
pub struct ExplorerHandle {
    tx: mpsc::Sender<ExplorerCommand>,
}

enum ExplorerCommand {
    SwitchContext {
        context: ContainerContext,
        reply: MergeWaiter,
    },
    Expand {
        path: String,
        reply: MergeWaiter,
    },
    Select {
        entry: FileEntry,
        reply: oneshot::Sender<Result<()>>,
    },
    ClearSelection {
        reply: oneshot::Sender<Result<()>>,
    },
    Selection {
        reply: oneshot::Sender<Result<Option<FileEntry>>>,
    },
    Tree {
        reply: oneshot::Sender<Result<FileTree>>,
    },
    Status {
        reply: oneshot::Sender<Result<ExplorerStatus>>,
    },
    DeleteSelected {
        reply: oneshot::Sender<Result<String>>,
    },
    DownloadSelected {
        reply: oneshot::Sender<Result<Download>>,
    },
    RemovePath {
        path: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// A resolved listing fetch re-entering the actor.
struct Fetched {
    generation: u64,
    path: String,
    result: Result<Vec<FileEntry>>,
}

struct ExplorerActor {
    explorer: Explorer,
    source: Arc<dyn FileSource>,
    rx: mpsc::Receiver<ExplorerCommand>,
    fetched_tx: mpsc::Sender<Fetched>,
    fetched_rx: mpsc::Receiver<Fetched>,
}

impl ExplorerHandle {
    /// Spawn an explorer over the given source. The tree stays empty
    /// until the first [`switch_context`](Self::switch_context).
    pub fn new(source: impl FileSource) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Spawn an explorer over an already-shared source.
    pub fn from_arc(source: Arc<dyn FileSource>) -> Self {
        ExplorerActor::spawn(source)
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R>>) -> ExplorerCommand,
    ) -> Result<R> {
        let (tx, rx) = oneshot::channel();
        let cmd = build(tx);
        self.tx.send(cmd).await.map_err(|_| ExplorerError::ActorStopped)?;
        rx.await.map_err(|_| ExplorerError::ActorStopped)?
    }

    /// Make `context` the active container and reload the tree from its
    /// root.
    ///
    /// Resolves once the root listing has been applied, or with
    /// [`MergeOutcome::Superseded`] when a later switch abandoned this
    /// one first. Switching to the context that is already active still
    /// resets and reloads it.
    pub async fn switch_context(&self, context: ContainerContext) -> Result<MergeOutcome> {
        self.request(|reply| ExplorerCommand::SwitchContext { context, reply })
            .await
    }

    /// Fetch the children of the directory at `path` and merge them into
    /// the tree.
    ///
    /// While a fetch for `path` is in flight, further `expand` calls for
    /// it attach to that fetch instead of issuing another request; all of
    /// them resolve with the same outcome. A failed fetch resolves as
    /// [`MergeOutcome::FailedEmpty`] and leaves the directory loaded but
    /// empty.
    pub async fn expand(&self, path: &str) -> Result<MergeOutcome> {
        self.request(|reply| ExplorerCommand::Expand {
            path: path.to_string(),
            reply,
        })
        .await
    }

    /// Record `entry` as the current selection.
    ///
    /// The entry is taken as given; it does not have to sit in the loaded
    /// tree. A context switch clears it.
    pub async fn select(&self, entry: FileEntry) -> Result<()> {
        self.request(|reply| ExplorerCommand::Select { entry, reply })
            .await
    }

    /// Clear the current selection.
    pub async fn clear_selection(&self) -> Result<()> {
        self.request(|reply| ExplorerCommand::ClearSelection { reply })
            .await
    }

    /// The current selection, if any.
    pub async fn selection(&self) -> Result<Option<FileEntry>> {
        self.request(|reply| ExplorerCommand::Selection { reply })
            .await
    }

    /// Snapshot of the current tree.
    pub async fn tree(&self) -> Result<FileTree> {
        self.request(|reply| ExplorerCommand::Tree { reply }).await
    }

    /// Current phase and active context.
    pub async fn status(&self) -> Result<ExplorerStatus> {
        self.request(|reply| ExplorerCommand::Status { reply }).await
    }

    /// Delete the selected entry on the backend.
    ///
    /// Permitted for a selected file or directory; anything else fails
    /// with [`ExplorerError::ActionNotPermitted`] before any network
    /// call. Returns the backend's confirmation message. The tree is not
    /// touched; call [`remove_path`](Self::remove_path) with the deleted
    /// path after surfacing the confirmation.
    pub async fn delete_selected(&self) -> Result<String> {
        self.request(|reply| ExplorerCommand::DeleteSelected { reply })
            .await
    }

    /// Download the selected entry's bytes.
    ///
    /// Permitted only when the selection is exactly a file; directories
    /// and special entries fail with
    /// [`ExplorerError::ActionNotPermitted`] before any network call.
    pub async fn download_selected(&self) -> Result<Download> {
        self.request(|reply| ExplorerCommand::DownloadSelected { reply })
            .await
    }

    /// Prune `path` and its descendants from the tree, clearing the
    /// selection when it sat inside the removed subtree. No-op for paths
    /// that are not loaded.
    pub async fn remove_path(&self, path: &str) -> Result<()> {
        self.request(|reply| ExplorerCommand::RemovePath {
            path: path.to_string(),
            reply,
        })
        .await
    }

    /// Stop the actor. Pending commands queued behind this one get
    /// [`ExplorerError::ActorStopped`].
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        let _ = self.tx.send(ExplorerCommand::Shutdown { reply: tx }).await;
        let _ = rx.await;
    }
}

impl ExplorerActor {
    fn spawn(source: Arc<dyn FileSource>) -> ExplorerHandle {
        let (tx, rx) = mpsc::channel(64);
        let (fetched_tx, fetched_rx) = mpsc::channel(64);
        let actor = ExplorerActor {
            explorer: Explorer::new(),
            source,
            rx,
            fetched_tx,
            fetched_rx,
        };
        tokio::spawn(actor.run());
        ExplorerHandle { tx }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if self.handle_command(cmd).await {
                        break;
                    }
                }
                Some(fetched) = self.fetched_rx.recv() => {
                    self.handle_fetched(fetched);
                }
            }
        }
    }

    /// Spawn the listing call for `path` as its own task; its result
    /// re-enters through the fetched channel carrying `generation`.
    fn spawn_fetch(&self, ctx: ContainerContext, generation: u64, path: String) {
        let source = Arc::clone(&self.source);
        let fetched_tx = self.fetched_tx.clone();
        tokio::spawn(async move {
            let result = source.list(&ctx, &path, true).await;
            let _ = fetched_tx
                .send(Fetched {
                    generation,
                    path,
                    result,
                })
                .await;
        });
    }

    fn handle_fetched(&mut self, fetched: Fetched) {
        let Fetched {
            generation,
            path,
            result,
        } = fetched;
        // Transport failures surface in the log and in the merge outcome,
        // then merge as an empty listing.
        let (entries, failed) = match result {
            Ok(entries) => (entries, false),
            Err(err) => {
                log::warn!("listing {path} failed, merging empty: {err}");
                (Vec::new(), true)
            }
        };
        self.explorer.apply_listing(generation, &path, entries, failed);
    }

    async fn handle_command(&mut self, cmd: ExplorerCommand) -> bool {
        match cmd {
            ExplorerCommand::SwitchContext { context, reply } => {
                match self.explorer.begin_switch(context.clone()) {
                    Ok(generation) => {
                        log::debug!("switched to {context} (generation {generation})");
                        self.explorer.track_fetch(ROOT_PATH, true, reply);
                        self.spawn_fetch(context, generation, ROOT_PATH.to_string());
                    }
                    Err(err) => {
                        let _ = reply.send(Err(err));
                    }
                }
            }
            ExplorerCommand::Expand { path, reply } => {
                let ctx = match self.explorer.require_context() {
                    Ok(ctx) => ctx.clone(),
                    Err(err) => {
                        let _ = reply.send(Err(err));
                        return false;
                    }
                };
                let generation = self.explorer.generation();
                if self.explorer.track_fetch(&path, false, reply) {
                    self.spawn_fetch(ctx, generation, path);
                } else {
                    log::debug!("expand of {path} already in flight, attaching");
                }
            }
            ExplorerCommand::Select { entry, reply } => {
                self.explorer.select(entry);
                let _ = reply.send(Ok(()));
            }
            ExplorerCommand::ClearSelection { reply } => {
                self.explorer.clear_selection();
                let _ = reply.send(Ok(()));
            }
            ExplorerCommand::Selection { reply } => {
                let _ = reply.send(Ok(self.explorer.selection().cloned()));
            }
            ExplorerCommand::Tree { reply } => {
                let _ = reply.send(Ok(self.explorer.tree().clone()));
            }
            ExplorerCommand::Status { reply } => {
                let status = ExplorerStatus {
                    phase: self.explorer.phase(),
                    context: self.explorer.context().cloned(),
                };
                let _ = reply.send(Ok(status));
            }
            ExplorerCommand::DeleteSelected { reply } => {
                let ctx = match self.explorer.require_context() {
                    Ok(ctx) => ctx.clone(),
                    Err(err) => {
                        let _ = reply.send(Err(err));
                        return false;
                    }
                };
                let path = match self.explorer.delete_target() {
                    Ok(entry) => entry.path.clone(),
                    Err(err) => {
                        let _ = reply.send(Err(err));
                        return false;
                    }
                };
                log::debug!("deleting {path} in {ctx}");
                let res = self.source.delete(&ctx, &path).await;
                // The tree keeps the entry until remove_path; the caller
                // decides when the confirmation has been surfaced.
                let _ = reply.send(res);
            }
            ExplorerCommand::DownloadSelected { reply } => {
                let ctx = match self.explorer.require_context() {
                    Ok(ctx) => ctx.clone(),
                    Err(err) => {
                        let _ = reply.send(Err(err));
                        return false;
                    }
                };
                let (path, file_name) = match self.explorer.download_target() {
                    Ok(entry) => {
                        let name = if entry.name.is_empty() {
                            FALLBACK_DOWNLOAD_NAME.to_string()
                        } else {
                            entry.name.clone()
                        };
                        (entry.path.clone(), name)
                    }
                    Err(err) => {
                        let _ = reply.send(Err(err));
                        return false;
                    }
                };
                log::debug!("downloading {path} in {ctx}");
                let res = self
                    .source
                    .download(&ctx, &path)
                    .await
                    .map(|bytes| Download { file_name, bytes });
                let _ = reply.send(res);
            }
            ExplorerCommand::RemovePath { path, reply } => {
                self.explorer.remove_path(&path);
                let _ = reply.send(Ok(()));
            }
            ExplorerCommand::Shutdown { reply } => {
                let _ = reply.send(());
                return true;
            }
        }
        false
    }
}
