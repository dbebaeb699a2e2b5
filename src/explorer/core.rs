//! Explorer state machine: phase, generation, tree, selection and
//! in-flight fetch bookkeeping.
//!
//! Everything here is synchronous; the actor owns an [`Explorer`] and
//! wires its transitions to the network.

use std::collections::HashMap;

use tokio::sync::oneshot;

use crate::error::{ExplorerError, Result};
use crate::explorer::context::ContainerContext;
use crate::fs::{FileEntry, FileTree};

/// Lifecycle of the tree with respect to the active context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No container has been selected yet.
    Uninitialized,
    /// A context is active and its root listing is in flight.
    Loading,
    /// The root listing for the active context has been applied. The tree
    /// may still be empty.
    Ready,
}

/// How a listing response was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The fetched entries were merged at the target path.
    Merged,
    /// The listing call failed; an empty entry list was merged instead.
    FailedEmpty,
    /// The response belonged to an abandoned context and was dropped.
    Superseded,
}

/// Reply channel resolved when a fetch has been applied (or superseded).
pub(crate) type MergeWaiter = oneshot::Sender<Result<MergeOutcome>>;

/// A listing fetch that has been issued but not applied yet.
struct PendingFetch {
    /// Root fetches replace the whole tree instead of one subtree.
    is_root: bool,
    waiters: Vec<MergeWaiter>,
}

/// Mutable explorer state, owned by the actor task.
pub(crate) struct Explorer {
    context: Option<ContainerContext>,
    /// Bumped on every context switch; responses carrying an older value
    /// are discarded.
    generation: u64,
    phase: Phase,
    tree: FileTree,
    selection: Option<FileEntry>,
    /// In-flight fetches keyed by path. At most one fetch per path;
    /// concurrent requests attach as extra waiters.
    pending: HashMap<String, PendingFetch>,
}

impl Explorer {
    pub(crate) fn new() -> Self {
        Explorer {
            context: None,
            generation: 0,
            phase: Phase::Uninitialized,
            tree: FileTree::new(),
            selection: None,
            pending: HashMap::new(),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn context(&self) -> Option<&ContainerContext> {
        self.context.as_ref()
    }

    pub(crate) fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub(crate) fn selection(&self) -> Option<&FileEntry> {
        self.selection.as_ref()
    }

    /// The active context, or the error every context-dependent call maps
    /// a missing one to.
    pub(crate) fn require_context(&self) -> Result<&ContainerContext> {
        self.context
            .as_ref()
            .ok_or_else(|| ExplorerError::InvalidContext("no container selected".to_string()))
    }

    /// Enter `Loading` for `ctx`: wipe the tree and selection, supersede
    /// every in-flight fetch, and return the generation the root fetch
    /// must carry. Switching to the already-active context still resets.
    pub(crate) fn begin_switch(&mut self, ctx: ContainerContext) -> Result<u64> {
        ctx.validate()?;
        self.generation += 1;
        self.phase = Phase::Loading;
        self.context = Some(ctx);
        self.tree = FileTree::new();
        self.selection = None;
        self.supersede_pending();
        Ok(self.generation)
    }

    fn supersede_pending(&mut self) {
        for (_, fetch) in self.pending.drain() {
            for waiter in fetch.waiters {
                let _ = waiter.send(Ok(MergeOutcome::Superseded));
            }
        }
    }

    /// Record a fetch for `path`. Returns `true` when the caller has to
    /// actually issue it; `false` means one is already in flight and the
    /// waiter was attached to it.
    pub(crate) fn track_fetch(&mut self, path: &str, is_root: bool, waiter: MergeWaiter) -> bool {
        match self.pending.get_mut(path) {
            Some(fetch) => {
                fetch.waiters.push(waiter);
                false
            }
            None => {
                self.pending.insert(
                    path.to_string(),
                    PendingFetch {
                        is_root,
                        waiters: vec![waiter],
                    },
                );
                true
            }
        }
    }

    /// Apply a resolved listing fetch.
    ///
    /// A response from a superseded generation is dropped without touching
    /// anything; its waiters were already resolved by the switch. A
    /// current one replaces the root or one subtree and resolves the
    /// waiters registered for the path.
    pub(crate) fn apply_listing(
        &mut self,
        generation: u64,
        path: &str,
        entries: Vec<FileEntry>,
        failed: bool,
    ) {
        if generation != self.generation {
            log::debug!(
                "discarding stale listing for {path} (generation {generation}, current {})",
                self.generation
            );
            return;
        }

        let fetch = self.pending.remove(path);
        if fetch.as_ref().map_or(false, |f| f.is_root) {
            self.tree = FileTree::from(entries);
            self.phase = Phase::Ready;
        } else {
            let tree = std::mem::take(&mut self.tree);
            self.tree = tree.replace_subtree(path, entries);
        }

        let outcome = if failed {
            MergeOutcome::FailedEmpty
        } else {
            MergeOutcome::Merged
        };
        if let Some(fetch) = fetch {
            for waiter in fetch.waiters {
                let _ = waiter.send(Ok(outcome));
            }
        }
    }

    pub(crate) fn select(&mut self, entry: FileEntry) {
        self.selection = Some(entry);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Guard for delete: any selected file or directory qualifies. Entries
    /// of another kind (links, sockets, devices) are refused.
    pub(crate) fn delete_target(&self) -> Result<&FileEntry> {
        let entry = self.selection.as_ref().ok_or_else(|| {
            ExplorerError::ActionNotPermitted("nothing is selected".to_string())
        })?;
        if entry.is_file() || entry.is_dir {
            Ok(entry)
        } else {
            Err(ExplorerError::ActionNotPermitted(format!(
                "cannot delete entry of kind \"{}\"",
                entry.kind
            )))
        }
    }

    /// Guard for download: only a plain file qualifies.
    pub(crate) fn download_target(&self) -> Result<&FileEntry> {
        let entry = self.selection.as_ref().ok_or_else(|| {
            ExplorerError::ActionNotPermitted("nothing is selected".to_string())
        })?;
        if entry.is_file() {
            Ok(entry)
        } else {
            Err(ExplorerError::ActionNotPermitted(format!(
                "not a regular file: {}",
                entry.path
            )))
        }
    }

    /// Prune `path` from the tree, clearing the selection if it sat inside
    /// the removed subtree. The follow-up to a confirmed delete.
    pub(crate) fn remove_path(&mut self, path: &str) {
        let tree = std::mem::take(&mut self.tree);
        self.tree = tree.remove_subtree(path);
        let covered = self
            .selection
            .as_ref()
            .map_or(false, |sel| path_covers(path, &sel.path));
        if covered {
            self.selection = None;
        }
    }
}

/// True when `child` is `parent` itself or sits anywhere below it.
fn path_covers(parent: &str, child: &str) -> bool {
    if parent == "/" {
        return true;
    }
    match child.strip_prefix(parent) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
