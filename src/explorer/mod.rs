//! Explorer engine: context switching, lazy expansion, selection and
//! the guarded file actions.

mod actor;
mod context;
mod core;

pub use actor::{Download, ExplorerHandle, ExplorerStatus};
pub use context::ContainerContext;
pub use core::{MergeOutcome, Phase};
