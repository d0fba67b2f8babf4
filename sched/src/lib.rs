//!
//! Scheduling of benchmark sweep units.
//!
//! A sweep is a directory tree. Each directory is a unit: directories with
//! subdirectories are parents, the rest are leaves. Leaves run an external
//! command through a [`Work`] implementation; parents take their status from
//! their children. Outcomes are recorded as `SUCCESS`/`FAILED` marker files in
//! each unit's directory, which is the only state that survives between
//! invocations. A host-wide [`Lock`] keeps two schedulers from running at once.
//!
//! Building a [`Scheduler`] happens in two phases:
//! 1. Walk the filesystem into a plain [`PathTree`].
//! 2. Map the tree into an arena of [`Unit`]s linked by [`UnitId`].

/// typed ids for the unit arena
mod id;
pub use id::UnitId;

/// reading and writing marker files
pub mod marker;
pub use marker::MarkerState;

/// host-wide execution lock
mod lock;
pub use lock::{FileLock, Lock, LockGuard};

/// unit status and its evaluation rules
mod status;
pub use status::{aggregate, Status};

/// a single schedulable node
mod unit;
pub use unit::{Unit, UnitKind};

/// phase 1 of discovery: directories into a tree of paths
mod tree;
pub use tree::PathTree;

/// discovery phase 2, status evaluation, and execution
mod scheduler;
pub use scheduler::{validate_target, RunOutcome, RunSummary, Scheduler};

/// the function that actually runs a leaf
mod work;
pub use work::Work;

/// Name of the marker file written when a unit succeeds.
pub const SUCCESS_MARKER: &str = "SUCCESS";
/// Name of the marker file written when a unit fails.
pub const FAILED_MARKER: &str = "FAILED";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Target {0:?} is not inside the sweep root {1:?}")]
    NotUnderSweepRoot(std::path::PathBuf, std::path::PathBuf),
    #[error("Target {0:?} does not exist or is not a directory")]
    NotADirectory(std::path::PathBuf),
    #[error("Refusing to write {0} marker in {1:?}: the opposite marker already exists")]
    ConflictingMarker(&'static str, std::path::PathBuf),
}
