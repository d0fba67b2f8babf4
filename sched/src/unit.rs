use std::path::{Path, PathBuf};

use crate::{Status, UnitId};

/// Whether a unit runs a command or aggregates its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// No subdirectories; runs the benchmark command.
    Leaf,
    /// Has subdirectories; status comes from its dependencies.
    Parent,
}

/// A single schedulable directory in the sweep tree.
#[derive(Debug)]
pub struct Unit {
    /// Directory of this unit; also its identifier.
    pub path: PathBuf,
    pub kind: UnitKind,
    pub status: Status,
    /// Immediate child units. Always empty for leaves.
    pub dependencies: Vec<UnitId>,
}

impl Unit {
    pub fn new(path: PathBuf, kind: UnitKind) -> Self {
        Self {
            path,
            kind,
            status: Status::Pending,
            dependencies: Vec::with_capacity(0),
        }
    }

    pub fn is_parent(&self) -> bool {
        self.kind == UnitKind::Parent
    }

    pub fn completed(&self) -> bool {
        self.status.completed()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
