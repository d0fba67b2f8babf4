use std::path::Path;

use anyhow::Result;

/// What a leaf unit actually does when it runs.
///
/// Both methods receive the leaf's directory. An `Err` from either one is
/// not a benchmark failure: it aborts the whole run and no marker is written.
pub trait Work {
    /// Set up the unit directory before executing (e.g. copy configuration in).
    fn prepare(&mut self, _unit_dir: &Path) -> Result<()> {
        Ok(())
    }

    /// Run the benchmark step and return its exit status; 0 means success.
    fn execute(&mut self, unit_dir: &Path) -> Result<i32>;
}
