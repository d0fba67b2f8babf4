//! Marker files record a unit's terminal outcome in its own directory.
//!
//! Markers are only ever created here. Clearing them is a reset, which
//! the caller does outside this module.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};

use crate::{Error, FAILED_MARKER, SUCCESS_MARKER};

/// Which markers are present in a unit directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    None,
    Success,
    Failed,
    /// Both markers exist. Never produced by this crate.
    Conflict,
}

/// True if `dir` holds a `SUCCESS` marker.
pub fn is_success(dir: &Path) -> bool {
    dir.join(SUCCESS_MARKER).exists()
}

/// True if `dir` holds a `FAILED` marker.
pub fn is_failed(dir: &Path) -> bool {
    dir.join(FAILED_MARKER).exists()
}

/// Look at both markers in `dir`.
pub fn read(dir: &Path) -> MarkerState {
    match (is_success(dir), is_failed(dir)) {
        (false, false) => MarkerState::None,
        (true, false) => MarkerState::Success,
        (false, true) => MarkerState::Failed,
        (true, true) => MarkerState::Conflict,
    }
}

/// Write the `SUCCESS` marker into `dir`.
pub fn mark_success(dir: &Path) -> Result<()> {
    mark(dir, SUCCESS_MARKER, FAILED_MARKER)
}

/// Write the `FAILED` marker into `dir`.
pub fn mark_failed(dir: &Path) -> Result<()> {
    mark(dir, FAILED_MARKER, SUCCESS_MARKER)
}

fn mark(dir: &Path, marker: &'static str, opposite: &str) -> Result<()> {
    if dir.join(opposite).exists() {
        return Err(Error::ConflictingMarker(marker, dir.to_path_buf()).into());
    }
    let path = dir.join(marker);
    // no truncate: touching an existing marker leaves it as it was.
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("writing marker {:?}", path))?;
    log::debug!("wrote {marker} marker in {dir:?}");
    Ok(())
}
