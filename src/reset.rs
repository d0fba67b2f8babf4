use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use sched::{FAILED_MARKER, SUCCESS_MARKER};

use crate::fs::Fs;
use crate::settings::Settings;
use crate::ui::Ui;

/// Logic for clearing the results of previous runs so they execute again.
///
/// Every file under the target is removed except configuration files, which
/// the sweep layout needs to rerun. Markers on the target's ancestors are
/// removed too, so parents get re-evaluated once the target finishes again.
pub struct Resetter<'a> {
    fs: &'a Fs,
    ui: &'a Ui,
    settings: &'a Settings,
}

impl<'a> Resetter<'a> {
    /// Create a new `Resetter`.
    pub fn new(settings: &'a Settings, ui: &'a Ui, fs: &'a Fs) -> Self {
        Self { settings, ui, fs }
    }
}

impl Resetter<'_> {
    /// Reset the target unit from settings. Returns the number of files deleted.
    pub fn reset(&self) -> Result<usize> {
        let target = &self.settings.target;
        sched::validate_target(&self.settings.root, target)?;
        eprintln!("{} {:?}", "Resetting".magenta(), target);

        let mut doomed = Vec::with_capacity(64);
        self.collect_files(target, &mut doomed)
            .with_context(|| format!("while scanning {:?} for files to reset", target))?;
        self.collect_ancestor_markers(target, &mut doomed);

        if doomed.is_empty() {
            eprintln!("Nothing to reset.");
            return Ok(0);
        }

        for path in &doomed {
            if self.ui.verbose {
                eprintln!("{} {:?}", "Deleting".red(), path);
            }
        }
        eprintln!("{} {} files.", "Deleting".red(), doomed.len());

        if self.settings.dry_run || !self.ui.confirm("Proceed?")? {
            eprintln!("Not resetting.");
            return Ok(0);
        }

        for path in &doomed {
            self.fs.delete_file(path)?;
        }
        eprintln!("{} {:?}.", "Reset".green(), target);
        Ok(doomed.len())
    }

    fn collect_files(&self, dir: &Path, doomed: &mut Vec<PathBuf>) -> Result<()> {
        for entry in self.fs.read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.collect_files(&path, doomed)?;
            } else if entry.file_name() == self.settings.config_name.as_str() {
                self.ui
                    .verbose_msg(&format!("Preserving config file {:?}", path));
            } else {
                doomed.push(path);
            }
        }
        Ok(())
    }

    fn collect_ancestor_markers(&self, target: &Path, doomed: &mut Vec<PathBuf>) {
        let ancestors = target.ancestors().skip(1);
        for dir in ancestors.take_while(|dir| dir.starts_with(&self.settings.root)) {
            for marker in [SUCCESS_MARKER, FAILED_MARKER] {
                let path = dir.join(marker);
                if self.fs.exists(&path) {
                    doomed.push(path);
                }
            }
        }
    }
}
