use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use colored::Colorize;

use sched::Work;

use crate::fs::Fs;
use crate::settings::Settings;
use crate::ui::Ui;

use super::run_cmd::run_cmd;

/// Runs the benchmark executable in a leaf unit directory.
///
/// Before each run, the unit's configuration (the nearest `config.yaml` found
/// walking up from the unit, without leaving the sweep root) is copied into the
/// unit directory as `used_cfg.yaml`, and to `--config-dest` if one was given.
pub struct BenchCommand<'a> {
    /// executable, made absolute if it was given as a relative path
    program: PathBuf,
    settings: &'a Settings,
    fs: &'a Fs,
    ui: &'a mut Ui,
    /// for whenever we need to create a path:
    pathbuf: PathBuf,
}

impl<'a> BenchCommand<'a> {
    /// Create a new `BenchCommand` running `program` with the args in `settings`.
    pub fn new(program: &str, settings: &'a Settings, fs: &'a Fs, ui: &'a mut Ui) -> Result<Self> {
        let mut program = PathBuf::from(program);
        // the command runs inside the unit dir, so a relative path would resolve differently:
        if program.components().count() > 1 && program.exists() {
            program = program
                .canonicalize()
                .with_context(|| format!("resolving benchmark command {:?}", program))?;
        }
        Ok(Self {
            program,
            settings,
            fs,
            ui,
            pathbuf: PathBuf::with_capacity(256),
        })
    }

    /// Nearest configuration file above `unit_dir`, staying inside the sweep root.
    fn find_config(&self, unit_dir: &Path) -> Option<PathBuf> {
        unit_dir
            .ancestors()
            .skip(1)
            .take_while(|dir| dir.starts_with(&self.settings.root))
            .map(|dir| dir.join(&self.settings.config_name))
            .find(|candidate| candidate.is_file())
    }
}

impl Work for BenchCommand<'_> {
    fn prepare(&mut self, unit_dir: &Path) -> Result<()> {
        let Some(src) = self.find_config(unit_dir) else {
            log::warn!(
                "no {} found above {:?}; running without a copied config",
                self.settings.config_name,
                unit_dir
            );
            return Ok(());
        };

        let used = self.fs.used_config(unit_dir, &mut self.pathbuf);
        self.fs
            .copy(&src, used)
            .context("copying config into run directory")?;
        log::debug!("copied config {:?} -> {:?}", src, used);

        if let Some(dest) = &self.settings.config_dest {
            self.fs
                .copy(&src, dest)
                .context("copying config to --config-dest")?;
            log::debug!("copied config {:?} -> {:?}", src, dest);
        }
        Ok(())
    }

    fn execute(&mut self, unit_dir: &Path) -> Result<i32> {
        eprintln!("{} {}", "RUN".green(), unit_dir.display());
        self.ui.start_timer();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.settings.command_args).current_dir(unit_dir);

        let exit_code = run_cmd(
            &mut cmd,
            unit_dir,
            self.fs,
            &mut self.pathbuf,
            self.ui.verbose,
        )?;

        self.ui.print_elapsed("Benchmark run");
        if exit_code == 0 {
            eprintln!("{} {}\n", "COMPLETED".green(), unit_dir.display());
        } else {
            eprintln!(
                "{} {} (exit code {exit_code})\n",
                "FAILED".red(),
                unit_dir.display()
            );
        }
        Ok(exit_code)
    }
}
