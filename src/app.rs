use anyhow::{Context, Result};
use colored::Colorize;

use sched::{FileLock, Lock, LockGuard, RunOutcome, Scheduler};

use crate::exec::BenchCommand;
use crate::fs::Fs;
use crate::reset::Resetter;
use crate::settings::{Action, Error, Settings};
use crate::ui::Ui;

/// Exit status when everything that could run did run
/// (individual benchmark failures don't count).
pub const EXIT_OK: i32 = 0;
/// Exit status when another instance holds the execution lock.
pub const EXIT_LOCKED: i32 = 1;
/// Exit status for configuration errors and unexpected failures.
pub const EXIT_FATAL: i32 = 2;

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// Filesystem interface
    fs: Fs,
    /// User interface
    ui: Ui,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        let mut fs = Fs::new(&settings.root, settings.dry_run);
        // only the destination file itself, never its whole directory:
        if let Some(dest) = settings.config_dest.as_ref().filter(|d| !d.as_os_str().is_empty()) {
            fs.allow(dest);
        }
        let ui = Ui::new(&settings);
        Self { settings, fs, ui }
    }

    /// Run the app, using settings to determine what to do.
    /// Returns the process exit status.
    pub fn run(mut self) -> Result<i32> {
        if self.settings.verbose > 0 {
            eprintln!(
                "Using sweep root {:?}, target {:?}",
                self.settings.root, self.settings.target
            );
        }
        self.fs.check_root_dir()?;

        match self.settings.action {
            Action::Status => {
                let sched = self.discover()?;
                self.ui.print_status(&sched);
                Ok(EXIT_OK)
            }
            Action::Run => self.run_sweep(),
            Action::Reset => self.with_lock(|app| {
                Resetter::new(&app.settings, &app.ui, &app.fs).reset()?;
                Ok(())
            }),
            Action::Delete => self.with_lock(|app| app.delete()),
        }
    }

    fn discover(&self) -> Result<Scheduler> {
        Scheduler::discover(&self.settings.root, &self.settings.target)
            .context("while reading the sweep tree")
    }

    fn run_sweep(&mut self) -> Result<i32> {
        let mut sched = self.discover()?;

        if self.settings.dry_run {
            self.ui.verbose_msg("Dry run; nothing will be executed.");
            self.ui.print_plan(&sched);
            return Ok(EXIT_OK);
        }

        let program = self.settings.command.as_deref().ok_or(Error::NoCommand)?;
        let mut lock = FileLock::new(&self.settings.lock);
        let label = self.settings.lock_label();
        log::info!("running sweep as {label}");

        let mut work = BenchCommand::new(program, &self.settings, &self.fs, &mut self.ui)?;
        let outcome = sched.run(&mut lock, &label, &mut work)?;

        match outcome {
            RunOutcome::Finished(summary) => {
                self.ui.print_summary(&summary);
                self.ui.print_status(&sched);
                Ok(EXIT_OK)
            }
            RunOutcome::Locked => {
                report_locked(&lock);
                Ok(EXIT_LOCKED)
            }
        }
    }

    /// Run `f` while holding the execution lock, so it can't race with a sweep.
    /// Dry runs don't modify anything, so they skip the lock.
    fn with_lock<F>(&self, f: F) -> Result<i32>
    where
        F: FnOnce(&Self) -> Result<()>,
    {
        if self.settings.dry_run {
            f(self)?;
            return Ok(EXIT_OK);
        }

        let mut lock = FileLock::new(&self.settings.lock);
        let label = self.settings.lock_label();
        let guard = LockGuard::acquire(&mut lock, &label)?;
        if guard.is_none() {
            drop(guard);
            report_locked(&lock);
            return Ok(EXIT_LOCKED);
        }
        f(self)?;
        Ok(EXIT_OK)
    }

    fn delete(&self) -> Result<()> {
        let target = &self.settings.target;
        sched::validate_target(&self.settings.root, target)?;

        eprintln!(
            "{} {:?} {}",
            "Deleting".red(),
            target,
            "and every run below it".red()
        );
        if self.settings.dry_run || !self.ui.confirm("Are you sure you want to proceed?")? {
            eprintln!("Not deleting.");
            return Ok(());
        }
        self.fs.delete_dir(target)?;
        eprintln!("{} {:?}.", "Deleted".green(), target);
        Ok(())
    }
}

fn report_locked(lock: &FileLock) {
    let holder = lock.holder().unwrap_or_else(|| "<unknown>".to_owned());
    eprintln!(
        "{} Another instance is already running: {}",
        "LOCKED".red(),
        holder.trim()
    );
    eprintln!(
        "If that's not true, remove the stale lock file {:?} and try again.",
        lock.path()
    );
}
