use std::path::PathBuf;

use anyhow::Context;

use sched::FileLock;

use crate::args::Args;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Only one of --status, --reset and --delete may be given")]
    MultipleActions,
    #[error("No benchmark command given (use --command or set BENCHSWEEP_COMMAND)")]
    NoCommand,
}

/// What the app should do with the target unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    Status,
    Reset,
    Delete,
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. defaults are added in.
#[derive(Debug)]
pub struct Settings {
    /// sweep root; nothing outside it is ever scheduled or deleted
    pub root: PathBuf,
    /// unit directory to operate on
    pub target: PathBuf,
    pub command: Option<String>,
    pub command_args: Vec<String>,
    pub config_name: String,
    pub config_dest: Option<PathBuf>,
    pub lock: PathBuf,
    pub action: Action,
    pub yes: bool,
    pub verbose: u8,
    pub log_file: Option<PathBuf>,
    pub dry_run: bool,
}

impl Settings {
    /// Label written into the lock file while we hold it.
    pub fn lock_label(&self) -> String {
        format!(
            "{} {:?} (pid {})",
            env!("CARGO_PKG_NAME"),
            self.target,
            std::process::id()
        )
    }
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let action = match (args.status, args.reset, args.delete) {
            (false, false, false) => Action::Run,
            (true, false, false) => Action::Status,
            (false, true, false) => Action::Reset,
            (false, false, true) => Action::Delete,
            _ => return Err(Error::MultipleActions.into()),
        };

        // dry runs only report, so they can do without a command:
        if action == Action::Run && !args.dry_run && args.command.is_none() {
            return Err(Error::NoCommand.into());
        }

        let root = absolute(&args.root)?;
        let target = match args.task {
            Some(task) => absolute(&task)?,
            None => root.clone(),
        };
        let config_dest = match args.config_dest {
            Some(dest) => Some(absolute(&dest)?),
            None => None,
        };
        let lock = match args.lock {
            Some(lock) => PathBuf::from(lock),
            None => FileLock::default_path(),
        };

        Ok(Self {
            root,
            target,
            command: args.command,
            command_args: args.args,
            config_name: args.config_name,
            config_dest,
            lock,
            action,
            yes: args.yes,
            verbose: args.verbose,
            log_file: args.log_file.map(PathBuf::from),
            dry_run: args.dry_run,
        })
    }
}

/// Absolute form of a command-line path, so `./runs` and `runs` compare equal.
/// `..` is left alone and rejected later where it matters.
fn absolute(path: &str) -> anyhow::Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolving path {:?}", path))
}
