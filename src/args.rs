use clap::Parser;

const CMD_NAME: &str = "bsw";
const DEFAULT_ROOT: &str = "runs";
const DEFAULT_CONFIG_NAME: &str = "config.yaml";

/// Stores our command-line args format.
#[derive(Parser)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Sweep root directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_ROOT)]
    #[arg(env = "BENCHSWEEP_ROOT")]
    pub root: String,

    /// Unit directory to operate on (defaults to the whole sweep root)
    #[arg(short, long, value_name = "DIR")]
    pub task: Option<String>,

    /// Benchmark executable run in each leaf directory
    #[arg(short, long, value_name = "PROG")]
    #[arg(env = "BENCHSWEEP_COMMAND")]
    pub command: Option<String>,

    /// Argument passed to the benchmark executable (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Name of the per-combination config file copied into each run
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CONFIG_NAME)]
    pub config_name: String,

    /// Extra location to copy each run's config to before it starts
    #[arg(long, value_name = "FILE")]
    #[arg(env = "BENCHSWEEP_CONFIG_DEST")]
    pub config_dest: Option<String>,

    /// Execution lock file (defaults to benchsweep.lock in the temp dir)
    #[arg(long, value_name = "FILE")]
    #[arg(env = "BENCHSWEEP_LOCK")]
    pub lock: Option<String>,

    /// Print the status of every unit
    #[arg(short, long)]
    pub status: bool,

    /// Reset the specified unit so it runs again
    #[arg(short = 'x', long)]
    pub reset: bool,

    /// Delete the specified unit directory entirely
    #[arg(long)]
    pub delete: bool,

    /// Bypass user confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Print additional debugging info (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Dry run; print info but don't modify anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
