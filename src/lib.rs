/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Running the benchmark command in a unit
mod exec;
/// Filesystem operations
mod fs;
/// Clearing previous results
mod reset;
/// Combined command-line and environment run settings
mod settings;
/// Text UI
mod ui;

// exported for tests:
pub use app::{App, EXIT_FATAL, EXIT_LOCKED, EXIT_OK};
pub use args::Args;
pub use settings::Settings;

/// Run the command-line app, returning the process exit status.
pub fn run() -> Result<i32, anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;

    let log_level = match settings.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    match &settings.log_file {
        Some(path) => simple_logging::log_to_file(path, log_level)?,
        None => simple_logging::log_to_stderr(log_level),
    }

    // RUN THE THING /////////////////
    let app = App::new(settings);
    app.run()
}
