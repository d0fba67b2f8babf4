/// Work function for leaf units
mod bench_command;
pub use bench_command::BenchCommand;

/// Run a subprocess
mod run_cmd;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to start benchmark command {0:?}")]
    SpawnFailed(String),
    #[error("Lost connection to the benchmark's {0}")]
    PipeUnavailable(&'static str),
    #[error("Thread copying the benchmark's {0} panicked")]
    TeeThreadPanicked(&'static str),
}
