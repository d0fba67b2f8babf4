use std::fs::File;
use std::io::{stderr, stdout, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::fs::Fs;

use super::Error;

/// Run a subprocess, storing stdout and stderr in the given `unit_dir`
/// while also passing them through to our own stdout and stderr.
/// Returns the exit code, or -1 if the process was killed by a signal.
/// Based on:
/// <https://stackoverflow.com/questions/66060139/how-to-tee-stdout-stderr-from-a-subprocess-in-rust>
pub fn run_cmd(
    cmd: &mut Command,
    unit_dir: &Path,
    fs: &Fs,
    pathbuf: &mut PathBuf,
    verbose: bool,
) -> Result<i32> {
    if verbose {
        eprintln!("{}", "Creating stdout and stderr files...".magenta());
    }

    let (out_file, err_file) = make_log_files(fs, unit_dir, pathbuf)?;

    if verbose {
        eprintln!("{}", "Running command...".magenta());
    }
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| Error::SpawnFailed(format!("{:?}", cmd.get_program())))?;

    let child_out = child.stdout.take().ok_or(Error::PipeUnavailable("stdout"))?;
    let child_err = child.stderr.take().ok_or(Error::PipeUnavailable("stderr"))?;

    let thread_out = thread::spawn(move || communicate(child_out, out_file, stdout()));
    let thread_err = thread::spawn(move || communicate(child_err, err_file, stderr()));

    // the child is always reaped before a tee error is reported:
    let copied_out = join_tee(thread_out, "stdout");
    let copied_err = join_tee(thread_err, "stderr");
    let status = child.wait().context("waiting on benchmark process")?;
    copied_out?;
    copied_err?;

    if verbose {
        eprintln!("\n{} with {status}.", "Process finished".green());
    }
    Ok(status.code().unwrap_or(-1))
}

fn join_tee(handle: JoinHandle<std::io::Result<()>>, stream: &'static str) -> Result<()> {
    handle
        .join()
        .map_err(|_| Error::TeeThreadPanicked(stream))?
        .with_context(|| format!("copying benchmark {stream}"))
}

/// Copy `stream` to both `file` and `output` until it closes.
/// After a failed write the stream is still drained, so the child can't block
/// on a full pipe; the first write error is returned at the end.
fn communicate<R: Read, W: Write>(
    mut stream: R,
    mut file: File,
    mut output: W,
) -> std::io::Result<()> {
    let mut buf = [0u8; 1024];
    let mut write_err = None;
    loop {
        let num_read = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if write_err.is_some() {
            continue;
        }

        let buf = &buf[..num_read];
        if let Err(e) = file.write_all(buf).and_then(|()| output.write_all(buf)) {
            write_err = Some(e);
        }
    }

    match write_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn make_log_files(fs: &Fs, unit_dir: &Path, pathbuf: &mut PathBuf) -> Result<(File, File)> {
    let out_file = fs
        .create_file(fs.stdout(unit_dir, pathbuf))
        .context("creating stdout.txt file")?;

    let err_file = fs
        .create_file(fs.stderr(unit_dir, pathbuf))
        .context("creating stderr.txt file")?;

    Ok((out_file, err_file))
}
