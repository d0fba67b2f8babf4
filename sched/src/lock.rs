use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Mutual exclusion between scheduler invocations.
///
/// One lock covers a whole run, not individual units.
pub trait Lock {
    /// Try to take the lock, recording `label` as the holder.
    /// Returns `Ok(false)` immediately if someone else holds it.
    fn acquire(&mut self, label: &str) -> Result<bool>;

    /// Give the lock up. Releasing a lock that isn't held is fine.
    fn release(&mut self) -> Result<()>;

    /// Label of the current holder, if the lock is held.
    fn holder(&self) -> Option<String>;
}

/// Host-wide lock backed by a file at a well-known path.
///
/// The file contains the holder's label so operators can see who is running.
/// A process that dies without unwinding leaves the file behind; it has to
/// be removed by hand.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    /// Create a lock handle for the file at `path`. Nothing is touched on disk.
    pub fn new<T: AsRef<Path>>(path: T) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<temp dir>/benchsweep.lock`
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join("benchsweep.lock")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Lock for FileLock {
    fn acquire(&mut self, label: &str) -> Result<bool> {
        log::debug!("acquiring lock {:?}", self.path);
        // create_new makes the existence check and creation a single step.
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::debug!("lock {:?} is already held", self.path);
                return Ok(false);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("creating lock file {:?}", self.path))
            }
        };

        if let Err(e) = file.write_all(label.as_bytes()) {
            drop(file);
            fs::remove_file(&self.path).ok();
            return Err(e).with_context(|| format!("writing lock file {:?}", self.path));
        }
        log::debug!("lock {:?} acquired by {label}", self.path);
        Ok(true)
    }

    fn release(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("released lock {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing lock file {:?}", self.path)),
        }
    }

    fn holder(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }
}

/// Holds a [`Lock`] for as long as it lives, releasing it on drop.
///
/// Dropping happens on normal return and while an error propagates, so a
/// failing unit can't leave the lock behind.
pub struct LockGuard<'a> {
    lock: &'a mut dyn Lock,
}

impl<'a> LockGuard<'a> {
    /// Acquire `lock` with `label`. `Ok(None)` means it's held elsewhere.
    pub fn acquire(lock: &'a mut dyn Lock, label: &str) -> Result<Option<Self>> {
        if lock.acquire(label)? {
            Ok(Some(Self { lock }))
        } else {
            Ok(None)
        }
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.release() {
            log::error!("failed to release execution lock: {e:?}");
        }
    }
}
