use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};

use util::PathEncodingError;

/// Defines fns for creating common paths in a unit directory
mod paths;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Sweep root \"{0}\" is not a directory")]
    NotDirectory(String),
    #[error("Can't perform IO operation: \"{0}\" is not whitelisted")]
    NotWhitelisted(String),
}

/// All file operations in the crate should go through this struct.
///
/// All destructive operations check that the path in question is a child of one
/// of the whitelisted prefixes (the sweep root, plus the extra config
/// destination if there is one), otherwise they will not be performed.
/// Note that the benchmark command itself can break this rule; it is up to the user
/// to make sure that it doesn't have unintended consequences.
#[derive(Debug)]
pub struct Fs {
    /// The directories we are allowed to modify
    prefixes: Vec<PathBuf>,
    /// if true, prevents all destructive operations
    dry_run: bool,
}

impl Fs {
    /// Create a new `Fs` allowed to modify files under `root`.
    pub fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            prefixes: vec![root.to_path_buf()],
            dry_run,
        }
    }

    /// Also allow modifying files under `prefix`.
    pub fn allow<T: AsRef<Path>>(&mut self, prefix: T) {
        self.prefixes.push(prefix.as_ref().to_path_buf());
    }

    /// Check that the sweep root exists and is a directory.
    pub fn check_root_dir(&self) -> Result<()> {
        let root = &self.prefixes[0];
        if !root.is_dir() {
            return Err(Error::NotDirectory(
                root.to_str().ok_or(PathEncodingError)?.to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// Check if path exists on disk.
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.exists() || path.is_symlink()
    }

    /// Create a file, and return a writable `File` handle.
    pub fn create_file<T: AsRef<Path>>(&self, path: T) -> Result<fs::File> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        let f = fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        Ok(f)
    }

    /// Delete a file.
    pub fn delete_file<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::remove_file(path).with_context(|| format!("deleting file {:?}", path))?;
        Ok(())
    }

    /// Recursively delete a directory.
    pub fn delete_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::remove_dir_all(path).with_context(|| format!("deleting dir {:?}", path))?;
        Ok(())
    }

    /// Copy the file at `src` to `tgt`, overwriting `tgt`.
    pub fn copy<T: AsRef<Path>, U: AsRef<Path>>(&self, src: T, tgt: U) -> Result<()> {
        let (src, tgt) = (src.as_ref(), tgt.as_ref());
        self.check_whitelist(tgt)?;
        fs::copy(src, tgt).with_context(|| format!("copying {:?} to {:?}", src, tgt))?;
        Ok(())
    }

    /// List entries in a directory
    pub fn read_dir<T: AsRef<Path>>(&self, path: T) -> Result<fs::ReadDir, io::Error> {
        fs::read_dir(path)
    }

    fn is_whitelisted<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    fn check_whitelist(&self, path: &Path) -> Result<()> {
        if self.dry_run || !self.is_whitelisted(path) {
            Err(Error::NotWhitelisted(path.to_str().ok_or(PathEncodingError)?.to_owned()).into())
        } else {
            Ok(())
        }
    }
}
