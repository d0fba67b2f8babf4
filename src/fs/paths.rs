use std::path::{Path, PathBuf};

use super::Fs;

/// Name given to a run's private copy of its configuration.
const USED_CONFIG: &str = "used_cfg.yaml";

/// Utility fns for making common types of paths inside a unit directory.
impl Fs {
    /// $UNIT/stdout.txt
    pub fn stdout<'a>(&self, unit: &Path, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(unit, "stdout.txt", buf)
    }

    /// $UNIT/stderr.txt
    pub fn stderr<'a>(&self, unit: &Path, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(unit, "stderr.txt", buf)
    }

    /// $UNIT/used_cfg.yaml
    pub fn used_config<'a>(&self, unit: &Path, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(unit, USED_CONFIG, buf)
    }

    fn parts2<'a, T, U>(&self, p1: T, p2: U, buf: &'a mut PathBuf) -> &'a Path
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
    {
        buf.clear();
        buf.push(p1);
        buf.push(p2);
        &*buf
    }
}
