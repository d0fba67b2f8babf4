use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One directory found during the walk.
#[derive(Debug)]
pub struct DirNode {
    pub path: PathBuf,
    /// indices of immediate subdirectories in [`PathTree::nodes`]
    pub children: Vec<usize>,
}

/// Plain tree of directories, before any scheduling meaning is attached.
///
/// Nodes are stored in post-order: every child comes before its parent,
/// and the root is last.
#[derive(Debug)]
pub struct PathTree {
    pub nodes: Vec<DirNode>,
}

impl PathTree {
    /// Walk every directory under (and including) `root`.
    ///
    /// Subdirectories are visited in file-name order. Symlinks are not followed.
    pub fn walk(root: &Path) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::with_capacity(64),
        };
        tree.visit(root.to_path_buf())?;
        Ok(tree)
    }

    #[cfg(test)]
    fn root(&self) -> Option<&DirNode> {
        self.nodes.last()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    fn visit(&mut self, dir: PathBuf) -> Result<usize> {
        let mut subdirs = Vec::with_capacity(8);
        for entry in fs::read_dir(&dir).with_context(|| format!("reading directory {:?}", dir))? {
            let entry = entry.with_context(|| format!("reading entry in {:?}", dir))?;
            if entry.file_type()?.is_dir() {
                subdirs.push(entry.path());
            }
        }
        subdirs.sort();

        let mut children = Vec::with_capacity(subdirs.len());
        for subdir in subdirs {
            children.push(self.visit(subdir)?);
        }

        self.nodes.push(DirNode {
            path: dir,
            children,
        });
        Ok(self.nodes.len() - 1)
    }
}
