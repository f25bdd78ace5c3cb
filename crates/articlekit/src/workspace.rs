//! Per-batch scratch directories
//!
//! Every batch writes into its own [`Workspace`], a directory named with a
//! random token under the workspace root. Dropping the workspace deletes
//! the directory and everything in it; [`Workspace::close`] does the same
//! but reports the outcome.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of every workspace directory name
pub const WORKSPACE_PREFIX: &str = "article_converter_";

/// An exclusively owned scratch directory for one batch
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under `root`, or the system temp dir
    pub fn create(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        tracing::debug!(path = %dir.path().display(), "Created workspace");
        Ok(Self { dir })
    }

    /// Directory holding every file of this batch
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file named `name` inside the workspace
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Delete the workspace and its contents
    ///
    /// Errors are logged and returned; the directory handle is consumed
    /// either way.
    pub fn close(self) -> io::Result<()> {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed workspace");
                Ok(())
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Workspace cleanup failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_lifecycle() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::create(Some(root.path())).unwrap();
        let path = workspace.path().to_path_buf();

        assert!(path.is_dir());
        assert!(path.starts_with(root.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(WORKSPACE_PREFIX));

        std::fs::write(workspace.file_path("a.txt"), "a").unwrap();
        workspace.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_workspace_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let workspace = Workspace::create(Some(root.path())).unwrap();
            std::fs::write(workspace.file_path("a.txt"), "a").unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_workspaces_are_distinct() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::create(Some(root.path())).unwrap();
        let b = Workspace::create(Some(root.path())).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_creates_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("nested").join("root");
        let workspace = Workspace::create(Some(&nested)).unwrap();
        assert!(workspace.path().starts_with(&nested));
    }
}
