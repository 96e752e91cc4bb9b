//! Reader and writer views of a workspace.
//!
//! Reads may still populate the root cache, which is why they take
//! `&mut self`; only [`WorkspaceWriter`] creates anything on disk.

use super::context::{WorkspaceContext, WorkspaceInfo};
use crate::config::{ConfigKey, ConfigStore};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Query workspace locations without changing workspace metadata.
pub trait WorkspaceReader {
    /// Workspace root enclosing `start` (or the current directory).
    fn root_dir(&mut self, start: Option<&Path>) -> Result<Option<PathBuf>>;

    fn log_dir(&mut self) -> Result<Option<PathBuf>>;

    fn tmp_dir(&mut self) -> Result<Option<PathBuf>>;

    fn db_dir(&mut self) -> Result<Option<PathBuf>>;

    /// Snapshot of the recorded paths, resolving the root first if needed.
    fn workspace_info(&mut self) -> Result<WorkspaceInfo>;
}

/// Change which workspace is active and bootstrap it.
pub trait WorkspaceWriter {
    /// Set (and bootstrap) the workspace root; an empty path clears it.
    fn set_root_dir(&mut self, root: &Path) -> Result<()>;
}

impl<S: ConfigStore> WorkspaceReader for WorkspaceContext<S> {
    fn root_dir(&mut self, start: Option<&Path>) -> Result<Option<PathBuf>> {
        self.root(start)
    }

    fn log_dir(&mut self) -> Result<Option<PathBuf>> {
        self.derived_dir(ConfigKey::LogDir)
    }

    fn tmp_dir(&mut self) -> Result<Option<PathBuf>> {
        self.derived_dir(ConfigKey::TmpDir)
    }

    fn db_dir(&mut self) -> Result<Option<PathBuf>> {
        self.derived_dir(ConfigKey::DbDir)
    }

    fn workspace_info(&mut self) -> Result<WorkspaceInfo> {
        self.root(None)?;
        Ok(self.info())
    }
}

impl<S: ConfigStore> WorkspaceWriter for WorkspaceContext<S> {
    fn set_root_dir(&mut self, root: &Path) -> Result<()> {
        self.set_root(root)
    }
}
