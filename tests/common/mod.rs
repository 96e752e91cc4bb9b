//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Each test builds its own [`TempWorkspace`] and its own `WorkspaceContext`,
//! so the settings cache never leaks between tests. Tests that change the
//! process's current directory must be marked `#[serial]` and restore it with
//! [`CwdGuard`].

use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wkspc::WorkspaceContext;

/// Marker directory name used by the default layout.
pub const MARKER: &str = ".dvln";

/// A temporary directory tree for test isolation.
///
/// The root is canonicalized so paths compare equal to what
/// `std::env::current_dir` reports after a `chdir` into it.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary directory.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp directory");
        Self { _temp: temp, root }
    }

    /// Returns the root path of this tree.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Returns `path` joined onto the root.
    pub fn join(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Creates a directory (and all parent directories) within this tree.
    ///
    /// # Panics
    /// Panics if directory creation fails.
    pub fn create_dir(&self, path: &str) -> PathBuf {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
        full_path
    }

    /// Creates a file with the given content within this tree.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Marks `path` (relative to the root, `"."` for the root) as a workspace
    /// root by creating the marker directory inside it.
    pub fn create_marker(&self, path: &str) -> PathBuf {
        self.create_dir(&format!("{}/{}", path, MARKER));
        let dir = self.root.join(path);
        dir.canonicalize().unwrap_or(dir)
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores the current working directory when dropped.
#[allow(dead_code)] // Used by tests that chdir
pub struct CwdGuard {
    original: PathBuf,
}

#[allow(dead_code)] // Used by tests that chdir
impl CwdGuard {
    /// Changes into `dir`, remembering the current directory.
    pub fn enter(dir: &Path) -> Self {
        let original = std::env::current_dir().expect("Failed to read current directory");
        std::env::set_current_dir(dir)
            .unwrap_or_else(|e| panic!("Failed to chdir to {}: {}", dir.display(), e));
        Self { original }
    }

    /// Changes into `dir` without resetting the restore target.
    pub fn move_to(&self, dir: &Path) {
        std::env::set_current_dir(dir)
            .unwrap_or_else(|e| panic!("Failed to chdir to {}: {}", dir.display(), e));
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A fresh temporary tree.
#[fixture]
pub fn temp_workspace() -> TempWorkspace {
    TempWorkspace::new()
}

/// A context with the default layout and an empty cache.
#[fixture]
pub fn context() -> WorkspaceContext {
    wkspc::tracing::init(false);
    WorkspaceContext::new()
}
