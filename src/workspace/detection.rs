//! Workspace root detection.
//!
//! Walks up the directory tree from a starting directory (the process's
//! current working directory by default) looking for the marker directory.
//! The nearest enclosing marker wins. Nothing here touches the settings
//! cache; see [`crate::WorkspaceContext::find_root`] for that.

use crate::error::{Result, WorkspaceError};
use crate::fsutil::{find_dir_in_or_above, normalize};
use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve the directory a search starts from.
///
/// `None` or an empty path means the current working directory; relative
/// paths are made absolute against it.
pub fn resolve_start(start: Option<&Path>) -> Result<PathBuf> {
    match start {
        Some(path) if !path.as_os_str().is_empty() => absolutize(&expand_tilde(path)),
        _ => env::current_dir().map_err(WorkspaceError::CurrentDir),
    }
}

/// Find the workspace root enclosing `start`.
///
/// Returns `Ok(None)` when the filesystem root is reached without finding a
/// `marker` directory; that is a normal outcome, not an error.
pub fn find_marker_root(start: Option<&Path>, marker: &str) -> Result<Option<PathBuf>> {
    let start = resolve_start(start)?;
    debug!("Searching for '{}' from: {}", marker, start.display());

    find_dir_in_or_above(&start, marker).map_err(|err| WorkspaceError::Walk {
        dir: err.dir,
        marker: marker.to_string(),
        source: err.source,
    })
}

/// Make `path` absolute against the current working directory and clean out
/// `.` and `..` components.
///
/// Does not resolve symlinks or require the path to exist.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::path::absolute(path).map_err(WorkspaceError::CurrentDir)?
    };
    Ok(normalize(&absolute))
}

/// Expand a leading `~` to the user's home directory.
///
/// Examples:
/// - `~/projects/foo` becomes `/home/user/projects/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &Path) -> Cow<'_, Path> {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.join(rest));
    }
    Cow::Borrowed(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~")), home);
            assert_eq!(expand_tilde(Path::new("~/ws")), home.join("ws"));
        }
        assert_eq!(expand_tilde(Path::new("/abs/~")), Path::new("/abs/~"));
        assert_eq!(expand_tilde(Path::new("~user/x")), Path::new("~user/x"));
    }

    #[test]
    fn test_absolutize_keeps_absolute() {
        assert_eq!(absolutize(Path::new("/a/b")).unwrap(), Path::new("/a/b"));
    }

    #[test]
    fn test_absolutize_relative() {
        let cwd = env::current_dir().unwrap();
        assert_eq!(absolutize(Path::new("sub")).unwrap(), cwd.join("sub"));
    }

    #[test]
    fn test_absolutize_cleans_parent_components() {
        assert_eq!(absolutize(Path::new("/x/a/../b")).unwrap(), Path::new("/x/b"));
        let cwd = env::current_dir().unwrap();
        assert_eq!(absolutize(Path::new("sub/../other/.")).unwrap(), cwd.join("other"));
    }

    #[test]
    fn test_resolve_start_empty_is_cwd() {
        let cwd = env::current_dir().unwrap();
        assert_eq!(resolve_start(Some(Path::new(""))).unwrap(), cwd);
    }
}
