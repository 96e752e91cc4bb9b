//! Directory and file primitives used by workspace resolution and bootstrap.
//!
//! All creation helpers are "create if missing": calling them on something
//! that already exists with the right kind is a no-op and never truncates.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// An I/O failure while checking one directory of an upward walk.
#[derive(Debug, Error)]
#[error("failed to check {}", .dir.display())]
pub struct WalkError {
    /// The directory whose entry could not be checked.
    pub dir: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Check whether `path` exists and is a directory.
///
/// A missing path (or a missing parent) is `Ok(false)`; anything else that
/// prevents the check, such as a permission error, is returned.
pub fn directory_exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotADirectory => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create `path` and any missing parents.
pub fn create_dir_if_missing(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Create an empty file at `path` unless one already exists.
///
/// Existing content is left untouched. Fails if `path` is a directory or its
/// parent is missing.
pub fn create_file_if_missing(path: &Path) -> io::Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
}

/// Walk up from `start` looking for a directory named `name`.
///
/// Returns the directory that *contains* `name` (the nearest one), or `None`
/// once the filesystem root has been checked without a match. `start` should
/// already be normalized (see [`normalize`]) so that every step up is a real
/// ancestor.
pub fn find_dir_in_or_above(start: &Path, name: &str) -> Result<Option<PathBuf>, WalkError> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let exists = directory_exists(&dir.join(name)).map_err(|source| WalkError {
            dir: dir.to_path_buf(),
            source,
        })?;
        if exists {
            debug!("Found '{}' in {}", name, dir.display());
            return Ok(Some(dir.to_path_buf()));
        }
        current = dir.parent();
    }

    debug!("Reached filesystem root without finding '{}'", name);
    Ok(None)
}

/// Lexically clean `path`: drop `.` components and let `..` remove the
/// component before it.
///
/// Does not touch the filesystem, so `a/link/..` becomes `a` even when `link`
/// is a symlink. `..` never climbs above the root of an absolute path; on a
/// relative path leading `..` components are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                if matches!(last, Some(Component::Normal(_))) {
                    out.pop();
                } else if !matches!(last, Some(Component::RootDir | Component::Prefix(_))) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();

        assert!(directory_exists(temp.path()).unwrap());
        assert!(!directory_exists(&temp.path().join("missing")).unwrap());
        assert!(!directory_exists(&file).unwrap());
        // Parent component is a file
        assert!(!directory_exists(&file.join("child")).unwrap());
    }

    #[test]
    fn test_create_file_if_missing_keeps_content() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data.db");

        create_file_if_missing(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "");

        fs::write(&file, "payload").unwrap();
        create_file_if_missing(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "payload");
    }

    #[test]
    fn test_create_file_if_missing_rejects_directory() {
        let temp = TempDir::new().unwrap();
        assert!(create_file_if_missing(temp.path()).is_err());
    }

    #[test]
    fn test_create_dir_if_missing_nested() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/c");

        create_dir_if_missing(&nested).unwrap();
        create_dir_if_missing(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_find_dir_in_or_above() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".mark")).unwrap();
        fs::create_dir_all(temp.path().join("x/y")).unwrap();

        let found = find_dir_in_or_above(&temp.path().join("x/y"), ".mark").unwrap();
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/x/a/../b")), Path::new("/x/b"));
        assert_eq!(normalize(Path::new("/x/./ws/lib/..")), Path::new("/x/ws"));
        assert_eq!(normalize(Path::new("/../..")), Path::new("/"));
        assert_eq!(normalize(Path::new("../a/../b")), Path::new("../b"));
        assert_eq!(normalize(Path::new("a/..")), Path::new(""));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_dir_in_or_above_names_failing_dir() {
        let temp = TempDir::new().unwrap();
        let upper = temp.path().join("upper");
        fs::create_dir_all(upper.join("lower")).unwrap();
        // A self-referencing symlink fails with ELOOP rather than NotFound
        std::os::unix::fs::symlink(upper.join(".loop"), upper.join(".loop")).unwrap();

        let err = find_dir_in_or_above(&upper.join("lower"), ".loop").unwrap_err();
        assert_eq!(err.dir, upper);
    }

    #[test]
    fn test_find_dir_in_or_above_ignores_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".wkspc-test-marker-file"), "").unwrap();

        let found = find_dir_in_or_above(temp.path(), ".wkspc-test-marker-file").unwrap();
        assert_eq!(found, None);
    }
}
