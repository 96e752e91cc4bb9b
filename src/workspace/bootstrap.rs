//! Ordered, idempotent creation of the workspace metadata tree.
//!
//! Each step records its path in the settings store and then makes sure the
//! directory or file exists. Steps run in dependency order and the first
//! failure stops the run; nothing already created is rolled back.

use super::layout::WorkspacePaths;
use crate::config::{ConfigKey, ConfigStore};
use crate::error::{BootstrapError, Result};
use crate::fsutil::{create_dir_if_missing, create_file_if_missing};
use std::fmt;
use std::io;
use std::path::Path;
use tracing::debug;

/// Whether a step creates a directory or an empty file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of the workspace metadata tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapStep {
    MetaDir,
    LogDir,
    TmpDir,
    VcsDir,
    VcsDataDir,
    StaticFile,
    DbDir,
    DbFile,
}

impl BootstrapStep {
    /// Every step, in the order they must run.
    pub const ALL: [Self; 8] = [
        Self::MetaDir,
        Self::LogDir,
        Self::TmpDir,
        Self::VcsDir,
        Self::VcsDataDir,
        Self::StaticFile,
        Self::DbDir,
        Self::DbFile,
    ];

    pub const fn key(self) -> ConfigKey {
        match self {
            Self::MetaDir => ConfigKey::MetaDir,
            Self::LogDir => ConfigKey::LogDir,
            Self::TmpDir => ConfigKey::TmpDir,
            Self::VcsDir => ConfigKey::VcsDir,
            Self::VcsDataDir => ConfigKey::VcsDataDir,
            Self::StaticFile => ConfigKey::StaticFile,
            Self::DbDir => ConfigKey::DbDir,
            Self::DbFile => ConfigKey::Db,
        }
    }

    pub const fn kind(self) -> EntryKind {
        match self {
            Self::StaticFile | Self::DbFile => EntryKind::File,
            _ => EntryKind::Directory,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::MetaDir => "meta-dir",
            Self::LogDir => "log-dir",
            Self::TmpDir => "tmp-dir",
            Self::VcsDir => "vcs-dir",
            Self::VcsDataDir => "vcs-data-dir",
            Self::StaticFile => "static-file",
            Self::DbDir => "db-dir",
            Self::DbFile => "db-file",
        }
    }

    /// The path this step creates.
    pub fn path(self, paths: &WorkspacePaths) -> &Path {
        match self {
            Self::MetaDir => &paths.meta_dir,
            Self::LogDir => &paths.log_dir,
            Self::TmpDir => &paths.tmp_dir,
            Self::VcsDir => &paths.vcs_dir,
            Self::VcsDataDir => &paths.vcs_data_dir,
            Self::StaticFile => &paths.static_file,
            Self::DbDir => &paths.db_dir,
            Self::DbFile => &paths.db_file,
        }
    }

    fn ensure(self, path: &Path) -> io::Result<()> {
        match self.kind() {
            EntryKind::Directory => create_dir_if_missing(path),
            EntryKind::File => create_file_if_missing(path),
        }
    }
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run the bootstrap steps starting at `from`, recording each path in `store`
/// before creating it.
pub fn run_steps<S: ConfigStore + ?Sized>(
    store: &mut S,
    paths: &WorkspacePaths,
    from: BootstrapStep,
) -> Result<()> {
    let start = BootstrapStep::ALL
        .iter()
        .position(|step| *step == from)
        .unwrap_or(0);

    for step in &BootstrapStep::ALL[start..] {
        let path = step.path(paths);
        store.set(step.key(), &path.to_string_lossy())?;

        debug!("Bootstrap {}: {}", step, path.display());
        step.ensure(path).map_err(|source| BootstrapError {
            step: *step,
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, register_defaults};
    use crate::error::WorkspaceError;
    use crate::workspace::Layout;
    use tempfile::TempDir;

    fn store() -> Settings {
        let mut settings = Settings::new();
        register_defaults(&mut settings, &Layout::default());
        settings
    }

    #[test]
    fn test_steps_cover_every_derived_key() {
        let keys: Vec<_> = BootstrapStep::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, ConfigKey::DERIVED);
    }

    #[test]
    fn test_run_all_steps() {
        let temp = TempDir::new().unwrap();
        let paths = WorkspacePaths::derive(temp.path(), &Layout::default());
        let mut settings = store();

        run_steps(&mut settings, &paths, BootstrapStep::MetaDir).unwrap();

        for step in BootstrapStep::ALL {
            let path = step.path(&paths);
            match step.kind() {
                EntryKind::Directory => assert!(path.is_dir(), "{step} should be a dir"),
                EntryKind::File => assert!(path.is_file(), "{step} should be a file"),
            }
            assert_eq!(settings.get_string(step.key()), path.to_string_lossy());
        }
    }

    #[test]
    fn test_run_from_later_step_skips_earlier_keys() {
        let temp = TempDir::new().unwrap();
        let paths = WorkspacePaths::derive(temp.path(), &Layout::default());
        let mut settings = store();

        run_steps(&mut settings, &paths, BootstrapStep::DbDir).unwrap();

        assert_eq!(settings.get_string(ConfigKey::LogDir), "");
        assert!(paths.db_file.is_file());
        // create_dir_all brings the meta dir along with db/
        assert!(paths.meta_dir.is_dir());
        assert!(!paths.log_dir.exists());
    }

    #[test]
    fn test_failure_reports_step() {
        let temp = TempDir::new().unwrap();
        let paths = WorkspacePaths::derive(temp.path(), &Layout::default());
        std::fs::create_dir_all(&paths.meta_dir).unwrap();
        std::fs::write(&paths.vcs_dir, "not a dir").unwrap();
        let mut settings = store();

        let err = run_steps(&mut settings, &paths, BootstrapStep::MetaDir).unwrap_err();
        let WorkspaceError::Bootstrap(err) = err else {
            panic!("expected a bootstrap error");
        };
        assert_eq!(err.step, BootstrapStep::VcsDir);
        assert_eq!(err.path, paths.vcs_dir);
        assert_eq!(
            err.completed(),
            [BootstrapStep::MetaDir, BootstrapStep::LogDir, BootstrapStep::TmpDir]
        );
        assert_eq!(settings.get_string(ConfigKey::DbDir), "");
    }
}
