//! Workspace context: resolution, caching and bootstrap of the workspace root.

use super::bootstrap::{BootstrapStep, run_steps};
use super::detection::{absolutize, expand_tilde, find_marker_root};
use super::layout::{Layout, WorkspacePaths};
use crate::config::{ConfigKey, ConfigStore, ROOT_UNSET, Settings, register_defaults};
use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What the settings store currently says about the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedRoot {
    /// Nothing resolved or set yet.
    Unset,
    /// Resolved or set to "no workspace".
    None,
    /// A workspace root.
    Root(PathBuf),
}

/// Snapshot of the recorded workspace paths, empty fields omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub root_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub meta_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tmp_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vcs_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub db_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub db: String,
}

/// The workspace root and its derived paths, cached in a [`ConfigStore`].
///
/// The store is the only cache: the root lives under
/// [`ConfigKey::RootDir`] (starting at [`ROOT_UNSET`]) and every derived
/// path under its own key.
#[derive(Debug)]
pub struct WorkspaceContext<S: ConfigStore = Settings> {
    store: S,
    layout: Layout,
}

impl WorkspaceContext<Settings> {
    /// Context with the default layout and a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_layout(Layout::default())
    }

    pub fn with_layout(layout: Layout) -> Self {
        Self::from_store(Settings::new(), layout)
    }
}

impl Default for WorkspaceContext<Settings> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ConfigStore> WorkspaceContext<S> {
    /// Wrap `store`, registering the workspace keys in it.
    pub fn from_store(mut store: S, layout: Layout) -> Self {
        register_defaults(&mut store, &layout);
        Self { store, layout }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Name of the marker directory, as registered in the store.
    pub fn marker_name(&self) -> String {
        self.store.get_string(ConfigKey::MetaDirName)
    }

    pub fn cached_root(&self) -> CachedRoot {
        match self.store.get_string(ConfigKey::RootDir).as_str() {
            ROOT_UNSET => CachedRoot::Unset,
            "" => CachedRoot::None,
            root => CachedRoot::Root(PathBuf::from(root)),
        }
    }

    /// Workspace root, using the cached value when there is one.
    ///
    /// Only walks the filesystem (via [`Self::find_root`]) while the root is
    /// unset. `Ok(None)` means there is no enclosing workspace.
    pub fn root(&mut self, start: Option<&Path>) -> Result<Option<PathBuf>> {
        match self.cached_root() {
            CachedRoot::Unset => self.find_root(start),
            CachedRoot::None => Ok(None),
            CachedRoot::Root(root) => Ok(Some(root)),
        }
    }

    /// Search for the workspace root, ignoring the cache, and record the
    /// result (including "none found") as the cached root.
    ///
    /// Derived path keys are recomputed but nothing is created on disk.
    pub fn find_root(&mut self, start: Option<&Path>) -> Result<Option<PathBuf>> {
        let marker = self.marker_name();
        let found = find_marker_root(start, &marker)?;

        match &found {
            Some(root) => info!("Found workspace root: {}", root.display()),
            None => debug!("No '{}' workspace found", marker),
        }
        self.record_root(found.as_deref())?;
        Ok(found)
    }

    /// Make `root` the workspace root and bootstrap its metadata tree.
    ///
    /// An empty path leaves the workspace: the root and every derived key
    /// are cleared and nothing on disk is touched. Otherwise relative paths
    /// are taken against the current directory and `~` is expanded.
    pub fn set_root(&mut self, root: impl AsRef<Path>) -> Result<()> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            debug!("Clearing workspace root");
            return self.record_root(None);
        }

        let root = absolutize(&expand_tilde(root))?;
        self.store
            .set(ConfigKey::RootDir, &root.to_string_lossy())?;

        let paths = WorkspacePaths::derive(&root, &self.layout);
        run_steps(&mut self.store, &paths, BootstrapStep::MetaDir)?;

        info!("Workspace ready at {}", root.display());
        Ok(())
    }

    /// Rerun the bootstrap of the cached root starting at `step`.
    ///
    /// Used after a [`crate::BootstrapError`] once the cause is fixed; a no-op
    /// when no root is cached.
    pub fn resume_from(&mut self, step: BootstrapStep) -> Result<()> {
        let CachedRoot::Root(root) = self.cached_root() else {
            warn!("No workspace root recorded, nothing to resume");
            return Ok(());
        };
        let paths = WorkspacePaths::derive(&root, &self.layout);
        run_steps(&mut self.store, &paths, step)
    }

    /// Drop the cached root so the next [`Self::root`] walks again.
    pub fn forget_root(&mut self) -> Result<()> {
        self.record_root(None)?;
        self.store.set(ConfigKey::RootDir, ROOT_UNSET)
    }

    /// Derived paths of the cached root, if there is one.
    pub fn paths(&self) -> Option<WorkspacePaths> {
        match self.cached_root() {
            CachedRoot::Root(root) => Some(WorkspacePaths::derive(&root, &self.layout)),
            CachedRoot::Unset | CachedRoot::None => None,
        }
    }

    /// Resolve the root if needed, then read a derived path key.
    pub fn derived_dir(&mut self, key: ConfigKey) -> Result<Option<PathBuf>> {
        self.root(None)?;
        let value = self.store.get_string(key);
        Ok((!value.is_empty()).then(|| PathBuf::from(value)))
    }

    pub fn info(&self) -> WorkspaceInfo {
        let root_dir = match self.cached_root() {
            CachedRoot::Root(root) => root.to_string_lossy().into_owned(),
            CachedRoot::Unset | CachedRoot::None => String::new(),
        };
        WorkspaceInfo {
            root_dir,
            meta_dir: self.store.get_string(ConfigKey::MetaDir),
            log_dir: self.store.get_string(ConfigKey::LogDir),
            tmp_dir: self.store.get_string(ConfigKey::TmpDir),
            vcs_dir: self.store.get_string(ConfigKey::VcsDir),
            db_dir: self.store.get_string(ConfigKey::DbDir),
            db: self.store.get_string(ConfigKey::Db),
        }
    }

    /// Store `root` as the cached root and rewrite every derived key to match.
    fn record_root(&mut self, root: Option<&Path>) -> Result<()> {
        let Some(root) = root else {
            self.store.set(ConfigKey::RootDir, "")?;
            for key in ConfigKey::DERIVED {
                self.store.set(key, "")?;
            }
            return Ok(());
        };

        self.store.set(ConfigKey::RootDir, &root.to_string_lossy())?;
        let paths = WorkspacePaths::derive(root, &self.layout);
        for step in BootstrapStep::ALL {
            self.store
                .set(step.key(), &step.path(&paths).to_string_lossy())?;
        }
        Ok(())
    }
}
