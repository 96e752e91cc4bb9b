//! Locate and bootstrap `.dvln` workspaces.
//!
//! A workspace is a directory tree whose root holds a marker directory
//! (`.dvln` by default). [`WorkspaceContext`] finds the nearest enclosing root,
//! caches it in a [`config::ConfigStore`], and creates the metadata tree
//! (log, tmp, vcs and db entries) under the marker when a root is set.

pub mod config;
pub mod error;
pub mod fsutil;
pub mod tracing;
pub mod workspace;

pub use config::{ConfigKey, ConfigStore, FileConfig, Mutability, Settings, Visibility};
pub use error::{BootstrapError, Result, WorkspaceError};
pub use workspace::{
    BootstrapStep, CachedRoot, Layout, WorkspaceContext, WorkspaceInfo, WorkspacePaths,
    WorkspaceReader, WorkspaceWriter,
};
