//! Workspace discovery and bootstrap: layout, detection, caching and creation.

pub mod api;
pub mod bootstrap;
pub mod context;
pub mod detection;
pub mod layout;

pub use api::{WorkspaceReader, WorkspaceWriter};
pub use bootstrap::{BootstrapStep, EntryKind, run_steps};
pub use context::{CachedRoot, WorkspaceContext, WorkspaceInfo};
pub use detection::{absolutize, expand_tilde, find_marker_root, resolve_start};
pub use layout::{
    DEFAULT_DB_FILE_NAME, DEFAULT_META_DIR_NAME, DEFAULT_STATIC_FILE_NAME, Layout, WorkspacePaths,
};
