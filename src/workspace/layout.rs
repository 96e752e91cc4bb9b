//! Names and derived paths of the workspace metadata tree.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default name of the marker directory under a workspace root.
pub const DEFAULT_META_DIR_NAME: &str = ".dvln";
/// Default name of the database placeholder file.
pub const DEFAULT_DB_FILE_NAME: &str = "wkspc.db";
/// Default name of the static state file in the vcs data dir.
pub const DEFAULT_STATIC_FILE_NAME: &str = "static.dvln";

/// File and directory names that make up a workspace.
///
/// Fixed at process start; a [`crate::WorkspaceContext`] never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub meta_dir_name: String,
    pub db_file_name: String,
    pub static_file_name: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            meta_dir_name: DEFAULT_META_DIR_NAME.to_string(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            static_file_name: DEFAULT_STATIC_FILE_NAME.to_string(),
        }
    }
}

/// Every path derived from a workspace root.
///
/// ```text
/// <root>/.dvln                      meta_dir
/// <root>/.dvln/log                  log_dir
/// <root>/.dvln/tmp                  tmp_dir
/// <root>/.dvln/vcs                  vcs_dir
/// <root>/.dvln/vcs/wkspc            vcs_data_dir
/// <root>/.dvln/vcs/wkspc/static.dvln static_file
/// <root>/.dvln/db                   db_dir
/// <root>/.dvln/db/wkspc.db          db_file
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub meta_dir: PathBuf,
    pub log_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub vcs_dir: PathBuf,
    pub vcs_data_dir: PathBuf,
    pub static_file: PathBuf,
    pub db_dir: PathBuf,
    pub db_file: PathBuf,
}

impl WorkspacePaths {
    pub fn derive(root: &Path, layout: &Layout) -> Self {
        let meta_dir = root.join(&layout.meta_dir_name);
        let vcs_dir = meta_dir.join("vcs");
        let vcs_data_dir = vcs_dir.join("wkspc");
        let db_dir = meta_dir.join("db");

        Self {
            root: root.to_path_buf(),
            log_dir: meta_dir.join("log"),
            tmp_dir: meta_dir.join("tmp"),
            static_file: vcs_data_dir.join(&layout.static_file_name),
            db_file: db_dir.join(&layout.db_file_name),
            meta_dir,
            vcs_dir,
            vcs_data_dir,
            db_dir,
        }
    }
}
