//! Error handling types and utilities.

use crate::config::ConfigKey;
use crate::workspace::BootstrapStep;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for wkspc operations.
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Errors raised while resolving or bootstrapping a workspace.
///
/// Not finding a workspace is never one of these: the resolver reports that
/// as an empty root.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The current working directory could not be determined.
    #[error("unable to find the workspace root directory (get current working dir failed)")]
    CurrentDir(#[source] io::Error),

    /// An unexpected I/O failure while walking up the directory tree.
    #[error("failed to check for '{marker}' in {}", .dir.display())]
    Walk {
        dir: PathBuf,
        marker: String,
        #[source]
        source: io::Error,
    },

    /// A bootstrap step failed; earlier steps are left in place.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// Attempted to overwrite a setting that only accepts a default.
    #[error("setting '{0}' is read-only once registered")]
    ReadOnlySetting(ConfigKey),

    /// The settings file could not be read.
    #[error("failed to read settings file {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is not valid TOML for [`crate::config::FileConfig`].
    #[error("failed to parse settings file {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A failed step of the workspace bootstrap.
///
/// Every step is idempotent, so the whole bootstrap (or
/// [`crate::WorkspaceContext::resume_from`] with [`BootstrapError::step`]) can
/// be rerun once the underlying problem is fixed.
#[derive(Debug, Error)]
#[error("workspace bootstrap failed at step '{step}' creating {}", .path.display())]
pub struct BootstrapError {
    pub step: BootstrapStep,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl BootstrapError {
    /// Steps that completed before this one failed.
    pub fn completed(&self) -> &'static [BootstrapStep] {
        let index = BootstrapStep::ALL
            .iter()
            .position(|step| *step == self.step)
            .unwrap_or(0);
        &BootstrapStep::ALL[..index]
    }
}
