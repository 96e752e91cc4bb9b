//! Settings registry used as the workspace cache.
//!
//! Every value the workspace code persists (the root and the paths derived
//! from it) lives behind a [`ConfigKey`] in a [`ConfigStore`]. The spelling
//! returned by [`ConfigKey::as_str`] is part of the persisted surface other
//! tooling reads, so it must stay stable.

use crate::error::{Result, WorkspaceError};
use crate::workspace::Layout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Stored in [`ConfigKey::RootDir`] until a root has been resolved or set.
pub const ROOT_UNSET: &str = "none";

/// Environment variable that overrides the marker directory name at startup.
pub const META_DIR_NAME_ENV: &str = "WKSPC_META_DIR_NAME";

/// Keys understood by the workspace settings registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    MetaDirName,
    RootDir,
    MetaDir,
    LogDir,
    TmpDir,
    VcsDir,
    VcsDataDir,
    StaticFile,
    DbDir,
    Db,
}

impl ConfigKey {
    /// Every key, in registration order.
    pub const ALL: [Self; 10] = [
        Self::MetaDirName,
        Self::RootDir,
        Self::MetaDir,
        Self::LogDir,
        Self::TmpDir,
        Self::VcsDir,
        Self::VcsDataDir,
        Self::StaticFile,
        Self::DbDir,
        Self::Db,
    ];

    /// Keys whose value is derived from the workspace root.
    pub const DERIVED: [Self; 8] = [
        Self::MetaDir,
        Self::LogDir,
        Self::TmpDir,
        Self::VcsDir,
        Self::VcsDataDir,
        Self::StaticFile,
        Self::DbDir,
        Self::Db,
    ];

    /// The persisted key name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetaDirName => "wkspcMetaDirName",
            Self::RootDir => "wkspcRootDir",
            Self::MetaDir => "wkspcMetaDir",
            Self::LogDir => "wkspcLogDir",
            Self::TmpDir => "wkspcTmpDir",
            Self::VcsDir => "wkspcVCSDir",
            Self::VcsDataDir => "wkspcVCSDataDir",
            Self::StaticFile => "wkspcStaticDvln",
            Self::DbDir => "wkspcDBDir",
            Self::Db => "wkspcDB",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a setting is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    /// Only used by the tool itself.
    #[default]
    InternalUse,
    /// Shown to and settable by users.
    ExternalUse,
}

/// How a setting may change after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Default value only, never overridden.
    ConstGlobal,
    /// Default value that the owning code may change at runtime.
    #[default]
    InternalGlobal,
    /// Default that env, config file or CLI may override.
    BasicGlobal,
}

/// Key/value store the workspace code reads from and writes its cache into.
pub trait ConfigStore {
    /// Current value of `key`: the last value set, else the default, else empty.
    fn get_string(&self, key: ConfigKey) -> String;

    /// Override the value of `key`.
    fn set(&mut self, key: ConfigKey, value: &str) -> Result<()>;

    /// Register (or replace) the default for `key`.
    fn set_default(&mut self, key: ConfigKey, value: &str);

    /// Register the description and classes for `key`.
    fn set_desc(
        &mut self,
        key: ConfigKey,
        description: &str,
        visibility: Visibility,
        mutability: Mutability,
    );
}

#[derive(Debug, Clone, Default)]
struct Entry {
    default: String,
    value: Option<String>,
    description: String,
    visibility: Visibility,
    mutability: Mutability,
}

/// In-memory [`ConfigStore`] with registration metadata.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    entries: BTreeMap<ConfigKey, Entry>,
}

/// A registered setting as reported by [`Settings::describe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingInfo {
    pub key: &'static str,
    pub default: String,
    pub value: String,
    pub description: String,
    pub visibility: Visibility,
    pub mutability: Mutability,
}

impl Settings {
    /// Create an empty store with no registered keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// List every registered setting in key order.
    pub fn describe(&self) -> Vec<SettingInfo> {
        self.entries
            .iter()
            .map(|(key, entry)| SettingInfo {
                key: key.as_str(),
                default: entry.default.clone(),
                value: entry.value.clone().unwrap_or_else(|| entry.default.clone()),
                description: entry.description.clone(),
                visibility: entry.visibility,
                mutability: entry.mutability,
            })
            .collect()
    }
}

impl ConfigStore for Settings {
    fn get_string(&self, key: ConfigKey) -> String {
        self.entries
            .get(&key)
            .map(|entry| entry.value.as_ref().unwrap_or(&entry.default).clone())
            .unwrap_or_default()
    }

    fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let entry = self.entries.entry(key).or_default();
        if entry.mutability == Mutability::ConstGlobal {
            return Err(WorkspaceError::ReadOnlySetting(key));
        }
        entry.value = Some(value.to_string());
        Ok(())
    }

    fn set_default(&mut self, key: ConfigKey, value: &str) {
        self.entries.entry(key).or_default().default = value.to_string();
    }

    fn set_desc(
        &mut self,
        key: ConfigKey,
        description: &str,
        visibility: Visibility,
        mutability: Mutability,
    ) {
        let entry = self.entries.entry(key).or_default();
        entry.description = description.to_string();
        entry.visibility = visibility;
        entry.mutability = mutability;
    }
}

/// Register defaults and descriptions for every workspace key.
///
/// The marker name comes from `layout` and is registered as a constant; the
/// root starts at [`ROOT_UNSET`] and every derived path starts empty.
pub fn register_defaults<S: ConfigStore + ?Sized>(store: &mut S, layout: &Layout) {
    // Constant: default value only, no overrides
    store.set_default(ConfigKey::MetaDirName, &layout.meta_dir_name);
    store.set_desc(
        ConfigKey::MetaDirName,
        "name of dir under wkspc root where dvln cfg lives",
        Visibility::InternalUse,
        Mutability::ConstGlobal,
    );

    // Internal: default value, changed by the workspace code
    store.set_default(ConfigKey::RootDir, ROOT_UNSET);
    store.set_desc(
        ConfigKey::RootDir,
        "the workspace root directory, if one exists",
        Visibility::InternalUse,
        Mutability::InternalGlobal,
    );

    let derived = [
        (ConfigKey::MetaDir, format!("the {} dir", layout.meta_dir_name)),
        (ConfigKey::LogDir, format!("the {}/log dir", layout.meta_dir_name)),
        (ConfigKey::TmpDir, format!("the {}/tmp dir", layout.meta_dir_name)),
        (ConfigKey::VcsDir, format!("the {}/vcs dir", layout.meta_dir_name)),
        (
            ConfigKey::VcsDataDir,
            format!("the {}/vcs/wkspc dir", layout.meta_dir_name),
        ),
        (
            ConfigKey::StaticFile,
            format!(
                "the {}/vcs/wkspc/{} file",
                layout.meta_dir_name, layout.static_file_name
            ),
        ),
        (ConfigKey::DbDir, format!("the {}/db dir", layout.meta_dir_name)),
        (
            ConfigKey::Db,
            format!("the {}/db/{} file", layout.meta_dir_name, layout.db_file_name),
        ),
    ];
    for (key, what) in derived {
        store.set_default(key, "");
        store.set_desc(
            key,
            &format!("{what} under the workspace root dir, empty if no root"),
            Visibility::InternalUse,
            Mutability::InternalGlobal,
        );
    }
}

/// Startup settings file.
///
/// ```toml
/// meta_dir_name = ".dvln"
/// db_file_name = "wkspc.db"
/// static_file_name = "static.dvln"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub meta_dir_name: Option<String>,
    pub db_file_name: Option<String>,
    pub static_file_name: Option<String>,
}

impl FileConfig {
    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WorkspaceError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| WorkspaceError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply the values present in this file on top of `layout`.
    pub fn apply(self, mut layout: Layout) -> Layout {
        if let Some(name) = self.meta_dir_name {
            layout.meta_dir_name = name;
        }
        if let Some(name) = self.db_file_name {
            layout.db_file_name = name;
        }
        if let Some(name) = self.static_file_name {
            layout.static_file_name = name;
        }
        layout
    }
}
