//! Plugin configuration.
//!
//! Every field is optional in the serialized form; missing keys fall back to
//! the values the bundled host integration ships with.

use crate::platform::domain::{CommandName, PermissionPolicy, PlatformDomainError, PlatformInfo};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Default root under which hosts keep plugin data.
pub const DEFAULT_DATA_ROOT: &str = "plugins-data";

/// Subdirectory of the data root owned by this plugin.
pub const PLUGIN_DIRECTORY_NAME: &str = "spark";

/// Errors returned while loading plugin configuration.
#[derive(Debug, Error)]
pub enum PluginConfigError {
    /// The configuration file could not be read.
    #[error("failed to read plugin configuration {path}: {source}")]
    Io {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON or has the wrong shape.
    #[error("failed to parse plugin configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured value failed domain validation.
    #[error(transparent)]
    Domain(#[from] PlatformDomainError),
}

/// Result type for configuration loading.
pub type PluginConfigResult<T> = Result<T, PluginConfigError>;

/// Settings shared by every adapter piece of one plugin instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Name of the command registered with the host.
    pub command_name: CommandName,
    /// Working directory handed to the monitoring core.
    pub plugin_directory: Utf8PathBuf,
    /// Version string reported for the plugin itself.
    pub plugin_version: String,
    /// Metadata describing the host platform.
    pub platform: PlatformInfo,
    /// Permission answer used when the host has no permission system.
    pub permission_policy: PermissionPolicy,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            command_name: CommandName::default(),
            plugin_directory: Utf8Path::new(DEFAULT_DATA_ROOT).join(PLUGIN_DIRECTORY_NAME),
            plugin_version: env!("CARGO_PKG_VERSION").to_owned(),
            platform: PlatformInfo::default(),
            permission_policy: PermissionPolicy::default(),
        }
    }
}

impl PluginConfig {
    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PluginConfigError::Parse`] when the text is malformed or a
    /// value fails validation during deserialization.
    pub fn from_json_str(raw: &str) -> PluginConfigResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PluginConfigError::Io`] when the file cannot be read and
    /// [`PluginConfigError::Parse`] when its contents are invalid.
    pub fn load(path: impl AsRef<Utf8Path>) -> PluginConfigResult<Self> {
        let config_path = path.as_ref();
        let io_error = |source: io::Error| PluginConfigError::Io {
            path: config_path.to_owned(),
            source,
        };

        let file_name = config_path.file_name().ok_or_else(|| {
            io_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "configuration path must name a file",
            ))
        })?;
        let parent = config_path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));

        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
        let raw = dir.read_to_string(file_name).map_err(io_error)?;
        Self::from_json_str(&raw)
    }

    /// Replaces the command name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginConfigError::Domain`] when the name is invalid.
    pub fn with_command_name(mut self, name: impl Into<String>) -> PluginConfigResult<Self> {
        self.command_name = CommandName::new(name)?;
        Ok(self)
    }

    /// Places the working directory under a host data root.
    #[must_use]
    pub fn with_data_root(mut self, root: impl AsRef<Utf8Path>) -> Self {
        self.plugin_directory = root.as_ref().join(PLUGIN_DIRECTORY_NAME);
        self
    }

    /// Replaces the platform metadata.
    #[must_use]
    pub fn with_platform(mut self, platform: PlatformInfo) -> Self {
        self.platform = platform;
        self
    }

    /// Replaces the permission fallback policy.
    #[must_use]
    pub const fn with_permission_policy(mut self, policy: PermissionPolicy) -> Self {
        self.permission_policy = policy;
        self
    }
}
