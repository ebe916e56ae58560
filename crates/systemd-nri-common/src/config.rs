//! Plugin configuration model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CGROUP_ROOT, DEFAULT_PLUGIN_IDX, DEFAULT_PLUGIN_NAME};
use crate::error::{Result, SystemdNriError};

/// Root configuration for the systemd plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Name the plugin registers under.
    pub plugin_name: String,
    /// Two-digit index ordering this plugin among others.
    pub plugin_idx: String,
    /// Dump requests and adjustments at info level.
    pub verbose: bool,
    /// Host path probed for cgroup filesystem support.
    pub cgroup_root: PathBuf,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugin_name: DEFAULT_PLUGIN_NAME.into(),
            plugin_idx: DEFAULT_PLUGIN_IDX.into(),
            verbose: false,
            cgroup_root: PathBuf::from(DEFAULT_CGROUP_ROOT),
        }
    }
}

impl PluginConfig {
    /// Checks the configuration for values the runtime would reject.
    ///
    /// # Errors
    ///
    /// Returns [`SystemdNriError::Config`] if the plugin name is empty, the
    /// index is not exactly two ASCII digits, or the cgroup root is relative.
    pub fn validate(&self) -> Result<()> {
        if self.plugin_name.is_empty() {
            return Err(SystemdNriError::Config {
                message: "plugin name must not be empty".into(),
            });
        }
        if self.plugin_idx.len() != 2 || !self.plugin_idx.chars().all(|c| c.is_ascii_digit()) {
            return Err(SystemdNriError::Config {
                message: format!(
                    "plugin index must be two digits, got \"{}\"",
                    self.plugin_idx
                ),
            });
        }
        if !self.cgroup_root.is_absolute() {
            return Err(SystemdNriError::Config {
                message: format!(
                    "cgroup root must be an absolute path, got {}",
                    self.cgroup_root.display()
                ),
            });
        }
        Ok(())
    }
}
