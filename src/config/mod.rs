//! Configuration system for draftquill.
//!
//! Settings live in a TOML file and cover history depth and the host-side
//! switches the core reads: the tree data feature gate and the key seed.
//!
//! # Example
//!
//! ```
//! use draftquill::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.undo_limit, 50);
//! assert!(config.allow_undo);
//!
//! let custom = Config {
//!     tree_data_support: true,
//!     ..Config::default()
//! };
//! assert!(custom.tree_data_support);
//! ```

use crate::gate;
use crate::keys::{reset_key_generator, KeySource};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Undo depth used when nothing else is configured.
pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// Configuration for a draftquill session.
///
/// # Fields
///
/// * `undo_limit` - Maximum number of undo entries to keep, 0 for unbounded (default: 50)
/// * `allow_undo` - Record history on every push (default: true)
/// * `tree_data_support` - Build new content from tree blocks (default: false)
/// * `key_seed` - Seed for reproducible block keys (default: none)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of undo entries to keep
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    /// Record history on every push
    #[serde(default = "default_allow_undo")]
    pub allow_undo: bool,

    /// Build new content from tree blocks
    #[serde(default)]
    pub tree_data_support: bool,

    /// Seed for reproducible block keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_seed: Option<u64>,
}

fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

fn default_allow_undo() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_limit: default_undo_limit(),
            allow_undo: default_allow_undo(),
            tree_data_support: false,
            key_seed: None,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/draftquill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("draftquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable config");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Loads configuration from `path`.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Applies the host-side settings to this thread: the tree data feature
    /// gate and the block key generator.
    pub fn install(&self) {
        let tree = self.tree_data_support;
        gate::set_feature_gate(move |flag| flag == gate::TREE_DATA_SUPPORT && tree);
        reset_key_generator(match self.key_seed {
            Some(seed) => KeySource::Seeded(seed),
            None => KeySource::Random,
        });
        tracing::debug!(
            tree_data_support = tree,
            seeded = self.key_seed.is_some(),
            "installed configuration"
        );
    }
}
