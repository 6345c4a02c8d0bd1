//! Optional TOML configuration.
//!
//! Looked up in this order, first hit wins:
//!   1. `<workspace>/.rails-goto.toml`
//!   2. `<user config dir>/rails-goto/config.toml`
//!   3. built-in defaults
//!
//! Every key is optional:
//!
//! ```toml
//! [search]
//! follow_symlinks = true
//! max_depth = 32
//!
//! [views]
//! extensions = ["html", "erb", "haml", "slim"]
//!
//! [helpers]
//! fallback_dirs = ["lib", "app/models", "app/controllers"]
//! ```
use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;

use crate::error::{ResolveError, Result};

/// File name of the per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = ".rails-goto.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub views: ViewConfig,
    pub helpers: HelperConfig,
}

/// Directory traversal options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Descend through symlinked directories. Loops are detected either way.
    pub follow_symlinks: bool,
    /// Maximum directory depth below a search root.
    pub max_depth: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Final extensions accepted for a template (`_form.html.erb` ends in `erb`).
    pub extensions: Vec<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            extensions: ["html", "erb", "haml", "slim"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    /// Workspace-relative directories searched after `app/helpers` or
    /// `app/mailers` come up empty.
    pub fallback_dirs: Vec<String>,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            fallback_dirs: ["lib", "app/models", "app/controllers"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    /// Parse a configuration document.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self> {
        toml::from_str(source).map_err(|err| ResolveError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Load configuration for a workspace, falling back to the user config
    /// file and then to defaults. Unreadable or malformed files are logged
    /// and skipped.
    pub fn load(workspace_root: Option<&Path>) -> Self {
        workspace_root
            .map(|root| root.join(PROJECT_CONFIG_FILE))
            .into_iter()
            .chain(user_config_path())
            .find_map(|path| Self::load_file(&path))
            .unwrap_or_default()
    }

    /// Like [`Config::load`], but never consults the user config file.
    pub fn load_project(workspace_root: &Path) -> Self {
        Self::load_file(&workspace_root.join(PROJECT_CONFIG_FILE)).unwrap_or_default()
    }

    fn load_file(path: &Path) -> Option<Self> {
        if !path.is_file() {
            return None;
        }
        match crate::error::read_source(path).and_then(|src| Self::from_toml(&src, path)) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                Some(config)
            }
            Err(err) => {
                tracing::warn!("{err}");
                None
            }
        }
    }
}

/// `<config_dir>/rails-goto/config.toml`, when a home directory is known.
fn user_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("rails-goto").join("config.toml"))
}
