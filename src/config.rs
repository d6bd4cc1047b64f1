//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treemodel/treemodel.toml`
//! 3. Local config: `<dir>/.treemodel.toml`
//! 4. Environment variables: `TREEMODEL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::display::DisplayOptions;

/// Unified configuration for treemodel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Append node ids to rendered rows
    pub show_ids: bool,
    /// Number of id characters to show
    pub id_width: usize,
    /// Prefix rows with the icon name
    pub show_icons: bool,
    /// Text of the root row
    pub root_label: String,
    /// Outline used when no file is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let display = DisplayOptions::default();
        Self {
            show_ids: display.show_ids,
            id_width: display.id_width,
            show_icons: display.show_icons,
            root_label: display.root_label,
            outline: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub show_ids: Option<bool>,
    pub id_width: Option<usize>,
    pub show_icons: Option<bool>,
    pub root_label: Option<String>,
    pub outline: Option<PathBuf>,
}

/// Get the XDG config directory for treemodel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treemodel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treemodel.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treemodel.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Options for [`TreeDisplay`](crate::display::TreeDisplay) rendering.
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_ids: self.show_ids,
            id_width: self.id_width,
            show_icons: self.show_icons,
            root_label: self.root_label.clone(),
        }
    }

    /// Expand shell variables and tilde in the outline path.
    fn expand_paths(&mut self) {
        if let Some(outline) = &self.outline {
            let expanded = expand_env_vars(outline.to_string_lossy().as_ref());
            self.outline = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
            id_width: overlay.id_width.unwrap_or(self.id_width),
            show_icons: overlay.show_icons.unwrap_or(self.show_icons),
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
            outline: overlay.outline.clone().or_else(|| self.outline.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treemodel.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply TREEMODEL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEMODEL").try_parsing(true))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("show_ids") {
            settings.show_ids = val;
        }
        if let Ok(val) = config.get::<usize>("id_width") {
            settings.id_width = val;
        }
        if let Ok(val) = config.get_bool("show_icons") {
            settings.show_icons = val;
        }
        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }
        if let Ok(val) = config.get_string("outline") {
            settings.outline = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treemodel configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treemodel/treemodel.toml
#   Local:  <dir>/.treemodel.toml
#   Env:    TREEMODEL_* environment variables

# Append node ids to rendered rows
# show_ids = false

# Number of id characters shown with show_ids
# id_width = 8

# Prefix rows with [icon-name]
# show_icons = true

# Text of the root row
# root_label = "."

# Outline used when no file is given
# outline = "~/notes/outline.toml"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
