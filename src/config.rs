//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/doctree/doctree.toml`
//! 3. Local config: `<project_dir>/.doctree.toml`
//! 4. Environment variables: `DOCTREE_*` prefix

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub hierarchy: Option<PathBuf>,
    pub pretty: Option<bool>,
    pub wrap_root: Option<bool>,
    pub extensions: Option<Vec<String>>,
}

/// Unified configuration for doctree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Hierarchy definition used when `--hierarchy` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<PathBuf>,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Wrap output as `{ <root name>: tree }`
    pub wrap_root: bool,
    /// File extensions picked up by batch runs
    pub extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hierarchy: None,
            pretty: true,
            wrap_root: false,
            extensions: vec!["md".into(), "txt".into()],
        }
    }
}

/// Get the XDG config directory for doctree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "doctree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("doctree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".doctree.toml")
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

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Result is sorted and de-duplicated
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: BTreeSet<String> = base.iter().cloned().collect();

        for item in overlay {
            if let Some(negated) = item.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(item.clone());
            }
        }

        result.into_iter().collect()
    }

    /// Expand shell variables and tilde in the hierarchy path.
    fn expand_paths(&mut self) {
        if let Some(hierarchy) = &self.hierarchy {
            let expanded = expand_env_vars(hierarchy.to_string_lossy().as_ref());
            self.hierarchy = Some(PathBuf::from(expanded));
        }
    }

    /// Apply global config onto defaults: arrays REPLACE the defaults.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            hierarchy: global.hierarchy.clone().or_else(|| self.hierarchy.clone()),
            pretty: global.pretty.unwrap_or(self.pretty),
            wrap_root: global.wrap_root.unwrap_or(self.wrap_root),
            extensions: global
                .extensions
                .clone()
                .unwrap_or_else(|| self.extensions.clone()),
        }
    }

    /// Merge local config onto self: arrays UNION (with `!item` negation).
    ///
    /// A relative hierarchy path is resolved against the project directory.
    fn merge_local(&self, local: &RawSettings, project_dir: &Path) -> Self {
        Self {
            hierarchy: local
                .hierarchy
                .as_ref()
                .map(|p| {
                    let expandable = p.to_string_lossy().starts_with(['~', '$']);
                    if p.is_relative() && !expandable {
                        project_dir.join(p)
                    } else {
                        p.clone()
                    }
                })
                .or_else(|| self.hierarchy.clone()),
            pretty: local.pretty.unwrap_or(self.pretty),
            wrap_root: local.wrap_root.unwrap_or(self.wrap_root),
            extensions: local
                .extensions
                .as_ref()
                .map(|o| Self::merge_array(&self.extensions, o))
                .unwrap_or_else(|| self.extensions.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for the local config
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_local(&raw, dir);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply DOCTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("DOCTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("hierarchy") {
            settings.hierarchy = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }
        if let Ok(val) = config.get_bool("wrap_root") {
            settings.wrap_root = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("extensions") {
            settings.extensions = val;
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
        r#"# doctree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/doctree/doctree.toml  (defines your baseline)
#   Local:  <project>/.doctree.toml         (project-specific additions)
#   Env:    DOCTREE_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global. Use "!item" to REMOVE an inherited item:
#     extensions = ["text", "!md"]

# Hierarchy definition (.toml or .json) used when --hierarchy is not given
# hierarchy = "~/hierarchies/civil_code.toml"

# Pretty-print JSON output
# pretty = true

# Wrap output under the hierarchy's root name
# wrap_root = false

# File extensions structured by `doctree batch`
# extensions = ["md", "txt"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
