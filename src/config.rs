//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeline/treeline.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `TREELINE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{AppError, InputShape};
use crate::domain::FieldSchema;

/// Unified configuration for treeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Attribute shown as the node label in tree output (falls back to the id)
    pub label: String,
    /// Default shape of input files
    pub input: InputShape,
    /// Field names and glyphs
    pub schema: FieldSchema,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label: "name".into(),
            input: InputShape::Flat,
            schema: FieldSchema::default(),
        }
    }
}

/// Get the XDG config directory for treeline.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeline").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeline.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(
        shellexpand::full(path)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string()),
    )
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// Config files are merged key by key: a key the local file leaves out
    /// keeps the global value, and a key neither file sets keeps the
    /// compiled default. Environment variables then override individual keys.
    pub fn load(local: Option<&Path>) -> Result<Self, AppError> {
        let local = match local {
            Some(local) => {
                let local = expand_path(&local.to_string_lossy());
                if !local.exists() {
                    return Err(AppError::Config {
                        message: format!("config file not found: {}", local.display()),
                    });
                }
                Some(local)
            }
            None => None,
        };
        Self::load_layers(global_config_path().as_deref(), local.as_deref())
    }

    /// Merge `global` (skipped if absent) and `local` over the defaults, then apply env overrides.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder();
        if let Some(global) = global {
            builder = builder.add_source(File::from(global).format(FileFormat::Toml).required(false));
        }
        if let Some(local) = local {
            builder = builder.add_source(File::from(local).format(FileFormat::Toml).required(true));
        }

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;

        Self::apply_env_overrides(settings)
    }

    /// Apply TREELINE_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `TREELINE_SCHEMA__PARENT=pid`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, AppError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREELINE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("label") {
            settings.label = val;
        }
        if let Ok(val) = config.get::<InputShape>("input") {
            settings.input = val;
        }
        let schema = &mut settings.schema;
        for (key, field) in [
            ("schema.id", &mut schema.id),
            ("schema.parent", &mut schema.parent),
            ("schema.level", &mut schema.level),
            ("schema.children", &mut schema.children),
            ("schema.breadcrumbs", &mut schema.breadcrumbs),
            ("schema.icons", &mut schema.icons),
            ("schema.first", &mut schema.first),
            ("schema.last", &mut schema.last),
            ("schema.only", &mut schema.only),
            ("schema.selected", &mut schema.selected),
            ("schema.visible", &mut schema.visible),
            ("schema.left", &mut schema.left),
            ("schema.right", &mut schema.right),
        ] {
            if let Ok(val) = config.get_string(key) {
                *field = val;
            }
        }
        if let Ok(val) = config.get_string("schema.sort") {
            schema.sort = Some(val);
        }
        if let Ok(val) = config.get_string("schema.origin") {
            schema.origin = Some(val.into());
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeline configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeline/treeline.toml
#   Local:  file given with --config
#   Env:    TREELINE_* environment variables (TREELINE_SCHEMA__PARENT=pid)

# Attribute used as node label in `treeline tree`
# label = "name"

# Shape of input files: "flat", "nested" or "snapshot"
# input = "flat"

[schema]
# id = "id"
# parent = "parent_id"
# Sibling ordering key; without it siblings keep input order
# sort = "position"
# level = "level"
# children = "children"
# breadcrumbs = "breadcrumbs"
# icons = "icons"
# first = "first"
# last = "last"
# only = "only"
# selected = "selected"
# visible = "visible"
# left = "left"
# right = "right"
# Id left out of every breadcrumb path (synthetic root)
# origin = 0

[schema.glyphs]
# empty = "  "
# join = "├─"
# bottom = "└─"
# bar = "│ "
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> AppError {
    AppError::Config {
        message: e.to_string(),
    }
}
