use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinate;

fn default_community() -> String {
    "SB".to_string()
}

fn default_fetch_for_all_objects() -> bool {
    true
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider community code sent with every request.
    #[serde(default = "default_community")]
    pub community: String,

    /// Override for the provider base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// When false, temperature is only resolved for `target_object_id`.
    #[serde(default = "default_fetch_for_all_objects")]
    pub fetch_for_all_objects: bool,

    /// Object the temperature panel is scoped to when gating is on.
    #[serde(default)]
    pub target_object_id: Option<String>,

    /// Coordinate used when a clicked object carries none. Kept last so
    /// the TOML table serializes after the scalar fields.
    ///
    /// Example TOML:
    /// [default_location]
    /// latitude = 36.8381
    /// longitude = -2.4597
    #[serde(default)]
    pub default_location: Option<Coordinate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            community: default_community(),
            base_url: None,
            default_location: None,
            fetch_for_all_objects: default_fetch_for_all_objects(),
            target_object_id: None,
        }
    }
}

impl Config {
    /// The coordinate to use when an object provides none.
    pub fn fallback_coordinate(&self) -> Coordinate {
        self.default_location.unwrap_or_default()
    }

    /// Whether the resolver should run for the clicked object.
    pub fn should_fetch_for(&self, object_id: Option<&str>) -> bool {
        if self.fetch_for_all_objects {
            return true;
        }
        match (self.target_object_id.as_deref(), object_id) {
            (Some(target), Some(id)) => target == id,
            _ => false,
        }
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "sitetemp", "sitetemp-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
