//! Application configuration for docfuse.
//!
//! User config lives at `~/.docfuse/docfuse.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocfuseError, Result};
use crate::profile::{ProjectProfile, builtin_profiles};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docfuse.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docfuse";

// ---------------------------------------------------------------------------
// Config structs (matching docfuse.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Additional or overriding project profiles.
    #[serde(default)]
    pub profiles: Vec<ProjectProfile>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory the documentation repositories are checked out under;
    /// profile content roots are resolved relative to it.
    #[serde(default = "default_docs_root")]
    pub docs_root: String,

    /// Directory merged documents are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum concurrent page loads.
    #[serde(default = "default_load_concurrency")]
    pub load_concurrency: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            output_dir: default_output_dir(),
            load_concurrency: default_load_concurrency(),
        }
    }
}

fn default_docs_root() -> String {
    ".".into()
}
fn default_output_dir() -> String {
    ".".into()
}
fn default_load_concurrency() -> u32 {
    8
}

// ---------------------------------------------------------------------------
// Profile table
// ---------------------------------------------------------------------------

/// The resolved set of project profiles: built-ins plus user entries,
/// user entries overriding built-ins by id.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: Vec<ProjectProfile>,
}

impl ProfileTable {
    /// Build the table from an application config.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut profiles = builtin_profiles();
        for user in &config.profiles {
            match profiles.iter_mut().find(|p| p.id == user.id) {
                Some(existing) => *existing = user.clone(),
                None => profiles.push(user.clone()),
            }
        }
        Self { profiles }
    }

    /// Look up a profile by set identifier.
    pub fn get(&self, id: &str) -> Result<&ProjectProfile> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DocfuseError::ConfigNotSupported { id: id.to_string() })
    }

    /// All known profiles, built-ins first.
    pub fn all(&self) -> &[ProjectProfile] {
        &self.profiles
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docfuse/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocfuseError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docfuse/docfuse.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocfuseError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocfuseError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocfuseError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocfuseError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocfuseError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
