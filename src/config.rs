//! Shell configuration and data-directory scaffolding.
//!
//! Settings live in `data/config/shell.toml` under the directory the shell
//! was started from. The file is optional and every field has a default, so
//! a partial file only overrides what it names. Free-form `[plugins.<name>]`
//! tables are carried verbatim and handed to the matching plugin through its
//! context.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Directories scaffolded under the start directory.
pub const DATA_DIR: &str = "data";
pub const CACHE_DIR: &str = "data/cache";
pub const CONFIG_DIR: &str = "data/config";

const CONFIG_FILE: &str = "data/config/shell.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Name shown at the front of the prompt and in the banner.
    pub environment: String,
    /// Plugins loaded but not enabled at startup.
    pub disabled_plugins: Vec<String>,
    /// Per-plugin settings, keyed by plugin name.
    pub plugins: HashMap<String, toml::Table>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            environment: "FerroShell".to_string(),
            disabled_plugins: Vec::new(),
            plugins: HashMap::new(),
        }
    }
}

/// Create the data directories if they are missing. Safe to call on every
/// start.
pub fn scaffold(root: &Path) -> std::io::Result<()> {
    for dir in [DATA_DIR, CACHE_DIR, CONFIG_DIR] {
        fs::create_dir_all(root.join(dir))?;
    }
    Ok(())
}

/// Load `data/config/shell.toml` under `root`; absent file means defaults.
pub fn load_config(root: &Path) -> Result<ShellConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(ShellConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config: ShellConfig = toml::from_str(&content)?;
    Ok(config)
}
