//! Bridge configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Data directory (holds bindings.db)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Allow admins to send raw console commands
    #[serde(default)]
    pub sudo_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Pause before each bulk command, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Reply fragments that mark a command as rejected by the server
    #[serde(default = "default_error_markers")]
    pub error_markers: Vec<String>,
}

impl RemoteConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

// Defaults
fn default_data_dir() -> PathBuf { PathBuf::from("/var/lib/whitelist-bridge") }
fn default_pacing_ms() -> u64 { 500 }
fn default_error_markers() -> Vec<String> {
    vec![
        "Unknown or incomplete command".to_string(),
        "That player does not exist".to_string(),
        "Incorrect argument".to_string(),
    ]
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sudo_enabled: false,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            error_markers: default_error_markers(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Path of the SQLite mapping database.
    pub fn database_path(&self) -> PathBuf {
        self.bridge.data_dir.join("bindings.db")
    }
}
