//! Configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::keys::layout::KeyLayout;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "SONOS_DECK_CONFIG";

/// Stream Deck configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Initial screen brightness in percent
    #[serde(default = "default_brightness")]
    pub brightness: u8,
    /// Serial number of the deck to open (first visual deck when unset)
    #[serde(default)]
    pub serial: Option<String>,
    /// Wait between input polls that found nothing, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_brightness() -> u8 {
    30
}
fn default_poll_interval() -> u64 {
    10
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            brightness: default_brightness(),
            serial: None,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Sonos zone configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Whether to talk to the zone at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Zone player address
    #[serde(default = "default_host")]
    pub host: String,
    /// UPnP control port
    #[serde(default = "default_port")]
    pub port: u16,
    /// HTTP timeout for each request in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Volume change per key press
    #[serde(default = "default_volume_step")]
    pub volume_step: i16,
    /// Interval between transport polls after Play
    #[serde(default = "default_play_poll_interval")]
    pub play_poll_interval_ms: u64,
    /// Give up waiting for PLAYING after this long
    #[serde(default = "default_play_poll_timeout")]
    pub play_poll_timeout_ms: u64,
}

fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "192.168.68.129".to_string()
}
fn default_port() -> u16 {
    1400
}
fn default_timeout() -> u64 {
    2000
}
fn default_volume_step() -> i16 {
    2
}
fn default_play_poll_interval() -> u64 {
    100
}
fn default_play_poll_timeout() -> u64 {
    10_000
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            port: default_port(),
            timeout_ms: default_timeout(),
            volume_step: default_volume_step(),
            play_poll_interval_ms: default_play_poll_interval(),
            play_poll_timeout_ms: default_play_poll_timeout(),
        }
    }
}

impl ZoneConfig {
    /// Base URL of the zone player's UPnP endpoints
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Icon and font assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Asset directory; relative paths resolve against the executable first
    #[serde(default = "default_assets_root")]
    pub root: PathBuf,
    /// Font file name under the asset root
    #[serde(default = "default_font")]
    pub font: String,
    /// Font size in points on a 64px reference tile
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("Assets")
}
fn default_font() -> String {
    "Arial.ttf".to_string()
}
fn default_font_size() -> f32 {
    18.0
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
            font: default_font(),
            font_size: default_font_size(),
        }
    }
}

impl AssetsConfig {
    /// Resolve the asset root to an existing directory where possible.
    ///
    /// Absolute roots are used as-is. Relative roots are tried next to the
    /// executable, then against the working directory.
    pub fn resolve_root(&self) -> PathBuf {
        if self.root.is_absolute() {
            return self.root.clone();
        }
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        if let Some(dir) = exe_dir {
            let candidate = dir.join(&self.root);
            if candidate.is_dir() {
                return candidate;
            }
        }
        self.root.clone()
    }
}

/// What to do after the restart key is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RestartStrategy {
    /// Exit with `restart_exit_code` and let the supervisor relaunch
    #[default]
    ExitCode,
    /// Spawn a fresh copy of the current executable, then exit
    Reexec,
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub on_restart: RestartStrategy,
    #[serde(default = "default_restart_exit_code")]
    pub restart_exit_code: i32,
}

fn default_restart_exit_code() -> i32 {
    75
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            on_restart: RestartStrategy::default(),
            restart_exit_code: default_restart_exit_code(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Stream Deck configuration
    #[serde(default)]
    pub deck: DeckConfig,
    /// Sonos zone configuration
    #[serde(default)]
    pub zone: ZoneConfig,
    /// Asset configuration
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Key layout and item list
    #[serde(default)]
    pub layout: KeyLayout,
    /// Session lifecycle
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            // Return default config if file doesn't exist
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Create parent directories if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let proj_dirs = ProjectDirs::from("com", "sonosdeck", "SonosDeck")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Get the default configuration embedded in the binary
    pub fn default_config_str() -> &'static str {
        include_str!("../../config/default.toml")
    }
}
