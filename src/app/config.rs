use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::types::{
    normalize_region, AudioFormat, SpeechRate, Volume, DEFAULT_AUDIO_FORMAT,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default = "default_rate")]
    pub rate: i32,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default = "default_local_command")]
    pub local_command: String,
    #[serde(default)]
    pub azure_region: Option<String>,
    #[serde(default)]
    pub azure_key: Option<String>,
    #[serde(default = "default_azure_voice")]
    pub azure_voice: String,
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    #[serde(default = "default_azure_timeout_secs")]
    pub azure_timeout_secs: u64,
}

fn default_rate() -> i32 {
    0
}

fn default_volume() -> u8 {
    100
}

fn default_local_command() -> String {
    "espeak-ng".to_string()
}

fn default_azure_voice() -> String {
    "en-US-JennyNeural".to_string()
}

fn default_audio_format() -> String {
    DEFAULT_AUDIO_FORMAT.to_string()
}

fn default_azure_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            voice: None,
            rate: default_rate(),
            volume: default_volume(),
            local_command: default_local_command(),
            azure_region: None,
            azure_key: None,
            azure_voice: default_azure_voice(),
            audio_format: default_audio_format(),
            azure_timeout_secs: default_azure_timeout_secs(),
        }
    }
}

impl Config {
    /// Validates config values after loading. Clamps out-of-range values
    /// and rejects clearly invalid inputs.
    pub fn validate(&mut self) -> Result<()> {
        if self.local_command.trim().is_empty() {
            bail!("local_command must not be empty");
        }

        // Hostnames are case-insensitive; the region is checked when Azure is used.
        self.azure_region = self.azure_region.as_deref().and_then(normalize_region);

        self.rate = SpeechRate::clamped(self.rate).value();
        self.volume = Volume::clamped(self.volume).value();
        self.azure_timeout_secs = self.azure_timeout_secs.clamp(1, 600);

        if AudioFormat::parse(&self.audio_format).is_err() {
            tracing::warn!(
                format = %self.audio_format,
                "invalid audio_format in config, using default"
            );
            self.audio_format = default_audio_format();
        }

        // Empty strings from hand-edited files mean "unset".
        if self.voice.as_deref().is_some_and(|v| v.trim().is_empty()) {
            self.voice = None;
        }
        if self.azure_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.azure_key = None;
        }
        if self.azure_voice.trim().is_empty() {
            self.azure_voice = default_azure_voice();
        }

        Ok(())
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("readout")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load the config at the default location, or defaults if it does not exist.
pub fn load_config() -> Result<Config> {
    let path = config_path();

    if !path.exists() {
        return Ok(Config::default());
    }

    load_config_from(&path)
}

/// Load and validate a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Set restrictive file permissions (owner-only read/write) on Unix systems.
#[cfg(unix)]
pub fn set_owner_only_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to set permissions: {}", path.display()))
}

#[cfg(not(unix))]
pub fn set_owner_only_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Write the config to `path`. The file may hold the Azure key, so it is
/// readable by the owner only.
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, &content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;

    set_owner_only_permissions(path)?;

    Ok(())
}
