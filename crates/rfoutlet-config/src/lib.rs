//! Shared configuration for rfoutlet clients.
//!
//! TOML profiles naming outlet servers, layered with `RFOUTLET_`
//! environment overrides, and translation to `rfoutlet_core::ClientConfig`.
//! The CLI adds `GlobalOpts`-aware wrappers on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rfoutlet_core::ClientConfig;

/// Server address used when no profile says otherwise.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:3333/ws";

/// Environment variable that points at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "RFOUTLET_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named outlet servers.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Seconds to wait for the server, both for the handshake and for
    /// the snapshot that answers a command.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named outlet server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// WebSocket endpoint (e.g., "ws://raspberrypi.local:3333/ws").
    #[serde(default = "default_url")]
    pub url: String,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Ask for a snapshot whenever the link opens. Defaults to on.
    pub request_status_on_connect: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: None,
            request_status_on_connect: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_URL.into()
}

impl Config {
    /// Name of the profile to use when `requested` is `None`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile by name.
    ///
    /// A missing `default` profile resolves to the built-in local server
    /// so a fresh install works without a config file; any other missing
    /// name is an error.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::ProfileNotFound { name: name.into() }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `RFOUTLET_CONFIG` if set, otherwise
/// XDG / platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("io", "rfoutlet", "rfoutlet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rfoutlet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields defaults.
///
/// Nested keys use a double underscore, e.g.
/// `RFOUTLET_DEFAULTS__TIMEOUT=30` or `RFOUTLET_DEFAULT_PROFILE=pi`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("RFOUTLET_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core ─────────────────────────────────────────────

/// Parse and check a server URL: it must be `ws://` or `wss://`.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected a ws:// or wss:// URL, got scheme '{other}'"),
        }),
    }
}

/// Build a `ClientConfig` from a profile, with no command-line overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let url = parse_server_url(&profile.url)?;
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ClientConfig {
        connect_timeout: timeout,
        request_status_on_connect: profile.request_status_on_connect.unwrap_or(true),
        ..ClientConfig::new(url)
    })
}
