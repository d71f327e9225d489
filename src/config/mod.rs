//! Configuration management

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::remote::Phase;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port for the control API
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub vlc: VlcConfig,

    #[serde(default)]
    pub polling: PollingConfig,
}

fn default_port() -> u16 {
    8089
}

/// Where the VLC HTTP interface lives and how to authenticate against it.
#[derive(Debug, Clone, Deserialize)]
pub struct VlcConfig {
    #[serde(default = "default_vlc_host")]
    pub host: String,
    #[serde(default = "default_vlc_port")]
    pub port: u16,
    /// VLC ignores the user name; it is sent empty unless overridden.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Per-request timeout. Unset means the transport default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for VlcConfig {
    fn default() -> Self {
        Self {
            host: default_vlc_host(),
            port: default_vlc_port(),
            username: String::new(),
            password: String::new(),
            request_timeout_secs: None,
        }
    }
}

impl VlcConfig {
    /// Base URL of the VLC HTTP interface, e.g. `http://127.0.0.1:8080`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn default_vlc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_vlc_port() -> u16 {
    8080
}

/// Poll cadence in milliseconds. The status interval depends on the player phase.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_playing_ms")]
    pub playing_ms: u64,
    #[serde(default = "default_paused_ms")]
    pub paused_ms: u64,
    #[serde(default = "default_stopped_ms")]
    pub stopped_ms: u64,
    #[serde(default = "default_playlist_ms")]
    pub playlist_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            playing_ms: default_playing_ms(),
            paused_ms: default_paused_ms(),
            stopped_ms: default_stopped_ms(),
            playlist_ms: default_playlist_ms(),
        }
    }
}

impl PollingConfig {
    /// Status poll interval for a phase
    pub fn status_interval(&self, phase: Phase) -> Duration {
        let ms = match phase {
            Phase::Playing => self.playing_ms,
            Phase::Paused => self.paused_ms,
            Phase::Stopped => self.stopped_ms,
        };
        // A zero period would make tokio::time::interval panic
        Duration::from_millis(ms.max(1))
    }

    pub fn playlist_interval(&self) -> Duration {
        Duration::from_millis(self.playlist_ms.max(1))
    }
}

fn default_playing_ms() -> u64 {
    200
}

fn default_paused_ms() -> u64 {
    500
}

fn default_stopped_ms() -> u64 {
    2000
}

fn default_playlist_ms() -> u64 {
    3000
}

/// Get config directory (VLCR_CONFIG_DIR or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VLCR_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/vlc-remote");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("vlc-remote");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/vlc-remote");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("vlc-remote");
        }
    }

    PathBuf::from(".")
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_dir())
}

/// Layered load: defaults, then `<dir>/config.*`, then `VLCR_*` env, then legacy `VLC_*` env.
pub fn load_config_from(config_dir: &Path) -> Result<Config> {
    let mut builder = ::config::Config::builder()
        .set_default("port", default_port() as i64)?
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // VLCR_PORT, VLCR_VLC__HOST, VLCR_POLLING__PLAYING_MS, ...
        .add_source(
            ::config::Environment::with_prefix("VLCR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // Short overrides: VLC_HOST / VLC_PORT / VLC_PASSWORD beat everything else
    if let Ok(host) = std::env::var("VLC_HOST") {
        builder = builder.set_override("vlc.host", host)?;
    }
    if let Ok(port) = std::env::var("VLC_PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("vlc.port", port_num as i64)?;
        }
    }
    if let Ok(password) = std::env::var("VLC_PASSWORD") {
        builder = builder.set_override("vlc.password", password)?;
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}
