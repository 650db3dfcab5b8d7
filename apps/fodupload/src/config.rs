//! Uploader configuration.
//!
//! Configuration is stored as TOML:
//! - Linux/macOS: `~/.config/fodupload/config.toml`
//! - Windows: `%APPDATA%/fodupload/config.toml`
//!
//! A missing file means defaults; nothing is written back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fodupload_protocol::constants::{DEFAULT_MAX_REAUTH_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT};
use fodupload_scan_upload::{SessionExpiryPolicy, UploadSettings};
use fodupload_transfer::{DEFAULT_CHUNK_SIZE, FinalFragmentPolicy};
use serde::{Deserialize, Serialize};

/// Uploader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API base URL; derived from the BSI URL when unset.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Fragment size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default)]
    pub final_fragment_policy: FinalFragmentPolicy,

    #[serde(default)]
    pub session_expiry_policy: SessionExpiryPolicy,

    #[serde(default = "default_max_reauth_attempts")]
    pub max_reauth_attempts: u32,

    /// Timeout for one HTTP round trip, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_max_reauth_attempts() -> u32 {
    DEFAULT_MAX_REAUTH_ATTEMPTS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            chunk_size: default_chunk_size(),
            final_fragment_policy: FinalFragmentPolicy::default(),
            session_expiry_policy: SessionExpiryPolicy::default(),
            max_reauth_attempts: default_max_reauth_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads `explicit` if given, otherwise the per-user file if it exists.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("cannot read configuration {}: {e}", path.display())
        })?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Per-request timeout; `0` falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => DEFAULT_REQUEST_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            session_expiry: self.session_expiry_policy,
            max_reauth_attempts: self.max_reauth_attempts,
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("fodupload").join("config.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("fodupload")
            .join("config.toml")
    }
}
