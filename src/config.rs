//! API key configuration, loaded once at startup from a TOML file.
//!
//! One table per service. A service is configured only when every one of its
//! keys is present and non-empty; partially filled tables are treated as
//! absent. Whitespace-only values count as empty.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_KEYS_FILE: &str = "api_keys.toml";

// ─── Key tables ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub mapbox: MapboxKeys,
    pub foursquare: FourSquareKeys,
    pub flickr: FlickrKeys,
    pub twitter: TwitterKeys,
}

/// Tile styling only — not a photo provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MapboxKeys {
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FourSquareKeys {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlickrKeys {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TwitterKeys {
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
    pub oauth_token: Option<String>,
    pub oauth_token_secret: Option<String>,
}

/// The four OAuth-style tokens Twitter needs, all present and non-empty.
#[derive(Debug, Clone, Copy)]
pub struct TwitterCredentials<'a> {
    pub app_key: &'a str,
    pub app_secret: &'a str,
    pub oauth_token: &'a str,
    pub oauth_token_secret: &'a str,
}

fn present(value: &Option<String>) -> Option<&str> {
    let v = value.as_deref()?.trim();
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

impl MapboxKeys {
    pub fn token(&self) -> Option<&str> {
        present(&self.access_token)
    }
}

impl FourSquareKeys {
    /// Client id and secret, when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((present(&self.client_id)?, present(&self.client_secret)?))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

impl FlickrKeys {
    pub fn credentials(&self) -> Option<&str> {
        present(&self.api_key)
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

impl TwitterKeys {
    pub fn credentials(&self) -> Option<TwitterCredentials<'_>> {
        Some(TwitterCredentials {
            app_key: present(&self.app_key)?,
            app_secret: present(&self.app_secret)?,
            oauth_token: present(&self.oauth_token)?,
            oauth_token_secret: present(&self.oauth_token_secret)?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

// ─── Loading ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ConfigError {
    Unreadable(PathBuf, std::io::Error),
    Malformed(PathBuf, toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(path, err) => {
                write!(f, "cannot read keys file {}: {}", path.display(), err)
            }
            Self::Malformed(path, err) => {
                write!(f, "malformed keys file {}: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ApiKeys {
    /// Load keys from an explicit path, or from the default location.
    ///
    /// An explicit path must exist and parse. The default file may be absent,
    /// in which case nothing is configured.
    pub fn load(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        match path_override {
            Some(path) => {
                let data = fs::read_to_string(path)
                    .map_err(|e| ConfigError::Unreadable(path.to_path_buf(), e))?;
                Self::parse(path, &data)
            }
            None => Self::load_from(&Self::default_path()),
        }
    }

    /// Load keys from `path`; a missing file yields the empty configuration.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Unreadable(path.to_path_buf(), e)),
        };
        Self::parse(path, &data)
    }

    fn parse(path: &Path, data: &str) -> Result<Self, ConfigError> {
        toml::from_str(data).map_err(|e| ConfigError::Malformed(path.to_path_buf(), e))
    }

    /// `./api_keys.toml` when present, else `~/.geopix/api_keys.toml`.
    fn default_path() -> PathBuf {
        let local = PathBuf::from(DEFAULT_KEYS_FILE);
        if local.exists() {
            return local;
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geopix")
            .join(DEFAULT_KEYS_FILE)
    }
}
