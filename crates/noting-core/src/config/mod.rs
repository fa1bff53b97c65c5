//! Client configuration: remote endpoint, identity and local database path.
//!
//! Loaded from a JSON file, then overridden by `NOTING_*` environment
//! variables. Missing files yield the default (local-only) configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const ENV_SUPABASE_URL: &str = "NOTING_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "NOTING_SUPABASE_ANON_KEY";
pub const ENV_USER_ID: &str = "NOTING_USER_ID";
pub const ENV_ACCESS_TOKEN: &str = "NOTING_ACCESS_TOKEN";
pub const ENV_DB_PATH: &str = "NOTING_DB_PATH";
pub const ENV_OFFLINE: &str = "NOTING_OFFLINE";

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotingConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    /// External id of the signed-in user
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// Never contact the remote store
    #[serde(default)]
    pub offline: bool,
}

impl fmt::Debug for NotingConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NotingConfig")
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_anon_key",
                &self.supabase_anon_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("user_id", &self.user_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("db_path", &self.db_path)
            .field("offline", &self.offline)
            .finish()
    }
}

/// Remote endpoint settings, present only when both values are configured
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub url: String,
    pub anon_key: String,
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RemoteSettings")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl NotingConfig {
    /// File configuration with environment overrides applied, validated
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_path(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!(
                "Failed to read config at {}: {error}",
                path.display()
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        std::fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(())
    }

    /// Override fields with the `NOTING_*` values returned by `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = normalize_text_option(lookup(ENV_SUPABASE_URL)) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = normalize_text_option(lookup(ENV_SUPABASE_ANON_KEY)) {
            self.supabase_anon_key = Some(key);
        }
        if let Some(user_id) = normalize_text_option(lookup(ENV_USER_ID)) {
            self.user_id = Some(user_id);
        }
        if let Some(token) = normalize_text_option(lookup(ENV_ACCESS_TOKEN)) {
            self.access_token = Some(token);
        }
        if let Some(path) = normalize_text_option(lookup(ENV_DB_PATH)) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = normalize_text_option(lookup(ENV_OFFLINE)) {
            self.offline = parse_flag(&flag);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.supabase_url {
            if !is_http_url(url) {
                return Err(Error::Config(
                    "supabase_url must include http:// or https://".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn remote_settings(&self) -> Option<RemoteSettings> {
        Some(RemoteSettings {
            url: normalize_text_option(self.supabase_url.clone())?,
            anon_key: normalize_text_option(self.supabase_anon_key.clone())?,
        })
    }

    /// Whether reconciliation can ever run with this configuration
    pub fn sync_enabled(&self) -> bool {
        !self.offline && self.remote_settings().is_some()
    }

    fn normalize(&mut self) {
        self.supabase_url = normalize_text_option(self.supabase_url.take())
            .map(|url| url.trim_end_matches('/').to_string());
        self.supabase_anon_key = normalize_text_option(self.supabase_anon_key.take());
        self.user_id = normalize_text_option(self.user_id.take());
        self.access_token = normalize_text_option(self.access_token.take());
        self.db_path = self
            .db_path
            .take()
            .filter(|path| !path.as_os_str().is_empty());
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
