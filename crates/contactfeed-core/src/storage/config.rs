//! TOML-based application configuration.
//!
//! Stores the account used to authenticate and the feed to talk to:
//! - `[account]`: application name, service account, impersonated user,
//!   key file, scope, token endpoint
//! - `[feed]`: base URL, projection, attachment directory
//!
//! Configuration is stored at `~/.config/contactfeed/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::attachment::AttachmentFetcher;
use crate::auth::{AuthConfig, DEFAULT_SCOPE};
use crate::entry::FeedKind;
use crate::error::ConfigError;
use crate::query::{FeedTarget, DEFAULT_BASE_URL, DEFAULT_PROJECTION};

/// Credentials for the service account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Overrides `client_email` from the key file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonated_user: Option<String>,
    /// JSON service-account key or PEM private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
}

/// Feed location and attachment output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_projection")]
    pub projection: String,
    /// Where downloaded photos go; the system temp directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_dir: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/contactfeed/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

fn default_application_name() -> String {
    "contactfeed".into()
}
fn default_scope() -> String {
    DEFAULT_SCOPE.into()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_projection() -> String {
    DEFAULT_PROJECTION.into()
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            application_name: default_application_name(),
            service_account: None,
            impersonated_user: None,
            key_file: None,
            scope: default_scope(),
            token_uri: None,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            projection: default_projection(),
            attachment_dir: None,
        }
    }
}

impl Config {
    /// Default location, `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(format!("{}: {e}", path.display())))
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            application_name: self.account.application_name.clone(),
            service_account_id: self.account.service_account.clone(),
            impersonated_user: self.account.impersonated_user.clone(),
            scope: self.account.scope.clone(),
            token_uri: self.account.token_uri.clone(),
        }
    }

    pub fn feed_target(&self, kind: FeedKind) -> FeedTarget {
        FeedTarget::new(kind, &self.feed.base_url, &self.feed.projection)
    }

    pub fn attachment_fetcher(&self) -> AttachmentFetcher {
        match &self.feed.attachment_dir {
            Some(dir) => AttachmentFetcher::new(dir),
            None => AttachmentFetcher::default(),
        }
    }

    /// Key file path, required before authenticating.
    pub fn key_file(&self) -> Result<&Path, ConfigError> {
        self.account
            .key_file
            .as_deref()
            .ok_or_else(|| ConfigError::MissingKey("account.key_file".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.feed.projection, "thin");
        assert_eq!(parsed.account.scope, DEFAULT_SCOPE);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(indoc! {r#"
            [account]
            key_file = "/etc/contactfeed/key.json"
            impersonated_user = "ada@example.test"

            [feed]
            projection = "full"
        "#})
        .unwrap();

        assert_eq!(cfg.account.application_name, "contactfeed");
        assert_eq!(cfg.account.impersonated_user.as_deref(), Some("ada@example.test"));
        assert_eq!(cfg.feed.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.feed.projection, "full");
        assert_eq!(cfg.key_file().unwrap(), Path::new("/etc/contactfeed/key.json"));
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.account.service_account = Some("sync@example.iam.test".into());
        cfg.feed.attachment_dir = Some(dir.path().to_path_buf());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.attachment_fetcher().dir(), dir.path());
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[feed\nprojection = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load_from(&missing), Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn missing_key_file_is_reported() {
        assert_eq!(
            Config::default().key_file().unwrap_err().to_string(),
            "Missing required configuration key: account.key_file"
        );
    }

    #[test]
    fn derived_settings() {
        let cfg = Config::default();
        let target = cfg.feed_target(FeedKind::Group);
        assert_eq!(target.feed_url(), "https://www.google.com/m8/feeds/groups/default/thin");

        let auth = cfg.auth_config();
        assert_eq!(auth.application_name, "contactfeed");
        assert!(auth.token_uri.is_none());
    }
}
