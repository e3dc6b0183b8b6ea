//! User-level configuration: defaults plus named accounts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use forge_types::ForgeKind;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The requested account is not defined.
    #[error("account {0:?} not found in config")]
    NoSuchAccount(String),

    /// No account is configured for the selected forge.
    #[error("no account configured for forge {0}")]
    NoAccountForForge(ForgeKind),

    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("cannot locate config directory: neither XDG_CONFIG_HOME nor HOME is set")]
    NoConfigDir,
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Global defaults section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    /// Account used when neither the env override nor `--account` is
    /// given and the repo file does not name one.
    #[serde(default)]
    pub account: Option<String>,

    /// Editor command for composing messages.
    #[serde(default)]
    pub editor: Option<String>,
}

/// A named account on one forge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub forge: ForgeKind,

    /// OAuth/API token. Bugzilla accounts put an API key here; it is
    /// injected as a URL parameter by that backend.
    #[serde(default)]
    pub token: Option<String>,

    /// API root override for self-hosted instances.
    #[serde(default, rename = "api-base")]
    pub api_base: Option<String>,

    /// Login name of the account owner, used where an owner cannot be
    /// inferred (e.g. listing your own repos).
    #[serde(default)]
    pub user: Option<String>,
}

impl Account {
    /// The API root this account talks to.
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.forge.default_api_base())
    }
}

/// The full configuration file.
///
/// All fields use serde defaults so a partial file deserializes with
/// sensible values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    /// Named accounts. BTreeMap keeps `account_for_forge` deterministic.
    #[serde(default)]
    pub accounts: BTreeMap<String, Account>,
}

impl Config {
    /// Looks up an account by name.
    pub fn account(&self, name: &str) -> Result<&Account> {
        self.accounts
            .get(name)
            .ok_or_else(|| ConfigError::NoSuchAccount(name.to_string()))
    }

    /// Returns the first account configured for the given forge.
    pub fn account_for_forge(&self, kind: ForgeKind) -> Result<(&str, &Account)> {
        self.accounts
            .iter()
            .find(|(_, account)| account.forge == kind)
            .map(|(name, account)| (name.as_str(), account))
            .ok_or(ConfigError::NoAccountForForge(kind))
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Resolves the config file path: `$XDG_CONFIG_HOME/fcli/config.yaml`,
/// falling back to `$HOME/.config/fcli/config.yaml`.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("fcli").join("config.yaml"));
        }
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoConfigDir)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("fcli")
        .join("config.yaml"))
}

/// Loads configuration from the given path.
///
/// A missing or empty file yields the default configuration.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Saves configuration to the given path, creating parent directories.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_missing_config_returns_default() {
        let cfg = load_config(Path::new("/nonexistent/fcli/config.yaml")).unwrap();
        assert!(cfg.accounts.is_empty());
        assert!(cfg.defaults.account.is_none());
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = "\
defaults:
  account: work
accounts:
  work:
    forge: gitlab
    token: glpat-123
    api-base: https://gitlab.example.com/api/v4
  hobby:
    forge: github
";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.defaults.account.as_deref(), Some("work"));

        let work = cfg.account("work").unwrap();
        assert_eq!(work.forge, ForgeKind::Gitlab);
        assert_eq!(work.api_base(), "https://gitlab.example.com/api/v4");

        let hobby = cfg.account("hobby").unwrap();
        assert_eq!(hobby.api_base(), "https://api.github.com");
        assert!(hobby.token.is_none());
    }

    #[test]
    fn account_lookup_failures() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.account("nope"),
            Err(ConfigError::NoSuchAccount(_))
        ));
        assert!(matches!(
            cfg.account_for_forge(ForgeKind::Gitea),
            Err(ConfigError::NoAccountForForge(ForgeKind::Gitea))
        ));
    }

    #[test]
    fn roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcli").join("config.yaml");

        let mut cfg = Config::default();
        cfg.defaults.account = Some("hobby".to_string());
        cfg.accounts.insert(
            "hobby".to_string(),
            Account {
                forge: ForgeKind::Gitea,
                token: Some("t0k3n".to_string()),
                api_base: None,
                user: Some("alice".to_string()),
            },
        );

        save_config(&path, &cfg).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.defaults.account.as_deref(), Some("hobby"));
        let account = loaded.account("hobby").unwrap();
        assert_eq!(account.forge, ForgeKind::Gitea);
        assert_eq!(account.token.as_deref(), Some("t0k3n"));
        assert_eq!(account.user.as_deref(), Some("alice"));
    }
}
