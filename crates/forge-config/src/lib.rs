//! Configuration for the forgecli system.
//!
//! Two sources feed a context: the user-level config file
//! (`$XDG_CONFIG_HOME/fcli/config.yaml`) holding named accounts with
//! their forge kind, token and API base, and an optional per-repo
//! `.fcli` file associating a working copy with an account and an
//! upstream `owner/repo`.

pub mod config;
pub mod repofile;

pub use config::{config_path, load_config, save_config, Account, Config, ConfigError, Defaults,
    Result};
pub use repofile::RepoFile;

/// Environment variable overriding the account selection.
pub const ACCOUNT_ENV: &str = "FCLI_ACCOUNT";
