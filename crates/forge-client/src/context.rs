//! Per-operation context: configuration, forge resolution, HTTP state.

use std::path::PathBuf;

use forge_config::{config_path, load_config, Account, Config, RepoFile, ACCOUNT_ENV};
use forge_git::{read_remotes, select_remote};
use forge_http::Client;
use forge_types::ForgeKind;
use tracing::debug;

use crate::error::{Error, Result};
use crate::forge::{forge, Forge};

/// The handle threaded through every operation.
///
/// Holds the resolved configuration, the overrides that steer forge and
/// account selection, and the persistent HTTP client. A context is
/// single-threaded; independent contexts may run concurrently.
pub struct Context {
    config: Config,
    repo_file: RepoFile,
    cwd: PathBuf,
    forge_override: Option<ForgeKind>,
    account_override: Option<String>,
    remote_override: Option<String>,
    http: Client,
}

/// Builder for [`Context`].
///
/// Overrides not set here are picked up from the environment
/// (`FCLI_ACCOUNT`), the per-repo `.fcli` file and the user config.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    config: Option<Config>,
    cwd: Option<PathBuf>,
    forge: Option<ForgeKind>,
    account: Option<String>,
    remote: Option<String>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects a configuration instead of loading the user config file.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Working directory used for `.fcli` and git discovery.
    pub fn cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    /// Explicit forge override (`--forge`).
    pub fn forge(mut self, kind: Option<ForgeKind>) -> Self {
        self.forge = kind;
        self
    }

    /// Explicit account override (`--account`).
    pub fn account(mut self, account: Option<String>) -> Self {
        self.account = account;
        self
    }

    /// Remote to base inference on (`--remote`).
    pub fn remote(mut self, remote: Option<String>) -> Self {
        self.remote = remote;
        self
    }

    pub fn build(self) -> Result<Context> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir().map_err(|e| Error::io(".", e))?,
        };
        let config = match self.config {
            Some(config) => config,
            None => load_config(&config_path()?)?,
        };
        let account = self
            .account
            .or_else(|| std::env::var(ACCOUNT_ENV).ok().filter(|s| !s.is_empty()));

        Ok(Context {
            config,
            repo_file: RepoFile::discover(&cwd),
            cwd,
            forge_override: self.forge,
            account_override: account,
            remote_override: self.remote,
            http: Client::new(),
        })
    }
}

impl Context {
    /// The persistent HTTP client.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// The per-repo `.fcli` association file (empty if none was found).
    pub fn repo_file(&self) -> &RepoFile {
        &self.repo_file
    }

    /// Resolves the forge kind for this operation.
    ///
    /// Chain: explicit override, repo file `forge` key, explicitly
    /// selected account, git remote inference, default account.
    pub fn forge_kind(&self) -> Result<ForgeKind> {
        if let Some(kind) = self.forge_override {
            return Ok(kind);
        }
        if let Some(kind) = self.repo_file.forge() {
            return Ok(kind);
        }
        if let Some(name) = self.selected_account_name() {
            return Ok(self.config.account(name)?.forge);
        }
        if let Ok(remotes) = read_remotes(&self.cwd) {
            if let Ok(remote) = select_remote(&remotes, self.remote_override.as_deref()) {
                if let Some(kind) = remote.forge() {
                    debug!(remote = %remote.name, forge = %kind, "forge inferred from git remote");
                    return Ok(kind);
                }
            }
        }
        if let Some(name) = self.config.defaults.account.as_deref() {
            return Ok(self.config.account(name)?.forge);
        }
        Err(Error::UnknownForge)
    }

    /// The backend for the resolved forge kind.
    pub fn forge(&self) -> Result<&'static dyn Forge> {
        Ok(forge(self.forge_kind()?))
    }

    /// Resolves the account: explicit selection first, then the default
    /// account if it matches the forge, then any account on that forge.
    pub fn account(&self) -> Result<(&str, &Account)> {
        if let Some(name) = self.selected_account_name() {
            return Ok((name, self.config.account(name)?));
        }
        let kind = self.forge_kind()?;
        if let Some(name) = self.config.defaults.account.as_deref() {
            if let Ok(account) = self.config.account(name) {
                if account.forge == kind {
                    return Ok((name, account));
                }
            }
        }
        self.config.account_for_forge(kind).map_err(Into::into)
    }

    /// API root for the current operation. Falls back to the forge's
    /// hosted instance when no account is configured (public reads).
    pub fn api_base(&self) -> Result<String> {
        if let Ok((_, account)) = self.account() {
            return Ok(account.api_base().to_string());
        }
        Ok(self.forge_kind()?.default_api_base().to_string())
    }

    /// The account token, if one is configured.
    pub fn token(&self) -> Option<String> {
        self.account().ok().and_then(|(_, a)| a.token.clone())
    }

    /// Login name of the configured account owner.
    pub fn account_user(&self) -> Option<String> {
        self.account().ok().and_then(|(_, a)| a.user.clone())
    }

    /// Resolves the upstream `owner/repo`: the repo file wins, then the
    /// selected git remote.
    pub fn owner_repo(&self) -> Result<(String, String)> {
        if let Some(pair) = self.repo_file.upstream() {
            return Ok(pair);
        }
        let remotes = read_remotes(&self.cwd)?;
        let remote = select_remote(&remotes, self.remote_override.as_deref())?;
        remote.owner_repo().ok_or_else(|| {
            Error::input(format!(
                "cannot derive owner/repo from remote url {}",
                remote.url
            ))
        })
    }

    fn selected_account_name(&self) -> Option<&str> {
        self.account_override
            .as_deref()
            .or_else(|| self.repo_file.account())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_config::Defaults;
    use std::collections::BTreeMap;

    fn config_with(accounts: &[(&str, ForgeKind)], default: Option<&str>) -> Config {
        let mut map = BTreeMap::new();
        for (name, kind) in accounts {
            map.insert(
                (*name).to_string(),
                Account {
                    forge: *kind,
                    token: Some(format!("token-{name}")),
                    api_base: None,
                    user: None,
                },
            );
        }
        Config {
            defaults: Defaults {
                account: default.map(String::from),
                editor: None,
            },
            accounts: map,
        }
    }

    fn context(config: Config, forge: Option<ForgeKind>, account: Option<&str>) -> Context {
        let dir = std::env::temp_dir();
        ContextBuilder::new()
            .config(config)
            .cwd(dir)
            .forge(forge)
            .account(account.map(String::from))
            .build()
            .unwrap()
    }

    #[test]
    fn forge_override_wins() {
        let ctx = context(
            config_with(&[("gh", ForgeKind::Github)], Some("gh")),
            Some(ForgeKind::Bugzilla),
            None,
        );
        assert_eq!(ctx.forge_kind().unwrap(), ForgeKind::Bugzilla);
    }

    #[test]
    fn explicit_account_sets_forge() {
        let ctx = context(
            config_with(
                &[("gh", ForgeKind::Github), ("gl", ForgeKind::Gitlab)],
                Some("gh"),
            ),
            None,
            Some("gl"),
        );
        assert_eq!(ctx.forge_kind().unwrap(), ForgeKind::Gitlab);
        let (name, account) = ctx.account().unwrap();
        assert_eq!(name, "gl");
        assert_eq!(account.token.as_deref(), Some("token-gl"));
    }

    #[test]
    fn default_account_is_fallback() {
        let ctx = context(config_with(&[("gh", ForgeKind::Github)], Some("gh")), None, None);
        assert_eq!(ctx.forge_kind().unwrap(), ForgeKind::Github);
    }

    #[test]
    fn account_matching_forge_is_found() {
        let ctx = context(
            config_with(
                &[("gh", ForgeKind::Github), ("gt", ForgeKind::Gitea)],
                None,
            ),
            Some(ForgeKind::Gitea),
            None,
        );
        let (name, _) = ctx.account().unwrap();
        assert_eq!(name, "gt");
        assert_eq!(ctx.token().as_deref(), Some("token-gt"));
    }

    #[test]
    fn no_resolution_is_an_error() {
        let ctx = context(Config::default(), None, None);
        assert!(matches!(ctx.forge_kind(), Err(Error::UnknownForge)));
    }
}
