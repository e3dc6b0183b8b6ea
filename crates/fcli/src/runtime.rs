//! Runtime state shared by all command handlers.

use anyhow::{Context as _, Result};

use forge_client::{Context, ContextBuilder, Forge};
use forge_types::ForgeKind;

use crate::cli::GlobalArgs;

/// Resolved context plus the output switches from the global flags.
pub struct Runtime {
    ctx: Context,
    owner: Option<String>,
    repo: Option<String>,
    pub json: bool,
}

impl Runtime {
    pub fn new(global: &GlobalArgs) -> Result<Self> {
        let forge = match &global.forge {
            Some(name) => Some(name.parse::<ForgeKind>()?),
            None => None,
        };

        let ctx = ContextBuilder::new()
            .forge(forge)
            .account(global.account.clone())
            .remote(global.remote.clone())
            .build()?;

        if let Ok(kind) = ctx.forge_kind() {
            tracing::debug!(forge = %kind, "resolved forge");
        }

        Ok(Self {
            ctx,
            owner: global.owner.clone(),
            repo: global.repo.clone(),
            json: global.json,
        })
    }

    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    /// The backend selected for this invocation.
    pub fn forge(&self) -> Result<&'static dyn Forge> {
        Ok(self.ctx.forge()?)
    }

    /// Resolves the target repository: explicit flags win, then the
    /// `.fcli` file, then the git remote.
    pub fn owner_repo(&self) -> Result<(String, String)> {
        if let (Some(owner), Some(repo)) = (&self.owner, &self.repo) {
            return Ok((owner.clone(), repo.clone()));
        }
        let inferred = self.ctx.owner_repo();
        match (&self.owner, &self.repo) {
            (Some(owner), None) => {
                let (_, repo) =
                    inferred.context("--owner given but no repo; pass --repo as well")?;
                Ok((owner.clone(), repo))
            }
            (None, Some(repo)) => {
                let (owner, _) =
                    inferred.context("--repo given but no owner; pass --owner as well")?;
                Ok((owner, repo.clone()))
            }
            _ => Ok(inferred.context(
                "cannot determine the target repository; pass --owner and --repo",
            )?),
        }
    }

    /// Resolves just the owner side, for commands that take no repo
    /// (listing someone's repositories).
    pub fn owner(&self) -> Option<String> {
        if let Some(owner) = &self.owner {
            return Some(owner.clone());
        }
        self.ctx.owner_repo().ok().map(|(owner, _)| owner)
    }

    /// Base branch for new pull requests, from the repo `.fcli` file.
    pub fn pr_base(&self) -> Option<String> {
        self.ctx.repo_file().pr_base().map(String::from)
    }

    /// Whether merges should keep the source branch by default.
    pub fn inhibit_delete_source_branch(&self) -> bool {
        self.ctx.repo_file().inhibit_delete_source_branch()
    }
}
