//! Forge kind -- which hosting service a context is talking to.

use serde::{Deserialize, Serialize};

/// The supported forge families.
///
/// Gitea intentionally sorts close to GitHub: its REST surface is a clone
/// of the GitHub v3 API and the Gitea backend reuses most of the GitHub
/// request/parse code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForgeKind {
    Github,
    Gitlab,
    Gitea,
    Bugzilla,
}

/// Error returned when parsing a forge kind from user input.
#[derive(Debug, thiserror::Error)]
#[error("unknown forge type: {0} (expected github, gitlab, gitea or bugzilla)")]
pub struct ParseForgeKindError(pub String);

impl ForgeKind {
    /// Canonical lowercase name, as used in config files and `--forge`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Gitea => "gitea",
            Self::Bugzilla => "bugzilla",
        }
    }

    /// Default API root for the hosted instance of this forge.
    ///
    /// Accounts may override this with a per-account api-base (self-hosted
    /// GitLab, Gitea or Bugzilla instances).
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Self::Github => "https://api.github.com",
            Self::Gitlab => "https://gitlab.com/api/v4",
            Self::Gitea => "https://codeberg.org/api/v1",
            Self::Bugzilla => "https://bugs.freebsd.org",
        }
    }
}

impl std::fmt::Display for ForgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ForgeKind {
    type Err = ParseForgeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "gitlab" => Ok(Self::Gitlab),
            "gitea" => Ok(Self::Gitea),
            "bugzilla" => Ok(Self::Bugzilla),
            _ => Err(ParseForgeKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for kind in [
            ForgeKind::Github,
            ForgeKind::Gitlab,
            ForgeKind::Gitea,
            ForgeKind::Bugzilla,
        ] {
            assert_eq!(kind.as_str().parse::<ForgeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("GitHub".parse::<ForgeKind>().unwrap(), ForgeKind::Github);
        assert!("sourcehut".parse::<ForgeKind>().is_err());
    }
}
