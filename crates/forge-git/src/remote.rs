//! Remote enumeration and forge inference.

use std::path::Path;

use forge_types::ForgeKind;

use crate::gitdir::{find_git_root, git_config_path};
use crate::{GitError, Result};

/// One `[remote "name"]` entry from the git config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

impl Remote {
    /// The forge this remote points at, if its host is recognized.
    pub fn forge(&self) -> Option<ForgeKind> {
        forge_from_url(&self.url)
    }

    /// The `owner/repo` pair encoded in the remote URL.
    pub fn owner_repo(&self) -> Option<(String, String)> {
        owner_repo_from_url(&self.url)
    }
}

/// Reads the remotes of the repository containing `start`, in the order
/// they appear in the config file.
pub fn read_remotes(start: &Path) -> Result<Vec<Remote>> {
    let root = find_git_root(start).ok_or(GitError::NotARepo)?;
    let config = git_config_path(&root).ok_or(GitError::NotARepo)?;
    let content = std::fs::read_to_string(config)?;
    Ok(parse_remotes(&content))
}

/// Picks a remote by name, falling back to the first one.
pub fn select_remote<'a>(remotes: &'a [Remote], name: Option<&str>) -> Result<&'a Remote> {
    if let Some(name) = name {
        if let Some(remote) = remotes.iter().find(|r| r.name == name) {
            return Ok(remote);
        }
    }
    remotes.first().ok_or(GitError::NoRemotes)
}

/// Extracts `[remote "..."]` url entries from git config text.
fn parse_remotes(config: &str) -> Vec<Remote> {
    let mut remotes = Vec::new();
    let mut current: Option<String> = None;

    for line in config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            current = line
                .strip_prefix("[remote \"")
                .and_then(|rest| rest.strip_suffix("\"]"))
                .map(str::to_string);
            continue;
        }
        if let (Some(name), Some((key, value))) = (&current, line.split_once('=')) {
            if key.trim() == "url" {
                remotes.push(Remote {
                    name: name.clone(),
                    url: value.trim().to_string(),
                });
            }
        }
    }

    remotes
}

// ---------------------------------------------------------------------------
// URL inference
// ---------------------------------------------------------------------------

/// Hosts with a known forge family. Self-hosted instances need an
/// explicit forge override; only these prefixes are auto-detected.
const KNOWN_HOSTS: &[(&str, ForgeKind)] = &[
    ("github.com", ForgeKind::Github),
    ("gitlab.com", ForgeKind::Gitlab),
    ("codeberg.org", ForgeKind::Gitea),
];

/// Infers the forge kind from an HTTPS or SSH remote URL.
pub fn forge_from_url(url: &str) -> Option<ForgeKind> {
    for (host, kind) in KNOWN_HOSTS {
        if url.starts_with(&format!("https://{host}/"))
            || url.starts_with(&format!("git@{host}:"))
            || url.starts_with(&format!("ssh://git@{host}/"))
        {
            return Some(*kind);
        }
    }
    None
}

/// Extracts the `owner/repo` pair from an HTTPS or SSH remote URL,
/// stripping a trailing `.git`.
pub fn owner_repo_from_url(url: &str) -> Option<(String, String)> {
    let path = if let Some(rest) = url.strip_prefix("https://") {
        rest.split_once('/')?.1
    } else if let Some(rest) = url.strip_prefix("ssh://") {
        rest.split_once('/')?.1
    } else if let Some(rest) = url.split_once("git@").map(|(_, r)| r) {
        rest.split_once(':')?.1
    } else {
        return None;
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.rsplit_once('/')?;
    // On deep paths (GitLab subgroups), the owner is everything up to
    // the final component.
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_remotes_from_config() {
        let config = "\
[core]
\trepositoryformatversion = 0
[remote \"origin\"]
\turl = git@github.com:octo/cat.git
\tfetch = +refs/heads/*:refs/remotes/origin/*
[remote \"upstream\"]
\turl = https://gitlab.com/group/project.git
[branch \"trunk\"]
\tremote = origin
";
        let remotes = parse_remotes(config);
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, "git@github.com:octo/cat.git");
        assert_eq!(remotes[1].name, "upstream");
    }

    #[test]
    fn select_prefers_named_remote() {
        let remotes = vec![
            Remote {
                name: "origin".into(),
                url: "a".into(),
            },
            Remote {
                name: "upstream".into(),
                url: "b".into(),
            },
        ];
        assert_eq!(select_remote(&remotes, Some("upstream")).unwrap().url, "b");
        assert_eq!(select_remote(&remotes, Some("missing")).unwrap().url, "a");
        assert_eq!(select_remote(&remotes, None).unwrap().url, "a");
    }

    #[test]
    fn forge_inference_rules() {
        assert_eq!(
            forge_from_url("https://github.com/octo/cat.git"),
            Some(ForgeKind::Github)
        );
        assert_eq!(
            forge_from_url("git@gitlab.com:group/project.git"),
            Some(ForgeKind::Gitlab)
        );
        assert_eq!(
            forge_from_url("ssh://git@codeberg.org/alice/tool.git"),
            Some(ForgeKind::Gitea)
        );
        assert_eq!(forge_from_url("https://example.com/own/repo.git"), None);
    }

    #[test]
    fn owner_repo_extraction() {
        assert_eq!(
            owner_repo_from_url("https://github.com/octo/cat.git"),
            Some(("octo".into(), "cat".into()))
        );
        assert_eq!(
            owner_repo_from_url("git@github.com:octo/cat"),
            Some(("octo".into(), "cat".into()))
        );
        assert_eq!(
            owner_repo_from_url("ssh://git@codeberg.org/alice/tool.git"),
            Some(("alice".into(), "tool".into()))
        );
        // GitLab subgroup: owner keeps the group path.
        assert_eq!(
            owner_repo_from_url("https://gitlab.com/group/sub/project.git"),
            Some(("group/sub".into(), "project".into()))
        );
        assert_eq!(owner_repo_from_url("not a url"), None);
    }
}
