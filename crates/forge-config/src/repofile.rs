//! Per-repo `.fcli` association file.
//!
//! A flat `key = value` file at the repository root that ties a working
//! copy to an account and an upstream. Recognized keys:
//!
//! ```text
//! account = work
//! upstream = herrhotzenplotz/gearbox
//! forge = gitlab
//! pr.base = trunk
//! pr.inhibit-delete-source-branch = yes
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use forge_types::ForgeKind;

/// Parsed contents of a `.fcli` file.
#[derive(Debug, Clone, Default)]
pub struct RepoFile {
    values: HashMap<String, String>,
}

impl RepoFile {
    /// Parses the flat `key = value` format. Blank lines and `#`
    /// comments are ignored; later duplicates win.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { values }
    }

    /// Finds and parses a `.fcli` file by walking up from `start`.
    /// Returns an empty `RepoFile` when none exists.
    pub fn discover(start: &Path) -> Self {
        match find_repo_file(start) {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(content) => Self::parse(&content),
                Err(_) => Self::default(),
            },
            None => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The account this working copy is tied to.
    pub fn account(&self) -> Option<&str> {
        self.get("account")
    }

    /// Explicit forge override for this working copy.
    pub fn forge(&self) -> Option<ForgeKind> {
        self.get("forge").and_then(|s| s.parse().ok())
    }

    /// The upstream `owner/repo` pair.
    pub fn upstream(&self) -> Option<(String, String)> {
        let (owner, repo) = self.get("upstream")?.split_once('/')?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some((owner.to_string(), repo.to_string()))
    }

    /// Base branch for new pull requests.
    pub fn pr_base(&self) -> Option<&str> {
        self.get("pr.base")
    }

    /// Whether merges should keep the source branch.
    pub fn inhibit_delete_source_branch(&self) -> bool {
        matches!(
            self.get("pr.inhibit-delete-source-branch"),
            Some("yes" | "true" | "1")
        )
    }
}

/// Walks up the directory tree looking for a `.fcli` file.
fn find_repo_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(".fcli");
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_basic_file() {
        let file = RepoFile::parse(
            "# repo association\n\
             account = work\n\
             upstream = octo/cat\n\
             pr.base = trunk\n\
             pr.inhibit-delete-source-branch = yes\n",
        );
        assert_eq!(file.account(), Some("work"));
        assert_eq!(
            file.upstream(),
            Some(("octo".to_string(), "cat".to_string()))
        );
        assert_eq!(file.pr_base(), Some("trunk"));
        assert!(file.inhibit_delete_source_branch());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let file = RepoFile::parse("not a pair\nupstream = broken\n");
        assert_eq!(file.upstream(), None);
        assert_eq!(file.get("not a pair"), None);
    }

    #[test]
    fn forge_override() {
        let file = RepoFile::parse("forge = bugzilla\n");
        assert_eq!(file.forge(), Some(ForgeKind::Bugzilla));
    }

    #[test]
    fn discover_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".fcli"), "account = here\n").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let file = RepoFile::discover(&nested);
        assert_eq!(file.account(), Some("here"));
    }
}
