//! Git directory detection.

use std::path::{Path, PathBuf};

/// Walks up the directory tree from `start` looking for a `.git` entry.
///
/// Returns the repository root (the parent of `.git`), or `None` if the
/// filesystem root is reached without finding one. `.git` may be a
/// directory (regular repo) or a file (worktrees, submodules).
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;

    let mut current = start.as_path();
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    None
}

/// Returns the path of the repository's `config` file, resolving the
/// worktree indirection (`.git` file containing `gitdir: <path>`).
pub fn git_config_path(root: &Path) -> Option<PathBuf> {
    let dot_git = root.join(".git");
    if dot_git.is_dir() {
        return Some(dot_git.join("config"));
    }

    // Worktree: `.git` is a file pointing at the real git dir, whose
    // `commondir` file in turn points at the shared one.
    let content = std::fs::read_to_string(&dot_git).ok()?;
    let gitdir = content.trim().strip_prefix("gitdir:")?.trim();
    let gitdir = if Path::new(gitdir).is_absolute() {
        PathBuf::from(gitdir)
    } else {
        root.join(gitdir)
    };
    if let Ok(common) = std::fs::read_to_string(gitdir.join("commondir")) {
        let common = common.trim();
        let common_dir = if Path::new(common).is_absolute() {
            PathBuf::from(common)
        } else {
            gitdir.join(common)
        };
        return Some(common_dir.join("config"));
    }
    Some(gitdir.join("config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_git_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_git_root(&nested).unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn find_git_root_none_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        // The tempdir itself has no .git anywhere up to /tmp; that may
        // not hold on exotic setups, so only assert when it is clean.
        if find_git_root(dir.path()).is_none() {
            assert!(find_git_root(&dir.path().join("missing")).is_none());
        }
    }

    #[test]
    fn config_path_for_regular_repo() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let config = git_config_path(dir.path()).unwrap();
        assert!(config.ends_with(".git/config"));
    }
}
