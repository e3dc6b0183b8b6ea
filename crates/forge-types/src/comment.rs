//! Comments on issues and pulls.

use serde::Serialize;

/// A single comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub date: String,
    pub body: String,
}

/// What a submitted comment attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Issue(u64),
    Pull(u64),
}

impl CommentTarget {
    /// The issue or pull number the comment is aimed at.
    pub fn number(&self) -> u64 {
        match *self {
            Self::Issue(n) | Self::Pull(n) => n,
        }
    }
}

/// Options for submitting a comment.
#[derive(Debug, Clone)]
pub struct SubmitCommentOptions {
    pub owner: String,
    pub repo: String,
    pub target: CommentTarget,
    pub message: String,
}
