//! `fcli comment` -- submit a comment to an issue or pull request.

use anyhow::Result;

use forge_types::{CommentTarget, SubmitCommentOptions};

use crate::cli::CommentArgs;
use crate::runtime::Runtime;

pub fn run(rt: &Runtime, args: &CommentArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = rt.owner_repo()?;

    let target = match (args.issue, args.pull) {
        (Some(issue), None) => CommentTarget::Issue(issue),
        (None, Some(pull)) => CommentTarget::Pull(pull),
        _ => anyhow::bail!("pass exactly one of --issue or --pull"),
    };

    let opts = SubmitCommentOptions {
        owner,
        repo,
        target,
        message: args.message.clone(),
    };
    forge.submit_comment(ctx, &opts)?;
    Ok(())
}
