//! `fcli pulls` -- list, inspect, merge and modify pull requests.

use std::io::Write;

use anyhow::Result;

use forge_types::{MergeFlags, Pull, PullFilter, SubmitPullOptions};

use crate::cli::{PullsAction, PullsArgs, PullsListArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &PullsArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = rt.owner_repo()?;

    match &args.action {
        PullsAction::List(list) => {
            let pulls = forge.search_pulls(ctx, &owner, &repo, &filter(list), list.limit.max())?;
            if rt.json {
                output::json(&pulls);
            } else {
                print_pull_table(&pulls);
            }
        }

        PullsAction::View { id, comments } => {
            let pull = forge.get_pull(ctx, &owner, &repo, *id)?;
            if rt.json {
                output::json(&pull);
            } else {
                print_pull(rt, &pull)?;
            }
            if *comments {
                let thread = forge.get_pull_comments(ctx, &owner, &repo, *id)?;
                if rt.json {
                    output::json(&thread);
                } else {
                    for comment in &thread {
                        println!();
                        println!("AUTHOR : {}", comment.author);
                        println!("DATE   : {}", comment.date);
                        for line in comment.body.lines() {
                            println!("         {line}");
                        }
                    }
                }
            }
        }

        PullsAction::Diff { id } => {
            let mut stdout = std::io::stdout().lock();
            forge.pull_get_diff(ctx, &mut stdout, &owner, &repo, *id)?;
            stdout.flush()?;
        }

        PullsAction::Patch { id } => {
            let mut stdout = std::io::stdout().lock();
            forge.pull_get_patch(ctx, &mut stdout, &owner, &repo, *id)?;
            stdout.flush()?;
        }

        PullsAction::Commits { id } => {
            let commits = forge.get_pull_commits(ctx, &owner, &repo, *id)?;
            if rt.json {
                output::json(&commits);
            } else {
                let mut table = Table::new(&["SHA", "DATE", "AUTHOR", "MESSAGE"]);
                for commit in &commits {
                    let subject = commit.message.lines().next().unwrap_or("").to_string();
                    table.row(vec![
                        commit.sha.clone(),
                        commit.date.clone(),
                        commit.author.clone(),
                        subject,
                    ]);
                }
                table.print();
            }
        }

        PullsAction::Create {
            title,
            from,
            to,
            message,
            draft,
            reviewers,
        } => {
            let to = match to {
                Some(to) => to.clone(),
                None => rt
                    .pr_base()
                    .ok_or_else(|| anyhow::anyhow!("no target branch; pass --to or set pr.base in .fcli"))?,
            };
            let opts = SubmitPullOptions {
                owner,
                repo,
                title: title.clone(),
                body: message.clone(),
                from: from.clone(),
                to,
                reviewers: reviewers.clone(),
                draft: *draft,
            };
            forge.submit_pull(ctx, &opts)?;
            println!("Created pull request: {title}");
        }

        PullsAction::Merge {
            id,
            squash,
            delete_branch,
        } => {
            let flags = MergeFlags {
                squash: *squash,
                delete_source: *delete_branch && !rt.inhibit_delete_source_branch(),
            };
            forge.pull_merge(ctx, &owner, &repo, *id, flags)?;
            println!("Merged pull request #{id}");
        }

        PullsAction::Close { id } => {
            forge.pull_close(ctx, &owner, &repo, *id)?;
        }

        PullsAction::Reopen { id } => {
            forge.pull_reopen(ctx, &owner, &repo, *id)?;
        }

        PullsAction::Title { id, new_title } => {
            forge.pull_set_title(ctx, &owner, &repo, *id, new_title)?;
        }

        PullsAction::Label { id, labels } => {
            forge.pull_add_labels(ctx, &owner, &repo, *id, labels)?;
        }

        PullsAction::Unlabel { id, labels } => {
            forge.pull_remove_labels(ctx, &owner, &repo, *id, labels)?;
        }

        PullsAction::Milestone {
            id,
            milestone,
            clear,
        } => {
            if *clear {
                forge.pull_clear_milestone(ctx, &owner, &repo, *id)?;
            } else if let Some(milestone) = milestone {
                forge.pull_set_milestone(ctx, &owner, &repo, *id, *milestone)?;
            } else {
                anyhow::bail!("pass a milestone id or --clear");
            }
        }

        PullsAction::Reviewer { id, user } => {
            forge.pull_add_reviewer(ctx, &owner, &repo, *id, user)?;
        }
    }

    Ok(())
}

fn filter(list: &PullsListArgs) -> PullFilter {
    PullFilter {
        all: list.all,
        author: list.author.clone(),
        label: list.label.clone(),
        milestone: list.milestone.clone(),
    }
}

fn print_pull_table(pulls: &[Pull]) {
    if pulls.is_empty() {
        println!("No pull requests");
        return;
    }
    let mut table = Table::new(&["NUMBER", "STATE", "AUTHOR", "TITLE"]);
    for pull in pulls {
        table.row(vec![
            pull.number.to_string(),
            output::state(&pull.state),
            pull.author.clone(),
            pull.title.clone(),
        ]);
    }
    table.print();
}

fn print_pull(rt: &Runtime, pull: &Pull) -> Result<()> {
    let quirks = rt.forge()?.pull_quirks();

    output::field("NUMBER", &pull.number.to_string());
    output::field("TITLE", &pull.title);
    output::field("CREATED", &pull.created_at);
    output::field("AUTHOR", &pull.author);
    output::field("STATE", &output::state(&pull.state));
    output::field("HEAD", &pull.head_label);
    output::field("BASE", &pull.base_label);
    output::field("COMMENTS", &pull.comments_count.to_string());
    if !quirks.additions_deletions {
        output::field("ADD:DEL", &format!("+{} -{}", pull.additions, pull.deletions));
    }
    if !quirks.commits {
        output::field("COMMITS", &pull.commits.to_string());
    }
    if !quirks.changed_files {
        output::field("CHANGED", &pull.changed_files.to_string());
    }
    if !quirks.merged {
        output::field("MERGED", output::yesno(pull.merged));
    }
    output::field("MERGEABLE", output::yesno(pull.mergeable));
    if !quirks.draft {
        output::field("DRAFT", output::yesno(pull.draft));
    }
    if !quirks.automerge {
        output::field("AUTOMERGE", output::yesno(pull.automerge));
    }
    if !quirks.coverage {
        if let Some(coverage) = &pull.coverage {
            output::field("COVERAGE", coverage);
        }
    }
    if !pull.labels.is_empty() {
        output::field("LABELS", &pull.labels.join(", "));
    }
    if !pull.reviewers.is_empty() {
        output::field("REVIEWERS", &pull.reviewers.join(", "));
    }
    if let Some(milestone) = &pull.milestone {
        output::field("MILESTONE", milestone);
    }
    if !pull.body.is_empty() {
        println!();
        println!("{}", pull.body);
    }
    Ok(())
}
