//! `fcli issues` -- list, inspect and modify issues.

use anyhow::Result;

use forge_types::{Comment, ForgeKind, Issue, IssueFilter, SubmitIssueOptions};

use crate::cli::{IssuesAction, IssuesArgs, IssuesListArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &IssuesArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = target(rt)?;

    match &args.action {
        IssuesAction::List(list) => {
            let issues = forge.search_issues(ctx, &owner, &repo, &filter(list), list.limit.max())?;
            if rt.json {
                output::json(&issues);
            } else {
                print_issue_table(&issues);
            }
        }

        IssuesAction::View { id, comments } => {
            let issue = forge.get_issue_summary(ctx, &owner, &repo, *id)?;
            if rt.json {
                output::json(&issue);
            } else {
                print_issue(rt, &issue)?;
            }
            if *comments {
                let thread = forge.get_issue_comments(ctx, &owner, &repo, *id)?;
                if rt.json {
                    output::json(&thread);
                } else {
                    print_comments(&thread);
                }
            }
        }

        IssuesAction::Create { title, message } => {
            let opts = SubmitIssueOptions {
                owner,
                repo,
                title: title.clone(),
                body: message.clone(),
                ..SubmitIssueOptions::default()
            };
            let created = forge.submit_issue(ctx, &opts)?;
            if rt.json {
                output::json(&created);
            } else {
                println!("Created issue #{}: {}", created.number, created.title);
            }
        }

        IssuesAction::Close { id } => {
            forge.issue_close(ctx, &owner, &repo, *id)?;
            println!("Closed issue #{id}");
        }

        IssuesAction::Reopen { id } => {
            forge.issue_reopen(ctx, &owner, &repo, *id)?;
            println!("Reopened issue #{id}");
        }

        IssuesAction::Assign { id, user } => {
            forge.issue_assign(ctx, &owner, &repo, *id, user)?;
            println!("Assigned issue #{id} to {user}");
        }

        IssuesAction::Title { id, new_title } => {
            forge.issue_set_title(ctx, &owner, &repo, *id, new_title)?;
        }

        IssuesAction::Label { id, labels } => {
            forge.issue_add_labels(ctx, &owner, &repo, *id, labels)?;
        }

        IssuesAction::Unlabel { id, labels } => {
            forge.issue_remove_labels(ctx, &owner, &repo, *id, labels)?;
        }

        IssuesAction::Milestone {
            id,
            milestone,
            clear,
        } => {
            if *clear {
                forge.issue_clear_milestone(ctx, &owner, &repo, *id)?;
            } else if let Some(milestone) = milestone {
                forge.issue_set_milestone(ctx, &owner, &repo, *id, *milestone)?;
            } else {
                anyhow::bail!("pass a milestone id or --clear");
            }
        }
    }

    Ok(())
}

/// Bugzilla has no owner/repo; product/component filtering is optional
/// there, so a missing repository is not an error.
fn target(rt: &Runtime) -> Result<(String, String)> {
    if rt.ctx().forge_kind()? == ForgeKind::Bugzilla {
        return Ok(rt.owner_repo().unwrap_or_default());
    }
    rt.owner_repo()
}

fn filter(list: &IssuesListArgs) -> IssueFilter {
    IssueFilter {
        all: list.all,
        author: list.author.clone(),
        label: list.label.clone(),
        milestone: list.milestone.clone(),
    }
}

fn print_issue_table(issues: &[Issue]) {
    if issues.is_empty() {
        println!("No issues");
        return;
    }
    let mut table = Table::new(&["NUMBER", "STATE", "TITLE"]);
    for issue in issues {
        table.row(vec![
            issue.number.to_string(),
            output::state(&issue.state),
            issue.title.clone(),
        ]);
    }
    table.print();
}

fn print_issue(rt: &Runtime, issue: &Issue) -> Result<()> {
    let quirks = rt.forge()?.issue_quirks();

    output::field("NUMBER", &issue.number.to_string());
    output::field("TITLE", &issue.title);
    output::field("CREATED", &issue.created_at);
    output::field("AUTHOR", &issue.author);
    output::field("STATE", &output::state(&issue.state));
    if !quirks.comments_count {
        output::field("COMMENTS", &issue.comments_count.to_string());
    }
    if !quirks.locked {
        output::field("LOCKED", output::yesno(issue.locked));
    }
    if !quirks.product_component {
        output::field("PRODUCT", issue.product.as_deref().unwrap_or(""));
        output::field("COMPONENT", issue.component.as_deref().unwrap_or(""));
    }
    if !quirks.url {
        if let Some(url) = &issue.url {
            output::field("URL", url);
        }
    }
    if !issue.labels.is_empty() {
        output::field("LABELS", &issue.labels.join(", "));
    }
    if !issue.assignees.is_empty() {
        output::field("ASSIGNEES", &issue.assignees.join(", "));
    }
    if let Some(milestone) = &issue.milestone {
        output::field("MILESTONE", milestone);
    }
    if !issue.body.is_empty() {
        println!();
        println!("{}", issue.body);
    }
    Ok(())
}

fn print_comments(comments: &[Comment]) {
    for comment in comments {
        println!();
        println!("AUTHOR : {}", comment.author);
        println!("DATE   : {}", comment.date);
        for line in comment.body.lines() {
            println!("         {line}");
        }
    }
}
