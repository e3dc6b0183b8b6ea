//! `fcli milestones` -- list and manage milestones.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;

use forge_types::{Milestone, MilestoneCreateOptions};

use crate::cli::{MilestonesAction, MilestonesArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &MilestonesArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = rt.owner_repo()?;

    match &args.action {
        MilestonesAction::List { limit } => {
            let milestones = forge.get_milestones(ctx, &owner, &repo, limit.max())?;
            if rt.json {
                output::json(&milestones);
            } else {
                print_milestone_table(&milestones);
            }
        }

        MilestonesAction::View { id } => {
            let milestone = forge.get_milestone(ctx, &owner, &repo, *id)?;
            if rt.json {
                output::json(&milestone);
            } else {
                print_milestone(rt, &milestone)?;
            }
        }

        MilestonesAction::Issues { id } => {
            let issues = forge.get_milestone_issues(ctx, &owner, &repo, *id)?;
            if rt.json {
                output::json(&issues);
                return Ok(());
            }
            let mut table = Table::new(&["NUMBER", "STATE", "TITLE"]);
            for issue in &issues {
                table.row(vec![
                    issue.number.to_string(),
                    output::state(&issue.state),
                    issue.title.clone(),
                ]);
            }
            table.print();
        }

        MilestonesAction::Create { title, description } => {
            let opts = MilestoneCreateOptions {
                owner,
                repo,
                title: title.clone(),
                description: description.clone(),
            };
            forge.create_milestone(ctx, &opts)?;
            println!("Created milestone {title}");
        }

        MilestonesAction::Delete { id } => {
            forge.delete_milestone(ctx, &owner, &repo, *id)?;
        }

        MilestonesAction::Duedate { id, date } => {
            // Validate early; backends pick their own wire format.
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("invalid date {date:?}, expected YYYY-MM-DD"))?;
            forge.milestone_set_duedate(ctx, &owner, &repo, *id, date)?;
        }
    }

    Ok(())
}

fn print_milestone_table(milestones: &[Milestone]) {
    if milestones.is_empty() {
        println!("No milestones");
        return;
    }
    let mut table = Table::new(&["ID", "STATE", "TITLE"]);
    for milestone in milestones {
        table.row(vec![
            milestone.id.to_string(),
            output::state(&milestone.state),
            milestone.title.clone(),
        ]);
    }
    table.print();
}

fn print_milestone(rt: &Runtime, milestone: &Milestone) -> Result<()> {
    let quirks = rt.forge()?.milestone_quirks();

    output::field("ID", &milestone.id.to_string());
    output::field("TITLE", &milestone.title);
    output::field("STATE", &output::state(&milestone.state));
    output::field("CREATED", &milestone.created_at);
    output::field("UPDATED", &milestone.updated_at);
    if !quirks.due_date {
        if let Some(due) = &milestone.due_date {
            output::field("DUE", due);
        }
    }
    if !quirks.expired {
        output::field("EXPIRED", output::yesno(milestone.expired));
    }
    if !quirks.issue_counts {
        output::field("OPEN", &milestone.open_issues.to_string());
        output::field("CLOSED", &milestone.closed_issues.to_string());
    }
    if !milestone.description.is_empty() {
        println!();
        println!("{}", milestone.description);
    }
    Ok(())
}
