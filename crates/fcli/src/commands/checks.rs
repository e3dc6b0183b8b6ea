//! `fcli checks` -- CI results of a pull request.
//!
//! The list is polymorphic: GitHub delivers check runs, GitLab delivers
//! pipelines. Rendering branches on the variant.

use anyhow::Result;

use forge_types::PullChecks;

use crate::cli::ChecksArgs;
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &ChecksArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = rt.owner_repo()?;

    let checks = forge.get_pull_checks(ctx, &owner, &repo, args.id)?;
    if rt.json {
        output::json(&checks);
        return Ok(());
    }
    if checks.is_empty() {
        println!("No checks");
        return Ok(());
    }

    match checks {
        PullChecks::GitHub(runs) => {
            let mut table = Table::new(&["ID", "STATUS", "CONCLUSION", "STARTED", "NAME"]);
            for check in &runs {
                table.row(vec![
                    check.id.to_string(),
                    check.status.clone(),
                    check.conclusion.clone(),
                    check.started_at.clone(),
                    check.name.clone(),
                ]);
            }
            table.print();
        }
        PullChecks::GitLab(pipelines) => {
            let mut table = Table::new(&["ID", "STATUS", "CREATED", "SOURCE", "REF"]);
            for pipeline in &pipelines {
                table.row(vec![
                    pipeline.id.to_string(),
                    pipeline.status.clone(),
                    pipeline.created_at.clone(),
                    pipeline.source.clone(),
                    pipeline.refname.clone(),
                ]);
            }
            table.print();
        }
    }

    Ok(())
}
