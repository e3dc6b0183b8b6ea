//! `fcli forks` -- list forks or fork the repository.

use anyhow::Result;

use crate::cli::{ForksAction, ForksArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &ForksArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = rt.owner_repo()?;

    match &args.action {
        ForksAction::List { limit } => {
            let forks = forge.get_forks(ctx, &owner, &repo, limit.max())?;
            if rt.json {
                output::json(&forks);
                return Ok(());
            }
            if forks.is_empty() {
                println!("No forks");
                return Ok(());
            }
            let mut table = Table::new(&["OWNER", "DATE", "FORKS", "FULLNAME"]);
            for fork in &forks {
                table.row(vec![
                    fork.owner.clone(),
                    fork.date.clone(),
                    fork.forks_count.to_string(),
                    fork.full_name.clone(),
                ]);
            }
            table.print();
        }

        ForksAction::Create { into } => {
            forge.fork_create(ctx, &owner, &repo, into.as_deref())?;
            println!("Forked {owner}/{repo}");
        }
    }

    Ok(())
}
