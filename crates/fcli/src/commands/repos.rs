//! `fcli repos` -- list, create, delete repositories.

use std::io::{BufRead, Write};

use anyhow::Result;

use forge_types::{Repo, RepoCreateOptions, Visibility};

use crate::cli::{ReposAction, ReposArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &ReposArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();

    match &args.action {
        ReposAction::List { limit } => {
            // With a resolvable owner list theirs, otherwise our own.
            let repos = match rt.owner() {
                Some(owner) => forge.get_repos(ctx, &owner, limit.max())?,
                None => forge.get_own_repos(ctx, limit.max())?,
            };
            if rt.json {
                output::json(&repos);
            } else {
                print_repo_table(&repos);
            }
        }

        ReposAction::Create {
            name,
            description,
            private,
        } => {
            let opts = RepoCreateOptions {
                name: name.clone(),
                description: description.clone(),
                private: *private,
            };
            let repo = forge.repo_create(ctx, &opts)?;
            if rt.json {
                output::json(&repo);
            } else {
                println!("Created {}", repo.full_name);
            }
        }

        ReposAction::Delete { yes } => {
            let (owner, repo) = rt.owner_repo()?;
            if !yes && !confirm(&format!("Delete {owner}/{repo}? [y/N] "))? {
                println!("Aborted");
                return Ok(());
            }
            forge.repo_delete(ctx, &owner, &repo)?;
            println!("Deleted {owner}/{repo}");
        }

        ReposAction::Visibility { level } => {
            let (owner, repo) = rt.owner_repo()?;
            let visibility = match level.as_str() {
                "public" => Visibility::Public,
                "private" => Visibility::Private,
                other => anyhow::bail!("unknown visibility {other:?} (public or private)"),
            };
            forge.repo_set_visibility(ctx, &owner, &repo, visibility)?;
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_repo_table(repos: &[Repo]) {
    if repos.is_empty() {
        println!("No repositories");
        return;
    }
    let mut table = Table::new(&["DATE", "VISIBILITY", "FORK", "FULLNAME"]);
    for repo in repos {
        table.row(vec![
            repo.date.clone(),
            repo.visibility.clone(),
            output::yesno(repo.is_fork).to_string(),
            repo.full_name.clone(),
        ]);
    }
    table.print();
}
