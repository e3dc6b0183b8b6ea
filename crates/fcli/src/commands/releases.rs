//! `fcli releases` -- list, create and delete releases.

use anyhow::Result;

use forge_types::{NewRelease, Release, ReleaseAssetUpload};

use crate::cli::{ReleasesAction, ReleasesArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &ReleasesArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = rt.owner_repo()?;

    match &args.action {
        ReleasesAction::List { limit } => {
            let releases = forge.get_releases(ctx, &owner, &repo, limit.max())?;
            if rt.json {
                output::json(&releases);
            } else {
                print_release_table(&releases);
            }
        }

        ReleasesAction::Create {
            tag,
            name,
            message,
            commitish,
            draft,
            prerelease,
            assets,
        } => {
            let release = NewRelease {
                owner,
                repo,
                tag: tag.clone(),
                name: name.clone().unwrap_or_else(|| tag.clone()),
                body: message.clone(),
                commitish: commitish.clone(),
                draft: *draft,
                prerelease: *prerelease,
                assets: assets
                    .iter()
                    .map(|path| ReleaseAssetUpload {
                        name: file_name(path),
                        path: path.clone(),
                    })
                    .collect(),
            };
            forge.create_release(ctx, &release)?;
            println!("Created release {tag}");
        }

        ReleasesAction::Delete { id } => {
            forge.delete_release(ctx, &owner, &repo, id)?;
        }
    }

    Ok(())
}

fn file_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn print_release_table(releases: &[Release]) {
    if releases.is_empty() {
        println!("No releases");
        return;
    }
    let mut table = Table::new(&["ID", "DATE", "DRAFT", "PRE", "NAME"]);
    for release in releases {
        table.row(vec![
            release.id.clone(),
            release.date.clone(),
            output::yesno(release.draft).to_string(),
            output::yesno(release.prerelease).to_string(),
            release.name.clone(),
        ]);
    }
    table.print();
}
