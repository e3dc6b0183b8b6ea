//! `fcli attachments` -- issue attachments (Bugzilla).

use std::fs::File;
use std::io::Write;

use anyhow::{Context as _, Result};

use crate::cli::{AttachmentsAction, AttachmentsArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &AttachmentsArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();

    match &args.action {
        AttachmentsAction::List { issue } => {
            let (owner, repo) = rt.owner_repo().unwrap_or_default();
            let attachments = forge.get_issue_attachments(ctx, &owner, &repo, *issue)?;
            if rt.json {
                output::json(&attachments);
                return Ok(());
            }
            if attachments.is_empty() {
                println!("No attachments");
                return Ok(());
            }
            let mut table = Table::new(&["ID", "AUTHOR", "DATE", "TYPE", "FILENAME", "SUMMARY"]);
            for attachment in &attachments {
                table.row(vec![
                    attachment.id.to_string(),
                    attachment.author.clone(),
                    attachment.created_at.clone(),
                    attachment.content_type.clone(),
                    attachment.file_name.clone(),
                    attachment.summary.clone(),
                ]);
            }
            table.print();
        }

        AttachmentsAction::Get { id, output } => match output {
            Some(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("could not create {path}"))?;
                forge.attachment_get_content(ctx, *id, &mut file)?;
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                forge.attachment_get_content(ctx, *id, &mut stdout)?;
                stdout.flush()?;
            }
        },
    }

    Ok(())
}
