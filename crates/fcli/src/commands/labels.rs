//! `fcli labels` -- list, create and delete labels.

use anyhow::{Context as _, Result};

use forge_types::Label;

use crate::cli::{LabelsAction, LabelsArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &LabelsArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();
    let (owner, repo) = rt.owner_repo()?;

    match &args.action {
        LabelsAction::List { limit } => {
            let labels = forge.get_labels(ctx, &owner, &repo, limit.max())?;
            if rt.json {
                output::json(&labels);
                return Ok(());
            }
            if labels.is_empty() {
                println!("No labels");
                return Ok(());
            }
            let mut table = Table::new(&["ID", "NAME", "DESCRIPTION"]);
            for label in &labels {
                table.row(vec![
                    label.id.to_string(),
                    output::label_chip(&label.name, label.color),
                    label.description.clone(),
                ]);
            }
            table.print();
        }

        LabelsAction::Create {
            name,
            color,
            description,
        } => {
            let rgb = u32::from_str_radix(color.trim_start_matches('#'), 16)
                .with_context(|| format!("invalid colour {color:?}, expected RRGGBB hex"))?;
            let mut label = Label {
                name: name.clone(),
                description: description.clone(),
                color: rgb << 8,
                ..Label::default()
            };
            forge.create_label(ctx, &owner, &repo, &mut label)?;
            println!("Created label {} (id {})", label.name, label.id);
        }

        LabelsAction::Delete { name } => {
            forge.delete_label(ctx, &owner, &repo, name)?;
        }
    }

    Ok(())
}
