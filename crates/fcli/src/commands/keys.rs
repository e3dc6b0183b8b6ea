//! `fcli keys` -- SSH key management.

use std::path::Path;

use anyhow::Result;

use crate::cli::{KeysAction, KeysArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &KeysArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();

    match &args.action {
        KeysAction::List => {
            let keys = forge.get_sshkeys(ctx)?;
            if rt.json {
                output::json(&keys);
                return Ok(());
            }
            if keys.is_empty() {
                println!("No SSH keys");
                return Ok(());
            }
            let mut table = Table::new(&["ID", "CREATED", "TITLE"]);
            for key in &keys {
                table.row(vec![
                    key.id.to_string(),
                    key.created_at.clone(),
                    key.title.clone(),
                ]);
            }
            table.print();
        }

        KeysAction::Add { title, path } => {
            let key = forge.add_sshkey(ctx, title, Path::new(path))?;
            println!("Added key {} (id {})", key.title, key.id);
        }

        KeysAction::Delete { id } => {
            forge.delete_sshkey(ctx, *id)?;
        }
    }

    Ok(())
}
