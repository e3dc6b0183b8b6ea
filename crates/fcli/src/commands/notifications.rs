//! `fcli notifications` -- list notifications, mark them read.

use anyhow::Result;

use crate::cli::{NotificationsAction, NotificationsArgs};
use crate::output;
use crate::runtime::Runtime;
use crate::table::Table;

pub fn run(rt: &Runtime, args: &NotificationsArgs) -> Result<()> {
    let forge = rt.forge()?;
    let ctx = rt.ctx();

    match &args.action {
        NotificationsAction::List { limit } => {
            let notifications = forge.get_notifications(ctx, limit.max())?;
            if rt.json {
                output::json(&notifications);
                return Ok(());
            }
            if notifications.is_empty() {
                println!("No new notifications");
                return Ok(());
            }
            let mut table = Table::new(&["ID", "TYPE", "REPO", "DATE", "TITLE"]);
            for notification in &notifications {
                table.row(vec![
                    notification.id.clone(),
                    notification.kind.clone(),
                    notification.repository.clone(),
                    notification.date.clone(),
                    notification.title.clone(),
                ]);
            }
            table.print();
        }

        NotificationsAction::Read { id } => {
            forge.notification_mark_as_read(ctx, id)?;
        }
    }

    Ok(())
}
