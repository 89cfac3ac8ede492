// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub.get_one::<String>("title").unwrap();
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let desc = sub.get_one::<String>("desc").map(|s| s.as_str());
            let r = ledger::create_reminder(conn, title, desc, date)?;
            println!("Added reminder '{}' for {} ({})", r.title, r.date, r.id);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for r in ledger::list_reminders(conn)? {
                data.push(vec![
                    r.id,
                    r.date.to_string(),
                    r.title,
                    r.description.unwrap_or_default(),
                    if r.done { "done".into() } else { String::new() },
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Id", "Date", "Title", "Description", "Done"], data)
            );
        }
        Some(("done", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            ledger::complete_reminder(conn, id)?;
            println!("Marked reminder {} done", id);
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            ledger::delete_reminder(conn, id)?;
            println!("Removed reminder {}", id);
        }
        _ => {}
    }
    Ok(())
}
