// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::CategoryKind;
use crate::utils::{id_for_category, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = CategoryKind::parse(sub.get_one::<String>("kind").unwrap())?;
            let icon = sub.get_one::<String>("icon").map(|s| s.as_str());
            ledger::create_category(conn, name, icon, kind)?;
            println!("Added category '{}' ({})", name, kind.as_str());
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for c in ledger::list_categories(conn)? {
                data.push(vec![
                    c.name,
                    c.kind.as_str().to_string(),
                    c.icon.unwrap_or_default(),
                    if c.protected { "yes".into() } else { String::new() },
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Name", "Kind", "Icon", "Protected"], data)
            );
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_category(conn, name)?;
            ledger::delete_category(conn, &id)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
