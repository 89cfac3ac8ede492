// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{id_for_card, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
            let available = parse_decimal(sub.get_one::<String>("available").unwrap())?;
            let card = ledger::create_card(conn, name, limit, available)?;
            println!(
                "Added card '{}' (limit {}, available {})",
                card.name, card.credit_limit, card.available
            );
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for c in ledger::list_cards(conn)? {
                data.push(vec![
                    c.name,
                    format!("{}", c.credit_limit),
                    format!("{}", c.available),
                ]);
            }
            println!("{}", pretty_table(&["Name", "Limit", "Available"], data));
        }
        Some(("update", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let new_name = sub
                .get_one::<String>("to")
                .map(|s| s.as_str())
                .unwrap_or(name.as_str());
            let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
            let available = parse_decimal(sub.get_one::<String>("available").unwrap())?;
            let id = id_for_card(conn, name)?;
            ledger::update_card(conn, &id, new_name, limit, available)?;
            println!("Updated card '{}'", new_name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_card(conn, name)?;
            ledger::delete_card(conn, &id)?;
            println!("Removed card '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
