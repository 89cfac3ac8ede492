// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{id_for_account, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let account = ledger::create_account(conn, name)?;
            println!("Added account '{}'", account.name);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for a in ledger::list_accounts(conn)? {
                data.push(vec![a.name, format!("{}", a.balance)]);
            }
            println!("{}", pretty_table(&["Name", "Balance"], data));
        }
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let to = sub.get_one::<String>("to").unwrap();
            let id = id_for_account(conn, name)?;
            ledger::rename_account(conn, &id, to)?;
            println!("Renamed account '{}' -> '{}'", name, to);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_account(conn, name)?;
            ledger::delete_account(conn, &id)?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
