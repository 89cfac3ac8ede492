// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::debts;
use crate::utils::{id_for_person, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            debts::create_person(conn, name)?;
            println!("Added person '{}'", name);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for p in debts::list_people(conn)? {
                data.push(vec![p.name, format!("{}", p.debt_total)]);
            }
            println!("{}", pretty_table(&["Name", "Owes you"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_person(conn, name)?;
            debts::delete_person(conn, &id)?;
            println!("Removed person '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
