// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{id_for_tag, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let label = sub.get_one::<String>("label").unwrap();
            ledger::create_tag(conn, label)?;
            println!("Added tag '{}'", label);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for t in ledger::list_tags(conn)? {
                data.push(vec![t.label]);
            }
            println!("{}", pretty_table(&["Tag"], data));
        }
        Some(("rm", sub)) => {
            let label = sub.get_one::<String>("label").unwrap();
            let id = id_for_tag(conn, label)?;
            ledger::delete_tag(conn, &id)?;
            println!("Removed tag '{}'", label);
        }
        _ => {}
    }
    Ok(())
}
