// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::sync::{self, HttpRemote};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("push", sub)) => {
            let base_url = sub.get_one::<String>("remote").unwrap();
            let remote = HttpRemote::new(base_url)?;
            let report = sync::push_pending(conn, &remote)?;
            println!("Pushed {} row(s)", report.pushed);
            if !report.failures.is_empty() {
                let rows: Vec<Vec<String>> = report
                    .failures
                    .iter()
                    .map(|f| vec![f.collection.clone(), f.id.clone(), f.reason.clone()])
                    .collect();
                println!("{}", pretty_table(&["Collection", "Id", "Error"], rows));
                println!("Failed rows stay dirty and retry on the next push.");
            }
        }
        _ => {}
    }
    Ok(())
}
