// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::reports;
use crate::utils::{maybe_print_json, parse_date, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("rollup", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let data = reports::monthly_rollup(conn)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|r| {
                        vec![
                            r.month.clone(),
                            format!("{:.2}", r.income),
                            format!("{:.2}", r.expense),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
            }
        }
        Some(("by-category", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let data = reports::category_breakdown(conn, &month)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|r| vec![r.category.clone(), format!("{:.2}", r.total)])
                    .collect();
                println!("{}", pretty_table(&["Category", "Total"], rows));
            }
        }
        Some(("summary", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let since = match sub.get_one::<String>("since") {
                Some(s) => Some(parse_date(s)?),
                None => None,
            };
            let data = reports::summary(conn, since)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                println!(
                    "{}",
                    pretty_table(
                        &["Income", "Expense"],
                        vec![vec![
                            format!("{:.2}", data.income),
                            format!("{:.2}", data.expense),
                        ]],
                    )
                );
            }
        }
        Some(("months", _)) => {
            let rows: Vec<Vec<String>> = reports::months(conn)?
                .into_iter()
                .map(|m| vec![m])
                .collect();
            println!("{}", pretty_table(&["Month"], rows));
        }
        _ => {}
    }
    Ok(())
}
