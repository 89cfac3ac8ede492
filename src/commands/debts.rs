// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::debts;
use crate::utils::{id_for_account, id_for_person, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let person = sub.get_one::<String>("person").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let desc = sub.get_one::<String>("desc").map(|s| s.as_str());
            let person_id = id_for_person(conn, person)?;
            let debt = debts::create_debt(conn, &person_id, amount, date, desc)?;
            println!("Added debt {} for '{}' ({})", debt.amount, person, debt.id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let account = sub.get_one::<String>("account").unwrap();
            let desc = sub.get_one::<String>("desc").unwrap();
            let account_id = id_for_account(conn, account)?;
            debts::record_payment(conn, id, amount, &account_id, desc)?;
            let debt = debts::get_debt(conn, id)?;
            if debt.paid {
                println!("Paid {} — debt settled", amount);
            } else {
                println!(
                    "Paid {} — {} outstanding",
                    amount,
                    debts::outstanding(conn, &debt)?
                );
            }
        }
        Some(("payments", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let mut data = Vec::new();
            for p in debts::list_payments(conn, id)? {
                data.push(vec![
                    p.date.to_string(),
                    format!("{}", p.amount),
                    if p.direction > 0 { "in".into() } else { "out".into() },
                    p.transaction_id,
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Date", "Amount", "Direction", "Transaction"], data)
            );
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            debts::delete_debt(conn, id)?;
            println!("Removed debt {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let person_id = match sub.get_one::<String>("person") {
        Some(name) => Some(id_for_person(conn, name)?),
        None => None,
    };
    let names: HashMap<String, String> = debts::list_people(conn)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let mut data = Vec::new();
    for d in debts::list_debts(conn, person_id.as_deref())? {
        let outstanding = if d.paid {
            "0".to_string()
        } else {
            format!("{}", debts::outstanding(conn, &d)?)
        };
        data.push(vec![
            d.id.clone(),
            names.get(&d.person_id).cloned().unwrap_or_default(),
            format!("{}", d.amount),
            outstanding,
            d.date.to_string(),
            if d.paid { "settled".into() } else { "open".into() },
            d.description.unwrap_or_default(),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &["Id", "Person", "Amount", "Outstanding", "Date", "State", "Description"],
            data,
        )
    );
    Ok(())
}
