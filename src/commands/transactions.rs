// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, NewTransaction, TransactionUpdate, TxFilter};
use crate::utils::{
    id_for_account, id_for_card, id_for_category, id_for_tag, maybe_print_json, parse_date,
    parse_decimal, parse_month, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            ledger::delete_transaction(conn, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn refs(
    conn: &Connection,
    sub: &clap::ArgMatches,
) -> Result<(Option<String>, Option<String>, Option<String>)> {
    let account = match sub.get_one::<String>("account") {
        Some(name) => Some(id_for_account(conn, name)?),
        None => None,
    };
    let card = match sub.get_one::<String>("card") {
        Some(name) => Some(id_for_card(conn, name)?),
        None => None,
    };
    let category = match sub.get_one::<String>("category") {
        Some(name) => Some(id_for_category(conn, name)?),
        None => None,
    };
    Ok((account, card, category))
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let description = sub.get_one::<String>("desc").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let (account_id, card_id, category_id) = refs(conn, sub)?;
    let mut tags = Vec::new();
    if let Some(labels) = sub.get_many::<String>("tag") {
        for label in labels {
            tags.push(id_for_tag(conn, label)?);
        }
    }
    let recorded = ledger::record_transaction(
        conn,
        &NewTransaction {
            description,
            amount,
            date,
            account_id,
            card_id,
            category_id,
            tags,
        },
    )?;
    println!(
        "Recorded {} on {} '{}' ({})",
        recorded.amount, recorded.date, recorded.description, recorded.id
    );
    Ok(())
}

fn update(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let description = sub.get_one::<String>("desc").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let (account_id, card_id, category_id) = refs(conn, sub)?;
    ledger::update_transaction(
        conn,
        id,
        &TransactionUpdate {
            description,
            amount,
            date,
            account_id,
            card_id,
            category_id,
        },
    )?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut filter = TxFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        filter.month = Some(parse_month(month)?);
    }
    if let Some(name) = sub.get_one::<String>("account") {
        filter.account_id = Some(id_for_account(conn, name)?);
    }
    if let Some(name) = sub.get_one::<String>("card") {
        filter.card_id = Some(id_for_card(conn, name)?);
    }
    if let Some(name) = sub.get_one::<String>("category") {
        filter.category_id = Some(id_for_category(conn, name)?);
    }
    if let Some(label) = sub.get_one::<String>("tag") {
        filter.tag_id = Some(id_for_tag(conn, label)?);
    }
    let page = *sub.get_one::<usize>("page").unwrap();
    let page_size = *sub.get_one::<usize>("page-size").unwrap();
    let data = ledger::list_transactions_paged(conn, &filter, page, page_size)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.account.clone(),
                    r.card.clone(),
                    r.category.clone(),
                    r.tags.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Amount", "Account", "Card", "Category", "Tags"],
                rows,
            )
        );
    }
    Ok(())
}
