// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::reports;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Cached account balances vs the transaction sum
    for drift in reports::balance_audit(conn)? {
        rows.push(vec![
            "balance_drift".into(),
            format!(
                "{}: cached {} vs computed {}",
                drift.name, drift.cached, drift.computed
            ),
        ]);
    }

    // 2) Cached person totals vs the fold over unpaid debts
    for drift in reports::debt_audit(conn)? {
        rows.push(vec![
            "debt_total_drift".into(),
            format!(
                "{}: cached {} vs computed {}",
                drift.name, drift.cached, drift.computed
            ),
        ]);
    }

    // 3) Payments whose ledger transaction is gone (legacy or tampered DBs;
    // foreign keys prevent this on rows written by this crate)
    let mut stmt = conn.prepare(
        "SELECT p.id FROM payments p LEFT JOIN transactions t ON p.transaction_id=t.id
         WHERE t.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        rows.push(vec!["orphan_payment".into(), id]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
