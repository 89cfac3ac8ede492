// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::ledger::{self, NewTransaction};
use billfold::models::CategoryKind;
use billfold::reports;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::ensure_schema(&mut conn).unwrap();
    conn
}

fn record(conn: &mut Connection, amount: i64, y: i32, m: u32, d: u32, category: Option<String>) {
    ledger::record_transaction(
        conn,
        &NewTransaction {
            description: "entry".into(),
            amount: Decimal::from(amount),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            account_id: None,
            card_id: None,
            category_id: category,
            tags: Vec::new(),
        },
    )
    .unwrap();
}

#[test]
fn rollup_groups_by_calendar_month() {
    let mut conn = setup();
    record(&mut conn, 100, 2025, 3, 10, None);
    record(&mut conn, -40, 2025, 3, 20, None);
    record(&mut conn, -7, 2025, 4, 1, None);

    let rows = reports::monthly_rollup(&conn).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].month, "2025-03");
    assert_eq!(rows[0].income, Decimal::from(100));
    // Expenses are reported as positive magnitudes.
    assert_eq!(rows[0].expense, Decimal::from(40));
    assert_eq!(rows[1].month, "2025-04");
    assert_eq!(rows[1].expense, Decimal::from(7));
}

#[test]
fn breakdown_excludes_uncategorized_rows() {
    let mut conn = setup();
    let food = ledger::create_category(&conn, "Dining", None, CategoryKind::Expense).unwrap();
    record(&mut conn, -30, 2025, 3, 5, Some(food.id.clone()));
    record(&mut conn, -12, 2025, 3, 6, Some(food.id));
    record(&mut conn, -99, 2025, 3, 7, None);

    let rows = reports::category_breakdown(&conn, "2025-03").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Dining");
    assert_eq!(rows[0].total, Decimal::from(-42));
}

#[test]
fn summary_respects_since_bound() {
    let mut conn = setup();
    record(&mut conn, 500, 2025, 1, 1, None);
    record(&mut conn, -100, 2025, 2, 1, None);
    record(&mut conn, 200, 2025, 3, 1, None);

    let all = reports::summary(&conn, None).unwrap();
    assert_eq!(all.income, Decimal::from(700));
    assert_eq!(all.expense, Decimal::from(100));

    // Inclusive lower bound.
    let since = reports::summary(&conn, NaiveDate::from_ymd_opt(2025, 2, 1)).unwrap();
    assert_eq!(since.income, Decimal::from(200));
    assert_eq!(since.expense, Decimal::from(100));
}

#[test]
fn months_are_distinct_and_ascending() {
    let mut conn = setup();
    record(&mut conn, 1, 2025, 2, 1, None);
    record(&mut conn, 1, 2025, 1, 15, None);
    record(&mut conn, 1, 2025, 1, 20, None);
    assert_eq!(reports::months(&conn).unwrap(), vec!["2025-01", "2025-02"]);
}

#[test]
fn audits_are_clean_after_normal_use() {
    let mut conn = setup();
    let a = ledger::create_account(&conn, "A").unwrap();
    ledger::record_transaction(
        &mut conn,
        &NewTransaction {
            description: "x".into(),
            amount: Decimal::from(40),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            account_id: Some(a.id),
            card_id: None,
            category_id: None,
            tags: Vec::new(),
        },
    )
    .unwrap();
    assert!(reports::balance_audit(&conn).unwrap().is_empty());
    assert!(reports::debt_audit(&conn).unwrap().is_empty());
}

#[test]
fn audit_flags_tampered_balance() {
    let mut conn = setup();
    ledger::create_account(&conn, "A").unwrap();
    conn.execute("UPDATE accounts SET balance='123'", []).unwrap();
    let drift = reports::balance_audit(&conn).unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].cached, Decimal::from(123));
    assert_eq!(drift[0].computed, Decimal::ZERO);
}
