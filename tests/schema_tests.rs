// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::error::CoreError;
use billfold::ledger::{self, NewTransaction};
use billfold::models::CategoryKind;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::ensure_schema(&mut conn).unwrap();
    conn
}

#[test]
fn ensure_schema_is_idempotent() {
    let mut conn = setup();
    db::ensure_schema(&mut conn).unwrap();
    db::ensure_schema(&mut conn).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 9);
}

#[test]
fn seed_categories_are_protected() {
    let mut conn = setup();
    let food = "cat-2";
    let t = ledger::record_transaction(
        &mut conn,
        &NewTransaction {
            description: "lunch".into(),
            amount: Decimal::from(-15),
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            account_id: None,
            card_id: None,
            category_id: Some(food.to_string()),
            tags: Vec::new(),
        },
    )
    .unwrap();

    let err = ledger::delete_category(&mut conn, food).unwrap_err();
    assert!(matches!(err, CoreError::Constraint(_)));

    // The failed delete rolled everything back: the category is still
    // there and the transaction still points at it.
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories WHERE id='cat-2'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(
        ledger::get_transaction(&conn, &t.id).unwrap().category_id,
        Some(food.to_string())
    );
}

#[test]
fn custom_categories_can_be_deleted() {
    let mut conn = setup();
    let cat = ledger::create_category(&conn, "Pets", None, CategoryKind::Expense).unwrap();
    let t = ledger::record_transaction(
        &mut conn,
        &NewTransaction {
            description: "vet".into(),
            amount: Decimal::from(-90),
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            account_id: None,
            card_id: None,
            category_id: Some(cat.id.clone()),
            tags: Vec::new(),
        },
    )
    .unwrap();

    ledger::delete_category(&mut conn, &cat.id).unwrap();
    assert_eq!(ledger::get_transaction(&conn, &t.id).unwrap().category_id, None);
}

#[test]
fn deleting_unknown_rows_is_not_found() {
    let mut conn = setup();
    assert!(matches!(
        ledger::delete_category(&mut conn, "nope"),
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        ledger::delete_transaction(&mut conn, "nope"),
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        ledger::delete_account(&mut conn, "nope"),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn seeds_include_debt_payments_category() {
    let conn = setup();
    let kind: String = conn
        .query_row(
            "SELECT kind FROM categories WHERE LOWER(name)='debt payments'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(kind, "expense");
}
