// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::error::CoreError;
use billfold::ledger::{self, NewTransaction, TransactionUpdate, TxFilter};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::ensure_schema(&mut conn).unwrap();
    conn
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tx(amount: i64, date_: NaiveDate, account_id: Option<String>) -> NewTransaction {
    NewTransaction {
        description: "entry".into(),
        amount: Decimal::from(amount),
        date: date_,
        account_id,
        card_id: None,
        category_id: None,
        tags: Vec::new(),
    }
}

#[test]
fn balance_follows_transaction_history() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    assert_eq!(wallet.balance, Decimal::ZERO);

    let groceries = ledger::record_transaction(
        &mut conn,
        &NewTransaction {
            description: "Groceries".into(),
            ..tx(-50000, date(2025, 8, 1), Some(wallet.id.clone()))
        },
    )
    .unwrap();
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::from(-50000)
    );

    ledger::record_transaction(
        &mut conn,
        &NewTransaction {
            description: "Salary".into(),
            ..tx(2000000, date(2025, 8, 2), Some(wallet.id.clone()))
        },
    )
    .unwrap();
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::from(1950000)
    );

    ledger::delete_transaction(&mut conn, &groceries.id).unwrap();
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::from(2000000)
    );
}

#[test]
fn update_moves_balance_between_accounts() {
    let mut conn = setup();
    let a = ledger::create_account(&conn, "A").unwrap();
    let b = ledger::create_account(&conn, "B").unwrap();
    let t = ledger::record_transaction(&mut conn, &tx(100, date(2025, 1, 5), Some(a.id.clone())))
        .unwrap();

    ledger::update_transaction(
        &mut conn,
        &t.id,
        &TransactionUpdate {
            description: "moved".into(),
            amount: Decimal::from(250),
            date: date(2025, 1, 6),
            account_id: Some(b.id.clone()),
            card_id: None,
            category_id: None,
        },
    )
    .unwrap();

    assert_eq!(
        ledger::get_account(&conn, &a.id).unwrap().balance,
        Decimal::ZERO
    );
    assert_eq!(
        ledger::get_account(&conn, &b.id).unwrap().balance,
        Decimal::from(250)
    );
}

#[test]
fn empty_names_are_rejected() {
    let conn = setup();
    assert!(matches!(
        ledger::create_account(&conn, "  "),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        ledger::create_tag(&conn, ""),
        Err(CoreError::Validation(_))
    ));
}

#[test]
fn unknown_account_ref_is_not_found() {
    let mut conn = setup();
    let err = ledger::record_transaction(&mut conn, &tx(10, date(2025, 1, 1), Some("nope".into())))
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn failed_insert_leaves_no_trace() {
    let mut conn = setup();
    let a = ledger::create_account(&conn, "A").unwrap();
    ledger::record_transaction(&mut conn, &tx(75, date(2025, 1, 1), Some(a.id.clone()))).unwrap();

    // A bad tag reference aborts the whole unit: no row, no balance change.
    let err = ledger::record_transaction(
        &mut conn,
        &NewTransaction {
            tags: vec!["missing-tag".into()],
            ..tx(500, date(2025, 1, 2), Some(a.id.clone()))
        },
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
    assert_eq!(
        ledger::get_account(&conn, &a.id).unwrap().balance,
        Decimal::from(75)
    );
    let rows = ledger::list_transactions(&conn, &TxFilter::default()).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn card_available_cannot_exceed_limit() {
    let conn = setup();
    let err =
        ledger::create_card(&conn, "Visa", Decimal::from(1000), Decimal::from(2000)).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    ledger::create_card(&conn, "Visa", Decimal::from(1000), Decimal::from(800)).unwrap();
}

#[test]
fn paged_listing_is_newest_first() {
    let mut conn = setup();
    for day in 1..=3 {
        ledger::record_transaction(&mut conn, &tx(-10, date(2025, 1, day), None)).unwrap();
    }
    let first = ledger::list_transactions_paged(&conn, &TxFilter::default(), 0, 2).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].date, "2025-01-03");
    assert_eq!(first[1].date, "2025-01-02");
    let second = ledger::list_transactions_paged(&conn, &TxFilter::default(), 1, 2).unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].date, "2025-01-01");
}

#[test]
fn listing_filters_by_month_and_tag() {
    let mut conn = setup();
    let groceries = ledger::create_tag(&conn, "groceries").unwrap();
    ledger::record_transaction(
        &mut conn,
        &NewTransaction {
            tags: vec![groceries.id.clone()],
            ..tx(-10, date(2025, 1, 10), None)
        },
    )
    .unwrap();
    ledger::record_transaction(&mut conn, &tx(-20, date(2025, 2, 10), None)).unwrap();

    let jan = ledger::list_transactions(
        &conn,
        &TxFilter {
            month: Some("2025-01".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(jan.len(), 1);
    assert_eq!(jan[0].tags, "groceries");

    let tagged = ledger::list_transactions(
        &conn,
        &TxFilter {
            tag_id: Some(groceries.id),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(tagged.len(), 1);
}

#[test]
fn deleting_account_clears_transaction_refs() {
    let mut conn = setup();
    let a = ledger::create_account(&conn, "A").unwrap();
    let t = ledger::record_transaction(&mut conn, &tx(10, date(2025, 1, 1), Some(a.id.clone())))
        .unwrap();
    ledger::delete_account(&mut conn, &a.id).unwrap();
    let t = ledger::get_transaction(&conn, &t.id).unwrap();
    assert_eq!(t.account_id, None);
}
