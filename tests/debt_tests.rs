// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billfold::db;
use billfold::debts;
use billfold::error::CoreError;
use billfold::ledger::{self, TxFilter};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::ensure_schema(&mut conn).unwrap();
    conn
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
}

#[test]
fn partial_then_final_payment_settles_debt() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let carlos = debts::create_person(&conn, "Carlos").unwrap();

    let debt = debts::create_debt(
        &mut conn,
        &carlos.id,
        Decimal::from(25000),
        today(),
        Some("Lunch loan"),
    )
    .unwrap();
    assert_eq!(
        debts::get_person(&conn, &carlos.id).unwrap().debt_total,
        Decimal::from(25000)
    );

    debts::record_payment(&mut conn, &debt.id, Decimal::from(10000), &wallet.id, "partial")
        .unwrap();
    let person = debts::get_person(&conn, &carlos.id).unwrap();
    assert_eq!(person.debt_total, Decimal::from(15000));
    assert!(!debts::get_debt(&conn, &debt.id).unwrap().paid);

    debts::record_payment(&mut conn, &debt.id, Decimal::from(15000), &wallet.id, "final")
        .unwrap();
    let person = debts::get_person(&conn, &carlos.id).unwrap();
    assert_eq!(person.debt_total, Decimal::ZERO);
    assert!(debts::get_debt(&conn, &debt.id).unwrap().paid);

    // Collecting what Carlos owed is income for the user.
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::from(25000)
    );
}

#[test]
fn settled_debt_stays_settled() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let p = debts::create_person(&conn, "Ana").unwrap();
    let debt =
        debts::create_debt(&mut conn, &p.id, Decimal::from(500), today(), None).unwrap();
    debts::record_payment(&mut conn, &debt.id, Decimal::from(500), &wallet.id, "all").unwrap();
    assert!(debts::get_debt(&conn, &debt.id).unwrap().paid);

    let err = debts::record_payment(&mut conn, &debt.id, Decimal::from(1), &wallet.id, "more")
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn user_owed_debt_pays_out_as_expense() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let laura = debts::create_person(&conn, "Laura").unwrap();

    // Negative amount: the user owes Laura.
    let debt = debts::create_debt(
        &mut conn,
        &laura.id,
        Decimal::from(-20000),
        today(),
        Some("Lent me transport money"),
    )
    .unwrap();
    assert_eq!(
        debts::get_person(&conn, &laura.id).unwrap().debt_total,
        Decimal::from(-20000)
    );

    let payment =
        debts::record_payment(&mut conn, &debt.id, Decimal::from(5000), &wallet.id, "repay")
            .unwrap();
    assert_eq!(payment.direction, -1);
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::from(-5000)
    );
    assert_eq!(
        debts::get_person(&conn, &laura.id).unwrap().debt_total,
        Decimal::from(-15000)
    );
}

#[test]
fn invalid_debts_and_payments_are_rejected() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let p = debts::create_person(&conn, "Ana").unwrap();

    assert!(matches!(
        debts::create_debt(&mut conn, &p.id, Decimal::ZERO, today(), None),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        debts::create_debt(&mut conn, "missing", Decimal::from(10), today(), None),
        Err(CoreError::NotFound(_))
    ));

    let debt = debts::create_debt(&mut conn, &p.id, Decimal::from(100), today(), None).unwrap();
    assert!(matches!(
        debts::record_payment(&mut conn, &debt.id, Decimal::ZERO, &wallet.id, "x"),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        debts::record_payment(&mut conn, "missing", Decimal::from(1), &wallet.id, "x"),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn deleting_debt_reverses_payment_transactions() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let p = debts::create_person(&conn, "Ana").unwrap();
    let debt = debts::create_debt(&mut conn, &p.id, Decimal::from(1000), today(), None).unwrap();
    debts::record_payment(&mut conn, &debt.id, Decimal::from(400), &wallet.id, "part").unwrap();
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::from(400)
    );

    debts::delete_debt(&mut conn, &debt.id).unwrap();
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::ZERO
    );
    assert_eq!(
        debts::get_person(&conn, &p.id).unwrap().debt_total,
        Decimal::ZERO
    );
    assert!(ledger::list_transactions(&conn, &TxFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn deleting_payment_transaction_refolds_person_total() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let p = debts::create_person(&conn, "Ana").unwrap();
    let debt = debts::create_debt(&mut conn, &p.id, Decimal::from(1000), today(), None).unwrap();
    let payment =
        debts::record_payment(&mut conn, &debt.id, Decimal::from(400), &wallet.id, "part")
            .unwrap();
    assert_eq!(
        debts::get_person(&conn, &p.id).unwrap().debt_total,
        Decimal::from(600)
    );

    // Removing the ledger entry cascades the payment away and the person's
    // total grows back.
    ledger::delete_transaction(&mut conn, &payment.transaction_id).unwrap();
    assert!(debts::list_payments(&conn, &debt.id).unwrap().is_empty());
    assert_eq!(
        debts::get_person(&conn, &p.id).unwrap().debt_total,
        Decimal::from(1000)
    );
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::ZERO
    );
}

#[test]
fn deleting_person_cascades_debts_and_transactions() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let p = debts::create_person(&conn, "Ana").unwrap();
    let debt = debts::create_debt(&mut conn, &p.id, Decimal::from(1000), today(), None).unwrap();
    debts::record_payment(&mut conn, &debt.id, Decimal::from(250), &wallet.id, "part").unwrap();

    debts::delete_person(&mut conn, &p.id).unwrap();
    assert!(matches!(
        debts::get_person(&conn, &p.id),
        Err(CoreError::NotFound(_))
    ));
    assert!(debts::list_debts(&conn, None).unwrap().is_empty());
    assert!(ledger::list_transactions(&conn, &TxFilter::default())
        .unwrap()
        .is_empty());
    assert_eq!(
        ledger::get_account(&conn, &wallet.id).unwrap().balance,
        Decimal::ZERO
    );
}

#[test]
fn payment_direction_is_fixed_at_payment_time() {
    let mut conn = setup();
    let wallet = ledger::create_account(&conn, "Wallet").unwrap();
    let p = debts::create_person(&conn, "Ana").unwrap();
    let debt = debts::create_debt(&mut conn, &p.id, Decimal::from(1000), today(), None).unwrap();
    let payment =
        debts::record_payment(&mut conn, &debt.id, Decimal::from(100), &wallet.id, "part")
            .unwrap();
    assert_eq!(payment.direction, 1);
    let stored = debts::list_payments(&conn, &debt.id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].direction, 1);
    assert_eq!(stored[0].amount, Decimal::from(100));
}
