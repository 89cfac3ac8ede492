// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Person/debt/payment engine. A debt's amount is signed: positive means
//! the person owes the user, negative means the user owes the person. A
//! debt is OPEN until cumulative payment magnitudes cover the amount's
//! magnitude, then SETTLED for good.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::{CoreError, Result};
use crate::ledger::{self, NewTransaction};
use crate::models::{parse_amount, parse_stored_date, Debt, Payment, Person};
use crate::utils::new_id;

/// Payment-generated transactions land in this seed category, looked up by
/// name the way the mobile app resolved its "Deuda" category.
fn debt_category_id(conn: &Connection) -> Result<String> {
    let id: Option<String> = conn
        .query_row(
            "SELECT id FROM categories WHERE LOWER(name)='debt payments'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    id.ok_or_else(|| CoreError::not_found("category 'Debt Payments'".to_string()))
}

fn paid_magnitude(conn: &Connection, debt_id: &str) -> Result<Decimal> {
    let mut stmt = conn.prepare("SELECT amount FROM payments WHERE debt_id=?1")?;
    let rows = stmt.query_map(params![debt_id], |r| r.get::<_, String>(0))?;
    let mut total = Decimal::ZERO;
    for row in rows {
        total += parse_amount(&row?)?;
    }
    Ok(total)
}

/// What is still owed on an open debt, keeping the debt's sign.
pub fn outstanding(conn: &Connection, debt: &Debt) -> Result<Decimal> {
    let paid = paid_magnitude(conn, &debt.id)?;
    Ok(if debt.amount >= Decimal::ZERO {
        debt.amount - paid
    } else {
        debt.amount + paid
    })
}

/// The single recomputation point for `people.debt_total`: signed sum of
/// the outstanding remainders of the person's unpaid debts. Runs inside the
/// caller's SQL transaction.
pub(crate) fn recompute_debt_total(conn: &Connection, person_id: &str) -> Result<()> {
    let mut stmt =
        conn.prepare("SELECT id, amount FROM debts WHERE person_id=?1 AND paid=0")?;
    let rows = stmt.query_map(params![person_id], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut total = Decimal::ZERO;
    for row in rows {
        let (debt_id, amount) = row?;
        let amount = parse_amount(&amount)?;
        let paid = paid_magnitude(conn, &debt_id)?;
        total += if amount >= Decimal::ZERO {
            amount - paid
        } else {
            amount + paid
        };
    }
    conn.execute(
        "UPDATE people SET debt_total=?1, dirty=1, rev=rev+1 WHERE id=?2",
        params![total.to_string(), person_id],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// People

pub fn create_person(conn: &Connection, name: &str) -> Result<Person> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("person name must not be empty"));
    }
    let id = new_id();
    conn.execute(
        "INSERT INTO people(id, name, debt_total) VALUES (?1, ?2, '0')",
        params![id, name],
    )?;
    Ok(Person {
        id,
        name: name.to_string(),
        debt_total: Decimal::ZERO,
    })
}

pub fn get_person(conn: &Connection, id: &str) -> Result<Person> {
    let row: Option<(String, String, String)> = conn
        .query_row(
            "SELECT id, name, debt_total FROM people WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let (id, name, debt_total) =
        row.ok_or_else(|| CoreError::not_found(format!("person '{}'", id)))?;
    Ok(Person {
        id,
        name,
        debt_total: parse_amount(&debt_total)?,
    })
}

pub fn list_people(conn: &Connection) -> Result<Vec<Person>> {
    let mut stmt = conn.prepare("SELECT id, name, debt_total FROM people ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, debt_total) = row?;
        out.push(Person {
            id,
            name,
            debt_total: parse_amount(&debt_total)?,
        });
    }
    Ok(out)
}

/// Removes the person, their debts, every payment, and the payments'
/// ledger transactions (reversing account balances). One atomic unit.
pub fn delete_person(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    get_person(&tx, id)?;
    let mut stmt = tx.prepare(
        "SELECT p.transaction_id FROM payments p
         JOIN debts d ON p.debt_id=d.id WHERE d.person_id=?1",
    )?;
    let tx_ids: Vec<String> = stmt
        .query_map(params![id], |r| r.get::<_, String>(0))?
        .collect::<std::result::Result<_, _>>()?;
    drop(stmt);
    for tx_id in &tx_ids {
        ledger::delete_transaction_inner(&tx, tx_id)?;
    }
    tx.execute("DELETE FROM people WHERE id=?1", params![id])?;
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Debts

pub fn create_debt(
    conn: &mut Connection,
    person_id: &str,
    amount: Decimal,
    date: NaiveDate,
    description: Option<&str>,
) -> Result<Debt> {
    if amount == Decimal::ZERO {
        return Err(CoreError::validation("debt amount must be non-zero"));
    }
    let tx = conn.transaction()?;
    get_person(&tx, person_id)?;
    let id = new_id();
    tx.execute(
        "INSERT INTO debts(id, person_id, amount, date, description) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, person_id, amount.to_string(), date.to_string(), description],
    )?;
    recompute_debt_total(&tx, person_id)?;
    tx.commit()?;
    Ok(Debt {
        id,
        person_id: person_id.to_string(),
        amount,
        date,
        description: description.map(|s| s.to_string()),
        paid: false,
    })
}

pub fn get_debt(conn: &Connection, id: &str) -> Result<Debt> {
    let row: Option<(String, String, String, String, Option<String>, bool)> = conn
        .query_row(
            "SELECT id, person_id, amount, date, description, paid FROM debts WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                ))
            },
        )
        .optional()?;
    let (id, person_id, amount, date, description, paid) =
        row.ok_or_else(|| CoreError::not_found(format!("debt '{}'", id)))?;
    Ok(Debt {
        id,
        person_id,
        amount: parse_amount(&amount)?,
        date: parse_stored_date(&date)?,
        description,
        paid,
    })
}

pub fn list_debts(conn: &Connection, person_id: Option<&str>) -> Result<Vec<Debt>> {
    let mut sql = String::from(
        "SELECT id, person_id, amount, date, description, paid FROM debts WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(p) = person_id {
        sql.push_str(" AND person_id=?");
        params_vec.push(p.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let person_id: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let date: String = r.get(3)?;
        let description: Option<String> = r.get(4)?;
        let paid: bool = r.get(5)?;
        out.push(Debt {
            id,
            person_id,
            amount: parse_amount(&amount)?,
            date: parse_stored_date(&date)?,
            description,
            paid,
        });
    }
    Ok(out)
}

/// Cascades payments and their ledger transactions, then refolds the
/// person's total.
pub fn delete_debt(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    let debt = get_debt(&tx, id)?;
    let mut stmt = tx.prepare("SELECT transaction_id FROM payments WHERE debt_id=?1")?;
    let tx_ids: Vec<String> = stmt
        .query_map(params![id], |r| r.get::<_, String>(0))?
        .collect::<std::result::Result<_, _>>()?;
    drop(stmt);
    for tx_id in &tx_ids {
        ledger::delete_transaction_inner(&tx, tx_id)?;
    }
    tx.execute("DELETE FROM debts WHERE id=?1", params![id])?;
    recompute_debt_total(&tx, &debt.person_id)?;
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Payments

/// Settle part (or all) of an open debt. Creates the linked ledger
/// transaction, the immutable payment row, flips the debt to SETTLED once
/// covered, and refolds the person's total — one SQL transaction spanning
/// the ledger and the debt engine.
///
/// The payment's income/expense direction comes from the parent debt's
/// sign, fixed here and never rewritten: collecting what a person owes the
/// user is income, repaying what the user owes is an expense.
pub fn record_payment(
    conn: &mut Connection,
    debt_id: &str,
    amount: Decimal,
    account_id: &str,
    description: &str,
) -> Result<Payment> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation("payment amount must be positive"));
    }
    let tx = conn.transaction()?;
    let debt = get_debt(&tx, debt_id)?;
    if debt.paid {
        return Err(CoreError::validation(format!(
            "debt '{}' is already settled",
            debt_id
        )));
    }
    let direction: i32 = if debt.amount >= Decimal::ZERO { 1 } else { -1 };
    let signed = if direction == 1 { amount } else { -amount };
    let date = chrono::Utc::now().date_naive();
    let category_id = debt_category_id(&tx)?;

    let ledger_tx = ledger::insert_transaction(
        &tx,
        &NewTransaction {
            description: description.to_string(),
            amount: signed,
            date,
            account_id: Some(account_id.to_string()),
            card_id: None,
            category_id: Some(category_id),
            tags: Vec::new(),
        },
    )?;

    let id = new_id();
    tx.execute(
        "INSERT INTO payments(id, debt_id, transaction_id, date, amount, direction)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            debt_id,
            ledger_tx.id,
            date.to_string(),
            amount.to_string(),
            direction
        ],
    )?;

    if paid_magnitude(&tx, debt_id)? >= debt.amount.abs() {
        tx.execute(
            "UPDATE debts SET paid=1, dirty=1, rev=rev+1 WHERE id=?1",
            params![debt_id],
        )?;
    }
    recompute_debt_total(&tx, &debt.person_id)?;
    tx.commit()?;

    Ok(Payment {
        id,
        debt_id: debt_id.to_string(),
        transaction_id: ledger_tx.id,
        date,
        amount,
        direction,
    })
}

pub fn list_payments(conn: &Connection, debt_id: &str) -> Result<Vec<Payment>> {
    let mut stmt = conn.prepare(
        "SELECT id, debt_id, transaction_id, date, amount, direction
         FROM payments WHERE debt_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![debt_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let debt_id: String = r.get(1)?;
        let transaction_id: String = r.get(2)?;
        let date: String = r.get(3)?;
        let amount: String = r.get(4)?;
        let direction: i32 = r.get(5)?;
        out.push(Payment {
            id,
            debt_id,
            transaction_id,
            date: parse_stored_date(&date)?,
            amount: parse_amount(&amount)?,
            direction,
        });
    }
    Ok(out)
}
