// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only rollups computed from the ledger on demand. Nothing here is
//! cached or mutated; expenses are always reported as positive magnitudes.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::parse_amount;

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRollup {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income and expense per calendar month, oldest first. Months come from
/// the transaction dates themselves, never stored separately.
pub fn monthly_rollup(conn: &Connection) -> Result<Vec<MonthlyRollup>> {
    let mut stmt = conn.prepare("SELECT substr(date,1,7), amount FROM transactions")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        let (month, amount) = row?;
        let amount = parse_amount(&amount)?;
        let entry = map.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        if amount > Decimal::ZERO {
            entry.0 += amount;
        } else {
            entry.1 += -amount;
        }
    }
    Ok(map
        .into_iter()
        .map(|(month, (income, expense))| MonthlyRollup {
            month,
            income,
            expense,
        })
        .collect())
}

/// Net total per category for one month. Transactions without a category
/// are excluded, matching the inner join the source screens used.
pub fn category_breakdown(conn: &Connection, month: &str) -> Result<Vec<CategoryTotal>> {
    let mut stmt = conn.prepare(
        "SELECT c.name, t.amount FROM transactions t
         JOIN categories c ON t.category_id=c.id
         WHERE substr(t.date,1,7)=?1",
    )?;
    let rows = stmt.query_map(params![month], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        let (category, amount) = row?;
        *map.entry(category).or_insert(Decimal::ZERO) += parse_amount(&amount)?;
    }
    Ok(map
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect())
}

/// Total income and expense, optionally restricted to dates on or after
/// `since`.
pub fn summary(conn: &Connection, since: Option<NaiveDate>) -> Result<Summary> {
    let mut sql = String::from("SELECT amount FROM transactions");
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(d) = since {
        sql.push_str(" WHERE date >= ?");
        params_vec.push(d.to_string());
    }
    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let rows = stmt.query_map(rusqlite::params_from_iter(params), |r| {
        r.get::<_, String>(0)
    })?;
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for row in rows {
        let amount = parse_amount(&row?)?;
        if amount >= Decimal::ZERO {
            income += amount;
        } else {
            expense += -amount;
        }
    }
    Ok(Summary { income, expense })
}

/// Distinct months with at least one transaction, ascending.
pub fn months(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT substr(date,1,7) AS m FROM transactions ORDER BY m")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceDrift {
    pub name: String,
    pub cached: Decimal,
    pub computed: Decimal,
}

/// Accounts whose cached balance disagrees with the transaction sum, used
/// by the doctor command. Empty means the cache invariant holds.
pub fn balance_audit(conn: &Connection) -> Result<Vec<BalanceDrift>> {
    let mut out = Vec::new();
    for account in crate::ledger::list_accounts(conn)? {
        let mut stmt =
            conn.prepare("SELECT amount FROM transactions WHERE account_id=?1")?;
        let rows = stmt.query_map(params![account.id], |r| r.get::<_, String>(0))?;
        let mut computed = Decimal::ZERO;
        for row in rows {
            computed += parse_amount(&row?)?;
        }
        if computed != account.balance {
            out.push(BalanceDrift {
                name: account.name,
                cached: account.balance,
                computed,
            });
        }
    }
    Ok(out)
}

/// People whose cached debt total disagrees with the fold over their unpaid
/// debts.
pub fn debt_audit(conn: &Connection) -> Result<Vec<BalanceDrift>> {
    let mut out = Vec::new();
    for person in crate::debts::list_people(conn)? {
        let mut computed = Decimal::ZERO;
        for debt in crate::debts::list_debts(conn, Some(&person.id))? {
            if !debt.paid {
                computed += crate::debts::outstanding(conn, &debt)?;
            }
        }
        if computed != person.debt_total {
            out.push(BalanceDrift {
                name: person.name,
                cached: person.debt_total,
                computed,
            });
        }
    }
    Ok(out)
}
