// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Cached sum of the amounts of all transactions referencing this
    /// account. Adjusted in the same SQL transaction as every write.
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub credit_limit: Decimal,
    pub available: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(CoreError::validation(format!(
                "invalid category kind '{}', expected income|expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub kind: CategoryKind,
    pub protected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Signed: positive is income, negative is expense.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub account_id: Option<String>,
    pub card_id: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Cached signed sum of the outstanding remainders of this person's
    /// unpaid debts. Positive means the person owes the user.
    pub debt_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub person_id: String,
    /// Signed: positive means the person owes the user, negative means the
    /// user owes the person.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub paid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub debt_id: String,
    pub transaction_id: String,
    pub date: NaiveDate,
    /// Positive magnitude of the settlement.
    pub amount: Decimal,
    /// +1 when the linked transaction is income for the user, -1 when it is
    /// an expense. Fixed at payment time from the parent debt's sign.
    pub direction: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub done: bool,
}

/// Parse a monetary TEXT column back into a `Decimal`. Amounts are written
/// by this crate, so a parse failure means the store was tampered with.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| CoreError::Constraint(format!("invalid stored amount '{}'", s)))
}

pub(crate) fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CoreError::Constraint(format!("invalid stored date '{}'", s)))
}
