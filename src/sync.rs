// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Outbound mirror: every dirty row is upserted to a remote document store
//! keyed by its local id, and marked clean only after the remote
//! acknowledges. The local store is authoritative; nothing is ever pulled
//! back.

use rusqlite::{params, Connection};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::models::{
    parse_amount, parse_stored_date, Account, Card, Category, CategoryKind, Debt, Payment,
    Person, Reminder, Tag, Transaction,
};

const UA: &str = concat!(
    "billfold/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/billfold)"
);

/// One collection per local table, one document per row, id-keyed upserts.
/// Any document store with idempotent writes satisfies this.
pub trait RemoteStore {
    fn upsert(&self, collection: &str, id: &str, doc: &Value) -> Result<()>;
}

pub struct HttpRemote {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(UA)
            .build()
            .map_err(|e| CoreError::sync(format!("build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl RemoteStore for HttpRemote {
    fn upsert(&self, collection: &str, id: &str, doc: &Value) -> Result<()> {
        let url = format!("{}/{}/{}", self.base_url, collection, id);
        self.client
            .put(&url)
            .json(doc)
            .send()
            .map_err(|e| CoreError::sync(e.to_string()))?
            .error_for_status()
            .map_err(|e| CoreError::sync(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub collection: String,
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub pushed: usize,
    pub failures: Vec<SyncFailure>,
}

pub const SYNCED_TABLES: [&str; 9] = [
    "accounts",
    "cards",
    "categories",
    "transactions",
    "tags",
    "people",
    "debts",
    "payments",
    "reminders",
];

struct PendingRow {
    id: String,
    rev: i64,
    doc: Value,
}

/// Push every dirty row. A failed upsert is recorded and skipped, never
/// fatal to the batch; the row stays dirty for the next pass. The dirty
/// flag is cleared only when the row's `rev` still matches the one read
/// here, so a write that lands mid-push keeps the row queued.
pub fn push_pending(conn: &Connection, remote: &dyn RemoteStore) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    for table in SYNCED_TABLES {
        for row in pending_rows(conn, table)? {
            match remote.upsert(table, &row.id, &row.doc) {
                Ok(()) => {
                    conn.execute(
                        &format!("UPDATE {} SET dirty=0 WHERE id=?1 AND rev=?2", table),
                        params![row.id, row.rev],
                    )?;
                    report.pushed += 1;
                }
                Err(e) => report.failures.push(SyncFailure {
                    collection: table.to_string(),
                    id: row.id,
                    reason: e.to_string(),
                }),
            }
        }
    }
    Ok(report)
}

fn doc<T: Serialize>(model: &T) -> Result<Value> {
    serde_json::to_value(model).map_err(|e| CoreError::sync(e.to_string()))
}

fn pending_rows(conn: &Connection, table: &str) -> Result<Vec<PendingRow>> {
    match table {
        "accounts" => {
            let mut stmt =
                conn.prepare("SELECT id, name, balance, rev FROM accounts WHERE dirty=1")?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Account {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    balance: parse_amount(&r.get::<_, String>(2)?)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(3)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        "cards" => {
            let mut stmt = conn
                .prepare("SELECT id, name, credit_limit, available, rev FROM cards WHERE dirty=1")?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Card {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    credit_limit: parse_amount(&r.get::<_, String>(2)?)?,
                    available: parse_amount(&r.get::<_, String>(3)?)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(4)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        "categories" => {
            let mut stmt = conn.prepare(
                "SELECT id, name, icon, kind, protected, rev FROM categories WHERE dirty=1",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Category {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    icon: r.get(2)?,
                    kind: CategoryKind::parse(&r.get::<_, String>(3)?)?,
                    protected: r.get(4)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(5)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        "transactions" => {
            let mut stmt = conn.prepare(
                "SELECT id, description, amount, date, account_id, card_id, category_id, rev
                 FROM transactions WHERE dirty=1",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Transaction {
                    id: r.get(0)?,
                    description: r.get(1)?,
                    amount: parse_amount(&r.get::<_, String>(2)?)?,
                    date: parse_stored_date(&r.get::<_, String>(3)?)?,
                    account_id: r.get(4)?,
                    card_id: r.get(5)?,
                    category_id: r.get(6)?,
                };
                let rev: i64 = r.get(7)?;
                // The join table is not mirrored on its own; the document
                // carries the tag ids instead.
                let mut value = doc(&model)?;
                let tags = crate::ledger::tag_ids_for_transaction(conn, &model.id)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("tags".to_string(), serde_json::json!(tags));
                }
                out.push(PendingRow {
                    id: model.id,
                    rev,
                    doc: value,
                });
            }
            Ok(out)
        }
        "tags" => {
            let mut stmt = conn.prepare("SELECT id, label, rev FROM tags WHERE dirty=1")?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Tag {
                    id: r.get(0)?,
                    label: r.get(1)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(2)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        "people" => {
            let mut stmt =
                conn.prepare("SELECT id, name, debt_total, rev FROM people WHERE dirty=1")?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Person {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    debt_total: parse_amount(&r.get::<_, String>(2)?)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(3)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        "debts" => {
            let mut stmt = conn.prepare(
                "SELECT id, person_id, amount, date, description, paid, rev
                 FROM debts WHERE dirty=1",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Debt {
                    id: r.get(0)?,
                    person_id: r.get(1)?,
                    amount: parse_amount(&r.get::<_, String>(2)?)?,
                    date: parse_stored_date(&r.get::<_, String>(3)?)?,
                    description: r.get(4)?,
                    paid: r.get(5)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(6)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        "payments" => {
            let mut stmt = conn.prepare(
                "SELECT id, debt_id, transaction_id, date, amount, direction, rev
                 FROM payments WHERE dirty=1",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Payment {
                    id: r.get(0)?,
                    debt_id: r.get(1)?,
                    transaction_id: r.get(2)?,
                    date: parse_stored_date(&r.get::<_, String>(3)?)?,
                    amount: parse_amount(&r.get::<_, String>(4)?)?,
                    direction: r.get(5)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(6)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        "reminders" => {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, date, done, rev FROM reminders WHERE dirty=1",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(r) = rows.next()? {
                let model = Reminder {
                    id: r.get(0)?,
                    title: r.get(1)?,
                    description: r.get(2)?,
                    date: parse_stored_date(&r.get::<_, String>(3)?)?,
                    done: r.get(4)?,
                };
                out.push(PendingRow {
                    id: model.id.clone(),
                    rev: r.get(5)?,
                    doc: doc(&model)?,
                });
            }
            Ok(out)
        }
        other => Err(CoreError::sync(format!("unknown synced table '{}'", other))),
    }
}
