// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Billfold", "billfold"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("billfold.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    ensure_schema(&mut conn)?;
    Ok(conn)
}

/// Create every table, index, trigger and seed row if absent. Safe to call
/// on every startup; columns can be added later without destroying rows.
///
/// Each synced table carries `dirty` (row changed since last acknowledged
/// push) and `rev` (bumped on every write, checked before the dirty flag is
/// cleared so a concurrent re-dirty is never lost).
pub fn ensure_schema(conn: &mut Connection) -> Result<(), crate::error::CoreError> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        balance TEXT NOT NULL DEFAULT '0',
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS cards(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        credit_limit TEXT NOT NULL,
        available TEXT NOT NULL,
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        icon TEXT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        protected INTEGER NOT NULL DEFAULT 0,
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        account_id TEXT,
        card_id TEXT,
        category_id TEXT,
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE SET NULL,
        FOREIGN KEY(card_id) REFERENCES cards(id) ON DELETE SET NULL,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS tags(
        id TEXT PRIMARY KEY,
        label TEXT NOT NULL UNIQUE,
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS transaction_tags(
        transaction_id TEXT NOT NULL,
        tag_id TEXT NOT NULL,
        PRIMARY KEY(transaction_id, tag_id),
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE,
        FOREIGN KEY(tag_id) REFERENCES tags(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS people(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        debt_total TEXT NOT NULL DEFAULT '0',
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS debts(
        id TEXT PRIMARY KEY,
        person_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT,
        paid INTEGER NOT NULL DEFAULT 0,
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(person_id) REFERENCES people(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS payments(
        id TEXT PRIMARY KEY,
        debt_id TEXT NOT NULL,
        transaction_id TEXT NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        direction INTEGER NOT NULL,
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(debt_id) REFERENCES debts(id) ON DELETE CASCADE,
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS reminders(
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        date TEXT NOT NULL,
        done INTEGER NOT NULL DEFAULT 0,
        dirty INTEGER NOT NULL DEFAULT 1,
        rev INTEGER NOT NULL DEFAULT 0
    );
    "#,
    )?;

    // Seed categories ship pre-acknowledged (dirty = 0); every mirror gets
    // the same fixed ids.
    conn.execute_batch(
        r#"
    INSERT OR IGNORE INTO categories(id, name, icon, kind, protected, dirty)
    VALUES
        ('cat-1', 'Salary', 'briefcase', 'income', 1, 0),
        ('cat-2', 'Food', 'food', 'expense', 1, 0),
        ('cat-3', 'Transport', 'bus', 'expense', 1, 0),
        ('cat-4', 'Entertainment', 'movie', 'expense', 1, 0),
        ('cat-5', 'Utilities', 'flash', 'expense', 1, 0),
        ('cat-6', 'Education', 'school', 'expense', 1, 0),
        ('cat-7', 'Other Income', 'cash-plus', 'income', 1, 0),
        ('cat-8', 'Other Expense', 'cash-minus', 'expense', 1, 0),
        ('cat-9', 'Debt Payments', 'account-cash', 'expense', 1, 0);
    "#,
    )?;

    conn.execute_batch(
        r#"
    CREATE TRIGGER IF NOT EXISTS guard_protected_categories
    BEFORE DELETE ON categories
    WHEN OLD.protected = 1
    BEGIN
        SELECT RAISE(ABORT, 'cannot delete a protected category');
    END;
    "#,
    )?;
    Ok(())
}
