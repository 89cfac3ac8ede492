// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::models::{
    parse_amount, parse_stored_date, Account, Card, Category, CategoryKind, Reminder, Tag,
    Transaction,
};
use crate::utils::new_id;

fn require_nonempty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_row(conn: &Connection, table: &str, label: &str, id: &str) -> Result<()> {
    let mut stmt = conn.prepare(&format!("SELECT 1 FROM {} WHERE id=?1", table))?;
    let found: Option<i32> = stmt.query_row(params![id], |r| r.get(0)).optional()?;
    if found.is_none() {
        return Err(CoreError::not_found(format!("{} '{}'", label, id)));
    }
    Ok(())
}

/// Single audited adjustment point for the denormalized account balance.
/// Always called inside the same SQL transaction as the write that moved
/// money, so readers never see the ledger and the cache disagree.
fn adjust_account_balance(conn: &Connection, account_id: &str, delta: Decimal) -> Result<()> {
    let bal: Option<String> = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .optional()?;
    let bal = bal.ok_or_else(|| CoreError::not_found(format!("account '{}'", account_id)))?;
    let next = parse_amount(&bal)? + delta;
    conn.execute(
        "UPDATE accounts SET balance=?1, dirty=1, rev=rev+1 WHERE id=?2",
        params![next.to_string(), account_id],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Accounts

pub fn create_account(conn: &Connection, name: &str) -> Result<Account> {
    require_nonempty("account name", name)?;
    let id = new_id();
    conn.execute(
        "INSERT INTO accounts(id, name, balance) VALUES (?1, ?2, '0')",
        params![id, name],
    )?;
    Ok(Account {
        id,
        name: name.to_string(),
        balance: Decimal::ZERO,
    })
}

pub fn get_account(conn: &Connection, id: &str) -> Result<Account> {
    let row: Option<(String, String, String)> = conn
        .query_row(
            "SELECT id, name, balance FROM accounts WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let (id, name, balance) = row.ok_or_else(|| CoreError::not_found(format!("account '{}'", id)))?;
    Ok(Account {
        id,
        name,
        balance: parse_amount(&balance)?,
    })
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, balance FROM accounts ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, balance) = row?;
        out.push(Account {
            id,
            name,
            balance: parse_amount(&balance)?,
        });
    }
    Ok(out)
}

pub fn rename_account(conn: &Connection, id: &str, name: &str) -> Result<()> {
    require_nonempty("account name", name)?;
    let n = conn.execute(
        "UPDATE accounts SET name=?1, dirty=1, rev=rev+1 WHERE id=?2",
        params![name, id],
    )?;
    if n == 0 {
        return Err(CoreError::not_found(format!("account '{}'", id)));
    }
    Ok(())
}

/// Transactions that referenced the account keep existing with the
/// reference cleared; they re-enter the sync queue since their row changed.
pub fn delete_account(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE transactions SET account_id=NULL, dirty=1, rev=rev+1 WHERE account_id=?1",
        params![id],
    )?;
    let n = tx.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(CoreError::not_found(format!("account '{}'", id)));
    }
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Cards

pub fn create_card(
    conn: &Connection,
    name: &str,
    credit_limit: Decimal,
    available: Decimal,
) -> Result<Card> {
    require_nonempty("card name", name)?;
    if available > credit_limit {
        return Err(CoreError::validation(format!(
            "available {} exceeds credit limit {}",
            available, credit_limit
        )));
    }
    let id = new_id();
    conn.execute(
        "INSERT INTO cards(id, name, credit_limit, available) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, credit_limit.to_string(), available.to_string()],
    )?;
    Ok(Card {
        id,
        name: name.to_string(),
        credit_limit,
        available,
    })
}

pub fn list_cards(conn: &Connection) -> Result<Vec<Card>> {
    let mut stmt =
        conn.prepare("SELECT id, name, credit_limit, available FROM cards ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, limit, avail) = row?;
        out.push(Card {
            id,
            name,
            credit_limit: parse_amount(&limit)?,
            available: parse_amount(&avail)?,
        });
    }
    Ok(out)
}

pub fn update_card(
    conn: &Connection,
    id: &str,
    name: &str,
    credit_limit: Decimal,
    available: Decimal,
) -> Result<()> {
    require_nonempty("card name", name)?;
    if available > credit_limit {
        return Err(CoreError::validation(format!(
            "available {} exceeds credit limit {}",
            available, credit_limit
        )));
    }
    let n = conn.execute(
        "UPDATE cards SET name=?1, credit_limit=?2, available=?3, dirty=1, rev=rev+1 WHERE id=?4",
        params![name, credit_limit.to_string(), available.to_string(), id],
    )?;
    if n == 0 {
        return Err(CoreError::not_found(format!("card '{}'", id)));
    }
    Ok(())
}

pub fn delete_card(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE transactions SET card_id=NULL, dirty=1, rev=rev+1 WHERE card_id=?1",
        params![id],
    )?;
    let n = tx.execute("DELETE FROM cards WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(CoreError::not_found(format!("card '{}'", id)));
    }
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories

pub fn create_category(
    conn: &Connection,
    name: &str,
    icon: Option<&str>,
    kind: CategoryKind,
) -> Result<Category> {
    require_nonempty("category name", name)?;
    let id = new_id();
    conn.execute(
        "INSERT INTO categories(id, name, icon, kind) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, icon, kind.as_str()],
    )?;
    Ok(Category {
        id,
        name: name.to_string(),
        icon: icon.map(|s| s.to_string()),
        kind,
        protected: false,
    })
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, icon, kind, protected FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, bool>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, icon, kind, protected) = row?;
        out.push(Category {
            id,
            name,
            icon,
            kind: CategoryKind::parse(&kind)?,
            protected,
        });
    }
    Ok(out)
}

/// Deleting a protected seed category trips the schema trigger and surfaces
/// as `CoreError::Constraint`; nothing is modified in that case.
pub fn delete_category(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE transactions SET category_id=NULL, dirty=1, rev=rev+1 WHERE category_id=?1",
        params![id],
    )?;
    let n = tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(CoreError::not_found(format!("category '{}'", id)));
    }
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tags

pub fn create_tag(conn: &Connection, label: &str) -> Result<Tag> {
    require_nonempty("tag label", label)?;
    let id = new_id();
    conn.execute(
        "INSERT INTO tags(id, label) VALUES (?1, ?2)",
        params![id, label],
    )?;
    Ok(Tag {
        id,
        label: label.to_string(),
    })
}

pub fn list_tags(conn: &Connection) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare("SELECT id, label FROM tags ORDER BY label")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        let (id, label) = row?;
        out.push(Tag { id, label });
    }
    Ok(out)
}

pub fn delete_tag(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    // The mirrored transaction documents embed their tag list, so dropping
    // a tag re-queues every transaction that carried it.
    tx.execute(
        "UPDATE transactions SET dirty=1, rev=rev+1
         WHERE id IN (SELECT transaction_id FROM transaction_tags WHERE tag_id=?1)",
        params![id],
    )?;
    let n = tx.execute("DELETE FROM tags WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(CoreError::not_found(format!("tag '{}'", id)));
    }
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reminders

pub fn create_reminder(
    conn: &Connection,
    title: &str,
    description: Option<&str>,
    date: NaiveDate,
) -> Result<Reminder> {
    require_nonempty("reminder title", title)?;
    let id = new_id();
    conn.execute(
        "INSERT INTO reminders(id, title, description, date) VALUES (?1, ?2, ?3, ?4)",
        params![id, title, description, date.to_string()],
    )?;
    Ok(Reminder {
        id,
        title: title.to_string(),
        description: description.map(|s| s.to_string()),
        date,
        done: false,
    })
}

pub fn list_reminders(conn: &Connection) -> Result<Vec<Reminder>> {
    let mut stmt =
        conn.prepare("SELECT id, title, description, date, done FROM reminders ORDER BY date")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, bool>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, title, description, date, done) = row?;
        out.push(Reminder {
            id,
            title,
            description,
            date: parse_stored_date(&date)?,
            done,
        });
    }
    Ok(out)
}

pub fn complete_reminder(conn: &Connection, id: &str) -> Result<()> {
    let n = conn.execute(
        "UPDATE reminders SET done=1, dirty=1, rev=rev+1 WHERE id=?1",
        params![id],
    )?;
    if n == 0 {
        return Err(CoreError::not_found(format!("reminder '{}'", id)));
    }
    Ok(())
}

pub fn delete_reminder(conn: &Connection, id: &str) -> Result<()> {
    let n = conn.execute("DELETE FROM reminders WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(CoreError::not_found(format!("reminder '{}'", id)));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transactions

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub account_id: Option<String>,
    pub card_id: Option<String>,
    pub category_id: Option<String>,
    /// Tag ids to link; each must already exist.
    pub tags: Vec<String>,
}

/// Full-replacement update, mirroring the edit form: every field is written,
/// tag links are left untouched.
#[derive(Debug, Clone)]
pub struct TransactionUpdate {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub account_id: Option<String>,
    pub card_id: Option<String>,
    pub category_id: Option<String>,
}

fn check_refs(
    conn: &Connection,
    account_id: Option<&str>,
    card_id: Option<&str>,
    category_id: Option<&str>,
) -> Result<()> {
    if let Some(a) = account_id {
        require_row(conn, "accounts", "account", a)?;
    }
    if let Some(c) = card_id {
        require_row(conn, "cards", "card", c)?;
    }
    if let Some(c) = category_id {
        require_row(conn, "categories", "category", c)?;
    }
    Ok(())
}

/// Raw insert + balance adjustment, no transaction boundary of its own.
/// Callers that compose larger units (debt payments) run this inside theirs.
pub(crate) fn insert_transaction(conn: &Connection, new: &NewTransaction) -> Result<Transaction> {
    require_nonempty("transaction description", &new.description)?;
    check_refs(
        conn,
        new.account_id.as_deref(),
        new.card_id.as_deref(),
        new.category_id.as_deref(),
    )?;
    let id = new_id();
    conn.execute(
        "INSERT INTO transactions(id, description, amount, date, account_id, card_id, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            new.description,
            new.amount.to_string(),
            new.date.to_string(),
            new.account_id,
            new.card_id,
            new.category_id
        ],
    )?;
    for tag_id in &new.tags {
        require_row(conn, "tags", "tag", tag_id)?;
        conn.execute(
            "INSERT OR IGNORE INTO transaction_tags(transaction_id, tag_id) VALUES (?1, ?2)",
            params![id, tag_id],
        )?;
    }
    if let Some(account_id) = &new.account_id {
        adjust_account_balance(conn, account_id, new.amount)?;
    }
    Ok(Transaction {
        id,
        description: new.description.clone(),
        amount: new.amount,
        date: new.date,
        account_id: new.account_id.clone(),
        card_id: new.card_id.clone(),
        category_id: new.category_id.clone(),
    })
}

pub fn record_transaction(conn: &mut Connection, new: &NewTransaction) -> Result<Transaction> {
    let tx = conn.transaction()?;
    let recorded = insert_transaction(&tx, new)?;
    tx.commit()?;
    Ok(recorded)
}

pub fn get_transaction(conn: &Connection, id: &str) -> Result<Transaction> {
    let row: Option<(
        String,
        String,
        String,
        String,
        Option<String>,
        Option<String>,
        Option<String>,
    )> = conn
        .query_row(
            "SELECT id, description, amount, date, account_id, card_id, category_id
             FROM transactions WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .optional()?;
    let (id, description, amount, date, account_id, card_id, category_id) =
        row.ok_or_else(|| CoreError::not_found(format!("transaction '{}'", id)))?;
    Ok(Transaction {
        id,
        description,
        amount: parse_amount(&amount)?,
        date: parse_stored_date(&date)?,
        account_id,
        card_id,
        category_id,
    })
}

/// Reverse the old amount on the old account, write the new fields, apply
/// the new amount on the new account. One SQL transaction end to end, so a
/// crash or concurrent reader never sees a half-moved balance.
pub fn update_transaction(conn: &mut Connection, id: &str, up: &TransactionUpdate) -> Result<()> {
    require_nonempty("transaction description", &up.description)?;
    let tx = conn.transaction()?;
    let old = get_transaction(&tx, id)?;
    check_refs(
        &tx,
        up.account_id.as_deref(),
        up.card_id.as_deref(),
        up.category_id.as_deref(),
    )?;
    if let Some(account_id) = &old.account_id {
        adjust_account_balance(&tx, account_id, -old.amount)?;
    }
    tx.execute(
        "UPDATE transactions SET description=?1, amount=?2, date=?3, account_id=?4, card_id=?5,
         category_id=?6, dirty=1, rev=rev+1 WHERE id=?7",
        params![
            up.description,
            up.amount.to_string(),
            up.date.to_string(),
            up.account_id,
            up.card_id,
            up.category_id,
            id
        ],
    )?;
    if let Some(account_id) = &up.account_id {
        adjust_account_balance(&tx, account_id, up.amount)?;
    }
    tx.commit()?;
    Ok(())
}

/// Shared by `delete_transaction` and the debt engine's cascades; assumes
/// the caller holds the transaction boundary.
pub(crate) fn delete_transaction_inner(conn: &Connection, id: &str) -> Result<()> {
    let old = get_transaction(conn, id)?;
    if let Some(account_id) = &old.account_id {
        adjust_account_balance(conn, account_id, -old.amount)?;
    }
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

pub fn delete_transaction(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    // Payments hanging off this transaction cascade away with it; the
    // owning people need their totals refolded afterwards.
    let mut stmt = tx.prepare(
        "SELECT DISTINCT d.person_id FROM payments p JOIN debts d ON p.debt_id=d.id
         WHERE p.transaction_id=?1",
    )?;
    let people: Vec<String> = stmt
        .query_map(params![id], |r| r.get::<_, String>(0))?
        .collect::<std::result::Result<_, _>>()?;
    drop(stmt);
    delete_transaction_inner(&tx, id)?;
    for person_id in &people {
        crate::debts::recompute_debt_total(&tx, person_id)?;
    }
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Listing

#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    /// YYYY-MM
    pub month: Option<String>,
    pub account_id: Option<String>,
    pub card_id: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
}

/// One joined row shape for every transaction listing (screen, export,
/// JSON); callers never re-join per call site.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub account: String,
    pub card: String,
    pub category: String,
    pub tags: String,
}

fn query_transaction_rows(
    conn: &Connection,
    filter: &TxFilter,
    page: Option<(usize, usize)>,
) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.description, t.amount, a.name, cd.name, c.name
         FROM transactions t
         LEFT JOIN accounts a ON t.account_id=a.id
         LEFT JOIN cards cd ON t.card_id=cd.id
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(month) = &filter.month {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.clone());
    }
    if let Some(account_id) = &filter.account_id {
        sql.push_str(" AND t.account_id=?");
        params_vec.push(account_id.clone());
    }
    if let Some(card_id) = &filter.card_id {
        sql.push_str(" AND t.card_id=?");
        params_vec.push(card_id.clone());
    }
    if let Some(category_id) = &filter.category_id {
        sql.push_str(" AND t.category_id=?");
        params_vec.push(category_id.clone());
    }
    if let Some(tag_id) = &filter.tag_id {
        sql.push_str(
            " AND t.id IN (SELECT transaction_id FROM transaction_tags WHERE tag_id=?)",
        );
        params_vec.push(tag_id.clone());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some((page, page_size)) = page {
        sql.push_str(&format!(" LIMIT {} OFFSET {}", page_size, page * page_size));
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let date: String = r.get(1)?;
        let description: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let account: Option<String> = r.get(4)?;
        let card: Option<String> = r.get(5)?;
        let category: Option<String> = r.get(6)?;
        data.push(TransactionRow {
            id,
            date,
            description,
            amount,
            account: account.unwrap_or_default(),
            card: card.unwrap_or_default(),
            category: category.unwrap_or_default(),
            tags: String::new(),
        });
    }
    for row in &mut data {
        let mut tstmt = conn.prepare(
            "SELECT g.label FROM tags g
             JOIN transaction_tags tt ON g.id=tt.tag_id
             WHERE tt.transaction_id=?1 ORDER BY g.label",
        )?;
        let labels: Vec<String> = tstmt
            .query_map(params![row.id], |r| r.get::<_, String>(0))?
            .collect::<std::result::Result<_, _>>()?;
        row.tags = labels.join(",");
    }
    Ok(data)
}

/// Newest first, `LIMIT page_size OFFSET page * page_size`. Offset paging
/// over the date ordering can drift slightly under concurrent inserts,
/// which the callers tolerate.
pub fn list_transactions_paged(
    conn: &Connection,
    filter: &TxFilter,
    page: usize,
    page_size: usize,
) -> Result<Vec<TransactionRow>> {
    query_transaction_rows(conn, filter, Some((page, page_size)))
}

pub fn list_transactions(conn: &Connection, filter: &TxFilter) -> Result<Vec<TransactionRow>> {
    query_transaction_rows(conn, filter, None)
}

pub fn tag_ids_for_transaction(conn: &Connection, transaction_id: &str) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT tag_id FROM transaction_tags WHERE transaction_id=?1 ORDER BY tag_id")?;
    let ids: Vec<String> = stmt
        .query_map(params![transaction_id], |r| r.get::<_, String>(0))?
        .collect::<std::result::Result<_, _>>()?;
    Ok(ids)
}
