use crate::StoreError;
use praxis_model::Account;
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        is_staff: row.get(4)?,
        is_superuser: row.get(5)?,
        is_active: row.get(6)?,
        two_fa_enabled: row.get(7)?,
        date_joined: row.get(8)?,
    })
}

const ACCOUNT_COLUMNS: &str =
    "id, email, first_name, last_name, is_staff, is_superuser, is_active, two_fa_enabled, date_joined";

pub fn create_account(conn: &Connection, new: &NewAccount) -> Result<Account, StoreError> {
    let id: i64 = conn.query_row(
        "INSERT INTO accounts (email, password_hash, first_name, last_name)
         VALUES (?1, ?2, ?3, ?4) RETURNING id",
        params![new.email, new.password_hash, new.first_name, new.last_name],
        |row| row.get(0),
    )?;
    get_account(conn, id)
}

pub fn get_account(conn: &Connection, id: i64) -> Result<Account, StoreError> {
    conn.query_row(
        &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
        params![id],
        account_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(format!("account {id}")))
}

/// Credential lookup: returns the account together with its stored
/// password hash. The hash stays inside the auth path and is never
/// serialized.
pub fn find_account_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<(Account, String)>, StoreError> {
    let found = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS}, password_hash FROM accounts WHERE email = ?1"),
            params![email],
            |row| Ok((account_from_row(row)?, row.get::<_, String>(9)?)),
        )
        .optional()?;
    Ok(found)
}

pub fn set_two_fa_enabled(conn: &Connection, email: &str) -> Result<Account, StoreError> {
    let changed = conn.execute(
        "UPDATE accounts SET two_fa_enabled = 1 WHERE email = ?1",
        params![email],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound(format!("account {email}")));
    }
    match find_account_by_email(conn, email)? {
        Some((account, _)) => Ok(account),
        None => Err(StoreError::NotFound(format!("account {email}"))),
    }
}
