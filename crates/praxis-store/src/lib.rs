#![forbid(unsafe_code)]
//! SQLite persistence layer. All functions are synchronous and take a
//! borrowed [`rusqlite::Connection`]; the caller owns connection lifecycle
//! and locking.

use praxis_model::ValidationError;
use std::fmt::{Display, Formatter};

mod accounts;
mod classifications;
mod customizations;
mod departments;
mod processes;
mod rows;
mod schema;
mod tasks;

pub use accounts::{create_account, find_account_by_email, get_account, set_two_fa_enabled, NewAccount};
pub use classifications::{get_or_create_classification, ClassificationSpec};
pub use customizations::{
    get_customization, update_customization_kanban, upsert_customization, UpsertCustomization,
};
pub use departments::{
    create_department, delete_department, get_department, list_departments, update_department,
    NewDepartment,
};
pub use processes::{
    bulk_update_kanban, create_process, delete_process, get_process, list_processes,
    update_process, NewProcess, ProcessPatch,
};
pub use schema::{init_schema, open, SCHEMA_VERSION};
pub use tasks::{create_task, delete_task, get_task, list_tasks, update_task, NewTask, TaskPatch};

#[derive(Debug)]
pub enum StoreError {
    /// Referenced row does not exist (or exists under the other variant).
    NotFound(String),
    /// Uniqueness violation surfaced by the storage engine.
    Conflict(String),
    /// Domain validation rejected the payload before any write.
    Invalid(ValidationError),
    /// A stored value failed to decode (corrupt JSON column or enum text).
    Data(String),
    Sqlite(rusqlite::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
            Self::Invalid(err) => write!(f, "invalid: {err}"),
            Self::Data(msg) => write!(f, "bad stored data: {msg}"),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(msg.clone().unwrap_or_else(|| code.to_string()))
            }
            _ => Self::Sqlite(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}
