use crate::StoreError;
use rusqlite::Connection;
use std::path::Path;

pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS classifications (
  id INTEGER PRIMARY KEY,
  kind TEXT NOT NULL CHECK (kind IN ('status','stage','phase')),
  name TEXT NOT NULL,
  bg_color TEXT NOT NULL DEFAULT 'bg-gray-500',
  text_color TEXT NOT NULL DEFAULT 'text-white',
  UNIQUE (kind, name)
);

CREATE TABLE IF NOT EXISTS departments (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL UNIQUE,
  parent_id INTEGER REFERENCES departments(id) ON DELETE CASCADE,
  color TEXT NOT NULL DEFAULT 'border-gray-500'
);

CREATE TABLE IF NOT EXISTS processes (
  id INTEGER PRIMARY KEY,
  variant TEXT NOT NULL CHECK (variant IN ('pmbok','scrum')),
  number INTEGER NOT NULL,
  name TEXT NOT NULL,
  status_id INTEGER REFERENCES classifications(id) ON DELETE SET NULL,
  stage_id INTEGER REFERENCES classifications(id) ON DELETE SET NULL,
  kanban_state TEXT NOT NULL DEFAULT 'unassigned',
  inputs TEXT NOT NULL DEFAULT '[]',
  tools TEXT NOT NULL DEFAULT '[]',
  outputs TEXT NOT NULL DEFAULT '[]',
  UNIQUE (variant, number)
);

CREATE TABLE IF NOT EXISTS customizations (
  id INTEGER PRIMARY KEY,
  process_id INTEGER NOT NULL REFERENCES processes(id) ON DELETE CASCADE,
  variant TEXT NOT NULL CHECK (variant IN ('pmbok','scrum')),
  country_code TEXT NOT NULL,
  department_id INTEGER REFERENCES departments(id) ON DELETE SET NULL,
  inputs TEXT NOT NULL DEFAULT '[]',
  tools TEXT NOT NULL DEFAULT '[]',
  outputs TEXT NOT NULL DEFAULT '[]',
  kanban_state TEXT NOT NULL DEFAULT 'unassigned',
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- SQLite treats NULLs as distinct in plain unique indexes, so the
-- (process, country, department) triple needs one partial index per
-- department shape to stay unique. Upserts target these indexes.
CREATE UNIQUE INDEX IF NOT EXISTS idx_customizations_scope
  ON customizations(process_id, country_code, department_id)
  WHERE department_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_customizations_scope_no_dept
  ON customizations(process_id, country_code)
  WHERE department_id IS NULL;
CREATE INDEX IF NOT EXISTS idx_customizations_process ON customizations(process_id);

CREATE TABLE IF NOT EXISTS accounts (
  id INTEGER PRIMARY KEY,
  email TEXT NOT NULL UNIQUE,
  password_hash TEXT NOT NULL,
  first_name TEXT NOT NULL DEFAULT '',
  last_name TEXT NOT NULL DEFAULT '',
  is_staff INTEGER NOT NULL DEFAULT 0,
  is_superuser INTEGER NOT NULL DEFAULT 0,
  is_active INTEGER NOT NULL DEFAULT 1,
  two_fa_enabled INTEGER NOT NULL DEFAULT 0,
  date_joined TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS tasks (
  id INTEGER PRIMARY KEY,
  title TEXT NOT NULL,
  completed INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

/// Creates the schema on a fresh database and stamps `user_version`.
/// Foreign keys are per-connection state in SQLite, so this also flips the
/// pragma on for the connection it is given.
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    conn.execute_batch(SCHEMA)?;
    conn.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))?;
    Ok(())
}

/// Opens (creating if needed) the catalog database with the pragmas the
/// server runs under and the schema applied.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         PRAGMA busy_timeout=5000;",
    )?;
    init_schema(&conn)?;
    Ok(conn)
}
