use crate::StoreError;
use praxis_model::Task;
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn create_task(conn: &Connection, new: &NewTask) -> Result<Task, StoreError> {
    let id: i64 = conn.query_row(
        "INSERT INTO tasks (title, completed) VALUES (?1, ?2) RETURNING id",
        params![new.title, new.completed],
        |row| row.get(0),
    )?;
    get_task(conn, id)
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Task, StoreError> {
    conn.query_row(
        "SELECT id, title, completed, created_at FROM tasks WHERE id = ?1",
        params![id],
        task_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(format!("task {id}")))
}

pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, title, completed, created_at FROM tasks ORDER BY id ASC")?;
    let rows = stmt
        .query_map([], task_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn update_task(conn: &Connection, id: i64, patch: &TaskPatch) -> Result<Task, StoreError> {
    let current = get_task(conn, id)?;
    let title = patch.title.clone().unwrap_or(current.title);
    let completed = patch.completed.unwrap_or(current.completed);
    conn.execute(
        "UPDATE tasks SET title = ?1, completed = ?2 WHERE id = ?3",
        params![title, completed, id],
    )?;
    get_task(conn, id)
}

pub fn delete_task(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound(format!("task {id}")));
    }
    Ok(())
}
