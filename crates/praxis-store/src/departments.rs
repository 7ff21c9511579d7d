use crate::StoreError;
use praxis_model::Department;
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
    pub parent_id: Option<i64>,
    pub color: String,
}

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
        color: row.get(3)?,
    })
}

pub fn create_department(conn: &Connection, new: &NewDepartment) -> Result<Department, StoreError> {
    if let Some(parent) = new.parent_id {
        if get_department(conn, parent).is_err() {
            return Err(StoreError::NotFound(format!("department {parent}")));
        }
    }
    let id: i64 = conn.query_row(
        "INSERT INTO departments (name, parent_id, color) VALUES (?1, ?2, ?3) RETURNING id",
        params![new.name, new.parent_id, new.color],
        |row| row.get(0),
    )?;
    get_department(conn, id)
}

pub fn get_department(conn: &Connection, id: i64) -> Result<Department, StoreError> {
    conn.query_row(
        "SELECT id, name, parent_id, color FROM departments WHERE id = ?1",
        params![id],
        department_from_row,
    )
    .optional()?
    .ok_or_else(|| StoreError::NotFound(format!("department {id}")))
}

pub fn list_departments(conn: &Connection) -> Result<Vec<Department>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, name, parent_id, color FROM departments ORDER BY name ASC")?;
    let rows = stmt
        .query_map([], department_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn update_department(
    conn: &Connection,
    id: i64,
    new: &NewDepartment,
) -> Result<Department, StoreError> {
    // A department must not become its own ancestor; the one-level check
    // against self covers the reparent-to-self footgun without walking the
    // whole tree.
    if new.parent_id == Some(id) {
        return Err(StoreError::Invalid(praxis_model::ValidationError(
            "department cannot be its own parent".to_string(),
        )));
    }
    if let Some(parent) = new.parent_id {
        if get_department(conn, parent).is_err() {
            return Err(StoreError::NotFound(format!("department {parent}")));
        }
    }
    let changed = conn.execute(
        "UPDATE departments SET name = ?1, parent_id = ?2, color = ?3 WHERE id = ?4",
        params![new.name, new.parent_id, new.color, id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound(format!("department {id}")));
    }
    get_department(conn, id)
}

/// Tree-delete: children go with the parent via the self-referential
/// cascade. Customizations pointing at any deleted node fall back to
/// no-department scope (SET NULL), they are not removed. The exception is
/// when a country-wide row for the same (process, country) already exists:
/// the cleared reference would collide with the partial unique index, so
/// the narrower row is dropped along with the scope that defined it.
pub fn delete_department(conn: &mut Connection, id: i64) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    let exists: Option<i64> = tx
        .query_row(
            "SELECT id FROM departments WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::NotFound(format!("department {id}")));
    }
    tx.execute(
        "WITH RECURSIVE subtree(did) AS (
           SELECT id FROM departments WHERE id = ?1
           UNION ALL
           SELECT d.id FROM departments d JOIN subtree s ON d.parent_id = s.did
         )
         DELETE FROM customizations
         WHERE department_id IN (SELECT did FROM subtree)
           AND EXISTS (
             SELECT 1 FROM customizations c2
             WHERE c2.process_id = customizations.process_id
               AND c2.country_code = customizations.country_code
               AND c2.department_id IS NULL
           )",
        params![id],
    )?;
    tx.execute("DELETE FROM departments WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(())
}
