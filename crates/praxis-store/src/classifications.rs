use crate::StoreError;
use praxis_model::{Classification, ClassificationKind};
use rusqlite::{params, Connection, OptionalExtension};

/// Write-side shape for a classification reference carried inline on a
/// process payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationSpec {
    pub name: String,
    pub bg_color: String,
    pub text_color: String,
}

/// Finds the (kind, name) row, refreshing its colors, or creates it.
/// Classification rows are presentational master data; the process write
/// path is the only thing that materializes them.
pub fn get_or_create_classification(
    conn: &Connection,
    kind: ClassificationKind,
    spec: &ClassificationSpec,
) -> Result<Classification, StoreError> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM classifications WHERE kind = ?1 AND name = ?2",
            params![kind.as_str(), spec.name],
            |row| row.get(0),
        )
        .optional()?;
    let id = match existing {
        Some(id) => {
            conn.execute(
                "UPDATE classifications SET bg_color = ?1, text_color = ?2 WHERE id = ?3",
                params![spec.bg_color, spec.text_color, id],
            )?;
            id
        }
        None => conn.query_row(
            "INSERT INTO classifications (kind, name, bg_color, text_color)
             VALUES (?1, ?2, ?3, ?4) RETURNING id",
            params![kind.as_str(), spec.name, spec.bg_color, spec.text_color],
            |row| row.get(0),
        )?,
    };
    Ok(Classification {
        id,
        kind,
        name: spec.name.clone(),
        bg_color: spec.bg_color.clone(),
        text_color: spec.text_color.clone(),
    })
}

pub(crate) fn get_classification(
    conn: &Connection,
    id: i64,
) -> Result<Option<Classification>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, kind, name, bg_color, text_color FROM classifications WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    match row {
        None => Ok(None),
        Some((id, kind, name, bg_color, text_color)) => Ok(Some(Classification {
            id,
            kind: ClassificationKind::parse(&kind).map_err(|e| StoreError::Data(e.to_string()))?,
            name,
            bg_color,
            text_color,
        })),
    }
}
