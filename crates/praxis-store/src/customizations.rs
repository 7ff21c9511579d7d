use crate::rows::{decode_items, decode_kanban, decode_variant, encode_items};
use crate::StoreError;
use praxis_model::{CountryCode, Customization, ItemRef, KanbanState, ProcessRef};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Write-side payload for the upsert-by-scope path. The country code and
/// item lists arrive already validated; the store checks referential
/// integrity (owning process under the right variant, department).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertCustomization {
    pub process: ProcessRef,
    pub country: CountryCode,
    pub department_id: Option<i64>,
    pub inputs: Vec<ItemRef>,
    pub tools: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
}

const CUSTOMIZATION_COLUMNS: &str =
    "id, process_id, variant, country_code, department_id, inputs, tools, outputs, kanban_state, created_at, updated_at";

pub(crate) fn customization_from_row(row: &Row<'_>) -> rusqlite::Result<RawCustomization> {
    Ok(RawCustomization {
        id: row.get(0)?,
        process_id: row.get(1)?,
        variant: row.get(2)?,
        country_code: row.get(3)?,
        department_id: row.get(4)?,
        inputs: row.get(5)?,
        tools: row.get(6)?,
        outputs: row.get(7)?,
        kanban_state: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Column-level image of a customization row, decoded into the domain type
/// in a second step so JSON/enum decode failures map to [`StoreError::Data`]
/// instead of a sqlite error.
pub(crate) struct RawCustomization {
    id: i64,
    process_id: i64,
    variant: String,
    country_code: String,
    department_id: Option<i64>,
    inputs: String,
    tools: String,
    outputs: String,
    kanban_state: String,
    created_at: String,
    updated_at: String,
}

impl RawCustomization {
    pub(crate) fn decode(self) -> Result<Customization, StoreError> {
        Ok(Customization {
            id: self.id,
            process: ProcessRef {
                variant: decode_variant(&self.variant)?,
                id: self.process_id,
            },
            country: CountryCode::parse(&self.country_code)
                .map_err(|e| StoreError::Data(e.to_string()))?,
            department_id: self.department_id,
            inputs: decode_items("inputs", &self.inputs)?,
            tools: decode_items("tools", &self.tools)?,
            outputs: decode_items("outputs", &self.outputs)?,
            kanban_state: decode_kanban(&self.kanban_state)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) fn load_customizations_for_process(
    conn: &Connection,
    process_id: i64,
) -> Result<Vec<Customization>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CUSTOMIZATION_COLUMNS} FROM customizations
         WHERE process_id = ?1 ORDER BY updated_at DESC, id DESC"
    ))?;
    let raw = stmt
        .query_map(params![process_id], customization_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raw.into_iter().map(RawCustomization::decode).collect()
}

pub fn get_customization(conn: &Connection, id: i64) -> Result<Customization, StoreError> {
    let raw = conn
        .query_row(
            &format!("SELECT {CUSTOMIZATION_COLUMNS} FROM customizations WHERE id = ?1"),
            params![id],
            customization_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("customization {id}")))?;
    raw.decode()
}

/// Creates or replaces the unique customization for the payload's
/// (process, country, department) triple. The write is a single native
/// upsert targeting the partial unique index for the department shape, so
/// concurrent calls for one triple collapse to last-write-wins instead of
/// duplicating rows. Only the three item lists (and `updated_at`) are
/// replaced on conflict; the row's own `kanban_state` is an independent
/// axis and survives.
pub fn upsert_customization(
    conn: &Connection,
    payload: &UpsertCustomization,
) -> Result<Customization, StoreError> {
    let owner: Option<i64> = conn
        .query_row(
            "SELECT id FROM processes WHERE id = ?1 AND variant = ?2",
            params![payload.process.id, payload.process.variant.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    if owner.is_none() {
        return Err(StoreError::NotFound(format!(
            "process {}",
            payload.process
        )));
    }
    if let Some(dept) = payload.department_id {
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM departments WHERE id = ?1",
                params![dept],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(format!("department {dept}")));
        }
    }

    let inputs = encode_items("inputs", &payload.inputs)?;
    let tools = encode_items("tools", &payload.tools)?;
    let outputs = encode_items("outputs", &payload.outputs)?;

    let conflict_target = if payload.department_id.is_some() {
        "(process_id, country_code, department_id) WHERE department_id IS NOT NULL"
    } else {
        "(process_id, country_code) WHERE department_id IS NULL"
    };
    let sql = format!(
        "INSERT INTO customizations
           (process_id, variant, country_code, department_id, inputs, tools, outputs)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT {conflict_target} DO UPDATE SET
           inputs = excluded.inputs,
           tools = excluded.tools,
           outputs = excluded.outputs,
           updated_at = datetime('now')
         RETURNING id"
    );
    let id: i64 = conn.query_row(
        &sql,
        params![
            payload.process.id,
            payload.process.variant.as_str(),
            payload.country.as_str(),
            payload.department_id,
            inputs,
            tools,
            outputs
        ],
        |row| row.get(0),
    )?;
    get_customization(conn, id)
}

/// Single customization-scoped kanban transition.
pub fn update_customization_kanban(
    conn: &Connection,
    id: i64,
    state: KanbanState,
) -> Result<Customization, StoreError> {
    let changed = conn.execute(
        "UPDATE customizations SET kanban_state = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![state.as_str(), id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound(format!("customization {id}")));
    }
    get_customization(conn, id)
}
