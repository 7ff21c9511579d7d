use crate::classifications::{get_classification, get_or_create_classification, ClassificationSpec};
use crate::customizations::load_customizations_for_process;
use crate::rows::{decode_items, decode_kanban, encode_items};
use crate::StoreError;
use praxis_model::{
    Classification, ClassificationKind, ItemRef, KanbanState, Process, Variant,
};
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProcess {
    pub number: i64,
    pub name: String,
    pub status: Option<ClassificationSpec>,
    pub stage: Option<ClassificationSpec>,
    pub kanban_state: KanbanState,
    pub inputs: Vec<ItemRef>,
    pub tools: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
}

/// Partial update. Outer `Option` = field present in the request;
/// `status`/`stage` use a nested `Option` so a payload can clear the
/// reference (`null`) as well as replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessPatch {
    pub number: Option<i64>,
    pub name: Option<String>,
    pub status: Option<Option<ClassificationSpec>>,
    pub stage: Option<Option<ClassificationSpec>>,
    pub kanban_state: Option<KanbanState>,
    pub inputs: Option<Vec<ItemRef>>,
    pub tools: Option<Vec<ItemRef>>,
    pub outputs: Option<Vec<ItemRef>>,
}

fn resolve_refs(
    conn: &Connection,
    variant: Variant,
    status: &Option<ClassificationSpec>,
    stage: &Option<ClassificationSpec>,
) -> Result<(Option<i64>, Option<i64>), StoreError> {
    let status_id = match status {
        Some(spec) => Some(get_or_create_classification(conn, ClassificationKind::Status, spec)?.id),
        None => None,
    };
    let stage_id = match stage {
        Some(spec) => Some(
            get_or_create_classification(conn, ClassificationKind::stage_kind_for(variant), spec)?
                .id,
        ),
        None => None,
    };
    Ok((status_id, stage_id))
}

pub fn create_process(
    conn: &Connection,
    variant: Variant,
    new: &NewProcess,
) -> Result<Process, StoreError> {
    let (status_id, stage_id) = resolve_refs(conn, variant, &new.status, &new.stage)?;
    let id: i64 = conn.query_row(
        "INSERT INTO processes
           (variant, number, name, status_id, stage_id, kanban_state, inputs, tools, outputs)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         RETURNING id",
        params![
            variant.as_str(),
            new.number,
            new.name,
            status_id,
            stage_id,
            new.kanban_state.as_str(),
            encode_items("inputs", &new.inputs)?,
            encode_items("tools", &new.tools)?,
            encode_items("outputs", &new.outputs)?,
        ],
        |row| row.get(0),
    )?;
    get_process(conn, variant, id)
}

struct RawProcess {
    id: i64,
    number: i64,
    name: String,
    status_id: Option<i64>,
    stage_id: Option<i64>,
    kanban_state: String,
    inputs: String,
    tools: String,
    outputs: String,
}

fn raw_to_process(
    conn: &Connection,
    variant: Variant,
    raw: RawProcess,
) -> Result<Process, StoreError> {
    let status = lookup_ref(conn, raw.status_id)?;
    let stage = lookup_ref(conn, raw.stage_id)?;
    Ok(Process {
        id: raw.id,
        variant,
        number: raw.number,
        name: raw.name,
        status,
        stage,
        kanban_state: decode_kanban(&raw.kanban_state)?,
        inputs: decode_items("inputs", &raw.inputs)?,
        tools: decode_items("tools", &raw.tools)?,
        outputs: decode_items("outputs", &raw.outputs)?,
        customizations: load_customizations_for_process(conn, raw.id)?,
    })
}

fn lookup_ref(conn: &Connection, id: Option<i64>) -> Result<Option<Classification>, StoreError> {
    match id {
        Some(id) => get_classification(conn, id),
        None => Ok(None),
    }
}

const PROCESS_COLUMNS: &str =
    "id, number, name, status_id, stage_id, kanban_state, inputs, tools, outputs";

pub fn get_process(conn: &Connection, variant: Variant, id: i64) -> Result<Process, StoreError> {
    let raw = conn
        .query_row(
            &format!("SELECT {PROCESS_COLUMNS} FROM processes WHERE id = ?1 AND variant = ?2"),
            params![id, variant.as_str()],
            |row| {
                Ok(RawProcess {
                    id: row.get(0)?,
                    number: row.get(1)?,
                    name: row.get(2)?,
                    status_id: row.get(3)?,
                    stage_id: row.get(4)?,
                    kanban_state: row.get(5)?,
                    inputs: row.get(6)?,
                    tools: row.get(7)?,
                    outputs: row.get(8)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("{variant} process {id}")))?;
    raw_to_process(conn, variant, raw)
}

/// Lists a variant's catalog, always ascending by process number.
pub fn list_processes(conn: &Connection, variant: Variant) -> Result<Vec<Process>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROCESS_COLUMNS} FROM processes WHERE variant = ?1 ORDER BY number ASC"
    ))?;
    let raws = stmt
        .query_map(params![variant.as_str()], |row| {
            Ok(RawProcess {
                id: row.get(0)?,
                number: row.get(1)?,
                name: row.get(2)?,
                status_id: row.get(3)?,
                stage_id: row.get(4)?,
                kanban_state: row.get(5)?,
                inputs: row.get(6)?,
                tools: row.get(7)?,
                outputs: row.get(8)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter()
        .map(|raw| raw_to_process(conn, variant, raw))
        .collect()
}

pub fn update_process(
    conn: &Connection,
    variant: Variant,
    id: i64,
    patch: &ProcessPatch,
) -> Result<Process, StoreError> {
    // Existence check first so an unknown id is NotFound, not a no-op.
    let current = get_process(conn, variant, id)?;

    let number = patch.number.unwrap_or(current.number);
    let name = patch.name.clone().unwrap_or(current.name);
    let kanban = patch.kanban_state.unwrap_or(current.kanban_state);
    let inputs = patch.inputs.clone().unwrap_or(current.inputs);
    let tools = patch.tools.clone().unwrap_or(current.tools);
    let outputs = patch.outputs.clone().unwrap_or(current.outputs);

    let status_id = match &patch.status {
        None => current.status.map(|c| c.id),
        Some(None) => None,
        Some(Some(spec)) => {
            Some(get_or_create_classification(conn, ClassificationKind::Status, spec)?.id)
        }
    };
    let stage_id = match &patch.stage {
        None => current.stage.map(|c| c.id),
        Some(None) => None,
        Some(Some(spec)) => Some(
            get_or_create_classification(conn, ClassificationKind::stage_kind_for(variant), spec)?
                .id,
        ),
    };

    conn.execute(
        "UPDATE processes SET
           number = ?1, name = ?2, status_id = ?3, stage_id = ?4,
           kanban_state = ?5, inputs = ?6, tools = ?7, outputs = ?8
         WHERE id = ?9 AND variant = ?10",
        params![
            number,
            name,
            status_id,
            stage_id,
            kanban.as_str(),
            encode_items("inputs", &inputs)?,
            encode_items("tools", &tools)?,
            encode_items("outputs", &outputs)?,
            id,
            variant.as_str(),
        ],
    )?;
    get_process(conn, variant, id)
}

/// Deleting a process cascades to its customizations via the foreign key.
pub fn delete_process(conn: &Connection, variant: Variant, id: i64) -> Result<(), StoreError> {
    let changed = conn.execute(
        "DELETE FROM processes WHERE id = ?1 AND variant = ?2",
        params![id, variant.as_str()],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound(format!("{variant} process {id}")));
    }
    Ok(())
}

/// Bulk kanban transition: every matching process row of the variant AND every
/// customization owned by those processes is overwritten to the target
/// state in one transaction. Ids with no matching row are silently
/// skipped. Returns the number of process rows that matched.
pub fn bulk_update_kanban(
    conn: &mut Connection,
    variant: Variant,
    ids: &[i64],
    state: KanbanState,
) -> Result<usize, StoreError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let tx = conn.transaction()?;
    let state_str = state.as_str();
    let variant_str = variant.as_str();

    let sql = format!(
        "UPDATE customizations SET kanban_state = ?1, updated_at = datetime('now')
         WHERE variant = ?2 AND process_id IN ({placeholders})"
    );
    let mut bind: Vec<&dyn rusqlite::types::ToSql> = vec![&state_str, &variant_str];
    for id in ids {
        bind.push(id);
    }
    tx.execute(&sql, bind.as_slice())?;

    let sql = format!(
        "UPDATE processes SET kanban_state = ?1
         WHERE variant = ?2 AND id IN ({placeholders})"
    );
    let matched = tx.execute(&sql, bind.as_slice())?;

    tx.commit()?;
    Ok(matched)
}
