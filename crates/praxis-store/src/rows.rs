use crate::StoreError;
use praxis_model::{ItemRef, KanbanState, Variant};

pub(crate) fn decode_items(column: &str, raw: &str) -> Result<Vec<ItemRef>, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Data(format!("{column}: {e}")))
}

pub(crate) fn encode_items(column: &str, items: &[ItemRef]) -> Result<String, StoreError> {
    serde_json::to_string(items).map_err(|e| StoreError::Data(format!("{column}: {e}")))
}

pub(crate) fn decode_kanban(raw: &str) -> Result<KanbanState, StoreError> {
    KanbanState::parse(raw).map_err(|e| StoreError::Data(e.to_string()))
}

pub(crate) fn decode_variant(raw: &str) -> Result<Variant, StoreError> {
    Variant::parse(raw).map_err(|e| StoreError::Data(e.to_string()))
}
