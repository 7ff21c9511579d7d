use serde::{Deserialize, Serialize};

/// Node in the department tree. Deleting a department deletes its entire
/// subtree; customizations referencing a deleted department fall back to
/// no-department scope instead of being removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub color: String,
}
