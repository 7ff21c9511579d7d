use serde::{Deserialize, Serialize};

// Leftover generic to-do feature; unrelated to the process catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
}
