use crate::process::{ItemRef, KanbanState, ValidationError, Variant};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Two-letter country code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct CountryCode(String);

impl CountryCode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError(format!(
                "country_code must be exactly 2 letters, got {input:?}"
            )));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for CountryCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the single process a customization belongs to. Carrying the
/// variant tag alongside the id makes "exactly one owner" structural: there
/// is no way to point at both taxonomies at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessRef {
    pub variant: Variant,
    pub id: i64,
}

impl Display for ProcessRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.variant, self.id)
    }
}

/// The (country, department) pair a read is scoped by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub country: CountryCode,
    pub department_id: Option<i64>,
}

/// Per-scope override row. Item lists follow the field-level sparse
/// override rule on read; `kanban_state` is an independent axis, never
/// merged from the base process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub id: i64,
    pub process: ProcessRef,
    pub country: CountryCode,
    pub department_id: Option<i64>,
    pub inputs: Vec<ItemRef>,
    pub tools: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
    pub kanban_state: KanbanState,
    pub created_at: String,
    pub updated_at: String,
}
