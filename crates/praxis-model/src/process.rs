use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const PROCESS_NAME_MAX_LEN: usize = 255;
pub const ITEM_NAME_MAX_LEN: usize = 255;

/// Which of the two parallel taxonomies a process belongs to. The catalogs
/// are structurally identical; every shared code path is parameterized by
/// this tag instead of being duplicated per taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Pmbok,
    Scrum,
}

impl Variant {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "pmbok" => Ok(Self::Pmbok),
            "scrum" => Ok(Self::Scrum),
            other => Err(ValidationError(format!(
                "unknown process variant: {other} (expected pmbok or scrum)"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pmbok => "pmbok",
            Self::Scrum => "scrum",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow position on the Kanban board. Flat assignment: any state may
/// move to any other state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KanbanState {
    #[default]
    Unassigned,
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl KanbanState {
    pub const ALL: [Self; 6] = [
        Self::Unassigned,
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Done,
    ];

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "unassigned" => Ok(Self::Unassigned),
            "backlog" => Ok(Self::Backlog),
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "in_review" => Ok(Self::InReview),
            "done" => Ok(Self::Done),
            other => Err(ValidationError(format!("unknown kanban state: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::InReview => "in_review",
            Self::Done => "done",
        }
    }
}

impl Display for KanbanState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in an inputs/tools/outputs list. `link` is free-form display
/// metadata and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemRef {
    pub name: String,
    #[serde(default)]
    pub link: String,
}

impl ItemRef {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError("item name must not be empty".to_string()));
        }
        if name.len() > ITEM_NAME_MAX_LEN {
            return Err(ValidationError(format!(
                "item name exceeds max length {ITEM_NAME_MAX_LEN}"
            )));
        }
        Ok(Self {
            name,
            link: link.into(),
        })
    }
}

/// Validates a caller-supplied JSON value as an item list. Accepts only an
/// array of `{name, link}` objects; `link` may be absent. The field name is
/// threaded through so errors point at the offending list.
pub fn parse_item_list(field: &str, value: &Value) -> Result<Vec<ItemRef>, ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError(format!("{field} must be a list of {{name, link}} objects")))?;
    let mut out = Vec::with_capacity(items.len());
    for (idx, raw) in items.iter().enumerate() {
        let item: ItemRef = serde_json::from_value(raw.clone())
            .map_err(|e| ValidationError(format!("{field}[{idx}]: {e}")))?;
        out.push(ItemRef::new(item.name, item.link).map_err(|e| ValidationError(format!("{field}[{idx}]: {e}")))?);
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationKind {
    Status,
    Stage,
    Phase,
}

impl ClassificationKind {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "status" => Ok(Self::Status),
            "stage" => Ok(Self::Stage),
            "phase" => Ok(Self::Phase),
            other => Err(ValidationError(format!(
                "unknown classification kind: {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Stage => "stage",
            Self::Phase => "phase",
        }
    }

    /// The kind a variant's second classification slot carries: PMBOK
    /// processes pair a status with a stage, Scrum processes with a phase.
    #[must_use]
    pub const fn stage_kind_for(variant: Variant) -> Self {
        match variant {
            Variant::Pmbok => Self::Stage,
            Variant::Scrum => Self::Phase,
        }
    }
}

impl Display for ClassificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status/Stage/Phase row. The two color attributes are opaque display
/// strings, never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub id: i64,
    pub kind: ClassificationKind,
    pub name: String,
    pub bg_color: String,
    pub text_color: String,
}

/// A PMBOK or Scrum catalog entry with its ordered item lists and the
/// customization rows that scope it per country/department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: i64,
    pub variant: Variant,
    pub number: i64,
    pub name: String,
    pub status: Option<Classification>,
    pub stage: Option<Classification>,
    pub kanban_state: KanbanState,
    pub inputs: Vec<ItemRef>,
    pub tools: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
    pub customizations: Vec<crate::Customization>,
}
