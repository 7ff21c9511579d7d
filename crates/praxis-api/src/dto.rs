// SPDX-License-Identifier: Apache-2.0

use praxis_model::{Customization, ItemRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---- request bodies ----

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwoFaSetupRequest {
    pub email: String,
    pub code1: String,
    pub code2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwoFaLoginRequest {
    pub code: String,
}

/// Shared write shape for process create (POST), replace (PUT) and partial
/// update (PATCH). Item lists arrive as raw JSON and are validated
/// element-wise so a malformed entry yields a field-level error instead of
/// a blanket deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessWriteRequest {
    pub number: Option<i64>,
    pub name: Option<String>,
    pub status: Option<ClassificationDto>,
    pub stage: Option<ClassificationDto>,
    pub kanban_status: Option<String>,
    pub inputs: Option<Value>,
    pub tools: Option<Value>,
    pub outputs: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomizationUpsertRequest {
    pub process_id: i64,
    pub process_type: String,
    pub country_code: String,
    #[serde(default)]
    pub department_id: Option<i64>,
    pub inputs: Option<Value>,
    pub tools: Option<Value>,
    pub outputs: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkKanbanRequest {
    pub process_ids: Vec<i64>,
    pub kanban_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KanbanUpdateRequest {
    pub kanban_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentWriteRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskCreateRequest {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatchRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

// ---- response bodies ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationDto {
    pub name: String,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

fn default_bg_color() -> String {
    "bg-gray-500".to_string()
}

fn default_text_color() -> String {
    "text-white".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomizationDto {
    pub id: i64,
    pub process_id: i64,
    pub process_type: String,
    pub country_code: String,
    pub department_id: Option<i64>,
    pub inputs: Vec<ItemRef>,
    pub tools: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
    pub kanban_status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Read shape for a process. Unscoped reads carry the base lists plus the
/// full customization collection; scoped reads carry the resolved lists
/// and the customization that supplied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessDto {
    pub id: i64,
    pub number: i64,
    pub name: String,
    pub status: Option<ClassificationDto>,
    pub stage: Option<ClassificationDto>,
    pub kanban_status: String,
    pub inputs: Vec<ItemRef>,
    pub tools: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
    pub customizations: Vec<CustomizationDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_customization: Option<CustomizationDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkKanbanResponse {
    pub updated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessTokenResponse {
    pub access: String,
}

const _: fn() = || {
    fn assert_serializable<T: Serialize>() {}
    assert_serializable::<ProcessDto>();
    assert_serializable::<Customization>();
};
