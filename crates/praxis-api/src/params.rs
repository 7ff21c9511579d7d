// SPDX-License-Identifier: Apache-2.0

use crate::dto::{
    BulkKanbanRequest, CustomizationUpsertRequest, DepartmentWriteRequest, KanbanUpdateRequest,
    ProcessWriteRequest, RegisterRequest,
};
use crate::errors::ApiError;
use praxis_model::{
    parse_item_list, CountryCode, ItemRef, KanbanState, ProcessRef, Scope, Variant,
    PROCESS_NAME_MAX_LEN,
};
use praxis_store::{ClassificationSpec, NewDepartment, NewProcess, ProcessPatch, UpsertCustomization};
use serde_json::Value;
use std::collections::HashMap;

pub const PASSWORD_MIN_LEN: usize = 8;

const DEFAULT_DEPARTMENT_COLOR: &str = "border-gray-500";

/// Reads the optional (country, department) scope off a query string.
/// A department filter without a country is rejected: the scope key is the
/// pair, and a department alone selects nothing.
pub fn parse_scope_query(query: &HashMap<String, String>) -> Result<Option<Scope>, ApiError> {
    let country = match query.get("country") {
        Some(raw) => Some(CountryCode::parse(raw).map_err(|_| ApiError::invalid_param("country", raw))?),
        None => None,
    };
    let department_id = match query.get("department") {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::invalid_param("department", raw))?,
        ),
        None => None,
    };
    match (country, department_id) {
        (Some(country), department_id) => Ok(Some(Scope {
            country,
            department_id,
        })),
        (None, Some(_)) => Err(ApiError::invalid_param(
            "department",
            "department scope requires a country",
        )),
        (None, None) => Ok(None),
    }
}

pub fn parse_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation_failed("email", "must be a valid email address"));
    }
    if req.password.len() < PASSWORD_MIN_LEN {
        return Err(ApiError::validation_failed(
            "password",
            format!("must be at least {PASSWORD_MIN_LEN} characters"),
        ));
    }
    if req.password != req.password2 {
        return Err(ApiError::validation_failed("password", "passwords do not match"));
    }
    Ok(())
}

fn parse_lists(
    inputs: &Option<Value>,
    tools: &Option<Value>,
    outputs: &Option<Value>,
) -> Result<(Option<Vec<ItemRef>>, Option<Vec<ItemRef>>, Option<Vec<ItemRef>>), ApiError> {
    let parse = |field: &str, value: &Option<Value>| -> Result<Option<Vec<ItemRef>>, ApiError> {
        match value {
            Some(raw) => parse_item_list(field, raw)
                .map(Some)
                .map_err(|e| ApiError::validation_failed(field, e.to_string())),
            None => Ok(None),
        }
    };
    Ok((
        parse("inputs", inputs)?,
        parse("tools", tools)?,
        parse("outputs", outputs)?,
    ))
}

fn parse_kanban_field(raw: &Option<String>) -> Result<Option<KanbanState>, ApiError> {
    match raw {
        Some(value) => KanbanState::parse(value)
            .map(Some)
            .map_err(|e| ApiError::validation_failed("kanban_status", e.to_string())),
        None => Ok(None),
    }
}

fn classification_spec(dto: &crate::dto::ClassificationDto) -> Result<ClassificationSpec, ApiError> {
    if dto.name.trim().is_empty() {
        return Err(ApiError::validation_failed("status", "name must not be empty"));
    }
    Ok(ClassificationSpec {
        name: dto.name.clone(),
        bg_color: dto.bg_color.clone(),
        text_color: dto.text_color.clone(),
    })
}

fn require_name(name: &Option<String>) -> Result<String, ApiError> {
    let name = name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::validation_failed("name", "is required"))?;
    if name.len() > PROCESS_NAME_MAX_LEN {
        return Err(ApiError::validation_failed(
            "name",
            format!("must be at most {PROCESS_NAME_MAX_LEN} characters"),
        ));
    }
    Ok(name)
}

pub fn parse_process_create(req: &ProcessWriteRequest) -> Result<NewProcess, ApiError> {
    let number = req
        .number
        .ok_or_else(|| ApiError::validation_failed("number", "is required"))?;
    let name = require_name(&req.name)?;
    let (inputs, tools, outputs) = parse_lists(&req.inputs, &req.tools, &req.outputs)?;
    Ok(NewProcess {
        number,
        name,
        status: req.status.as_ref().map(classification_spec).transpose()?,
        stage: req.stage.as_ref().map(classification_spec).transpose()?,
        kanban_state: parse_kanban_field(&req.kanban_status)?.unwrap_or_default(),
        inputs: inputs.unwrap_or_default(),
        tools: tools.unwrap_or_default(),
        outputs: outputs.unwrap_or_default(),
    })
}

/// PUT is a whole-record replace: required identity fields, absent
/// classification refs cleared, absent lists emptied. PATCH touches only
/// the fields present in the payload.
pub fn parse_process_patch(req: &ProcessWriteRequest, full: bool) -> Result<ProcessPatch, ApiError> {
    let (inputs, tools, outputs) = parse_lists(&req.inputs, &req.tools, &req.outputs)?;
    let status = req.status.as_ref().map(classification_spec).transpose()?;
    let stage = req.stage.as_ref().map(classification_spec).transpose()?;
    if full {
        let number = req
            .number
            .ok_or_else(|| ApiError::validation_failed("number", "is required"))?;
        let name = require_name(&req.name)?;
        Ok(ProcessPatch {
            number: Some(number),
            name: Some(name),
            status: Some(status),
            stage: Some(stage),
            kanban_state: parse_kanban_field(&req.kanban_status)?,
            inputs: Some(inputs.unwrap_or_default()),
            tools: Some(tools.unwrap_or_default()),
            outputs: Some(outputs.unwrap_or_default()),
        })
    } else {
        let name = match &req.name {
            Some(_) => Some(require_name(&req.name)?),
            None => None,
        };
        Ok(ProcessPatch {
            number: req.number,
            name,
            status: status.map(Some),
            stage: stage.map(Some),
            kanban_state: parse_kanban_field(&req.kanban_status)?,
            inputs,
            tools,
            outputs,
        })
    }
}

pub fn parse_upsert_request(req: &CustomizationUpsertRequest) -> Result<UpsertCustomization, ApiError> {
    let variant = Variant::parse(&req.process_type)
        .map_err(|e| ApiError::validation_failed("process_type", e.to_string()))?;
    let country = CountryCode::parse(&req.country_code)
        .map_err(|e| ApiError::validation_failed("country_code", e.to_string()))?;
    let (inputs, tools, outputs) = parse_lists(&req.inputs, &req.tools, &req.outputs)?;
    Ok(UpsertCustomization {
        process: ProcessRef {
            variant,
            id: req.process_id,
        },
        country,
        department_id: req.department_id,
        inputs: inputs.unwrap_or_default(),
        tools: tools.unwrap_or_default(),
        outputs: outputs.unwrap_or_default(),
    })
}

pub fn parse_bulk_request(req: &BulkKanbanRequest) -> Result<(Vec<i64>, KanbanState), ApiError> {
    let state = KanbanState::parse(&req.kanban_status)
        .map_err(|e| ApiError::validation_failed("kanban_status", e.to_string()))?;
    Ok((req.process_ids.clone(), state))
}

pub fn parse_kanban_update(req: &KanbanUpdateRequest) -> Result<KanbanState, ApiError> {
    KanbanState::parse(&req.kanban_status)
        .map_err(|e| ApiError::validation_failed("kanban_status", e.to_string()))
}

pub fn parse_department_write(req: &DepartmentWriteRequest) -> Result<NewDepartment, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::validation_failed("name", "must not be empty"));
    }
    Ok(NewDepartment {
        name: req.name.clone(),
        parent_id: req.parent_id,
        color: req
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_DEPARTMENT_COLOR.to_string()),
    })
}
