// SPDX-License-Identifier: Apache-2.0

use crate::dto::{ClassificationDto, CustomizationDto, ProcessDto};
use praxis_model::{resolve_effective, Classification, Customization, Process, Scope};

fn classification_to_dto(classification: &Classification) -> ClassificationDto {
    ClassificationDto {
        name: classification.name.clone(),
        bg_color: classification.bg_color.clone(),
        text_color: classification.text_color.clone(),
    }
}

#[must_use]
pub fn customization_to_dto(customization: &Customization) -> CustomizationDto {
    CustomizationDto {
        id: customization.id,
        process_id: customization.process.id,
        process_type: customization.process.variant.as_str().to_string(),
        country_code: customization.country.as_str().to_string(),
        department_id: customization.department_id,
        inputs: customization.inputs.clone(),
        tools: customization.tools.clone(),
        outputs: customization.outputs.clone(),
        kanban_status: customization.kanban_state.as_str().to_string(),
        created_at: customization.created_at.clone(),
        updated_at: customization.updated_at.clone(),
    }
}

/// Projects a process for the wire. With a scope, the item lists are the
/// resolved effective lists and the customization
/// that supplied them rides along; without one, the base lists and the
/// full customization collection are returned as-is.
#[must_use]
pub fn process_to_dto(process: &Process, scope: Option<&Scope>) -> ProcessDto {
    let (inputs, tools, outputs, active) = match scope {
        Some(scope) => {
            let (effective, active) = resolve_effective(process, scope);
            (
                effective.inputs,
                effective.tools,
                effective.outputs,
                active.map(customization_to_dto),
            )
        }
        None => (
            process.inputs.clone(),
            process.tools.clone(),
            process.outputs.clone(),
            None,
        ),
    };
    ProcessDto {
        id: process.id,
        number: process.number,
        name: process.name.clone(),
        status: process.status.as_ref().map(classification_to_dto),
        stage: process.stage.as_ref().map(classification_to_dto),
        kanban_status: process.kanban_state.as_str().to_string(),
        inputs,
        tools,
        outputs,
        customizations: process.customizations.iter().map(customization_to_dto).collect(),
        active_customization: active,
    }
}
