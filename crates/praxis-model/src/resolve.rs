use crate::customization::{Customization, Scope};
use crate::process::{ItemRef, Process};

/// Effective item lists after applying a scope to a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveItto {
    pub inputs: Vec<ItemRef>,
    pub tools: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
}

/// Selects the customization a scope resolves to. Priority: the exact
/// (country, department) row, then the country-wide row (no department).
/// Country codes are normalized uppercase at parse time, so equality here
/// is already case-insensitive from the caller's point of view.
#[must_use]
pub fn match_customization<'a>(
    customizations: &'a [Customization],
    scope: &Scope,
) -> Option<&'a Customization> {
    if scope.department_id.is_some() {
        let exact = customizations
            .iter()
            .find(|c| c.country == scope.country && c.department_id == scope.department_id);
        if exact.is_some() {
            return exact;
        }
    }
    customizations
        .iter()
        .find(|c| c.country == scope.country && c.department_id.is_none())
}

fn override_list(base: &[ItemRef], custom: &[ItemRef]) -> Vec<ItemRef> {
    if custom.is_empty() {
        base.to_vec()
    } else {
        custom.to_vec()
    }
}

/// Field-level sparse override: each of the three lists is taken from the
/// matching customization only when non-empty there; an empty customization
/// list leaves the base list visible. The base `kanban_state` is never
/// merged; the matched customization is handed back so its independent
/// state stays observable.
#[must_use]
pub fn resolve_effective<'a>(
    process: &'a Process,
    scope: &Scope,
) -> (EffectiveItto, Option<&'a Customization>) {
    match match_customization(&process.customizations, scope) {
        Some(custom) => (
            EffectiveItto {
                inputs: override_list(&process.inputs, &custom.inputs),
                tools: override_list(&process.tools, &custom.tools),
                outputs: override_list(&process.outputs, &custom.outputs),
            },
            Some(custom),
        ),
        None => (
            EffectiveItto {
                inputs: process.inputs.clone(),
                tools: process.tools.clone(),
                outputs: process.outputs.clone(),
            },
            None,
        ),
    }
}
