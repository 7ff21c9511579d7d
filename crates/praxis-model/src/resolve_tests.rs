use super::*;
use serde_json::json;

fn item(name: &str) -> ItemRef {
    ItemRef::new(name, "").expect("item")
}

fn customization(id: i64, country: &str, department_id: Option<i64>) -> Customization {
    Customization {
        id,
        process: ProcessRef {
            variant: Variant::Pmbok,
            id: 1,
        },
        country: CountryCode::parse(country).expect("country"),
        department_id,
        inputs: Vec::new(),
        tools: Vec::new(),
        outputs: Vec::new(),
        kanban_state: KanbanState::Unassigned,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn base_process(customizations: Vec<Customization>) -> Process {
    Process {
        id: 1,
        variant: Variant::Pmbok,
        number: 1,
        name: "Develop Charter".to_string(),
        status: None,
        stage: None,
        kanban_state: KanbanState::Backlog,
        inputs: vec![item("Business Case")],
        tools: vec![item("Expert Judgment")],
        outputs: vec![item("Project Charter")],
        customizations,
    }
}

fn scope(country: &str, department_id: Option<i64>) -> Scope {
    Scope {
        country: CountryCode::parse(country).expect("country"),
        department_id,
    }
}

#[test]
fn no_match_returns_base_lists_unmodified() {
    let process = base_process(vec![customization(10, "US", None)]);
    let (effective, active) = resolve_effective(&process, &scope("CO", None));
    assert!(active.is_none());
    assert_eq!(effective.inputs, process.inputs);
    assert_eq!(effective.tools, process.tools);
    assert_eq!(effective.outputs, process.outputs);
}

#[test]
fn empty_customization_list_does_not_hide_base_list() {
    let mut custom = customization(10, "CO", None);
    custom.tools = vec![item("Local Workshop")];
    let process = base_process(vec![custom]);

    let (effective, active) = resolve_effective(&process, &scope("CO", None));
    assert_eq!(active.map(|c| c.id), Some(10));
    // inputs empty on the customization: base stays visible
    assert_eq!(effective.inputs, vec![item("Business Case")]);
    // tools non-empty on the customization: overridden
    assert_eq!(effective.tools, vec![item("Local Workshop")]);
    assert_eq!(effective.outputs, vec![item("Project Charter")]);
}

#[test]
fn department_scope_prefers_exact_row_over_country_wide() {
    let mut country_wide = customization(10, "CO", None);
    country_wide.inputs = vec![item("Country Input")];
    let mut dept_scoped = customization(11, "CO", Some(3));
    dept_scoped.inputs = vec![item("Dept Input")];
    let process = base_process(vec![country_wide, dept_scoped]);

    let (effective, active) = resolve_effective(&process, &scope("CO", Some(3)));
    assert_eq!(active.map(|c| c.id), Some(11));
    assert_eq!(effective.inputs, vec![item("Dept Input")]);
}

#[test]
fn department_scope_falls_back_to_country_wide_row() {
    let mut country_wide = customization(10, "CO", None);
    country_wide.inputs = vec![item("Country Input")];
    let process = base_process(vec![country_wide]);

    let (effective, active) = resolve_effective(&process, &scope("CO", Some(99)));
    assert_eq!(active.map(|c| c.id), Some(10));
    assert_eq!(effective.inputs, vec![item("Country Input")]);
}

#[test]
fn base_kanban_state_is_never_merged() {
    let mut custom = customization(10, "CO", None);
    custom.kanban_state = KanbanState::Done;
    let process = base_process(vec![custom]);

    let (_, active) = resolve_effective(&process, &scope("CO", None));
    assert_eq!(active.map(|c| c.kanban_state), Some(KanbanState::Done));
    assert_eq!(process.kanban_state, KanbanState::Backlog);
}

#[test]
fn country_code_normalizes_and_rejects_bad_input() {
    assert_eq!(CountryCode::parse("co").expect("parse").as_str(), "CO");
    assert_eq!(CountryCode::parse(" us ").expect("parse").as_str(), "US");
    assert!(CountryCode::parse("COL").is_err());
    assert!(CountryCode::parse("C").is_err());
    assert!(CountryCode::parse("C1").is_err());
    assert!(CountryCode::parse("").is_err());
}

#[test]
fn kanban_state_parses_all_six_values_and_rejects_others() {
    for state in KanbanState::ALL {
        assert_eq!(KanbanState::parse(state.as_str()).expect("parse"), state);
    }
    assert!(KanbanState::parse("archived").is_err());
    assert!(KanbanState::parse("").is_err());
}

#[test]
fn item_list_parsing_accepts_missing_link_and_rejects_malformed_entries() {
    let items = parse_item_list(
        "inputs",
        &json!([{"name": "Business Case"}, {"name": "Charter", "link": "https://x"}]),
    )
    .expect("valid list");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].link, "");
    assert_eq!(items[1].link, "https://x");

    assert!(parse_item_list("inputs", &json!({"name": "x"})).is_err());
    assert!(parse_item_list("inputs", &json!([{"link": "only"}])).is_err());
    assert!(parse_item_list("inputs", &json!([{"name": ""}])).is_err());
    assert!(parse_item_list("inputs", &json!([{"name": "x", "extra": 1}])).is_err());
}

#[test]
fn variant_parse_round_trips() {
    assert_eq!(Variant::parse("pmbok").expect("pmbok"), Variant::Pmbok);
    assert_eq!(Variant::parse("scrum").expect("scrum"), Variant::Scrum);
    assert!(Variant::parse("kanban").is_err());
    assert_eq!(
        ClassificationKind::stage_kind_for(Variant::Pmbok),
        ClassificationKind::Stage
    );
    assert_eq!(
        ClassificationKind::stage_kind_for(Variant::Scrum),
        ClassificationKind::Phase
    );
}
