use serde_json::json;

use crate::{
    app::FormOptions,
    domain::{FieldKind, LayoutError, parse_form_layout},
    form::{FieldConstraint, FormState, SectionKind},
};

#[test]
fn descriptor_attributes_become_ordered_constraints() {
    let layout = parse_form_layout(&json!({
        "primary": {"fields": [
            {"name": "code", "required": true, "min_length": 3, "pattern": "^[A-Z]+$"}
        ]}
    }))
    .unwrap();
    assert_eq!(
        layout.primary.fields[0].constraints(),
        vec![
            FieldConstraint::Required,
            FieldConstraint::MinLength(3),
            FieldConstraint::Pattern("^[A-Z]+$".into()),
        ]
    );
    assert_eq!(layout.primary.fields[0].kind, FieldKind::Text);
}

#[test]
fn identity_source_must_live_on_primary() {
    let err = parse_form_layout(&json!({
        "primary": {"fields": []},
        "subforms": [{"name": "extra", "fields": [{"name": "seed", "identity_source": true}]}]
    }))
    .unwrap_err();
    assert!(matches!(err, LayoutError::IdentitySourceOutsidePrimary(name) if name == "seed"));
}

#[test]
fn only_one_identity_source() {
    let err = parse_form_layout(&json!({
        "primary": {"fields": [
            {"name": "a", "identity_source": true},
            {"name": "b", "identity_source": true}
        ]}
    }))
    .unwrap_err();
    assert!(matches!(err, LayoutError::MultipleIdentitySources(..)));
}

#[test]
fn duplicate_section_names_are_rejected() {
    let err = parse_form_layout(&json!({
        "primary": {"name": "main"},
        "subforms": [{"name": "main"}]
    }))
    .unwrap_err();
    assert!(matches!(err, LayoutError::DuplicateSection(name) if name == "main"));
}

#[test]
fn select_without_options_is_rejected() {
    let err = parse_form_layout(&json!({
        "primary": {"fields": [{"name": "size", "kind": {"type": "select", "options": []}}]}
    }))
    .unwrap_err();
    assert!(matches!(err, LayoutError::EmptySelect(_)));
}

#[test]
fn untitled_subforms_are_numbered() {
    let layout = parse_form_layout(&json!({
        "primary": {},
        "subforms": [{"name": "a", "title": "Alpha"}, {"name": "b"}]
    }))
    .unwrap();
    let state = FormState::from_layout(&layout, &FormOptions::default()).unwrap();
    let titles: Vec<_> = state
        .subforms()
        .iter()
        .map(|section| match &section.kind {
            SectionKind::Subform { title, .. } => title.clone(),
            SectionKind::Primary => unreachable!(),
        })
        .collect();
    assert_eq!(titles, vec!["Alpha".to_string(), "Form 2".to_string()]);
    assert_eq!(state.navigation().entry(1).unwrap().title, "Form 2");
}
