use mockall::predicate::always;
use pretty_assertions::assert_eq;

use crate::{
    app::FormOptions,
    domain::{FieldDescriptor, FormLayout, SectionLayout},
    form::{
        BadgeState, DefaultIdentityGenerator, DirtyState, FieldValue, FormError, FormSnapshot,
        FormState, MockFormHooks, MockIdentityGenerator, SectionData, Transition,
    },
    tests::product_form,
};

fn declining_hooks() -> MockFormHooks {
    let mut hooks = MockFormHooks::new();
    hooks.expect_confirm_discard().times(1).return_const(false);
    hooks
}

fn snapshot(pairs: &[(&str, FieldValue)]) -> FormSnapshot {
    let data: SectionData = pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    FormSnapshot::new("loaded-id", data)
}

#[test]
fn starts_clean_with_first_subform_displayed() {
    let form = product_form();
    assert_eq!(form.dirty_state(), DirtyState::Clean);
    assert_eq!(form.navigation().active_index(), Some(0));
    assert_eq!(form.primary().name, "primary");
    assert_eq!(form.subforms().len(), 2);
}

#[test]
fn required_sku_drives_aggregate_validation() {
    let mut form = product_form();
    assert!(!form.compute_snapshot().validation);

    form.set_field("sku", "ABC123").unwrap();
    assert!(form.compute_snapshot().validation);
}

#[test]
fn invalid_subform_fails_aggregate_validation() {
    let mut form = product_form();
    form.set_field("sku", "ABC123").unwrap();
    form.set_field("price", "ten").unwrap();
    assert!(!form.compute_snapshot().validation);
}

#[test]
fn edits_mark_dirty_idempotently() {
    let mut form = product_form();
    form.set_field("name", "Widget").unwrap();
    assert!(form.is_dirty());
    form.touch_field("note").unwrap();
    assert_eq!(form.dirty_state(), DirtyState::Dirty);
}

#[test]
fn edit_reports_failed_constraints_and_shows_messages() {
    let mut form = product_form();
    let edit = form.set_field("sku", "  ").unwrap();
    assert!(!edit.validation.is_valid());
    assert_eq!(edit.badge, None);
    assert_eq!(
        form.messages(),
        vec![("sku".to_string(), vec!["This field is required".to_string()])]
    );
}

#[test]
fn subform_edit_refreshes_its_badge() {
    let mut form = product_form();
    let edit = form.set_field("price", "10").unwrap();
    assert_eq!(edit.badge, Some(BadgeState::Populated));

    let edit = form.set_field("price", "ten").unwrap();
    assert_eq!(edit.badge, Some(BadgeState::Attention));
    assert_eq!(form.navigation().entry(0).unwrap().badge(), BadgeState::Attention);
    assert_eq!(form.navigation().entry(1).unwrap().badge(), BadgeState::Neutral);
}

#[test]
fn unknown_field_is_reported() {
    let mut form = product_form();
    assert!(matches!(
        form.set_field("colour", "red"),
        Err(FormError::UnknownField(name)) if name == "colour"
    ));
    assert!(!form.is_dirty());
}

#[test]
fn input_text_is_shaped_per_field_kind() {
    let mut form = product_form();
    form.set_field_input("carriers", "dhl,ups").unwrap();
    form.set_field_input("fragile", "yes").unwrap();
    let data = form.compute_snapshot().data;
    assert_eq!(
        data.get("carriers"),
        Some(&FieldValue::Selection(vec!["ups".into(), "dhl".into()]))
    );
    assert_eq!(data.get("fragile"), Some(&FieldValue::Flag(true)));
}

#[test]
fn declined_clear_changes_nothing() {
    let mut form = product_form().with_hooks(Box::new(declining_hooks()));
    form.set_field("sku", "ABC123").unwrap();
    form.set_identity("kept");

    assert_eq!(form.clear(), Transition::Declined);
    assert_eq!(form.dirty_state(), DirtyState::Dirty);
    assert_eq!(form.identity(), "kept");
    assert_eq!(form.field("sku").unwrap().value, FieldValue::from("ABC123"));
    assert_eq!(form.status().message(), "Unsaved changes kept");
}

#[test]
fn clean_clear_does_not_ask_for_confirmation() {
    let mut hooks = MockFormHooks::new();
    hooks.expect_confirm_discard().never();
    hooks.expect_on_clear().times(1).return_const(());
    let mut form = product_form().with_hooks(Box::new(hooks));

    assert_eq!(form.clear(), Transition::Applied);
}

#[test]
fn confirmed_clear_resets_everything() {
    let mut hooks = MockFormHooks::new();
    hooks.expect_confirm_discard().times(1).return_const(true);
    hooks.expect_on_clear().times(1).return_const(());
    let mut form = product_form().with_hooks(Box::new(hooks));
    form.set_field("sku", "ABC123").unwrap();
    form.set_field("price", "10").unwrap();
    form.set_identity("id-1");
    form.set_version(Some(3));

    assert_eq!(form.clear(), Transition::Applied);
    assert_eq!(form.dirty_state(), DirtyState::Clean);
    assert_eq!(form.identity(), "");
    assert_eq!(form.version(), None);
    assert!(form.messages().is_empty());
    assert!(
        form.navigation()
            .entries()
            .iter()
            .all(|entry| entry.badge() == BadgeState::Neutral)
    );

    let snapshot = form.compute_snapshot();
    assert!(snapshot.data.values().all(|value| !value.has_value()));
    // sku is required
    assert!(!snapshot.validation);
}

#[test]
fn cleared_form_without_required_fields_is_valid() {
    let layout = FormLayout {
        primary: SectionLayout {
            name: "primary".into(),
            fields: vec![
                FieldDescriptor::text("name"),
                FieldDescriptor::text("code").with_pattern("^[A-Z]+$"),
            ],
        },
        subforms: Vec::new(),
    };
    let mut form = FormState::from_layout(&layout, &FormOptions::default()).unwrap();
    assert_eq!(form.clear(), Transition::Applied);
    assert!(form.compute_snapshot().validation);
}

#[test]
fn fallback_confirmation_comes_from_options() {
    let options = FormOptions::default().with_discard_fallback(true);
    let mut form = FormState::from_layout(&crate::tests::product_layout(), &options).unwrap();
    form.set_field("name", "Widget").unwrap();
    assert_eq!(form.clear(), Transition::Applied);

    let mut strict = product_form();
    strict.set_field("name", "Widget").unwrap();
    assert_eq!(strict.clear(), Transition::Declined);
}

#[test]
fn version_is_emitted_only_when_numeric() {
    let mut form = product_form();
    assert_eq!(form.compute_snapshot().version, None);

    form.set_version_text("");
    assert_eq!(form.compute_snapshot().version, None);

    form.set_version_text("seven");
    assert_eq!(form.compute_snapshot().version, None);

    form.set_version_text("7");
    let snapshot = form.compute_snapshot();
    assert_eq!(snapshot.version, Some(7));
    assert_eq!(serde_json::to_value(&snapshot).unwrap()["version"], 7);
}

#[test]
fn snapshot_flattens_sections_in_order() {
    let mut form = product_form();
    form.set_field("sku", "A1").unwrap();
    form.set_field("price", "10").unwrap();
    let keys: Vec<_> = form.compute_snapshot().data.keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["sku", "name", "price", "note", "carriers", "fragile"]
    );
}

#[test]
fn save_hands_snapshot_over_and_cleans() {
    let mut hooks = MockFormHooks::new();
    hooks
        .expect_on_save()
        .withf(|snapshot| snapshot.data.get("sku") == Some(&FieldValue::from("A1")))
        .times(1)
        .return_const(());
    let mut form = product_form().with_hooks(Box::new(hooks));
    form.set_field("sku", "A1").unwrap();

    let snapshot = form.save();
    assert!(snapshot.validation);
    assert_eq!(form.dirty_state(), DirtyState::Clean);
    // save keeps values
    assert_eq!(form.field("sku").unwrap().value, FieldValue::from("A1"));
    assert_eq!(form.status().message(), "Saved");
}

#[test]
fn save_and_clear_never_prompts() {
    let mut hooks = MockFormHooks::new();
    hooks.expect_on_save().with(always()).times(1).return_const(());
    hooks.expect_confirm_discard().never();
    hooks.expect_on_clear().times(1).return_const(());
    let mut form = product_form().with_hooks(Box::new(hooks));
    form.set_field("sku", "A1").unwrap();

    let snapshot = form.save_and_clear();
    assert_eq!(snapshot.data.get("sku"), Some(&FieldValue::from("A1")));
    assert_eq!(form.field("sku").unwrap().value, FieldValue::from(""));
    assert!(!form.is_dirty());
}

#[test]
fn save_without_save_hook_keeps_form_dirty() {
    let mut form = product_form();
    form.set_field("sku", "A1").unwrap();

    let snapshot = form.save();
    assert_eq!(snapshot.data.get("sku"), Some(&FieldValue::from("A1")));
    assert_eq!(form.dirty_state(), DirtyState::Dirty);
    assert_eq!(form.status().message(), "Not saved: no save handler installed");

    // the fallback answer still guards the unsaved value
    assert_eq!(form.clear(), Transition::Declined);
    assert_eq!(form.field("sku").unwrap().value, FieldValue::from("A1"));
}

#[test]
fn save_and_clear_without_save_hook_keeps_values() {
    let options = FormOptions::default().with_discard_fallback(true);
    let mut form = FormState::from_layout(&crate::tests::product_layout(), &options).unwrap();
    form.set_field("sku", "A1").unwrap();

    form.save_and_clear();
    assert!(form.is_dirty());
    assert_eq!(form.field("sku").unwrap().value, FieldValue::from("A1"));
}

#[test]
fn malformed_pattern_field_never_validates() {
    let layout = FormLayout {
        primary: SectionLayout {
            name: "primary".into(),
            fields: vec![FieldDescriptor::text("sku")],
        },
        subforms: vec![crate::domain::SubformLayout {
            name: "codes".into(),
            title: Some("Codes".into()),
            tags: Vec::new(),
            fields: vec![FieldDescriptor::text("x").with_pattern("(")],
        }],
    };
    let mut form = FormState::from_layout(&layout, &FormOptions::default()).unwrap();

    let edit = form.set_field("x", "anything").unwrap();
    assert_eq!(edit.badge, Some(BadgeState::Attention));
    assert!(edit.validation.has_failed(crate::form::ConstraintKind::Pattern));
    assert!(!form.compute_snapshot().validation);
    assert_eq!(
        form.messages(),
        vec![("x".to_string(), vec!["Invalid format".to_string()])]
    );
}

#[test]
fn showing_a_subform_switches_the_displayed_one() {
    let mut form = product_form();
    form.show_subform(1).unwrap();
    assert_eq!(form.navigation().active_index(), Some(1));
    assert!(!form.navigation().is_displayed(0));
    assert!(matches!(form.show_subform(7), Err(FormError::UnknownSubform(7))));
    assert_eq!(form.navigation().active_index(), Some(1));
}

#[test]
fn load_populates_and_recomputes_badges() {
    let mut hooks = MockFormHooks::new();
    hooks.expect_on_save().times(1).return_const(());
    hooks.expect_confirm_discard().never();
    let mut form = product_form().with_hooks(Box::new(hooks));
    form.set_field("name", "Old name").unwrap();
    form.save();

    let incoming = snapshot(&[
        ("sku", "B2".into()),
        ("price", "oops".into()),
        ("carriers", FieldValue::Selection(vec!["fedex".into()])),
    ])
    .with_version(4);
    assert_eq!(form.load(&incoming), Transition::Applied);

    assert_eq!(form.identity(), "loaded-id");
    assert_eq!(form.version(), Some(4));
    assert_eq!(form.dirty_state(), DirtyState::Clean);
    // absent from the snapshot, so untouched
    assert_eq!(form.field("name").unwrap().value, FieldValue::from("Old name"));
    assert_eq!(form.navigation().entry(0).unwrap().badge(), BadgeState::Attention);
    assert_eq!(form.navigation().entry(1).unwrap().badge(), BadgeState::Populated);
    assert_eq!(form.status().message(), "Loaded loaded-id");
}

#[test]
fn declined_load_keeps_current_record() {
    let mut form = product_form().with_hooks(Box::new(declining_hooks()));
    form.set_field("sku", "A1").unwrap();

    assert_eq!(form.load(&snapshot(&[("sku", "B2".into())])), Transition::Declined);
    assert_eq!(form.field("sku").unwrap().value, FieldValue::from("A1"));
    assert_eq!(form.identity(), "");
    assert!(form.is_dirty());
}

#[test]
fn load_then_compute_round_trips_data() {
    let mut source = product_form();
    source.set_field("sku", "A1").unwrap();
    source.set_field("price", "9.99").unwrap();
    source.set_field_input("carriers", "ups,fedex").unwrap();
    source.set_field("fragile", true).unwrap();
    source.set_identity("id-7");
    source.set_version(Some(2));
    let saved = source.save();

    let mut target = product_form();
    target.load(&saved);
    assert_eq!(target.compute_snapshot(), saved);
}

#[test]
fn identity_source_edit_issues_request() {
    let mut form = product_form();
    let edit = form.set_field("sku", "ABC").unwrap();
    let request = edit.identity_request.expect("identity request");
    assert_eq!(request.seed, "ABC");

    assert!(form.set_field("name", "x").unwrap().identity_request.is_none());
    assert!(form.touch_field("sku").unwrap().identity_request.is_none());
    assert!(form.set_field("sku", "").unwrap().identity_request.is_none());
}

#[test]
fn only_the_latest_identity_request_applies() {
    let mut form = product_form();
    let first = form.set_field("sku", "A").unwrap().identity_request.unwrap();
    let second = form.set_field("sku", "AB").unwrap().identity_request.unwrap();

    assert!(form.resolve_identity(crate::form::IdentityResolution {
        request: second,
        token: "token-ab".into(),
    }));
    assert!(!form.resolve_identity(crate::form::IdentityResolution {
        request: first,
        token: "token-a".into(),
    }));
    assert_eq!(form.identity(), "token-ab");
    assert_eq!(form.pending_identity(), None);
}

#[test]
fn clear_drops_in_flight_identity() {
    let options = FormOptions::default().with_discard_fallback(true);
    let mut form = FormState::from_layout(&crate::tests::product_layout(), &options).unwrap();
    let request = form.set_field("sku", "A").unwrap().identity_request.unwrap();
    form.clear();

    assert!(!form.resolve_identity(crate::form::IdentityResolution {
        request,
        token: "late".into(),
    }));
    assert_eq!(form.identity(), "");
}

#[tokio::test]
async fn identity_is_generated_from_the_seed() {
    let mut generator = MockIdentityGenerator::new();
    generator
        .expect_generate()
        .withf(|seed| seed.to_string() == "ABC123")
        .times(1)
        .returning(|seed| Ok(format!("id-{seed}")));
    let mut form = product_form();

    let request = form.set_field("sku", "ABC123").unwrap().identity_request.unwrap();
    // the edit is already applied while generation is outstanding
    assert!(form.is_dirty());
    assert_eq!(form.identity(), "");

    let resolution = request.run(&generator).await.unwrap();
    assert!(form.resolve_identity(resolution));
    assert_eq!(form.identity(), "id-ABC123");
}

#[tokio::test]
async fn default_generator_feeds_snapshot_identity() {
    let mut form = product_form();
    let request = form.set_field("sku", "ABC123").unwrap().identity_request.unwrap();
    let resolution = request.run(&DefaultIdentityGenerator).await.unwrap();
    form.resolve_identity(resolution);
    assert_eq!(form.compute_snapshot().identity.len(), 68);
}
