mod value;

use std::collections::BTreeSet;

pub use value::FieldValue;

use crate::{
    app::PatternMatch,
    domain::{FieldDescriptor, FieldKind},
};

use super::validator::{ConstraintKind, FieldConstraint, FieldRules, ValidationResult};

#[derive(Debug, Clone)]
pub struct FieldState {
    pub descriptor: FieldDescriptor,
    pub value: FieldValue,
    rules: FieldRules,
    /// Constraint kinds whose message slot is currently shown.
    visible_messages: BTreeSet<ConstraintKind>,
}

impl FieldState {
    pub fn from_descriptor(descriptor: FieldDescriptor, mode: PatternMatch) -> Self {
        let rules = FieldRules::compile(&descriptor.name, descriptor.constraints(), mode);
        let value = FieldValue::empty_for(&descriptor.kind);
        Self {
            descriptor,
            value,
            rules,
            visible_messages: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.descriptor.kind
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Assign a value, reshaped to fit this field's kind.
    pub fn assign(&mut self, value: &FieldValue) {
        self.value = value.coerce_to(&self.descriptor.kind);
    }

    pub fn reset(&mut self) {
        self.value = FieldValue::empty_for(&self.descriptor.kind);
        self.visible_messages.clear();
    }

    /// Validate and refresh the visible message slots.
    pub fn validate(&mut self) -> ValidationResult {
        let result = self.rules.check(&self.value);
        self.visible_messages = result.failed().clone();
        result
    }

    pub fn validate_silently(&self) -> bool {
        self.rules.check(&self.value).is_valid()
    }

    pub fn visible_messages(&self) -> Vec<String> {
        self.rules
            .constraints()
            .iter()
            .filter(|constraint| self.visible_messages.contains(&constraint.kind()))
            .map(FieldConstraint::message)
            .collect()
    }

    pub fn has_visible_messages(&self) -> bool {
        !self.visible_messages.is_empty()
    }
}
