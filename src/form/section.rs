use crate::{
    app::FormOptions,
    domain::{SectionLayout, SubformLayout},
};

use super::field::FieldState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Primary,
    Subform { title: String, tags: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct SectionState {
    pub name: String,
    pub kind: SectionKind,
    pub fields: Vec<FieldState>,
}

impl SectionState {
    pub fn primary(layout: &SectionLayout, options: &FormOptions) -> Self {
        Self {
            name: layout.name.clone(),
            kind: SectionKind::Primary,
            fields: collect_fields(&layout.fields, options),
        }
    }

    /// Build a subform; `position` is its zero-based registration order.
    pub fn subform(layout: &SubformLayout, position: usize, options: &FormOptions) -> Self {
        let title = layout
            .title
            .clone()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| format!("{} {}", options.untitled_prefix, position + 1));
        Self {
            name: layout.name.clone(),
            kind: SectionKind::Subform {
                title,
                tags: layout.tags.clone(),
            },
            fields: collect_fields(&layout.fields, options),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|field| field.name() == name)
    }

    /// Validate every field and refresh their messages.
    pub fn validate(&mut self) -> bool {
        let mut all_valid = true;
        for field in &mut self.fields {
            if !field.validate().is_valid() {
                all_valid = false;
            }
        }
        all_valid
    }

    /// Validate without touching message state; stops at the first failure.
    pub fn validate_silently(&self) -> bool {
        self.fields.iter().all(FieldState::validate_silently)
    }

    pub fn error_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| field.has_visible_messages())
            .count()
    }
}

fn collect_fields(
    descriptors: &[crate::domain::FieldDescriptor],
    options: &FormOptions,
) -> Vec<FieldState> {
    descriptors
        .iter()
        .cloned()
        .map(|descriptor| FieldState::from_descriptor(descriptor, options.pattern_match))
        .collect()
}
