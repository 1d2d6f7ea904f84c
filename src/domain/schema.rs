use serde::Deserialize;

use crate::form::FieldConstraint;

/// Field names owned by the form itself rather than by any section.
pub const RESERVED_FIELDS: [&str; 2] = ["identity", "version"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormLayout {
    pub primary: SectionLayout,
    #[serde(default)]
    pub subforms: Vec<SubformLayout>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionLayout {
    #[serde(default = "default_primary_name")]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubformLayout {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Select {
        options: Vec<String>,
        #[serde(default)]
        multiple: bool,
    },
    Checkbox,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub pattern: Option<String>,
    /// Edits to this field seed a fresh identity token.
    #[serde(default)]
    pub identity_source: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            min_length: None,
            pattern: None,
            identity_source: false,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn identity_source(mut self) -> Self {
        self.identity_source = true;
        self
    }

    pub fn constraints(&self) -> Vec<FieldConstraint> {
        let mut constraints = Vec::new();
        if self.required {
            constraints.push(FieldConstraint::Required);
        }
        if let Some(length) = self.min_length {
            constraints.push(FieldConstraint::MinLength(length));
        }
        if let Some(pattern) = &self.pattern {
            constraints.push(FieldConstraint::Pattern(pattern.clone()));
        }
        constraints
    }
}

fn default_primary_name() -> String {
    "primary".to_string()
}
