use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::schema::{FieldDescriptor, FieldKind, FormLayout, is_reserved};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("section '{0}' is declared more than once")]
    DuplicateSection(String),
    #[error("field '{0}' is an identity source outside the primary section")]
    IdentitySourceOutsidePrimary(String),
    #[error("more than one identity source declared ('{0}' and '{1}')")]
    MultipleIdentitySources(String, String),
    #[error("select field '{0}' declares no options")]
    EmptySelect(String),
}

/// Parse a layout document into a `FormLayout`, enforcing form-wide naming rules.
pub fn parse_form_layout(value: &Value) -> Result<FormLayout, LayoutError> {
    let layout: FormLayout = serde_json::from_value(value.clone())?;
    check_layout(&layout)?;
    Ok(layout)
}

pub(crate) fn check_layout(layout: &FormLayout) -> Result<(), LayoutError> {
    let mut sections = HashSet::new();
    let mut fields = HashSet::new();
    let mut identity_source: Option<&str> = None;

    sections.insert(layout.primary.name.as_str());
    for field in &layout.primary.fields {
        check_field(field, &mut fields)?;
        if field.identity_source {
            if let Some(existing) = identity_source {
                return Err(LayoutError::MultipleIdentitySources(
                    existing.to_string(),
                    field.name.clone(),
                ));
            }
            identity_source = Some(field.name.as_str());
        }
    }

    for subform in &layout.subforms {
        if !sections.insert(subform.name.as_str()) {
            return Err(LayoutError::DuplicateSection(subform.name.clone()));
        }
        for field in &subform.fields {
            check_field(field, &mut fields)?;
            if field.identity_source {
                return Err(LayoutError::IdentitySourceOutsidePrimary(
                    field.name.clone(),
                ));
            }
        }
    }
    Ok(())
}

fn check_field<'a>(
    field: &'a FieldDescriptor,
    seen: &mut HashSet<&'a str>,
) -> Result<(), LayoutError> {
    if !seen.insert(field.name.as_str()) {
        return Err(LayoutError::DuplicateField(field.name.clone()));
    }
    if let FieldKind::Select { options, .. } = &field.kind
        && options.is_empty()
    {
        return Err(LayoutError::EmptySelect(field.name.clone()));
    }
    if is_reserved(&field.name) {
        warn!(
            field = %field.name,
            "reserved field declared in layout; it is excluded from extracted data"
        );
    }
    Ok(())
}
