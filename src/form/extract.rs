use indexmap::IndexMap;

use crate::domain::is_reserved;

use super::{field::FieldValue, section::SectionState};

/// Field name to value, in field declaration order.
pub type SectionData = IndexMap<String, FieldValue>;

/// Read every user field of `section`; form-level metadata fields are skipped.
pub fn extract(section: &SectionState) -> SectionData {
    let mut data = SectionData::new();
    extract_into(section, &mut data);
    data
}

pub(crate) fn extract_into(section: &SectionState, data: &mut SectionData) {
    for field in &section.fields {
        if is_reserved(field.name()) {
            continue;
        }
        data.insert(field.name().to_string(), field.value.clone());
    }
}

/// Write values onto the fields named in `data`. Fields missing from `data` keep their value.
pub fn populate(section: &mut SectionState, data: &SectionData) {
    for field in &mut section.fields {
        if is_reserved(field.name()) {
            continue;
        }
        if let Some(value) = data.get(field.name()) {
            field.assign(value);
        }
    }
}

/// Reset every field to its empty value and hide all validation messages.
pub fn clear(section: &mut SectionState) {
    for field in &mut section.fields {
        field.reset();
    }
}

pub fn has_any_value(data: &SectionData) -> bool {
    data.values().any(FieldValue::has_value)
}
