use serde::{Deserialize, Serialize, Serializer};

use crate::domain::FieldKind;

/// Wire text of a set checkbox; an unset one is written as `""`.
const CHECKED: &str = "on";

/// A field's current value.
///
/// Snapshots carry only strings and string lists, so flags are written as
/// `"on"` or `""`. Reading also accepts JSON booleans.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Selection(Vec<String>),
    Flag(bool),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Selection(items) => items.serialize(serializer),
            FieldValue::Flag(true) => serializer.serialize_str(CHECKED),
            FieldValue::Flag(false) => serializer.serialize_str(""),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::Selection(value)
    }
}

impl FieldValue {
    /// The cleared representation for a field of the given kind.
    pub fn empty_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Select { multiple: true, .. } => FieldValue::Selection(Vec::new()),
            FieldKind::Select { multiple: false, .. } => FieldValue::Text(String::new()),
            FieldKind::Checkbox => FieldValue::Flag(false),
        }
    }

    /// Convert raw user input into a value shaped for `kind`.
    ///
    /// Multi-selects split on commas; checkboxes accept `true`, `on`, `yes` and `1`.
    pub fn from_input(kind: &FieldKind, raw: &str) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Select { multiple: false, .. } => {
                FieldValue::Text(raw.to_string())
            }
            FieldKind::Select { multiple: true, .. } => FieldValue::Selection(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            FieldKind::Checkbox => FieldValue::Flag(parse_flag(raw)),
        }
    }

    /// Reshape a value received from outside (a snapshot, an edit) to fit `kind`.
    pub fn coerce_to(&self, kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(self.as_text()),
            FieldKind::Select { options, multiple } => {
                let wanted = self.items();
                let mut selected: Vec<String> = options
                    .iter()
                    .filter(|option| wanted.iter().any(|item| item == *option))
                    .cloned()
                    .collect();
                if *multiple {
                    FieldValue::Selection(selected)
                } else {
                    selected.truncate(1);
                    FieldValue::Text(selected.pop().unwrap_or_default())
                }
            }
            FieldKind::Checkbox => match self {
                FieldValue::Flag(flag) => FieldValue::Flag(*flag),
                FieldValue::Text(text) => FieldValue::Flag(parse_flag(text)),
                FieldValue::Selection(items) => FieldValue::Flag(!items.is_empty()),
            },
        }
    }

    /// True for a non-empty string, a non-empty selection or a set flag.
    pub fn has_value(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::Selection(items) => !items.is_empty(),
            FieldValue::Flag(flag) => *flag,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Selection(items) => items.join(","),
            FieldValue::Flag(true) => CHECKED.to_string(),
            FieldValue::Flag(false) => String::new(),
        }
    }

    fn items(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(text) if text.is_empty() => Vec::new(),
            FieldValue::Text(text) => vec![text.as_str()],
            FieldValue::Selection(items) => items.iter().map(String::as_str).collect(),
            FieldValue::Flag(_) => Vec::new(),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "yes" | "1"
    )
}
