use serde::{Deserialize, Serialize};

use super::extract::SectionData;

/// The flattened save/load unit for a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    #[serde(default)]
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default)]
    pub validation: bool,
    #[serde(default)]
    pub data: SectionData,
}

impl FormSnapshot {
    pub fn new(identity: impl Into<String>, data: SectionData) -> Self {
        Self {
            identity: identity.into(),
            version: None,
            validation: false,
            data,
        }
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }
}
