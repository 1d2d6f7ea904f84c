use thiserror::Error;

/// A constraint that cannot be evaluated because it is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}invalid pattern '{pattern}': {message}", field_prefix(.field.as_deref()))]
pub struct ConfigurationError {
    /// `None` when the constraints were checked outside any field.
    pub field: Option<String>,
    pub pattern: String,
    pub message: String,
}

fn field_prefix(field: Option<&str>) -> String {
    field.map(|name| format!("field '{name}': ")).unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("no field named '{0}'")]
    UnknownField(String),
    #[error("no subform at index {0}")]
    UnknownSubform(usize),
    #[error("subform {got} registered out of order (expected index {expected})")]
    NavigationOrder { expected: usize, got: usize },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Layout(#[from] crate::domain::LayoutError),
}
