use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use tracing::error;

use super::{
    error::ConfigurationError,
    field::FieldValue,
};
use crate::app::PatternMatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldConstraint {
    Required,
    MinLength(usize),
    Pattern(String),
}

impl FieldConstraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            FieldConstraint::Required => ConstraintKind::Required,
            FieldConstraint::MinLength(_) => ConstraintKind::MinLength,
            FieldConstraint::Pattern(_) => ConstraintKind::Pattern,
        }
    }

    /// Text shown in the constraint's message slot when it fails.
    pub fn message(&self) -> String {
        match self {
            FieldConstraint::Required => "This field is required".to_string(),
            FieldConstraint::MinLength(length) => format!("Minimum length: {length}"),
            FieldConstraint::Pattern(_) => "Invalid format".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintKind {
    Required,
    MinLength,
    Pattern,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Required => write!(f, "required"),
            ConstraintKind::MinLength => write!(f, "length"),
            ConstraintKind::Pattern => write!(f, "regex"),
        }
    }
}

/// Every constraint kind that failed for one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    failed: BTreeSet<ConstraintKind>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed(&self) -> &BTreeSet<ConstraintKind> {
        &self.failed
    }

    pub fn has_failed(&self, kind: ConstraintKind) -> bool {
        self.failed.contains(&kind)
    }

    fn fail(&mut self, kind: ConstraintKind) {
        self.failed.insert(kind);
    }
}

/// Evaluate `constraints` against `value`, compiling any pattern on the way.
pub fn validate(
    value: &FieldValue,
    constraints: &[FieldConstraint],
) -> Result<ValidationResult, ConfigurationError> {
    let mut result = ValidationResult::default();
    for constraint in constraints {
        let passed = match constraint {
            FieldConstraint::Required => check_required(value),
            FieldConstraint::MinLength(length) => check_min_length(value, *length),
            FieldConstraint::Pattern(pattern) => {
                let regex = compile_pattern(None, pattern, PatternMatch::Partial)?;
                check_pattern(value, &regex)
            }
        };
        if !passed {
            result.fail(constraint.kind());
        }
    }
    Ok(result)
}

/// Constraints for one field with the pattern compiled once up front.
///
/// A pattern that fails to compile leaves the field permanently failing `Pattern`.
#[derive(Debug, Clone)]
pub struct FieldRules {
    constraints: Vec<FieldConstraint>,
    pattern: Option<Result<Regex, ConfigurationError>>,
}

impl FieldRules {
    pub fn compile(field: &str, constraints: Vec<FieldConstraint>, mode: PatternMatch) -> Self {
        let pattern = constraints.iter().find_map(|constraint| match constraint {
            FieldConstraint::Pattern(pattern) => {
                let compiled = compile_pattern(Some(field), pattern, mode);
                if let Err(err) = &compiled {
                    error!(error = %err, "field treated as invalid until its pattern is fixed");
                }
                Some(compiled)
            }
            _ => None,
        });
        Self {
            constraints,
            pattern,
        }
    }

    pub fn constraints(&self) -> &[FieldConstraint] {
        &self.constraints
    }

    pub fn configuration_error(&self) -> Option<&ConfigurationError> {
        self.pattern.as_ref().and_then(|compiled| compiled.as_ref().err())
    }

    pub fn check(&self, value: &FieldValue) -> ValidationResult {
        let mut result = ValidationResult::default();
        for constraint in &self.constraints {
            let passed = match constraint {
                FieldConstraint::Required => check_required(value),
                FieldConstraint::MinLength(length) => check_min_length(value, *length),
                FieldConstraint::Pattern(_) => match &self.pattern {
                    Some(Ok(regex)) => check_pattern(value, regex),
                    _ => false,
                },
            };
            if !passed {
                result.fail(constraint.kind());
            }
        }
        result
    }
}

fn compile_pattern(
    field: Option<&str>,
    pattern: &str,
    mode: PatternMatch,
) -> Result<Regex, ConfigurationError> {
    let source = match mode {
        PatternMatch::Partial => pattern.to_string(),
        PatternMatch::Full => format!("^(?:{pattern})$"),
    };
    Regex::new(&source).map_err(|err| ConfigurationError {
        field: field.map(str::to_string),
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

fn check_required(value: &FieldValue) -> bool {
    match value {
        FieldValue::Text(text) => !text.trim().is_empty(),
        FieldValue::Selection(items) => !items.is_empty(),
        FieldValue::Flag(flag) => *flag,
    }
}

fn check_min_length(value: &FieldValue, length: usize) -> bool {
    match value {
        FieldValue::Text(text) => text.chars().count() >= length,
        _ => true,
    }
}

fn check_pattern(value: &FieldValue, regex: &Regex) -> bool {
    match value {
        FieldValue::Text(text) if !text.trim().is_empty() => regex.is_match(text),
        _ => true,
    }
}
