//! The validation contract shared by every structured record.
//!
//! A candidate payload (usually a JSON object located in a model response) either
//! becomes a fully-typed, validated instance or fails with a `SchemaValidationError`
//! naming every offending field. Pure: no I/O, no logging.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// What is wrong with a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    Missing,
    Empty,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Dotted path, e.g. `projects[2].technologies`.
    pub field: String,
    pub problem: Problem,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "{}: missing", self.field),
            Problem::Empty => write!(f, "{}: empty", self.field),
            Problem::Malformed(detail) => write!(f, "{}: malformed ({detail})", self.field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("schema validation failed: {}", join_violations(.violations))]
pub struct SchemaValidationError {
    pub violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaValidationError {
    pub fn malformed(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                problem: Problem::Malformed(detail.into()),
            }],
        }
    }

    /// The offending field paths, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

/// Accumulates field violations while a record is checked.
#[derive(Debug, Default)]
pub struct Violations {
    inner: Vec<FieldViolation>,
}

impl Violations {
    pub fn push(&mut self, field: impl Into<String>, problem: Problem) {
        self.inner.push(FieldViolation {
            field: field.into(),
            problem,
        });
    }

    /// Flags `value` as `Missing` when absent and `Empty` when blank.
    pub fn require_text(&mut self, field: impl Into<String>, value: Option<&str>) {
        match value.map(str::trim) {
            None => self.push(field, Problem::Missing),
            Some("") => self.push(field, Problem::Empty),
            Some(_) => {}
        }
    }

    pub fn require_items<T>(&mut self, field: impl Into<String>, items: &[T]) {
        if items.is_empty() {
            self.push(field, Problem::Empty);
        }
    }

    pub fn into_result(self) -> Result<(), SchemaValidationError> {
        if self.inner.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError {
                violations: self.inner,
            })
        }
    }
}

/// Implemented by every record that has invariants beyond its serde shape.
pub trait Validate {
    /// Appends violations found in `self`, prefixing field names with `path`.
    fn check(&self, path: &str, out: &mut Violations);

    fn validate(&self) -> Result<(), SchemaValidationError> {
        let mut out = Violations::default();
        self.check("", &mut out);
        out.into_result()
    }
}

/// Builds `prefix.field` (or just `field` at the root).
pub fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// The single validation contract: shape check via serde, then invariant check.
pub fn validate_payload<T>(payload: Value) -> Result<T, SchemaValidationError>
where
    T: DeserializeOwned + Validate,
{
    if !payload.is_object() {
        return Err(SchemaValidationError::malformed(
            "payload",
            "expected a JSON object",
        ));
    }

    let record: T = serde_json::from_value(payload)
        .map_err(|e| SchemaValidationError::malformed("payload", e.to_string()))?;
    record.validate()?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_distinguishes_missing_and_empty() {
        let mut out = Violations::default();
        out.require_text("name", None);
        out.require_text("email", Some("   "));
        out.require_text("phone", Some("555-1234"));
        let err = out.into_result().unwrap_err();
        assert_eq!(err.fields(), vec!["name", "email"]);
        assert_eq!(err.violations[0].problem, Problem::Missing);
        assert_eq!(err.violations[1].problem, Problem::Empty);
    }

    #[test]
    fn test_error_message_names_every_field() {
        let mut out = Violations::default();
        out.push("email", Problem::Missing);
        out.push("projects[1].technologies", Problem::Empty);
        let message = out.into_result().unwrap_err().to_string();
        assert_eq!(
            message,
            "schema validation failed: email: missing; projects[1].technologies: empty"
        );
    }

    #[test]
    fn test_field_path_root_and_nested() {
        assert_eq!(field_path("", "name"), "name");
        assert_eq!(field_path("projects[0]", "name"), "projects[0].name");
    }

    #[test]
    fn test_no_violations_is_ok() {
        assert!(Violations::default().into_result().is_ok());
    }
}
