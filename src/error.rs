//! Error types for the widget core
//!
//! Callers match on `WidgetError`; storage internals chain context through
//! `anyhow` and surface here as the `Storage` variant.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Errors surfaced by widget operations.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Lookup or delete hit an id (or stacking index) with no record.
    #[error("could not find requested element")]
    NotFound,

    /// A submitted widget failed the required-field or range checks.
    #[error("invalid widget: {0}")]
    Validation(ValidationErrors),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// One failed field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            message: "must not be null",
        }
    }

    pub fn negative(field: &'static str) -> Self {
        Self {
            field,
            message: "must be greater than or equal to 0",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Every field error from one validation pass, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Names of the fields that failed.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display() {
        let errors = ValidationErrors(vec![
            FieldError::missing("x"),
            FieldError::negative("width"),
        ]);
        assert_eq!(
            errors.to_string(),
            "x must not be null; width must be greater than or equal to 0"
        );
        assert_eq!(errors.fields(), vec!["x", "width"]);
    }

    #[test]
    fn test_storage_variant_wraps_anyhow() {
        let err: WidgetError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err, WidgetError::Storage(_)));
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn test_field_errors_serialize_for_the_wire() {
        let errors = ValidationErrors(vec![FieldError::missing("height")]);
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value[0]["field"], "height");
        assert_eq!(value[0]["message"], "must not be null");
    }
}
