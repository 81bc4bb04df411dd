//! Field-level validation errors for create requests.

use serde::Serialize;
use std::fmt;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Range,
    OneOf,
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Range => "range",
            Self::OneOf => "one_of",
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    /// `<field> is required`
    pub fn required(field: &str) -> Self {
        Self::new(field, ValidationCode::Required, format!("{field} is required"))
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// Record a `required` error when `value` is blank after trimming.
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(ValidationError::required(field));
        }
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&err.message)?;
        }
        Ok(())
    }
}
