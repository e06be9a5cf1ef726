//! Field format providers: pluggable validators for single field values.
//!
//! A field format is constructed by a factory from the parts of a field
//! definition row (name, empty flag, length text, rule) plus the data format,
//! and afterwards validates data values one at a time. The ICD compiler
//! resolves format type names to the factories defined here through its type
//! registry; it never inspects field values itself.

use std::fmt;

use thiserror::Error;

use icd_model::{DataFormat, Range, SyntaxError};

mod choice;
mod constant;
mod datetime;
mod decimal;
mod integer;
mod pattern;
mod text;

pub use choice::ChoiceFieldFormat;
pub use constant::ConstantFieldFormat;
pub use datetime::DateTimeFieldFormat;
pub use decimal::DecimalFieldFormat;
pub use integer::IntegerFieldFormat;
pub use pattern::{PatternFieldFormat, RegexFieldFormat};
pub use text::TextFieldFormat;

/// A field definition row could not be turned into a field format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FieldSyntaxError(pub String);

impl FieldSyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<SyntaxError> for FieldSyntaxError {
    fn from(error: SyntaxError) -> Self {
        Self(error.0)
    }
}

/// A data value was rejected by a field format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FieldValueError(pub String);

impl FieldValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The typed result of validating a single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(chrono::NaiveDate),
    Time(chrono::NaiveTime),
    DateTime(chrono::NaiveDateTime),
}

/// Structural SQL type of a field, consumed by the SQL exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlAnsiType {
    Varchar { length: Option<i64> },
    Integer { valid_range: Range },
    Decimal { precision: u32, scale: u32 },
    Date { has_date: bool, has_time: bool },
}

/// A compiled, pluggable validator for one declared field.
pub trait FieldFormat: Send + Sync + fmt::Debug {
    /// The field name as declared in the ICD.
    fn name(&self) -> &str;

    /// True when an empty value is acceptable.
    fn is_allow_empty(&self) -> bool;

    /// The accepted value length in characters.
    fn length(&self) -> &Range;

    /// The raw rule text this format was constructed from.
    fn rule(&self) -> &str;

    /// Validate `value`, returning its typed form.
    fn validated(&self, value: &str) -> Result<FieldValue, FieldValueError>;

    /// The structural SQL type for DDL export.
    fn sql_ansi_type(&self) -> SqlAnsiType;

    /// Literal choices for formats restricted to an enumerated value set.
    fn choices(&self) -> Option<&[String]> {
        None
    }
}

/// Factory contract resolved by the type registry:
/// `(name, allow_empty, length text, rule, data format)` to a boxed format.
pub type FieldFormatFactory = fn(
    &str,
    bool,
    &str,
    &str,
    &DataFormat,
) -> Result<Box<dyn FieldFormat>, FieldSyntaxError>;

/// State shared by every built-in field format.
#[derive(Debug, Clone)]
pub(crate) struct FieldCore {
    name: String,
    allow_empty: bool,
    length: Range,
    rule: String,
}

impl FieldCore {
    pub(crate) fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        let length = Range::parse(length_text).map_err(|error| {
            FieldSyntaxError::new(format!("length of field {name:?} is broken: {error}"))
        })?;
        Ok(Self {
            name: name.to_string(),
            allow_empty,
            length,
            rule: rule.trim().to_string(),
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_allow_empty(&self) -> bool {
        self.allow_empty
    }

    pub(crate) fn length(&self) -> &Range {
        &self.length
    }

    pub(crate) fn rule(&self) -> &str {
        &self.rule
    }

    /// Uniform empty and length handling before type-specific validation.
    ///
    /// Returns `Some(FieldValue::Empty)` when the (empty) value is already
    /// fully validated, `None` when the caller must continue.
    pub(crate) fn checked_empty_and_length(
        &self,
        value: &str,
    ) -> Result<Option<FieldValue>, FieldValueError> {
        if value.is_empty() {
            if self.allow_empty {
                return Ok(Some(FieldValue::Empty));
            }
            return Err(FieldValueError::new(format!(
                "value for field {:?} must not be empty",
                self.name
            )));
        }
        let count = value.chars().count() as i64;
        if !self.length.contains(count) {
            return Err(FieldValueError::new(format!(
                "value {value:?} for field {:?} must have a length within {} \
                 but has {count} characters",
                self.name, self.length
            )));
        }
        Ok(None)
    }
}
