//! Check providers: pluggable row-level and end-of-data validations.
//!
//! A check is constructed by a factory from a check definition row
//! (description, rule, the field names defined so far, location) and then
//! observes every accepted data row. Checks with end-of-data semantics
//! report their verdict once all rows have been seen.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use icd_model::{Location, SyntaxError};

mod distinct_count;
mod is_unique;

pub use distinct_count::DistinctCountCheck;
pub use is_unique::IsUniqueCheck;

/// A check definition row could not be turned into a check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CheckSyntaxError(pub String);

impl CheckSyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<SyntaxError> for CheckSyntaxError {
    fn from(error: SyntaxError) -> Self {
        Self(error.0)
    }
}

/// Data violated a check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CheckError(pub String);

impl CheckError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A named validation over one or more fields of every data row.
pub trait Check: Send + Sync + fmt::Debug {
    /// The unique description this check was declared under.
    fn description(&self) -> &str;

    /// The raw rule text this check was constructed from.
    fn rule(&self) -> &str;

    /// Where the check was declared in the ICD.
    fn location(&self) -> &Location;

    /// Observe one accepted data row, mapped field name to value.
    fn check_row(
        &mut self,
        row: &BTreeMap<String, String>,
        location: &Location,
    ) -> Result<(), CheckError> {
        let _ = (row, location);
        Ok(())
    }

    /// Report the verdict once all rows have been seen.
    fn check_at_end(&mut self, location: &Location) -> Result<(), CheckError> {
        let _ = location;
        Ok(())
    }

    /// Forget everything seen so far, ready for another validation run.
    fn reset(&mut self);
}

/// Factory contract resolved by the type registry:
/// `(description, rule, field names, location)` to a boxed check.
pub type CheckFactory =
    fn(&str, &str, &[String], &Location) -> Result<Box<dyn Check>, CheckSyntaxError>;

/// Resolve `name` against the fields declared so far.
pub(crate) fn known_field(
    name: &str,
    field_names: &[String],
    description: &str,
) -> Result<String, CheckSyntaxError> {
    if field_names.iter().any(|known| known == name) {
        Ok(name.to_string())
    } else {
        Err(CheckSyntaxError::new(format!(
            "field name {name:?} of check {description:?} must be one of: {}",
            icd_model::human_readable_join(field_names)
        )))
    }
}
