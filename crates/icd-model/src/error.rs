#![deny(unsafe_code)]

use thiserror::Error;

use crate::location::Location;

/// Supplementary context for a diagnostic, pointing at a second location
/// (e.g. the initial declaration shadowed by a duplicate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeeAlso {
    pub label: String,
    pub location: Location,
}

impl SeeAlso {
    pub fn new(label: impl Into<String>, location: &Location) -> Self {
        Self {
            label: label.into(),
            location: location.clone(),
        }
    }
}

fn render_see_also(see_also: &Option<SeeAlso>) -> String {
    match see_also {
        Some(context) => format!(" ({}: {})", context.label, context.location),
        None => String::new(),
    }
}

/// Errors raised while compiling an ICD or resolving against a compiled schema.
///
/// Every located variant embeds a snapshot of the cursor taken at the moment
/// the offending cell was processed. Compilation is fail-fast: the first error
/// aborts the whole document.
#[derive(Debug, Error)]
pub enum IcdError {
    /// Row tag invalid, data-format row malformed, field declared before any
    /// data format, or a row below its minimum column count.
    #[error("{location}: {message}")]
    Structure { message: String, location: Location },

    /// A field definition row could not be compiled.
    #[error("{location}: {message}")]
    FieldDefinition { message: String, location: Location },

    /// A check definition row could not be compiled.
    #[error("{location}: {message}{}", render_see_also(.see_also))]
    CheckDefinition {
        message: String,
        location: Location,
        see_also: Option<SeeAlso>,
    },

    /// A data value was rejected by a field format.
    #[error("{location}: {message}")]
    FieldValue { message: String, location: Location },

    /// Unknown field name requested post-compilation, or a row arity mismatch.
    #[error("{message}")]
    Lookup { message: String },

    /// Broken registry setup, e.g. two distinct providers under one name.
    #[error("{message}")]
    Configuration { message: String },
}

impl IcdError {
    pub fn structure(message: impl Into<String>, location: &Location) -> Self {
        Self::Structure {
            message: message.into(),
            location: location.clone(),
        }
    }

    pub fn field_definition(message: impl Into<String>, location: &Location) -> Self {
        Self::FieldDefinition {
            message: message.into(),
            location: location.clone(),
        }
    }

    pub fn check_definition(
        message: impl Into<String>,
        location: &Location,
        see_also: Option<SeeAlso>,
    ) -> Self {
        Self::CheckDefinition {
            message: message.into(),
            location: location.clone(),
            see_also,
        }
    }

    pub fn field_value(message: impl Into<String>, location: &Location) -> Self {
        Self::FieldValue {
            message: message.into(),
            location: location.clone(),
        }
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The location the error points at, when it carries one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Structure { location, .. }
            | Self::FieldDefinition { location, .. }
            | Self::CheckDefinition { location, .. }
            | Self::FieldValue { location, .. } => Some(location),
            Self::Lookup { .. } | Self::Configuration { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IcdError>;

/// A syntax problem detected away from any source location, e.g. while
/// parsing a range or rule text. Callers that know the location wrap this
/// into a located [`IcdError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SyntaxError(pub String);

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
