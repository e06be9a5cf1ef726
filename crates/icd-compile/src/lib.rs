//! Compiles an Interface Control Document (ICD) — a tabular schema of data
//! format, field definitions and checks — into an in-memory [`Schema`].

pub mod compiler;
pub mod registry;
pub mod schema;

pub use compiler::Compiler;
pub use registry::{CHECK_SUFFIX, FIELD_FORMAT_SUFFIX, TypeRegistry};
pub use schema::{CheckDefinition, FieldDefinition, Schema};
