//! Generates SQL DDL from compiled ICD schemas.

pub mod sql;

pub use sql::{SqlDialect, create_table_sql};
