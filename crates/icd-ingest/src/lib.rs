//! Reads physical data sources into rows of cells.
//!
//! The compiler and validator are I/O-free; everything that touches the file
//! system lives here. Delimited sources honor the data format's delimiter
//! and quote properties, fixed-width sources slice lines by the field widths
//! of a compiled schema. Spreadsheets are not supported for reading.

use std::path::PathBuf;

use icd_model::Location;

mod delimited;
mod fixed;

pub use delimited::{delimited_rows, icd_rows};
pub use fixed::fixed_rows;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse delimited data {path}: {message}")]
    Delimited { path: PathBuf, message: String },

    #[error("{location}: {message}")]
    FixedWidth { message: String, location: Location },

    #[error("data format {format:?} is not supported for reading")]
    Unsupported { format: String },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn delimited(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Delimited {
            path: path.into(),
            message: message.into(),
        }
    }
}
