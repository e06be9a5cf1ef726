#![deny(unsafe_code)]

use std::fmt;

/// Cursor into a tabular source, attached to every diagnostic.
///
/// Lines are 1-based. Cell 0 is the row-tag column of an ICD row; the content
/// cells after the tag are numbered from 1. Sources without column granularity
/// set `has_cell` to false and render as `path:line` only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Location {
    path: String,
    line: u32,
    cell: u32,
    has_cell: bool,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: 1,
            cell: 0,
            has_cell: true,
        }
    }

    pub fn without_cell(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: 1,
            cell: 0,
            has_cell: false,
        }
    }

    /// A location describing the code that called the current function,
    /// used when a diagnostic has no row-scoped location to point at.
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self {
            path: caller.file().to_string(),
            line: caller.line(),
            cell: 0,
            has_cell: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn cell(&self) -> u32 {
        self.cell
    }

    pub fn has_cell(&self) -> bool {
        self.has_cell
    }

    /// Move to the start of the next row.
    pub fn advance_line(&mut self) {
        self.line += 1;
        self.cell = 0;
    }

    /// Move to the next cell within the current row.
    pub fn advance_cell(&mut self) {
        if self.has_cell {
            self.cell += 1;
        }
    }

    /// Jump to a specific cell, e.g. to point back at an earlier column.
    pub fn set_cell(&mut self, cell: u32) {
        if self.has_cell {
            self.cell = cell;
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_cell {
            write!(f, "{}:{}:{}", self.path, self.line, self.cell)
        } else {
            write!(f, "{}:{}", self.path, self.line)
        }
    }
}
