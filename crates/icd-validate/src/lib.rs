//! Validates data rows against a compiled [`Schema`].
//!
//! Unlike schema compilation, data validation does not fail fast: every
//! offending row is reported as an issue and counted, then validation moves
//! on. Checks observe accepted rows only and report their verdict once all
//! rows have been seen.

use std::collections::BTreeMap;

use tracing::debug;

use icd_checks::Check;
use icd_compile::Schema;
use icd_model::{Location, Result};

/// Run-time counters of one validation run.
///
/// A compiled schema is shared read-only between validation workers; each
/// worker accumulates its own stats and merges them afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationStats {
    pub accepted_rows: u64,
    pub rejected_rows: u64,
    pub passed_checks_at_end: u64,
    pub failed_checks_at_end: u64,
}

impl ValidationStats {
    pub fn merge(&mut self, other: &Self) {
        self.accepted_rows += other.accepted_rows;
        self.rejected_rows += other.rejected_rows;
        self.passed_checks_at_end += other.passed_checks_at_end;
        self.failed_checks_at_end += other.failed_checks_at_end;
    }
}

/// One data problem found during validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationIssue {
    pub message: String,
    pub location: Location,
    pub field_name: Option<String>,
    pub check_description: Option<String>,
}

/// The outcome of validating one data source.
#[derive(Debug, Default, serde::Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Walks data rows against a schema, feeding accepted rows to the schema's
/// checks. One validator per worker; the schema itself stays immutable.
pub struct Validator<'a> {
    schema: &'a Schema,
    checks: Vec<Box<dyn Check>>,
}

impl<'a> Validator<'a> {
    /// Create a validator with a private instance of every schema check.
    pub fn new(schema: &'a Schema) -> Result<Self> {
        let mut checks = Vec::new();
        for definition in schema.check_definitions() {
            checks.push(definition.instantiate()?);
        }
        Ok(Self { schema, checks })
    }

    /// Validate all rows of one source, reporting `path` in every issue.
    pub fn validate_rows<I>(&mut self, path: &str, rows: I) -> ValidationReport
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        for check in &mut self.checks {
            check.reset();
        }
        let mut report = ValidationReport::default();
        let mut location = Location::new(path);
        let expected_count = self.schema.fields().len();

        for row in rows {
            let issue_count_before = report.issues.len();
            if row.len() != expected_count {
                report.issues.push(ValidationIssue {
                    message: format!(
                        "row must contain {expected_count} values but contains {}",
                        row.len()
                    ),
                    location: location.clone(),
                    field_name: None,
                    check_description: None,
                });
            } else {
                self.validate_cells(&row, &mut location, &mut report);
                if report.issues.len() == issue_count_before {
                    self.run_row_checks(&row, &mut location, &mut report);
                }
            }
            if report.issues.len() == issue_count_before {
                report.stats.accepted_rows += 1;
            } else {
                report.stats.rejected_rows += 1;
            }
            location.advance_line();
        }

        self.run_checks_at_end(&mut location, &mut report);
        debug!(
            path,
            accepted = report.stats.accepted_rows,
            rejected = report.stats.rejected_rows,
            issue_count = report.issues.len(),
            "validated rows"
        );
        report
    }

    fn validate_cells(
        &self,
        row: &[String],
        location: &mut Location,
        report: &mut ValidationReport,
    ) {
        for (index, value) in row.iter().enumerate() {
            location.set_cell(index as u32 + 1);
            let format = self.schema.field_format_at(index);
            if let Err(error) = format.validated(value) {
                report.issues.push(ValidationIssue {
                    message: error.to_string(),
                    location: location.clone(),
                    field_name: Some(format.name().to_string()),
                    check_description: None,
                });
            }
        }
        location.set_cell(0);
    }

    fn run_row_checks(
        &mut self,
        row: &[String],
        location: &mut Location,
        report: &mut ValidationReport,
    ) {
        let row_map: BTreeMap<String, String> = self
            .schema
            .fields()
            .iter()
            .zip(row)
            .map(|(field, value)| (field.name().to_string(), value.clone()))
            .collect();
        for check in &mut self.checks {
            if let Err(error) = check.check_row(&row_map, location) {
                report.issues.push(ValidationIssue {
                    message: error.to_string(),
                    location: location.clone(),
                    field_name: None,
                    check_description: Some(check.description().to_string()),
                });
            }
        }
    }

    fn run_checks_at_end(&mut self, location: &mut Location, report: &mut ValidationReport) {
        for check in &mut self.checks {
            match check.check_at_end(location) {
                Ok(()) => report.stats.passed_checks_at_end += 1,
                Err(error) => {
                    report.stats.failed_checks_at_end += 1;
                    report.issues.push(ValidationIssue {
                        message: error.to_string(),
                        location: location.clone(),
                        field_name: None,
                        check_description: Some(check.description().to_string()),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_merge_adds_counters() {
        let mut total = ValidationStats::default();
        let worker_a = ValidationStats {
            accepted_rows: 10,
            rejected_rows: 2,
            passed_checks_at_end: 1,
            failed_checks_at_end: 0,
        };
        let worker_b = ValidationStats {
            accepted_rows: 5,
            rejected_rows: 1,
            passed_checks_at_end: 0,
            failed_checks_at_end: 1,
        };
        total.merge(&worker_a);
        total.merge(&worker_b);
        assert_eq!(total.accepted_rows, 15);
        assert_eq!(total.rejected_rows, 3);
        assert_eq!(total.passed_checks_at_end, 1);
        assert_eq!(total.failed_checks_at_end, 1);

        let mut reordered = ValidationStats::default();
        reordered.merge(&worker_b);
        reordered.merge(&worker_a);
        assert_eq!(total, reordered);
    }
}
