//! Integration tests for data validation against compiled schemas.

use icd_compile::{Compiler, Schema, TypeRegistry};
use icd_validate::{ValidationReport, Validator};

fn compile(raw: &[&[&str]]) -> Schema {
    let rows: Vec<Vec<String>> = raw
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect();
    let registry = TypeRegistry::built_in();
    Compiler::new(&registry)
        .compile("icd.csv", rows)
        .expect("ICD must compile")
}

fn customer_schema() -> Schema {
    compile(&[
        &["d", "format", "delimited"],
        &["f", "branch_id", "38000", "", "5", "Integer", ""],
        &["f", "customer_id", "23", "", ":8", "Integer", "0:99999999"],
        &["f", "surname", "Miller", "x", ":60"],
        &["c", "customers are unique", "IsUnique", "branch_id, customer_id"],
        &["c", "fewer than 10 branches", "DistinctCount", "branch_id < 10"],
    ])
}

fn data(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect()
}

fn validate(schema: &Schema, raw: &[&[&str]]) -> ValidationReport {
    let mut validator = Validator::new(schema).expect("validator");
    validator.validate_rows("customers.csv", data(raw))
}

#[test]
fn valid_rows_are_accepted() {
    let schema = customer_schema();
    let report = validate(
        &schema,
        &[
            &["38000", "23", "Miller"],
            &["38000", "59", "Webster"],
            &["38001", "23", ""],
        ],
    );
    assert!(report.is_valid(), "{:?}", report.issues);
    assert_eq!(report.stats.accepted_rows, 3);
    assert_eq!(report.stats.rejected_rows, 0);
    assert_eq!(report.stats.passed_checks_at_end, 2);
    assert_eq!(report.stats.failed_checks_at_end, 0);
}

#[test]
fn invalid_cell_rejects_the_row_with_location() {
    let schema = customer_schema();
    let report = validate(
        &schema,
        &[
            &["38000", "23", "Miller"],
            &["not a number", "59", "Webster"],
        ],
    );
    assert_eq!(report.stats.accepted_rows, 1);
    assert_eq!(report.stats.rejected_rows, 1);
    let issue = &report.issues[0];
    assert_eq!(issue.field_name.as_deref(), Some("branch_id"));
    assert_eq!(issue.location.line(), 2);
    assert_eq!(issue.location.cell(), 1);
}

#[test]
fn arity_mismatch_rejects_the_row_without_cell_checks() {
    let schema = customer_schema();
    let report = validate(&schema, &[&["38000", "23"]]);
    assert_eq!(report.stats.rejected_rows, 1);
    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].message.contains("3 values"));
}

#[test]
fn duplicate_key_is_flagged_by_the_unique_check() {
    let schema = customer_schema();
    let report = validate(
        &schema,
        &[
            &["38000", "23", "Miller"],
            &["38000", "23", "Webster"],
        ],
    );
    assert_eq!(report.stats.accepted_rows, 1);
    assert_eq!(report.stats.rejected_rows, 1);
    let issue = &report.issues[0];
    assert_eq!(
        issue.check_description.as_deref(),
        Some("customers are unique")
    );
    assert_eq!(issue.location.line(), 2);
}

#[test]
fn failed_check_at_end_is_counted_and_reported() {
    let schema = compile(&[
        &["d", "format", "delimited"],
        &["f", "branch_id", "", "", "", "Integer", ""],
        &["c", "at most two branches", "DistinctCount", "branch_id < 3"],
    ]);
    let report = validate(&schema, &[&["1"], &["2"], &["3"], &["4"]]);
    assert_eq!(report.stats.accepted_rows, 4);
    assert_eq!(report.stats.failed_checks_at_end, 1);
    assert_eq!(report.stats.passed_checks_at_end, 0);
    assert!(report.issues[0].message.contains("distinct count"));
}

#[test]
fn accepted_plus_rejected_equals_row_count() {
    let schema = customer_schema();
    let rows: &[&[&str]] = &[
        &["38000", "23", "Miller"],
        &["oops", "59", "Webster"],
        &["38000", "59", ""],
        &["38000"],
    ];
    let report = validate(&schema, rows);
    assert_eq!(
        report.stats.accepted_rows + report.stats.rejected_rows,
        rows.len() as u64
    );
}

#[test]
fn a_validator_can_run_twice_with_reset_check_state() {
    let schema = customer_schema();
    let mut validator = Validator::new(&schema).expect("validator");
    let rows = data(&[&["38000", "23", "Miller"]]);
    let first = validator.validate_rows("customers.csv", rows.clone());
    assert!(first.is_valid(), "{:?}", first.issues);
    // Without a reset the second run would flag the same key as duplicate.
    let second = validator.validate_rows("customers.csv", rows);
    assert!(second.is_valid(), "{:?}", second.issues);
}

#[test]
fn two_validators_share_one_schema() {
    let schema = customer_schema();
    let mut worker_a = Validator::new(&schema).expect("validator");
    let mut worker_b = Validator::new(&schema).expect("validator");
    let report_a = worker_a.validate_rows("a.csv", data(&[&["38000", "23", "Miller"]]));
    let report_b = worker_b.validate_rows("b.csv", data(&[&["38000", "23", "Miller"]]));
    let mut total = report_a.stats;
    total.merge(&report_b.stats);
    assert_eq!(total.accepted_rows, 2);
}

#[test]
fn report_serializes_to_json() {
    let schema = customer_schema();
    let report = validate(&schema, &[&["oops", "59", "Webster"]]);
    let json = serde_json::to_string(&report).expect("serialize report");
    assert!(json.contains("\"rejected_rows\":1"));
    assert!(json.contains("customers.csv"));
}
