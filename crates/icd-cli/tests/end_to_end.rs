//! End-to-end flows through the library crates the CLI wires together:
//! read an ICD from disk, compile it, validate data, export SQL.

use std::io::Write;

use icd_compile::{Compiler, TypeRegistry};
use icd_ingest::{delimited_rows, fixed_rows, icd_rows};
use icd_report::{SqlDialect, create_table_sql};
use icd_validate::Validator;

fn write_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write");
    file
}

const CUSTOMER_ICD: &str = "\
d,format,delimited
d,item delimiter,comma
f,branch_id,38000,,5,Integer
f,customer_id,23,,:8,Integer,0:99999999
f,surname,Miller,x,:60
c,customers are unique,IsUnique,\"branch_id, customer_id\"
c,fewer than 10 branches,DistinctCount,branch_id < 10
";

#[test]
fn delimited_flow_from_files() {
    let icd_file = write_file(CUSTOMER_ICD);
    let data_file = write_file("38000,23,Miller\n38000,59,Webster\n38000,23,Miller\n");

    let registry = TypeRegistry::built_in();
    let rows = icd_rows(icd_file.path()).expect("ICD rows");
    let schema = Compiler::new(&registry)
        .compile(&icd_file.path().display().to_string(), rows)
        .expect("compile");
    assert_eq!(schema.field_names().len(), 3);

    let data_format = schema.data_format().expect("data format");
    let data = delimited_rows(data_file.path(), data_format).expect("data rows");
    let mut validator = Validator::new(&schema).expect("validator");
    let report = validator.validate_rows("customers.csv", data);

    // The third row repeats the key of the first.
    assert_eq!(report.stats.accepted_rows, 2);
    assert_eq!(report.stats.rejected_rows, 1);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(
        report.issues[0].check_description.as_deref(),
        Some("customers are unique")
    );
}

#[test]
fn fixed_width_flow_from_files() {
    let icd_file = write_file(
        "d,format,fixed\n\
         f,branch_id,38000,,5,Integer\n\
         f,surname,Miller,,10\n",
    );
    let data_file = write_file("38000Miller    \n38001Webster   \n");

    let registry = TypeRegistry::built_in();
    let rows = icd_rows(icd_file.path()).expect("ICD rows");
    let schema = Compiler::new(&registry)
        .compile(&icd_file.path().display().to_string(), rows)
        .expect("compile");

    let widths = schema.fixed_field_widths().expect("fixed widths");
    assert_eq!(widths, [("branch_id".to_string(), 5), ("surname".to_string(), 10)]);

    let data = fixed_rows(data_file.path(), &widths).expect("data rows");
    let mut validator = Validator::new(&schema).expect("validator");
    let report = validator.validate_rows("customers.dat", data);
    assert!(report.is_valid(), "{:?}", report.issues);
    assert_eq!(report.stats.accepted_rows, 2);
}

#[test]
fn sql_export_from_compiled_icd() {
    let icd_file = write_file(CUSTOMER_ICD);
    let registry = TypeRegistry::built_in();
    let rows = icd_rows(icd_file.path()).expect("ICD rows");
    let schema = Compiler::new(&registry)
        .compile(&icd_file.path().display().to_string(), rows)
        .expect("compile");

    let sql = create_table_sql(&schema, "customers", SqlDialect::Mysql);
    assert!(sql.starts_with("create table customers ("), "{sql}");
    assert!(sql.contains("surname varchar(60)"), "{sql}");
    assert!(sql.trim_end().ends_with(");"), "{sql}");
}
