//! Integration tests for SQL DDL generation.

use icd_compile::{Compiler, Schema, TypeRegistry};
use icd_report::{SqlDialect, create_table_sql};

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
        &["f", "branch_id", "", "", "", "Integer", ""],
        &["f", "customer_id", "", "", "", "Integer", "0:99999999"],
        &["f", "surname", "", "x", ":60"],
        &["f", "gender", "", "", "", "Choice", "female, male"],
        &["f", "date_of_birth", "", "", "", "DateTime", "DD.MM.YYYY"],
    ])
}

#[test]
fn ansi_create_table_is_stable() {
    let sql = create_table_sql(&customer_schema(), "customers", SqlDialect::Ansi);
    insta::assert_snapshot!(sql, @r"
    create table customers (
        branch_id integer not null,
        customer_id integer not null,
        surname varchar(60),
        gender varchar(6) not null,
        date_of_birth date not null,
        constraint chk_branch_id check (branch_id between -2147483648 and 2147483647),
        constraint chk_customer_id check (customer_id between 0 and 99999999),
        constraint chk_length_surname check (length(surname) <= 60),
        constraint chk_rule_gender check (gender in ('female', 'male'))
    );
    ");
}

#[test]
fn oracle_uses_varchar2_and_smallint() {
    let schema = compile(&[
        &["d", "format", "delimited"],
        &["f", "id", "", "", "", "Integer", "1:9999"],
        &["f", "name", "", "x", ":10"],
    ]);
    let sql = create_table_sql(&schema, "items", SqlDialect::Oracle);
    assert!(sql.contains("id smallint not null"), "{sql}");
    assert!(sql.contains("name varchar2(10)"), "{sql}");
}

#[test]
fn integer_width_is_promoted_per_dialect() {
    let schema = compile(&[
        &["d", "format", "delimited"],
        &["f", "small", "", "", "", "Integer", "0:100"],
        &["f", "medium", "", "", "", "Integer", "0:100000"],
        &["f", "large", "", "", "", "Integer", "0:3000000000"],
    ]);
    let ansi = create_table_sql(&schema, "numbers", SqlDialect::Ansi);
    assert!(ansi.contains("small smallint"), "{ansi}");
    assert!(ansi.contains("medium integer"), "{ansi}");
    assert!(ansi.contains("large bigint"), "{ansi}");

    let mssql = create_table_sql(&schema, "numbers", SqlDialect::Mssql);
    assert!(mssql.contains("medium int not null"), "{mssql}");

    let oracle = create_table_sql(&schema, "numbers", SqlDialect::Oracle);
    assert!(oracle.contains("large number(19)"), "{oracle}");
}

#[test]
fn numeric_choices_are_not_quoted() {
    let schema = compile(&[
        &["d", "format", "delimited"],
        &["f", "status", "", "", "", "Choice", "1, 2, 3"],
    ]);
    let sql = create_table_sql(&schema, "events", SqlDialect::Ansi);
    assert!(sql.contains("check (status in (1, 2, 3))"), "{sql}");
}

#[test]
fn datetime_maps_per_dialect() {
    let schema = compile(&[
        &["d", "format", "delimited"],
        &["f", "created", "", "", "", "DateTime", "YYYY-MM-DD hh:mm:ss"],
    ]);
    let ansi = create_table_sql(&schema, "events", SqlDialect::Ansi);
    assert!(ansi.contains("created timestamp"), "{ansi}");
    let mysql = create_table_sql(&schema, "events", SqlDialect::Mysql);
    assert!(mysql.contains("created datetime"), "{mysql}");
}

#[test]
fn dialect_names_round_trip() {
    for name in ["ansi", "db2", "mssql", "mysql", "oracle"] {
        let dialect = SqlDialect::parse(name).expect("dialect");
        assert_eq!(dialect.as_str(), name);
    }
    assert!(SqlDialect::parse("postgres").is_none());
}
