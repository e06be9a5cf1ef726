use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{info, info_span};

use icd_compile::{Compiler, Schema, TypeRegistry};
use icd_ingest::{IngestError, delimited_rows, fixed_rows, icd_rows};
use icd_model::Format;
use icd_report::{SqlDialect, create_table_sql};
use icd_validate::{ValidationReport, Validator};

use crate::cli::{CompileArgs, DialectArg, ReportFormatArg, SqlArgs, ValidateArgs};
use crate::summary::{apply_table_style, print_validation_summary};

pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let registry = TypeRegistry::built_in();
    let schema = compile_icd(&registry, &args.icd_path)?;
    let rows = data_rows(&schema, &args.data_path)?;

    let span = info_span!("validate", data = %args.data_path.display());
    let _guard = span.enter();
    let mut validator = Validator::new(&schema)?;
    let report = validator.validate_rows(&args.data_path.display().to_string(), rows);
    info!(
        accepted = report.stats.accepted_rows,
        rejected = report.stats.rejected_rows,
        "validation finished"
    );

    match args.report {
        ReportFormatArg::Table => print_validation_summary(&report),
        ReportFormatArg::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        ),
    }
    Ok(report)
}

pub fn run_compile(args: &CompileArgs) -> Result<()> {
    let registry = TypeRegistry::built_in();
    let schema = compile_icd(&registry, &args.icd_path)?;

    let format_name = schema
        .data_format()
        .map_or_else(|| "(none)".to_string(), |f| f.format().to_string());
    println!("Data format: {format_name}");

    let mut fields = Table::new();
    fields.set_header(vec!["Field", "Type", "Empty", "Length", "Rule", "Example"]);
    apply_table_style(&mut fields);
    for field in schema.fields() {
        fields.add_row(vec![
            field.name().to_string(),
            field.type_name().to_string(),
            if field.is_allow_empty() { "x" } else { "" }.to_string(),
            field.length_text().to_string(),
            field.rule().to_string(),
            field.example().unwrap_or("").to_string(),
        ]);
    }
    println!("{fields}");

    if !schema.check_descriptions().is_empty() {
        let mut checks = Table::new();
        checks.set_header(vec!["Check", "Type", "Rule"]);
        apply_table_style(&mut checks);
        for check in schema.check_definitions() {
            checks.add_row(vec![
                check.description().to_string(),
                check.type_name().to_string(),
                check.rule().to_string(),
            ]);
        }
        println!("{checks}");
    }
    Ok(())
}

pub fn run_sql(args: &SqlArgs) -> Result<()> {
    let registry = TypeRegistry::built_in();
    let schema = compile_icd(&registry, &args.icd_path)?;
    let table_name = match &args.table {
        Some(name) => name.clone(),
        None => args
            .icd_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .context("ICD path must have a file name")?,
    };
    let dialect = sql_dialect(args.dialect);
    println!("{}", create_table_sql(&schema, &table_name, dialect));
    Ok(())
}

pub fn run_types() -> Result<()> {
    let registry = TypeRegistry::built_in();
    let mut table = Table::new();
    table.set_header(vec!["Kind", "Type"]);
    apply_table_style(&mut table);
    for name in registry.field_format_names() {
        table.add_row(vec!["field format".to_string(), name]);
    }
    for name in registry.check_names() {
        table.add_row(vec!["check".to_string(), name]);
    }
    println!("{table}");
    Ok(())
}

fn compile_icd(registry: &TypeRegistry, icd_path: &Path) -> Result<Schema> {
    let span = info_span!("compile", icd = %icd_path.display());
    let _guard = span.enter();
    let rows = icd_rows(icd_path)
        .with_context(|| format!("read ICD {}", icd_path.display()))?;
    let schema = Compiler::new(registry)
        .compile(&icd_path.display().to_string(), rows)
        .context("compile ICD")?;
    info!(
        field_count = schema.fields().len(),
        check_count = schema.check_descriptions().len(),
        "compiled ICD"
    );
    Ok(schema)
}

fn data_rows(schema: &Schema, data_path: &Path) -> Result<Vec<Vec<String>>> {
    let Some(data_format) = schema.data_format() else {
        bail!("ICD must declare a data format before data can be validated");
    };
    let rows = match data_format.format() {
        Format::Delimited => delimited_rows(data_path, data_format)
            .with_context(|| format!("read delimited data {}", data_path.display()))?,
        Format::Fixed => {
            let widths = schema
                .fixed_field_widths()
                .context("fixed schema must resolve every field to a single width")?;
            fixed_rows(data_path, &widths)
                .with_context(|| format!("read fixed-width data {}", data_path.display()))?
        }
        Format::Excel => {
            return Err(IngestError::Unsupported {
                format: data_format.format().to_string(),
            }
            .into());
        }
    };
    Ok(rows)
}

fn sql_dialect(arg: DialectArg) -> SqlDialect {
    match arg {
        DialectArg::Ansi => SqlDialect::Ansi,
        DialectArg::Db2 => SqlDialect::Db2,
        DialectArg::Mssql => SqlDialect::Mssql,
        DialectArg::Mysql => SqlDialect::Mysql,
        DialectArg::Oracle => SqlDialect::Oracle,
    }
}
