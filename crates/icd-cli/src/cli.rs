//! CLI argument definitions for icdcheck.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "icdcheck",
    version,
    about = "Validate tabular data files against Interface Control Documents",
    long_about = "Validate tabular data files (delimited, fixed-width) against a \
                  declarative schema written in the same tabular form, an \
                  Interface Control Document (ICD).\n\n\
                  An ICD enumerates the data format, the field definitions and \
                  row-level checks; icdcheck compiles it and reports every data \
                  value or check violation with an exact location."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile an ICD and validate a data file against it.
    Validate(ValidateArgs),

    /// Compile an ICD and print its fields and checks.
    Compile(CompileArgs),

    /// Generate a CREATE TABLE statement from an ICD.
    Sql(SqlArgs),

    /// List all registered field format and check types.
    Types,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the ICD file (delimited).
    #[arg(value_name = "ICD")]
    pub icd_path: PathBuf,

    /// Path to the data file to validate.
    #[arg(value_name = "DATA")]
    pub data_path: PathBuf,

    /// Report output format.
    #[arg(long = "report", value_enum, default_value = "table")]
    pub report: ReportFormatArg,
}

#[derive(Parser)]
pub struct CompileArgs {
    /// Path to the ICD file (delimited).
    #[arg(value_name = "ICD")]
    pub icd_path: PathBuf,
}

#[derive(Parser)]
pub struct SqlArgs {
    /// Path to the ICD file (delimited).
    #[arg(value_name = "ICD")]
    pub icd_path: PathBuf,

    /// Target SQL dialect.
    #[arg(long = "dialect", value_enum, default_value = "ansi")]
    pub dialect: DialectArg,

    /// Table name (default: the ICD file stem).
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,
}

/// Validation report output choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// SQL dialect choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum DialectArg {
    Ansi,
    Db2,
    Mssql,
    Mysql,
    Oracle,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
