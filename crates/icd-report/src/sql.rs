#![deny(unsafe_code)]

use std::fmt;

use icd_compile::{FieldDefinition, Schema};
use icd_fields::SqlAnsiType;
use icd_model::Range;

const DEFAULT_VARCHAR_LENGTH: i64 = 255;

/// Target SQL dialect for DDL generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Ansi,
    Db2,
    Mssql,
    Mysql,
    Oracle,
}

impl SqlDialect {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ansi" => Some(Self::Ansi),
            "db2" => Some(Self::Db2),
            "mssql" => Some(Self::Mssql),
            "mysql" => Some(Self::Mysql),
            "oracle" => Some(Self::Oracle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::Db2 => "db2",
            Self::Mssql => "mssql",
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(column definition, optional constraint)` fragments of one field.
#[derive(Debug, Clone)]
struct SqlFragment {
    column: String,
    constraint: Option<String>,
}

/// Build one `create table` statement covering every field of `schema`.
pub fn create_table_sql(schema: &Schema, table_name: &str, dialect: SqlDialect) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut constraints: Vec<String> = Vec::new();

    for field in schema.fields() {
        let fragment = field_fragment(field, dialect);
        lines.push(fragment.column);
        if let Some(constraint) = fragment.constraint {
            constraints.push(constraint);
        }
    }
    lines.extend(constraints);

    let mut result = format!("create table {table_name} (\n");
    for (index, line) in lines.iter().enumerate() {
        result.push_str("    ");
        result.push_str(line);
        if index + 1 < lines.len() {
            result.push(',');
        }
        result.push('\n');
    }
    result.push_str(");");
    result
}

fn field_fragment(field: &FieldDefinition, dialect: SqlDialect) -> SqlFragment {
    let name = field.name();
    let format = field.format();

    let (type_name, mut constraint) = match format.sql_ansi_type() {
        SqlAnsiType::Varchar { length } => {
            let length = length.unwrap_or(DEFAULT_VARCHAR_LENGTH);
            (
                format!("{}({length})", varchar_name(dialect)),
                length_constraint(name, format.length()),
            )
        }
        SqlAnsiType::Integer { valid_range } => (
            integer_name(dialect, &valid_range).to_string(),
            range_constraint(name, &valid_range),
        ),
        SqlAnsiType::Decimal { precision, scale } => (
            match dialect {
                SqlDialect::Oracle => format!("number({precision},{scale})"),
                _ => format!("decimal({precision},{scale})"),
            },
            None,
        ),
        SqlAnsiType::Date { has_date, has_time } => {
            (date_name(dialect, has_date, has_time).to_string(), None)
        }
    };

    if let Some(choices) = format.choices() {
        constraint = Some(choices_constraint(name, choices));
    }

    let mut column = format!("{name} {type_name}");
    if !format.is_allow_empty() {
        column.push_str(" not null");
    }
    SqlFragment { column, constraint }
}

fn varchar_name(dialect: SqlDialect) -> &'static str {
    match dialect {
        SqlDialect::Oracle => "varchar2",
        _ => "varchar",
    }
}

fn integer_name(dialect: SqlDialect, valid_range: &Range) -> &'static str {
    if range_fits(valid_range, i64::from(i16::MIN), i64::from(i16::MAX)) {
        "smallint"
    } else if range_fits(valid_range, i64::from(i32::MIN), i64::from(i32::MAX)) {
        match dialect {
            SqlDialect::Mssql => "int",
            _ => "integer",
        }
    } else {
        match dialect {
            SqlDialect::Oracle => "number(19)",
            _ => "bigint",
        }
    }
}

fn range_fits(valid_range: &Range, min: i64, max: i64) -> bool {
    match (valid_range.lower_limit(), valid_range.upper_limit()) {
        (Some(lower), Some(upper)) => lower >= min && upper <= max,
        _ => false,
    }
}

fn date_name(dialect: SqlDialect, has_date: bool, has_time: bool) -> &'static str {
    match (has_date, has_time) {
        (true, true) => match dialect {
            SqlDialect::Mssql | SqlDialect::Mysql => "datetime",
            _ => "timestamp",
        },
        (_, false) => "date",
        (false, true) => match dialect {
            SqlDialect::Oracle => "timestamp",
            _ => "time",
        },
    }
}

/// A check constraint limiting the character length of a varchar column.
fn length_constraint(name: &str, length: &Range) -> Option<String> {
    let condition = match (length.lower_limit(), length.upper_limit()) {
        (Some(lower), Some(upper)) if lower == upper => format!("length({name}) = {lower}"),
        (Some(lower), Some(upper)) => format!("length({name}) between {lower} and {upper}"),
        (Some(lower), None) => format!("length({name}) >= {lower}"),
        (None, Some(upper)) => format!("length({name}) <= {upper}"),
        (None, None) => return None,
    };
    Some(format!("constraint chk_length_{name} check ({condition})"))
}

/// A check constraint limiting an integer column to its valid range.
fn range_constraint(name: &str, valid_range: &Range) -> Option<String> {
    let mut conditions = Vec::new();
    for item in valid_range.items() {
        let condition = match (item.lower, item.upper) {
            (Some(lower), Some(upper)) => format!("{name} between {lower} and {upper}"),
            (Some(lower), None) => format!("{name} >= {lower}"),
            (None, Some(upper)) => format!("{name} <= {upper}"),
            (None, None) => continue,
        };
        conditions.push(condition);
    }
    if conditions.is_empty() {
        return None;
    }
    Some(format!(
        "constraint chk_{name} check ({})",
        conditions.join(" or ")
    ))
}

/// A check constraint restricting a column to its literal choices.
fn choices_constraint(name: &str, choices: &[String]) -> String {
    let all_numeric = choices
        .iter()
        .all(|choice| !choice.is_empty() && choice.chars().all(|c| c.is_ascii_digit()));
    let rendered: Vec<String> = if all_numeric {
        choices.to_vec()
    } else {
        choices
            .iter()
            .map(|choice| format!("'{}'", choice.replace('\'', "''")))
            .collect()
    };
    format!(
        "constraint chk_rule_{name} check ({name} in ({}))",
        rendered.join(", ")
    )
}
