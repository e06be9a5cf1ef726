use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use icd_model::{DataFormat, Range};

use crate::{FieldCore, FieldFormat, FieldSyntaxError, FieldValue, FieldValueError, SqlAnsiType};

/// Human-readable date tokens and their strftime translations. Order
/// matters: longer tokens must match before their prefixes.
const DATE_TOKENS: &[(&str, &str, bool)] = &[
    ("YYYY", "%Y", true),
    ("YY", "%y", true),
    ("MM", "%m", true),
    ("DD", "%d", true),
    ("hh", "%H", false),
    ("mm", "%M", false),
    ("ss", "%S", false),
];

/// Accepts dates, times or date-times described by a human-readable rule
/// such as `DD.MM.YYYY` or `YYYY-MM-DD hh:mm:ss`.
#[derive(Debug)]
pub struct DateTimeFieldFormat {
    core: FieldCore,
    strftime_format: String,
    has_date: bool,
    has_time: bool,
}

impl DateTimeFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        let core = FieldCore::new(name, allow_empty, length_text, rule)?;
        if core.rule().is_empty() {
            return Err(FieldSyntaxError::new(format!(
                "date format of field {name:?} must be specified as rule, e.g. \"DD.MM.YYYY\""
            )));
        }
        let (strftime_format, has_date, has_time) = translate_rule(core.rule());
        if !has_date && !has_time {
            return Err(FieldSyntaxError::new(format!(
                "date format {:?} of field {name:?} must contain at least one of: \
                 YYYY, YY, MM, DD, hh, mm or ss",
                core.rule()
            )));
        }
        Ok(Self {
            core,
            strftime_format,
            has_date,
            has_time,
        })
    }

    pub fn from_row(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
        _data_format: &DataFormat,
    ) -> Result<Box<dyn FieldFormat>, FieldSyntaxError> {
        Ok(Box::new(Self::new(name, allow_empty, length_text, rule)?))
    }
}

fn translate_rule(rule: &str) -> (String, bool, bool) {
    let mut format = String::with_capacity(rule.len());
    let mut has_date = false;
    let mut has_time = false;
    let mut rest = rule;

    'outer: while !rest.is_empty() {
        for (token, translated, is_date) in DATE_TOKENS {
            if let Some(remaining) = rest.strip_prefix(token) {
                format.push_str(translated);
                has_date |= is_date;
                has_time |= !is_date;
                rest = remaining;
                continue 'outer;
            }
        }
        let ch = rest.chars().next().expect("rest is non-empty");
        if ch == '%' {
            format.push_str("%%");
        } else {
            format.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }

    (format, has_date, has_time)
}

impl FieldFormat for DateTimeFieldFormat {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn is_allow_empty(&self) -> bool {
        self.core.is_allow_empty()
    }

    fn length(&self) -> &Range {
        self.core.length()
    }

    fn rule(&self) -> &str {
        self.core.rule()
    }

    fn validated(&self, value: &str) -> Result<FieldValue, FieldValueError> {
        if let Some(empty) = self.core.checked_empty_and_length(value)? {
            return Ok(empty);
        }
        let trimmed = value.trim();
        let reject = || {
            FieldValueError::new(format!(
                "value for field {:?} must match date format {:?} but is: {value:?}",
                self.core.name(),
                self.core.rule()
            ))
        };
        match (self.has_date, self.has_time) {
            (true, true) => NaiveDateTime::parse_from_str(trimmed, &self.strftime_format)
                .map(FieldValue::DateTime)
                .map_err(|_| reject()),
            (true, false) => NaiveDate::parse_from_str(trimmed, &self.strftime_format)
                .map(FieldValue::Date)
                .map_err(|_| reject()),
            (false, true) => NaiveTime::parse_from_str(trimmed, &self.strftime_format)
                .map(FieldValue::Time)
                .map_err(|_| reject()),
            (false, false) => unreachable!("constructor requires a date or time token"),
        }
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        SqlAnsiType::Date {
            has_date: self.has_date,
            has_time: self.has_time,
        }
    }
}
