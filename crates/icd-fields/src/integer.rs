use icd_model::{DataFormat, Range};

use crate::{FieldCore, FieldFormat, FieldSyntaxError, FieldValue, FieldValueError, SqlAnsiType};

/// The default valid range when the rule leaves it unspecified: 32 bit signed.
const DEFAULT_RANGE_TEXT: &str = "-2147483648:2147483647";

/// Accepts integer numbers, optionally restricted by a range rule.
#[derive(Debug)]
pub struct IntegerFieldFormat {
    core: FieldCore,
    valid_range: Range,
}

impl IntegerFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        let core = FieldCore::new(name, allow_empty, length_text, rule)?;
        let range_text = if core.rule().is_empty() {
            DEFAULT_RANGE_TEXT
        } else {
            core.rule()
        };
        let valid_range = Range::parse(range_text).map_err(|error| {
            FieldSyntaxError::new(format!("rule of field {name:?} is broken: {error}"))
        })?;
        Ok(Self { core, valid_range })
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

    pub fn valid_range(&self) -> &Range {
        &self.valid_range
    }
}

impl FieldFormat for IntegerFieldFormat {
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
        let number: i64 = value.trim().parse().map_err(|_| {
            FieldValueError::new(format!(
                "value for field {:?} must be an integer number but is: {value:?}",
                self.core.name()
            ))
        })?;
        if !self.valid_range.contains(number) {
            return Err(FieldValueError::new(format!(
                "value for field {:?} is {number} but must be within range: {}",
                self.core.name(),
                self.valid_range
            )));
        }
        Ok(FieldValue::Integer(number))
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        SqlAnsiType::Integer {
            valid_range: self.valid_range.clone(),
        }
    }
}
