use icd_model::{DataFormat, Range};

use crate::{FieldCore, FieldFormat, FieldSyntaxError, FieldValue, FieldValueError, SqlAnsiType};

const DEFAULT_PRECISION: u32 = 18;
const DEFAULT_SCALE: u32 = 6;

/// Accepts decimal numbers, honoring the data format's decimal and
/// thousands separators.
#[derive(Debug)]
pub struct DecimalFieldFormat {
    core: FieldCore,
    decimal_separator: char,
    thousands_separator: Option<char>,
}

impl DecimalFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
        data_format: &DataFormat,
    ) -> Result<Self, FieldSyntaxError> {
        let core = FieldCore::new(name, allow_empty, length_text, rule)?;
        if !core.rule().is_empty() {
            return Err(FieldSyntaxError::new(format!(
                "rule for decimal field {name:?} must be empty but is: {:?}",
                core.rule()
            )));
        }
        Ok(Self {
            core,
            decimal_separator: data_format.decimal_separator(),
            thousands_separator: data_format.thousands_separator(),
        })
    }

    pub fn from_row(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
        data_format: &DataFormat,
    ) -> Result<Box<dyn FieldFormat>, FieldSyntaxError> {
        Ok(Box::new(Self::new(
            name,
            allow_empty,
            length_text,
            rule,
            data_format,
        )?))
    }
}

impl FieldFormat for DecimalFieldFormat {
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
        let mut normalized = String::with_capacity(value.len());
        for ch in value.trim().chars() {
            if Some(ch) == self.thousands_separator {
                continue;
            }
            if ch == self.decimal_separator {
                normalized.push('.');
            } else {
                normalized.push(ch);
            }
        }
        let number: f64 = normalized.parse().map_err(|_| {
            FieldValueError::new(format!(
                "value for field {:?} must be a decimal number but is: {value:?}",
                self.core.name()
            ))
        })?;
        if !number.is_finite() {
            return Err(FieldValueError::new(format!(
                "value for field {:?} must be a finite decimal number but is: {value:?}",
                self.core.name()
            )));
        }
        Ok(FieldValue::Decimal(number))
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        let precision = self
            .core
            .length()
            .upper_limit()
            .map_or(DEFAULT_PRECISION, |upper| {
                u32::try_from(upper).unwrap_or(DEFAULT_PRECISION).max(1)
            });
        SqlAnsiType::Decimal {
            precision,
            scale: DEFAULT_SCALE.min(precision.saturating_sub(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delimited_format() -> DataFormat {
        DataFormat::new("delimited").expect("format")
    }

    #[test]
    fn accepts_plain_decimals() {
        let format =
            DecimalFieldFormat::new("amount", false, "", "", &delimited_format()).expect("format");
        assert_eq!(
            format.validated("17.23").expect("validated"),
            FieldValue::Decimal(17.23)
        );
    }

    #[test]
    fn honors_separator_properties() {
        let mut data_format = delimited_format();
        data_format
            .set_property("decimal_separator", ",")
            .expect("set property");
        data_format
            .set_property("thousands_separator", ".")
            .expect("set property");
        let format =
            DecimalFieldFormat::new("amount", false, "", "", &data_format).expect("format");
        assert_eq!(
            format.validated("1.234,56").expect("validated"),
            FieldValue::Decimal(1234.56)
        );
    }

    #[test]
    fn rejects_text() {
        let format =
            DecimalFieldFormat::new("amount", false, "", "", &delimited_format()).expect("format");
        assert!(format.validated("lots").is_err());
        assert!(format.validated("inf").is_err());
    }

    #[test]
    fn rejects_non_empty_rule() {
        assert!(DecimalFieldFormat::new("amount", false, "", "1:2", &delimited_format()).is_err());
    }
}
