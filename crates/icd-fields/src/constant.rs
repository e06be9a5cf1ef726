use icd_model::{DataFormat, Range, tokenize};

use crate::{FieldCore, FieldFormat, FieldSyntaxError, FieldValue, FieldValueError, SqlAnsiType};

/// Accepts exactly one constant value; with an empty rule the field must
/// always be empty.
#[derive(Debug)]
pub struct ConstantFieldFormat {
    core: FieldCore,
    constant: String,
}

impl ConstantFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        let core = FieldCore::new(name, allow_empty, length_text, rule)?;
        let tokens = tokenize(core.rule()).map_err(|error| {
            FieldSyntaxError::new(format!("constant rule of field {name:?} is broken: {error}"))
        })?;
        let constant = match tokens.as_slice() {
            [] => {
                if !allow_empty {
                    return Err(FieldSyntaxError::new(format!(
                        "field {name:?} with empty constant rule must be allowed to be empty"
                    )));
                }
                String::new()
            }
            [token] if token.is_value() => token.text().to_string(),
            _ => {
                return Err(FieldSyntaxError::new(format!(
                    "constant rule of field {name:?} must be a single value but is: {:?}",
                    core.rule()
                )));
            }
        };
        Ok(Self { core, constant })
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

impl FieldFormat for ConstantFieldFormat {
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
        if self.constant.is_empty() {
            if value.is_empty() {
                return Ok(FieldValue::Empty);
            }
            return Err(FieldValueError::new(format!(
                "value for field {:?} must be empty but is: {value:?}",
                self.core.name()
            )));
        }
        if let Some(empty) = self.core.checked_empty_and_length(value)? {
            return Ok(empty);
        }
        if value != self.constant {
            return Err(FieldValueError::new(format!(
                "value for field {:?} is {value:?} but must be the constant: {:?}",
                self.core.name(),
                self.constant
            )));
        }
        Ok(FieldValue::Text(value.to_string()))
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        SqlAnsiType::Varchar {
            length: Some(self.constant.chars().count() as i64),
        }
    }

    fn choices(&self) -> Option<&[String]> {
        Some(std::slice::from_ref(&self.constant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_the_constant() {
        let format = ConstantFieldFormat::new("currency", false, "", "EUR").expect("format");
        assert_eq!(
            format.validated("EUR").expect("validated"),
            FieldValue::Text("EUR".to_string())
        );
        assert!(format.validated("USD").is_err());
    }

    #[test]
    fn empty_rule_means_always_empty() {
        let format = ConstantFieldFormat::new("reserved", true, "", "").expect("format");
        assert_eq!(format.validated("").expect("validated"), FieldValue::Empty);
        assert!(format.validated("x").is_err());
    }

    #[test]
    fn empty_rule_requires_allow_empty() {
        assert!(ConstantFieldFormat::new("reserved", false, "", "").is_err());
    }

    #[test]
    fn quoted_constant_keeps_spaces() {
        let format = ConstantFieldFormat::new("note", false, "", "'not set'").expect("format");
        assert!(format.validated("not set").is_ok());
    }

    #[test]
    fn multiple_values_are_a_syntax_error() {
        assert!(ConstantFieldFormat::new("currency", false, "", "EUR, USD").is_err());
    }
}
