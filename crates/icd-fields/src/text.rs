use icd_model::{DataFormat, Range};

use crate::{FieldCore, FieldFormat, FieldSyntaxError, FieldValue, FieldValueError, SqlAnsiType};

/// Accepts any text within the declared length range.
#[derive(Debug)]
pub struct TextFieldFormat {
    core: FieldCore,
}

impl TextFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        Ok(Self {
            core: FieldCore::new(name, allow_empty, length_text, rule)?,
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

impl FieldFormat for TextFieldFormat {
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
        Ok(FieldValue::Text(value.to_string()))
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        SqlAnsiType::Varchar {
            length: self.core.length().upper_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(allow_empty: bool, length_text: &str) -> TextFieldFormat {
        TextFieldFormat::new("surname", allow_empty, length_text, "").expect("format")
    }

    #[test]
    fn accepts_text_within_length() {
        let format = format(false, ":10");
        assert_eq!(
            format.validated("Miller").expect("validated"),
            FieldValue::Text("Miller".to_string())
        );
    }

    #[test]
    fn rejects_text_beyond_length() {
        let format = format(false, ":3");
        assert!(format.validated("Miller").is_err());
    }
}
