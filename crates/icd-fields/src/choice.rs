use icd_model::{DataFormat, Range, human_readable_join, parse_choices};

use crate::{FieldCore, FieldFormat, FieldSyntaxError, FieldValue, FieldValueError, SqlAnsiType};

/// Accepts only values from a comma-separated choice list rule.
#[derive(Debug)]
pub struct ChoiceFieldFormat {
    core: FieldCore,
    choices: Vec<String>,
}

impl ChoiceFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        let core = FieldCore::new(name, allow_empty, length_text, rule)?;
        let choices = parse_choices(core.rule()).map_err(|error| {
            FieldSyntaxError::new(format!("choice rule of field {name:?} is broken: {error}"))
        })?;
        if choices.is_empty() {
            return Err(FieldSyntaxError::new(format!(
                "choice rule of field {name:?} must contain at least one value"
            )));
        }
        Ok(Self { core, choices })
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

impl FieldFormat for ChoiceFieldFormat {
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
        if !self.choices.iter().any(|choice| choice == value) {
            return Err(FieldValueError::new(format!(
                "value for field {:?} is {value:?} but must be one of: {}",
                self.core.name(),
                human_readable_join(&self.choices)
            )));
        }
        Ok(FieldValue::Text(value.to_string()))
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        let longest = self
            .choices
            .iter()
            .map(|choice| choice.chars().count() as i64)
            .max();
        SqlAnsiType::Varchar {
            length: self.core.length().upper_limit().or(longest),
        }
    }

    fn choices(&self) -> Option<&[String]> {
        Some(&self.choices)
    }
}
