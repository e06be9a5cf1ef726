use regex::Regex;

use icd_model::{DataFormat, Range};

use crate::{FieldCore, FieldFormat, FieldSyntaxError, FieldValue, FieldValueError, SqlAnsiType};

/// Accepts values matching a shell-style pattern rule (`*` and `?`).
#[derive(Debug)]
pub struct PatternFieldFormat {
    core: FieldCore,
    regex: Regex,
}

impl PatternFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        let core = FieldCore::new(name, allow_empty, length_text, rule)?;
        if core.rule().is_empty() {
            return Err(FieldSyntaxError::new(format!(
                "pattern of field {name:?} must be specified as rule, e.g. \"h*llo?\""
            )));
        }
        let regex = Regex::new(&translate_pattern(core.rule())).map_err(|error| {
            FieldSyntaxError::new(format!("pattern of field {name:?} is broken: {error}"))
        })?;
        Ok(Self { core, regex })
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

/// Translate a shell-style pattern to an anchored regular expression.
fn translate_pattern(pattern: &str) -> String {
    let mut result = String::with_capacity(pattern.len() + 2);
    result.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => result.push_str(".*"),
            '?' => result.push('.'),
            _ => result.push_str(&regex::escape(&ch.to_string())),
        }
    }
    result.push('$');
    result
}

impl FieldFormat for PatternFieldFormat {
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
        if !self.regex.is_match(value) {
            return Err(FieldValueError::new(format!(
                "value for field {:?} is {value:?} but must match pattern: {:?}",
                self.core.name(),
                self.core.rule()
            )));
        }
        Ok(FieldValue::Text(value.to_string()))
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        SqlAnsiType::Varchar {
            length: self.core.length().upper_limit(),
        }
    }
}

/// Accepts values matching a regular expression rule.
#[derive(Debug)]
pub struct RegexFieldFormat {
    core: FieldCore,
    regex: Regex,
}

impl RegexFieldFormat {
    pub fn new(
        name: &str,
        allow_empty: bool,
        length_text: &str,
        rule: &str,
    ) -> Result<Self, FieldSyntaxError> {
        let core = FieldCore::new(name, allow_empty, length_text, rule)?;
        if core.rule().is_empty() {
            return Err(FieldSyntaxError::new(format!(
                "regular expression of field {name:?} must be specified as rule"
            )));
        }
        let regex = Regex::new(core.rule()).map_err(|error| {
            FieldSyntaxError::new(format!(
                "regular expression of field {name:?} is broken: {error}"
            ))
        })?;
        Ok(Self { core, regex })
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

impl FieldFormat for RegexFieldFormat {
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
        if !self.regex.is_match(value) {
            return Err(FieldValueError::new(format!(
                "value for field {:?} is {value:?} but must match regular expression: {:?}",
                self.core.name(),
                self.core.rule()
            )));
        }
        Ok(FieldValue::Text(value.to_string()))
    }

    fn sql_ansi_type(&self) -> SqlAnsiType {
        SqlAnsiType::Varchar {
            length: self.core.length().upper_limit(),
        }
    }
}
