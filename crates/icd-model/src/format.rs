#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use crate::error::SyntaxError;
use crate::text::human_readable_join;

/// Property names understood by [`DataFormat::set_property`].
pub mod property {
    pub const DECIMAL_SEPARATOR: &str = "decimal_separator";
    pub const ENCODING: &str = "encoding";
    pub const ESCAPE_CHARACTER: &str = "escape_character";
    pub const HEADER: &str = "header";
    pub const ITEM_DELIMITER: &str = "item_delimiter";
    pub const LINE_DELIMITER: &str = "line_delimiter";
    pub const SHEET: &str = "sheet";
    pub const QUOTE_CHARACTER: &str = "quote_character";
    pub const THOUSANDS_SEPARATOR: &str = "thousands_separator";
}

const LINE_DELIMITERS: &[&str] = &["any", "cr", "crlf", "lf"];

/// The physical layout family of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Delimited,
    Excel,
    Fixed,
}

impl Format {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "delimited" => Some(Self::Delimited),
            "excel" => Some(Self::Excel),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Excel => "excel",
            Self::Fixed => "fixed",
        }
    }

    pub fn names() -> Vec<String> {
        vec![
            "delimited".to_string(),
            "excel".to_string(),
            "fixed".to_string(),
        ]
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The layout family of a data source plus its named properties.
///
/// Created by the first data-format row of an ICD; later data-format rows
/// only set additional properties.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DataFormat {
    format: Format,
    properties: BTreeMap<String, String>,
}

impl DataFormat {
    pub fn new(name: &str) -> Result<Self, SyntaxError> {
        let format = Format::parse(name).ok_or_else(|| {
            SyntaxError::new(format!(
                "data format is {name:?} but must be one of: {}",
                human_readable_join(&Format::names())
            ))
        })?;
        Ok(Self {
            format,
            properties: BTreeMap::new(),
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_fixed(&self) -> bool {
        self.format == Format::Fixed
    }

    /// Set a named property. Names are normalized to lower case with
    /// underscores; values are stored lower-cased.
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<(), SyntaxError> {
        let name = normalized_property_name(name);
        let value = value.trim().to_lowercase();

        let allowed = self.allowed_properties();
        if !allowed.contains(&name.as_str()) {
            return Err(SyntaxError::new(format!(
                "property {name:?} for data format {} must be one of: {}",
                self.format,
                human_readable_join(
                    &allowed
                        .iter()
                        .map(|p| (*p).to_string())
                        .collect::<Vec<String>>()
                ),
            )));
        }

        match name.as_str() {
            property::ITEM_DELIMITER | property::QUOTE_CHARACTER | property::ESCAPE_CHARACTER => {
                parse_character(&name, &value)?;
            }
            property::DECIMAL_SEPARATOR | property::THOUSANDS_SEPARATOR => {
                if value.chars().count() != 1 {
                    return Err(SyntaxError::new(format!(
                        "property {name:?} must be a single character but is: {value:?}"
                    )));
                }
            }
            property::LINE_DELIMITER => {
                if !LINE_DELIMITERS.contains(&value.as_str()) {
                    return Err(SyntaxError::new(format!(
                        "property {name:?} is {value:?} but must be one of: {}",
                        human_readable_join(
                            &LINE_DELIMITERS
                                .iter()
                                .map(|d| (*d).to_string())
                                .collect::<Vec<String>>()
                        ),
                    )));
                }
            }
            property::HEADER => {
                parse_flag(&name, &value)?;
            }
            property::SHEET => {
                value.parse::<u32>().map_err(|_| {
                    SyntaxError::new(format!(
                        "property {name:?} must be a number but is: {value:?}"
                    ))
                })?;
            }
            _ => {}
        }

        self.properties.insert(name, value);
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn item_delimiter(&self) -> char {
        self.named_character(property::ITEM_DELIMITER, ',')
    }

    pub fn quote_character(&self) -> char {
        self.named_character(property::QUOTE_CHARACTER, '"')
    }

    pub fn decimal_separator(&self) -> char {
        self.single_character(property::DECIMAL_SEPARATOR, '.')
    }

    pub fn thousands_separator(&self) -> Option<char> {
        self.property(property::THOUSANDS_SEPARATOR)
            .and_then(|value| value.chars().next())
    }

    /// True when the first data row is a header that should be skipped.
    pub fn has_header(&self) -> bool {
        self.property(property::HEADER)
            .and_then(|value| parse_flag(property::HEADER, value).ok())
            .unwrap_or(false)
    }

    fn named_character(&self, name: &str, default: char) -> char {
        self.property(name)
            .and_then(|value| parse_character(name, value).ok())
            .unwrap_or(default)
    }

    fn single_character(&self, name: &str, default: char) -> char {
        self.property(name)
            .and_then(|value| value.chars().next())
            .unwrap_or(default)
    }

    fn allowed_properties(&self) -> &'static [&'static str] {
        match self.format {
            Format::Delimited => &[
                property::DECIMAL_SEPARATOR,
                property::ENCODING,
                property::ESCAPE_CHARACTER,
                property::HEADER,
                property::ITEM_DELIMITER,
                property::LINE_DELIMITER,
                property::QUOTE_CHARACTER,
                property::THOUSANDS_SEPARATOR,
            ],
            Format::Fixed => &[
                property::DECIMAL_SEPARATOR,
                property::ENCODING,
                property::HEADER,
                property::LINE_DELIMITER,
                property::THOUSANDS_SEPARATOR,
            ],
            Format::Excel => &[property::HEADER, property::SHEET],
        }
    }
}

fn normalized_property_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// A delimiter-like property value: a single character or a symbolic name.
fn parse_character(name: &str, value: &str) -> Result<char, SyntaxError> {
    match value {
        "comma" => Ok(','),
        "semicolon" => Ok(';'),
        "space" => Ok(' '),
        "tab" => Ok('\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(ch),
                _ => Err(SyntaxError::new(format!(
                    "property {name:?} must be a single character or one of: \
                     'comma', 'semicolon', 'space' or 'tab' but is: {value:?}"
                ))),
            }
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, SyntaxError> {
    match value {
        "true" | "yes" | "1" | "x" => Ok(true),
        "false" | "no" | "0" | "" => Ok(false),
        _ => Err(SyntaxError::new(format!(
            "property {name:?} must be a truth value but is: {value:?}"
        ))),
    }
}
