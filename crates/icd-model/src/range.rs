#![deny(unsafe_code)]

use std::fmt;

use crate::error::SyntaxError;
use crate::tokens::{Token, tokenize};

/// One closed, half-open or open interval of a [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RangeItem {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl fmt::Display for RangeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) if lower == upper => write!(f, "{lower}"),
            (Some(lower), Some(upper)) => write!(f, "{lower}:{upper}"),
            (Some(lower), None) => write!(f, "{lower}:"),
            (None, Some(upper)) => write!(f, ":{upper}"),
            (None, None) => write!(f, ":"),
        }
    }
}

/// A set of integer intervals parsed from text like `"1:5"`, `"4"`,
/// `"10:"` or `"1:2, 5:9"`. Empty text yields an unbounded range.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Range {
    items: Vec<RangeItem>,
}

impl Range {
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(text)?;
        let mut items = Vec::new();
        if tokens.is_empty() {
            return Ok(Self { items });
        }

        for group in tokens.split(|token| *token == Token::Comma) {
            let item = match group {
                [Token::Number(number)] => {
                    let value = parse_int(number, text)?;
                    RangeItem {
                        lower: Some(value),
                        upper: Some(value),
                    }
                }
                [Token::Number(lower), Token::Colon, Token::Number(upper)] => {
                    let lower = parse_int(lower, text)?;
                    let upper = parse_int(upper, text)?;
                    if lower > upper {
                        return Err(SyntaxError::new(format!(
                            "lower limit {lower} must not be greater than upper limit {upper} \
                             in range: {text:?}"
                        )));
                    }
                    RangeItem {
                        lower: Some(lower),
                        upper: Some(upper),
                    }
                }
                [Token::Number(lower), Token::Colon] => RangeItem {
                    lower: Some(parse_int(lower, text)?),
                    upper: None,
                },
                [Token::Colon, Token::Number(upper)] => RangeItem {
                    lower: None,
                    upper: Some(parse_int(upper, text)?),
                },
                _ => {
                    return Err(SyntaxError::new(format!(
                        "range must be specified using integer numbers and a colon (:) \
                         but is: {text:?}"
                    )));
                }
            };
            items.push(item);
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[RangeItem] {
        &self.items
    }

    /// True when no interval constrains the value at all.
    pub fn is_unbounded(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: i64) -> bool {
        if self.items.is_empty() {
            return true;
        }
        self.items.iter().any(|item| {
            item.lower.is_none_or(|lower| value >= lower)
                && item.upper.is_none_or(|upper| value <= upper)
        })
    }

    /// The single `n` of a range shaped exactly `[n, n]`, if it has that shape.
    pub fn single_value(&self) -> Option<i64> {
        match self.items.as_slice() {
            [
                RangeItem {
                    lower: Some(lower),
                    upper: Some(upper),
                },
            ] if lower == upper => Some(*lower),
            _ => None,
        }
    }

    pub fn lower_limit(&self) -> Option<i64> {
        let mut result: Option<i64> = None;
        for item in &self.items {
            let lower = item.lower?;
            result = Some(result.map_or(lower, |current| current.min(lower)));
        }
        result
    }

    pub fn upper_limit(&self) -> Option<i64> {
        let mut result: Option<i64> = None;
        for item in &self.items {
            let upper = item.upper?;
            result = Some(result.map_or(upper, |current| current.max(upper)));
        }
        result
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in &self.items {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
            first = false;
        }
        Ok(())
    }
}

fn parse_int(number: &str, text: &str) -> Result<i64, SyntaxError> {
    number.parse().map_err(|_| {
        SyntaxError::new(format!(
            "range limit {number:?} must be an integer number in range: {text:?}"
        ))
    })
}
