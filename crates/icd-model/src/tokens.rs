#![deny(unsafe_code)]

use crate::error::SyntaxError;

/// A single lexeme of an inline rule string.
///
/// Quoted strings carry their content with the enclosing quote characters
/// already stripped. Insignificant whitespace never produces a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Name(String),
    Number(String),
    Str(String),
    Comma,
    Colon,
    Operator(String),
}

impl Token {
    pub fn text(&self) -> &str {
        match self {
            Token::Name(text) | Token::Number(text) | Token::Str(text) | Token::Operator(text) => {
                text
            }
            Token::Comma => ",",
            Token::Colon => ":",
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Token::Name(_) | Token::Number(_) | Token::Str(_))
    }
}

/// Lex `text` into tokens, dropping whitespace, stopping at end of input.
pub fn tokenize(text: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Name(name));
        } else if ch.is_ascii_digit() || ch == '-' {
            chars.next();
            let mut number = String::from(ch);
            if ch == '-' && !chars.peek().is_some_and(char::is_ascii_digit) {
                return Err(SyntaxError::new(format!(
                    "minus sign (-) must be followed by a digit in: {text:?}"
                )));
            }
            let mut seen_point = false;
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() || (c == '.' && !seen_point) {
                    seen_point |= c == '.';
                    number.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(number));
        } else if ch == '"' || ch == '\'' {
            chars.next();
            let mut content = String::new();
            let mut terminated = false;
            for c in chars.by_ref() {
                if c == ch {
                    terminated = true;
                    break;
                }
                content.push(c);
            }
            if !terminated {
                return Err(SyntaxError::new(format!(
                    "string must end with a closing quote ({ch}) in: {text:?}"
                )));
            }
            tokens.push(Token::Str(content));
        } else if ch == ',' {
            chars.next();
            tokens.push(Token::Comma);
        } else if ch == ':' {
            chars.next();
            tokens.push(Token::Colon);
        } else if ch == '<' || ch == '>' {
            chars.next();
            let mut operator = String::from(ch);
            if chars.peek() == Some(&'=') {
                operator.push('=');
                chars.next();
            }
            tokens.push(Token::Operator(operator));
        } else if ch == '=' {
            chars.next();
            if chars.peek() == Some(&'=') {
                chars.next();
            }
            tokens.push(Token::Operator("==".to_string()));
        } else if ch == '!' {
            chars.next();
            if chars.peek() != Some(&'=') {
                return Err(SyntaxError::new(format!(
                    "exclamation mark (!) must be followed by = in: {text:?}"
                )));
            }
            chars.next();
            tokens.push(Token::Operator("!=".to_string()));
        } else {
            return Err(SyntaxError::new(format!(
                "rule contains unsupported character {ch:?} in: {text:?}"
            )));
        }
    }

    Ok(tokens)
}

/// Split a comma-separated choice rule into its literal values.
///
/// Tokens are read pairwise: a value, then a comma or end of input. An empty
/// rule yields no choices.
pub fn parse_choices(rule: &str) -> Result<Vec<String>, SyntaxError> {
    let mut choices = Vec::new();
    let mut tokens = tokenize(rule)?.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let choice = match token {
            Token::Name(text) | Token::Number(text) | Token::Str(text) => text,
            other => {
                return Err(SyntaxError::new(format!(
                    "choice must be a name, number or string but is: {:?}",
                    other.text()
                )));
            }
        };
        choices.push(choice);
        match tokens.next() {
            None => break,
            Some(Token::Comma) => {
                if tokens.peek().is_none() {
                    return Err(SyntaxError::new(format!(
                        "choice must follow after comma (,) at the end of: {rule:?}"
                    )));
                }
            }
            Some(other) => {
                return Err(SyntaxError::new(format!(
                    "choices must be separated by a comma (,) but found: {:?}",
                    other.text()
                )));
            }
        }
    }

    Ok(choices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_whitespace() {
        let tokens = tokenize("  red ,\tgreen ").expect("tokenize");
        assert_eq!(
            tokens,
            vec![
                Token::Name("red".to_string()),
                Token::Comma,
                Token::Name("green".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_strips_quotes() {
        let tokens = tokenize("\"male or female\", 'other'").expect("tokenize");
        assert_eq!(tokens[0], Token::Str("male or female".to_string()));
        assert_eq!(tokens[2], Token::Str("other".to_string()));
    }

    #[test]
    fn tokenize_rejects_unterminated_string() {
        assert!(tokenize("'oops").is_err());
    }

    #[test]
    fn parse_choices_reads_pairwise() {
        let choices = parse_choices("female, male, other").expect("choices");
        assert_eq!(choices, vec!["female", "male", "other"]);
    }

    #[test]
    fn parse_choices_accepts_numbers_and_strings() {
        let choices = parse_choices("1, '2 b', three").expect("choices");
        assert_eq!(choices, vec!["1", "2 b", "three"]);
    }

    #[test]
    fn parse_choices_rejects_trailing_comma() {
        assert!(parse_choices("red, green,").is_err());
    }

    #[test]
    fn parse_choices_rejects_missing_comma() {
        assert!(parse_choices("red green").is_err());
    }

    #[test]
    fn parse_choices_of_empty_rule_is_empty() {
        assert_eq!(parse_choices("").expect("choices"), Vec::<String>::new());
    }
}
