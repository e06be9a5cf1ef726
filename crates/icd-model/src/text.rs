#![deny(unsafe_code)]

use crate::error::SyntaxError;

/// Join `items` for an error message: `'a'`, `'a' or 'b'`, `'a', 'b' or 'c'`.
pub fn human_readable_join(items: &[String]) -> String {
    let mut result = String::new();
    let count = items.len();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            if index == count - 1 {
                result.push_str(" or ");
            } else {
                result.push_str(", ");
            }
        }
        result.push('\'');
        result.push_str(item);
        result.push('\'');
    }
    result
}

/// Validate that `value` is a single bare identifier (ASCII letters, digits
/// and underscore, not starting with a digit) and return it trimmed.
///
/// `kind` names the value in error messages, e.g. `"field name"`.
pub fn validated_identifier(kind: &str, value: &str) -> Result<String, SyntaxError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SyntaxError::new(format!(
            "{kind} must not be empty but was: {value:?}"
        )));
    }

    let mut words = trimmed.split_whitespace();
    let first = words.next().unwrap_or_default();
    if let Some(second) = words.next() {
        return Err(SyntaxError::new(format!(
            "{kind} must be a single word, but after {first:?} there also is {second:?}"
        )));
    }

    let mut chars = first.chars();
    let leading_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !leading_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SyntaxError::new(format!(
            "{kind} must contain only ASCII letters, digits and underscore (_) \
             but is: {first:?}"
        )));
    }

    Ok(first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_small_lists() {
        assert_eq!(human_readable_join(&[]), "");
        assert_eq!(human_readable_join(&["a".to_string()]), "'a'");
        assert_eq!(
            human_readable_join(&["a".to_string(), "b".to_string()]),
            "'a' or 'b'"
        );
        assert_eq!(
            human_readable_join(&["a".to_string(), "b".to_string(), "c".to_string()]),
            "'a', 'b' or 'c'"
        );
    }

    #[test]
    fn identifier_accepts_bare_names() {
        assert_eq!(
            validated_identifier("field name", " customer_id ").expect("identifier"),
            "customer_id"
        );
        assert_eq!(
            validated_identifier("field name", "_x9").expect("identifier"),
            "_x9"
        );
    }

    #[test]
    fn identifier_rejects_empty() {
        let error = validated_identifier("field name", "  ").expect_err("must fail");
        assert!(error.to_string().contains("must not be empty"));
    }

    #[test]
    fn identifier_rejects_multiple_words() {
        let error = validated_identifier("field name", "first second").expect_err("must fail");
        assert!(error.to_string().contains("single word"));
    }

    #[test]
    fn identifier_rejects_punctuation_and_leading_digit() {
        assert!(validated_identifier("field name", "customer-id").is_err());
        assert!(validated_identifier("field name", "1st").is_err());
    }
}
