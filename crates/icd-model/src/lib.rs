pub mod error;
pub mod format;
pub mod location;
pub mod range;
pub mod text;
pub mod tokens;

pub use error::{IcdError, Result, SeeAlso, SyntaxError};
pub use format::{DataFormat, Format};
pub use location::Location;
pub use range::{Range, RangeItem};
pub use text::{human_readable_join, validated_identifier};
pub use tokens::{Token, parse_choices, tokenize};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_renders_path_line_cell() {
        let mut location = Location::new("customers.csv");
        location.advance_line();
        location.set_cell(4);
        assert_eq!(location.to_string(), "customers.csv:2:4");
    }

    #[test]
    fn error_renders_location_prefix() {
        let location = Location::new("icd.csv");
        let error = IcdError::structure("row tag is \"x\"", &location);
        assert_eq!(error.to_string(), "icd.csv:1:0: row tag is \"x\"");
    }

    #[test]
    fn location_serializes() {
        let location = Location::new("data.csv");
        let json = serde_json::to_string(&location).expect("serialize location");
        assert!(json.contains("\"line\":1"));
    }
}
