//! Attribute maps from user input.
//!
//! Attribute maps arrive as flat JSON objects (`{"username": "u", "site": "x"}`).
//! Only string values are accepted: the secret service stores strings and matching is
//! exact string equality. Anything else (numbers, arrays, `{"$ne": ...}` style
//! operators) is refused instead of being coerced or silently dropped.

use crate::error::{KeyrakenError, Result};
use crate::model::Attributes;
use serde_json::Value;

/// What an attribute map is used for. Decides which error a bad map produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapRole {
    /// Selecting items (`--attributes`). Errors are `InvalidFilter`.
    Filter,
    /// New or deleted attributes (`--new_attributes`, `--delete_attributes`).
    /// Errors are `InvalidInput`.
    Input,
}

impl MapRole {
    fn error(self, msg: String) -> KeyrakenError {
        match self {
            MapRole::Filter => KeyrakenError::InvalidFilter(msg),
            MapRole::Input => KeyrakenError::InvalidInput(msg),
        }
    }
}

/// Parse a flat JSON object of strings. Blank input is an empty map.
pub fn parse_attribute_map(json: &str, role: MapRole) -> Result<Attributes> {
    if json.trim().is_empty() {
        return Ok(Attributes::new());
    }

    let value: Value =
        serde_json::from_str(json).map_err(|e| role.error(format!("Malformed JSON: {}", e)))?;
    let Value::Object(object) = value else {
        return Err(role.error(format!("Expected a JSON object, got {}", json.trim())));
    };

    let mut attributes = Attributes::new();
    for (key, value) in object {
        match value {
            Value::String(s) => {
                attributes.insert(key, s);
            }
            Value::Object(_) => {
                return Err(role.error(format!(
                    "Unsupported operator for \"{}\": only exact string values are allowed",
                    key
                )))
            }
            other => {
                return Err(role.error(format!(
                    "Value for \"{}\" must be a string, got {}",
                    key, other
                )))
            }
        }
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_string_map() {
        let attrs = parse_attribute_map(r#"{"username":"u","site":"x"}"#, MapRole::Filter).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["username"], "u");
        assert_eq!(attrs["site"], "x");
    }

    #[test]
    fn blank_input_is_empty_map() {
        assert!(parse_attribute_map("", MapRole::Filter).unwrap().is_empty());
        assert!(parse_attribute_map("  ", MapRole::Input).unwrap().is_empty());
        assert!(parse_attribute_map("{}", MapRole::Input).unwrap().is_empty());
    }

    #[test]
    fn operator_object_is_invalid_filter() {
        let err = parse_attribute_map(r#"{"user":{"$ne":"u"}}"#, MapRole::Filter).unwrap_err();
        match err {
            KeyrakenError::InvalidFilter(msg) => assert!(msg.contains("user")),
            other => panic!("Expected InvalidFilter, got {:?}", other),
        }
    }

    #[test]
    fn non_string_values_are_rejected_by_role() {
        assert!(matches!(
            parse_attribute_map(r#"{"port":22}"#, MapRole::Filter),
            Err(KeyrakenError::InvalidFilter(_))
        ));
        assert!(matches!(
            parse_attribute_map(r#"{"tags":["a"]}"#, MapRole::Input),
            Err(KeyrakenError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_attribute_map(r#"{"x":null}"#, MapRole::Input),
            Err(KeyrakenError::InvalidInput(_))
        ));
    }

    #[test]
    fn malformed_or_non_object_json_is_rejected() {
        assert!(matches!(
            parse_attribute_map("{not json", MapRole::Filter),
            Err(KeyrakenError::InvalidFilter(_))
        ));
        assert!(matches!(
            parse_attribute_map(r#"["a","b"]"#, MapRole::Input),
            Err(KeyrakenError::InvalidInput(_))
        ));
    }
}
