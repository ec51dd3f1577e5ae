//! Space registration request parser.
//!
//! # Invariants
//! - Field names are case-sensitive: `Level` and `Space`.
//! - Both fields must be JSON strings; `null` is rejected.
//! - Empty strings are accepted as-is.
//! - Unknown extra fields are ignored.

use crate::model::level::{Level, LevelSpace};
use serde::Deserialize;
use serde_json::error::Category;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Malformed registration payload.
#[derive(Debug)]
pub enum ParseError {
    /// Payload is not valid JSON (including truncated input).
    Syntax(serde_json::Error),
    /// Payload is valid JSON but not an object with string `Level` and `Space`.
    Shape(serde_json::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(err) => write!(f, "request body is not valid JSON: {err}"),
            Self::Shape(err) => write!(f, "request body has an unexpected shape: {err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(err) | Self::Shape(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(value: serde_json::Error) -> Self {
        match value.classify() {
            Category::Data => Self::Shape(value),
            Category::Syntax | Category::Eof | Category::Io => Self::Syntax(value),
        }
    }
}

/// Decodes a raw request payload into a level-space command.
pub trait RequestParser {
    fn parse(&self, payload: &[u8]) -> Result<LevelSpace, ParseError>;
}

/// Wire shape of `POST /api/admin/space`.
#[derive(Debug, Deserialize)]
struct RegisterSpaceBody {
    #[serde(rename = "Level")]
    level: String,
    #[serde(rename = "Space")]
    space: String,
}

/// JSON implementation of [`RequestParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRequestParser;

impl RequestParser for JsonRequestParser {
    fn parse(&self, payload: &[u8]) -> Result<LevelSpace, ParseError> {
        let body: RegisterSpaceBody = serde_json::from_slice(payload)?;
        Ok(LevelSpace::new(Level::new(body.level), body.space))
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonRequestParser, ParseError, RequestParser};

    fn parse(payload: &str) -> Result<crate::LevelSpace, ParseError> {
        JsonRequestParser.parse(payload.as_bytes())
    }

    #[test]
    fn extracts_level_and_space() {
        let parsed = parse(r#"{"Space":"S1","Level":"L1"}"#).expect("valid payload");
        assert_eq!(parsed.level.id, "L1");
        assert_eq!(parsed.space, "S1");
    }

    #[test]
    fn ignores_unknown_fields() {
        let parsed = parse(r#"{"Level":"L2","Space":"S9","Note":"extra"}"#)
            .expect("extra fields should be ignored");
        assert_eq!(parsed.level_id(), "L2");
    }

    #[test]
    fn accepts_empty_strings() {
        let parsed = parse(r#"{"Level":"","Space":""}"#).expect("empty ids are accepted");
        assert_eq!(parsed.level_id(), "");
        assert_eq!(parsed.space, "");
    }

    #[test]
    fn missing_level_is_a_shape_error() {
        let err = parse(r#"{"Space":"S1"}"#).expect_err("missing Level must fail");
        assert!(matches!(err, ParseError::Shape(_)));
        assert!(err.to_string().contains("Level"));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let err = parse(r#"{"level":"L1","space":"S1"}"#).expect_err("lowercase must fail");
        assert!(matches!(err, ParseError::Shape(_)));
    }

    #[test]
    fn null_and_non_string_fields_are_rejected() {
        assert!(matches!(
            parse(r#"{"Level":null,"Space":"S1"}"#),
            Err(ParseError::Shape(_))
        ));
        assert!(matches!(
            parse(r#"{"Level":1,"Space":"S1"}"#),
            Err(ParseError::Shape(_))
        ));
        assert!(matches!(parse(r#""L1""#), Err(ParseError::Shape(_))));
    }

    #[test]
    fn invalid_json_is_a_syntax_error() {
        assert!(matches!(parse("{\"Level\":"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse("not json"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse(""), Err(ParseError::Syntax(_))));
    }
}
