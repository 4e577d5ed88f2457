//! Error type shared by the setter table, the node tree and configuration.

use taffy::TaffyError;

pub type FlexResult<T> = Result<T, FlexError>;

#[derive(thiserror::Error, Debug)]
pub enum FlexError {
    /// An enumerated property received a string outside its allowed set, or a
    /// non-string value.
    #[error("unexpected value {value}, expected {}", expected.join(", "))]
    InvalidKeyword {
        value: String,
        expected: &'static [&'static str],
    },

    #[error("invalid value {value} for property {property}")]
    InvalidValue { property: &'static str, value: String },

    #[error("unknown layout property {0}")]
    UnknownProperty(String),

    #[error("invalid layout config: {0}")]
    InvalidConfig(String),

    #[error("solver error: {0}")]
    Solver(#[from] TaffyError),
}

impl FlexError {
    pub fn invalid_keyword(value: impl ToString, expected: &'static [&'static str]) -> Self {
        Self::InvalidKeyword {
            value: value.to_string(),
            expected,
        }
    }

    pub fn invalid_value(property: &'static str, value: impl ToString) -> Self {
        Self::InvalidValue {
            property,
            value: value.to_string(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_message_lists_allowed_set() {
        let err = FlexError::invalid_keyword("centerx", &["auto", "center"]);
        assert_eq!(err.to_string(), "unexpected value centerx, expected auto, center");
    }

    #[test]
    fn test_display_prefixes_are_stable() {
        assert!(
            FlexError::invalid_value("width", "wide")
                .to_string()
                .contains("for property width")
        );
        assert!(
            FlexError::invalid_config("x")
                .to_string()
                .contains("invalid layout config:")
        );
        assert!(
            FlexError::UnknownProperty("colour".into())
                .to_string()
                .contains("colour")
        );
    }
}
