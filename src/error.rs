//! Error types for box-v2.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("limit must be within the range {min} <= limit <= {max}, got {value}")]
    LimitOutOfRange { value: u32, min: u32, max: u32 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("api error ({status}){}: {message}", .code.as_deref().map(|c| format!(" {c}")).unwrap_or_default())]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("auth error: {0}")]
    Auth(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for failures raised locally before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::LimitOutOfRange { .. } | Error::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_error_names_value_and_bounds() {
        let err = Error::LimitOutOfRange {
            value: 0,
            min: 1,
            max: 500,
        };
        assert_eq!(
            err.to_string(),
            "limit must be within the range 1 <= limit <= 500, got 0"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn api_error_display_with_and_without_code() {
        let err = Error::Api {
            status: 404,
            code: Some("not_found".to_string()),
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "api error (404) not_found: Not Found");

        let err = Error::Api {
            status: 502,
            code: None,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "api error (502): Bad Gateway");
        assert!(!err.is_validation());
    }
}
