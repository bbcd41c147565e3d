//! Error types for REST API operations

use serde_json::Value;

/// Errors that can occur during REST API operations
///
/// Every failure is reported to the caller; there is no local recovery and
/// no retry, so a failed order submission is never silently re-sent.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP transport failed (network, DNS, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error code from the response body (`error` field)
        code: String,
        /// Human-readable message from the response body (`message` field)
        message: String,
        /// Raw parsed error body
        body: Value,
    },

    /// Failed to parse an otherwise-successful response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

impl RestError {
    /// Build an API error from a non-success response body
    ///
    /// The body is parsed leniently: a non-JSON body is preserved verbatim
    /// as a string, and missing `error`/`message` fields fall back to the
    /// raw text so the caller always sees something actionable.
    pub(crate) fn from_error_body(status: u16, body: &str) -> Self {
        let parsed: Value =
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
        Self::from_error_value(status, parsed)
    }

    /// Build an API error from an already-parsed error body
    pub(crate) fn from_error_value(status: u16, body: Value) -> Self {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());

        Self::Api {
            status,
            code,
            message,
            body,
        }
    }

    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error indicates rejected authentication
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_json_body() {
        let err = RestError::from_error_body(
            401,
            r#"{"error":"unauthorized","message":"invalid signature"}"#,
        );
        match err {
            RestError::Api {
                status,
                code,
                message,
                body,
            } => {
                assert_eq!(status, 401);
                assert_eq!(code, "unauthorized");
                assert_eq!(message, "invalid signature");
                assert_eq!(body["error"], "unauthorized");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_from_non_json_body() {
        let err = RestError::from_error_body(502, "Bad Gateway");
        match err {
            RestError::Api { status, code, body, .. } => {
                assert_eq!(status, 502);
                assert_eq!(code, "unknown");
                assert_eq!(body, Value::String("Bad Gateway".to_string()));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_error_detection() {
        let err = RestError::from_error_body(403, r#"{"error":"forbidden"}"#);
        assert!(err.is_auth_error());
        assert_eq!(err.status(), Some(403));

        let parse = RestError::Parse("bad json".to_string());
        assert!(!parse.is_auth_error());
        assert_eq!(parse.status(), None);
    }
}
