//! Error types for the household API client.
//!
//! # Design
//! Every variant's `Display` text is what a dashboard shows the user. Backend
//! failures surface the backend's own `message` verbatim; everything that
//! prevented a usable response from arriving collapses to the fixed
//! connection message, with the underlying cause kept on the variant for logs.

use thiserror::Error;

/// Shown when the backend rejects a request without saying why.
pub const REQUEST_FAILED: &str = "Yêu cầu thất bại";

/// Shown when no usable response arrived from the backend.
pub const CONNECTION_FAILED: &str = "Lỗi kết nối đến máy chủ";

/// Errors returned by `HouseholdClient` and `HouseholdApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{}", .message.as_deref().unwrap_or(REQUEST_FAILED))]
    Http { status: u16, message: Option<String> },

    /// The request never produced a response (refused, reset, unreadable).
    #[error("{}", CONNECTION_FAILED)]
    Network { cause: String },

    /// A 2xx body could not be deserialized into the expected type.
    #[error("{}", CONNECTION_FAILED)]
    Decode { cause: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request payload failed boundary validation; nothing was sent.
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl ApiError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP status for backend-reported failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_backend_message_verbatim() {
        let err = ApiError::Http {
            status: 401,
            message: Some("Invalid token".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid token");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn http_error_without_message_uses_fallback() {
        let err = ApiError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), REQUEST_FAILED);
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn network_and_decode_hide_their_cause() {
        let network = ApiError::Network {
            cause: "Connection refused (os error 111)".to_string(),
        };
        let decode = ApiError::Decode {
            cause: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(network.to_string(), CONNECTION_FAILED);
        assert_eq!(decode.to_string(), CONNECTION_FAILED);
        assert_eq!(network.status(), None);
    }

    #[test]
    fn validation_names_the_field() {
        let err = ApiError::invalid("name", "must not be blank");
        assert_eq!(err.to_string(), "name: must not be blank");
    }
}
