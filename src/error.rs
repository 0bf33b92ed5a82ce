//! Custom error types for SealNote
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// Notice shown for malformed envelopes and authentication failures alike
pub const GENERIC_FAILURE_NOTICE: &str =
    "Decryption failed. The message may be invalid or the password is wrong.";

/// Notice shown when an authentic message is past its time limit
pub const EXPIRED_NOTICE: &str =
    "The message is older than the specified time limit and is no longer valid.";

/// The main error type for SealNote operations
#[derive(Error, Debug)]
pub enum SealError {
    /// The key derivation primitive rejected its inputs
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Bad base64 or a byte sequence too short to hold salt, IV and tag
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// GCM tag mismatch: wrong password or tampered data (never says which)
    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailure,

    /// Decrypted text is not a `timestamp:limit:message` payload
    #[error("Payload format error: {0}")]
    PayloadFormat(String),

    /// Authentic message that is past its time limit
    #[error("Message expired: {age_seconds}s old, limit was {limit_minutes} minute(s)")]
    ExpiredMessage { age_seconds: i64, limit_minutes: u64 },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid user input or an invalid session transition
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SealError {
    /// Check if this is an expiry error
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::ExpiredMessage { .. })
    }

    /// Check if this error is reported with the merged generic notice
    pub fn is_generic_failure(&self) -> bool {
        matches!(self, Self::MalformedEnvelope(_) | Self::AuthenticationFailure)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Text suitable for showing to the person who pasted or scanned an envelope
    ///
    /// Malformed input and authentication failures share one notice so the
    /// output does not act as an oracle. Payload errors only occur after a
    /// successful tag check, but they are reported generically as well.
    pub fn user_message(&self) -> String {
        match self {
            Self::ExpiredMessage { .. } => EXPIRED_NOTICE.to_string(),
            Self::MalformedEnvelope(_) | Self::AuthenticationFailure | Self::PayloadFormat(_) => {
                GENERIC_FAILURE_NOTICE.to_string()
            }
            other => other.to_string(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SealError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for SealNote operations
pub type SealResult<T> = Result<T, SealError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SealError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_expired_error() {
        let err = SealError::ExpiredMessage {
            age_seconds: 400,
            limit_minutes: 5,
        };
        assert_eq!(
            err.to_string(),
            "Message expired: 400s old, limit was 5 minute(s)"
        );
        assert!(err.is_expired());
        assert!(!err.is_generic_failure());
        assert_eq!(err.user_message(), EXPIRED_NOTICE);
    }

    #[test]
    fn test_malformed_and_auth_share_notice() {
        let malformed = SealError::MalformedEnvelope("bad base64".into());
        let auth = SealError::AuthenticationFailure;
        assert!(malformed.is_generic_failure());
        assert!(auth.is_generic_failure());
        assert_eq!(malformed.user_message(), auth.user_message());
        assert_eq!(auth.user_message(), GENERIC_FAILURE_NOTICE);
    }

    #[test]
    fn test_auth_failure_does_not_say_which() {
        let msg = SealError::AuthenticationFailure.to_string();
        assert!(msg.contains("wrong password or corrupted data"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let seal_err: SealError = io_err.into();
        assert!(matches!(seal_err, SealError::Io(_)));
    }
}
