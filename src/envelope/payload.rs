//! Plaintext payload: `timestamp:time_limit_minutes:message`
//!
//! Only the first two colons are delimiters. Everything after the second
//! colon is message text, colons included.

use crate::error::{SealError, SealResult};

const DELIMITER: char = ':';

/// The timestamped plaintext sealed inside an envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Unix seconds at which the message was sealed
    pub timestamp: i64,
    /// Minutes the message stays valid after `timestamp`
    pub time_limit_minutes: u64,
    /// The user's message
    pub message: String,
}

impl Payload {
    /// Create a payload sealed at `timestamp`
    pub fn new(timestamp: i64, time_limit_minutes: u64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            time_limit_minutes,
            message: message.into(),
        }
    }

    /// Render as `timestamp:limit:message`
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.timestamp, DELIMITER, self.time_limit_minutes, DELIMITER, self.message
        )
    }

    /// Parse decrypted text, splitting on the first two delimiters only
    pub fn parse(text: &str) -> SealResult<Self> {
        let mut parts = text.splitn(3, DELIMITER);

        let (Some(timestamp), Some(limit), Some(message)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SealError::PayloadFormat(
                "expected timestamp, time limit and message".to_string(),
            ));
        };

        let digits = timestamp.strip_prefix('-').unwrap_or(timestamp);
        if !is_plain_digits(digits) {
            return Err(SealError::PayloadFormat(format!(
                "invalid timestamp '{}'",
                timestamp
            )));
        }
        let timestamp = timestamp.parse::<i64>().map_err(|e| {
            SealError::PayloadFormat(format!("invalid timestamp '{}': {}", timestamp, e))
        })?;

        if !is_plain_digits(limit) {
            return Err(SealError::PayloadFormat(format!("invalid time limit '{}'", limit)));
        }
        let time_limit_minutes = limit.parse::<u64>().map_err(|e| {
            SealError::PayloadFormat(format!("invalid time limit '{}': {}", limit, e))
        })?;

        Ok(Self {
            timestamp,
            time_limit_minutes,
            message: message.to_string(),
        })
    }

    /// Seconds elapsed between sealing and `now`
    ///
    /// Negative when the sealing clock was ahead of ours.
    pub fn age_seconds(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }

    /// Time limit in seconds, saturating at `i64::MAX`
    pub fn time_limit_seconds(&self) -> i64 {
        i64::try_from(self.time_limit_minutes.saturating_mul(60)).unwrap_or(i64::MAX)
    }

    /// True once strictly more than the time limit has elapsed
    pub fn is_expired(&self, now: i64) -> bool {
        self.age_seconds(now) > self.time_limit_seconds()
    }

    /// Fail with [`SealError::ExpiredMessage`] if the payload is stale at `now`
    pub fn check_expiry(&self, now: i64) -> SealResult<()> {
        if self.is_expired(now) {
            return Err(SealError::ExpiredMessage {
                age_seconds: self.age_seconds(now),
                limit_minutes: self.time_limit_minutes,
            });
        }
        Ok(())
    }

    /// Consume the payload, returning the message
    pub fn into_message(self) -> String {
        self.message
    }
}

/// `str::parse` also accepts a leading `+`, which `encode` never writes
fn is_plain_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let payload = Payload::new(1_700_000_000, 5, "hello");
        assert_eq!(payload.encode(), "1700000000:5:hello");
    }

    #[test]
    fn test_parse() {
        let payload = Payload::parse("1700000000:5:hello").unwrap();
        assert_eq!(payload, Payload::new(1_700_000_000, 5, "hello"));
    }

    #[test]
    fn test_parse_keeps_colons_in_message() {
        let payload = Payload::parse("1700000000:5:a:b:c").unwrap();
        assert_eq!(payload.message, "a:b:c");
    }

    #[test]
    fn test_parse_message_that_looks_like_payload() {
        let payload = Payload::parse("1700000000:5:1700000000:5:x").unwrap();
        assert_eq!(payload.timestamp, 1_700_000_000);
        assert_eq!(payload.message, "1700000000:5:x");
    }

    #[test]
    fn test_parse_empty_message() {
        let payload = Payload::parse("1700000000:5:").unwrap();
        assert_eq!(payload.message, "");
    }

    #[test]
    fn test_parse_missing_delimiters() {
        assert!(matches!(
            Payload::parse("1700000000"),
            Err(SealError::PayloadFormat(_))
        ));
        assert!(matches!(
            Payload::parse("1700000000:5"),
            Err(SealError::PayloadFormat(_))
        ));
    }

    #[test]
    fn test_parse_non_numeric_fields() {
        assert!(matches!(
            Payload::parse("yesterday:5:hi"),
            Err(SealError::PayloadFormat(_))
        ));
        assert!(matches!(
            Payload::parse("1700000000:five:hi"),
            Err(SealError::PayloadFormat(_))
        ));
        assert!(matches!(
            Payload::parse("1700000000:-5:hi"),
            Err(SealError::PayloadFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_explicit_plus_sign() {
        for text in ["+1700000000:5:hi", "1700000000:+5:hi", "-+1:5:hi", "-:5:hi"] {
            assert!(
                matches!(Payload::parse(text), Err(SealError::PayloadFormat(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_negative_timestamp_round_trip() {
        let payload = Payload::new(-60, 1, "before the epoch");
        let parsed = Payload::parse(&payload.encode()).unwrap();
        assert_eq!(parsed.timestamp, -60);
    }

    #[test]
    fn test_expiry_boundary() {
        let payload = Payload::new(1_000, 1, "hi");
        assert!(payload.check_expiry(1_000).is_ok());
        assert!(payload.check_expiry(1_060).is_ok());

        let err = payload.check_expiry(1_061).unwrap_err();
        assert!(matches!(
            err,
            SealError::ExpiredMessage {
                age_seconds: 61,
                limit_minutes: 1
            }
        ));
    }

    #[test]
    fn test_zero_limit_expires_after_one_second() {
        let payload = Payload::new(1_000, 0, "hi");
        assert!(!payload.is_expired(1_000));
        assert!(payload.is_expired(1_001));
    }

    #[test]
    fn test_future_timestamp_not_expired() {
        let payload = Payload::new(2_000, 0, "hi");
        assert_eq!(payload.age_seconds(1_000), -1_000);
        assert!(!payload.is_expired(1_000));
    }

    #[test]
    fn test_huge_limit_saturates() {
        let payload = Payload::new(0, u64::MAX, "hi");
        assert_eq!(payload.time_limit_seconds(), i64::MAX);
        assert!(!payload.is_expired(i64::MAX));
    }
}
