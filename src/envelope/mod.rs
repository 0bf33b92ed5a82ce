//! Password-sealed, time-limited message envelopes
//!
//! [`encrypt`] derives a key from the password and a fresh salt, prefixes the
//! message with the current time and a time limit, seals it with AES-256-GCM
//! under a fresh IV, and returns `base64(salt | iv | ciphertext+tag)`.
//! [`decrypt`] reverses this and rejects messages past their time limit.
//!
//! Both operations are pure functions of their inputs and the clock; nothing
//! is cached between calls, so they may be called from several threads at
//! once.

pub mod codec;
pub mod payload;

pub use codec::{Envelope, HEADER_LEN, MIN_ENVELOPE_LEN};
pub use payload::Payload;

use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::crypto::{self, derive_key, Iv, Salt};
use crate::error::{SealError, SealResult};

/// Seal `message` under `password`, valid for `time_limit_minutes`
pub fn encrypt(message: &str, password: &str, time_limit_minutes: u64) -> SealResult<String> {
    encrypt_with_clock(message, password, time_limit_minutes, &SystemClock)
}

/// Open an envelope produced by [`encrypt`]
///
/// # Errors
///
/// - [`SealError::MalformedEnvelope`] for bad base64 or a too-short envelope
/// - [`SealError::AuthenticationFailure`] for a wrong password or tampered data
/// - [`SealError::PayloadFormat`] if the decrypted text is not a payload
/// - [`SealError::ExpiredMessage`] if the message is past its time limit
pub fn decrypt(envelope_text: &str, password: &str) -> SealResult<String> {
    decrypt_with_clock(envelope_text, password, &SystemClock)
}

/// [`encrypt`] with an explicit time source
pub fn encrypt_with_clock(
    message: &str,
    password: &str,
    time_limit_minutes: u64,
    clock: &dyn Clock,
) -> SealResult<String> {
    let salt = Salt::generate();
    let iv = Iv::generate();
    let key = derive_key(password, &salt)?;

    let payload = Payload::new(clock.now_unix_seconds(), time_limit_minutes, message);
    let ciphertext = crypto::encrypt(payload.encode().as_bytes(), &key, &iv)?;

    let envelope = Envelope::new(salt, iv, ciphertext);
    debug!(bytes = envelope.byte_len(), time_limit_minutes, "sealed message");

    Ok(envelope.to_text())
}

/// [`decrypt`] with an explicit time source
pub fn decrypt_with_clock(
    envelope_text: &str,
    password: &str,
    clock: &dyn Clock,
) -> SealResult<String> {
    let payload = open_payload(envelope_text, password)?;

    let now = clock.now_unix_seconds();
    if let Err(err) = payload.check_expiry(now) {
        warn!(
            age_seconds = payload.age_seconds(now),
            time_limit_minutes = payload.time_limit_minutes,
            "authentic message is past its time limit"
        );
        return Err(err);
    }

    Ok(payload.into_message())
}

/// Decrypt and parse the payload without checking expiry
pub fn open_payload(envelope_text: &str, password: &str) -> SealResult<Payload> {
    let envelope = Envelope::from_text(envelope_text)?;
    let key = derive_key(password, envelope.salt())?;

    let plaintext = crypto::decrypt(envelope.ciphertext(), &key, envelope.iv()).map_err(|e| {
        debug!(bytes = envelope.byte_len(), "envelope failed authentication");
        e
    })?;

    let text = String::from_utf8(plaintext)
        .map_err(|e| SealError::PayloadFormat(format!("decrypted data is not UTF-8: {}", e)))?;

    Payload::parse(&text)
}
