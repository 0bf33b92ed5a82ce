//! SealNote - password-sealed, time-limited message envelopes
//!
//! A message is sealed under a password with AES-256-GCM, using a key
//! derived by PBKDF2-HMAC-SHA256 from the password and a fresh salt. The
//! plaintext carries the sealing time and a time limit in minutes, and
//! opening fails once that limit has passed. The resulting base64 envelope
//! is small enough to paste into a chat or render as a QR code.
//!
//! # Architecture
//!
//! - `crypto`: key derivation, AES-GCM, zeroizing password holder
//! - `envelope`: payload format, envelope framing, encrypt/decrypt
//! - `clock`: injectable wall-clock source
//! - `session`: chat/call session state machine
//! - `config`: paths and persisted settings
//! - `cli`: command handlers for the `sealnote` binary
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust,no_run
//! let text = sealnote::encrypt("meet at noon", "hunter2", 5)?;
//! assert_eq!(sealnote::decrypt(&text, "hunter2")?, "meet at noon");
//! # Ok::<(), sealnote::SealError>(())
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod session;

pub use envelope::{decrypt, decrypt_with_clock, encrypt, encrypt_with_clock, Envelope, Payload};
pub use error::{SealError, SealResult};
