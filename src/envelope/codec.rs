//! Envelope framing
//!
//! Byte layout: `salt[16] | iv[12] | ciphertext+tag[>= 16]`, carried as
//! standard padded base64 text.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::crypto::{Iv, Salt, IV_SIZE, SALT_SIZE, TAG_SIZE};
use crate::error::{SealError, SealResult};

/// Offset of the first ciphertext byte
pub const HEADER_LEN: usize = SALT_SIZE + IV_SIZE;

/// Shortest byte sequence that can be a valid envelope
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + TAG_SIZE;

/// A sealed message: salt, IV and authenticated ciphertext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: Salt,
    iv: Iv,
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope from its parts
    pub fn new(salt: Salt, iv: Iv, ciphertext: Vec<u8>) -> Self {
        Self {
            salt,
            iv,
            ciphertext,
        }
    }

    /// The key-derivation salt
    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// The AES-GCM IV
    pub fn iv(&self) -> &Iv {
        &self.iv
    }

    /// Ciphertext with the authentication tag appended
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Total length of the framed bytes
    pub fn byte_len(&self) -> usize {
        HEADER_LEN + self.ciphertext.len()
    }

    /// Concatenate salt, IV and ciphertext
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        bytes.extend_from_slice(self.salt.as_bytes());
        bytes.extend_from_slice(self.iv.as_bytes());
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split framed bytes back into salt, IV and ciphertext
    pub fn from_bytes(bytes: &[u8]) -> SealResult<Self> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(SealError::MalformedEnvelope(format!(
                "expected at least {} bytes, got {}",
                MIN_ENVELOPE_LEN,
                bytes.len()
            )));
        }

        let (salt_bytes, rest) = bytes.split_at(SALT_SIZE);
        let (iv_bytes, ciphertext) = rest.split_at(IV_SIZE);

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(salt_bytes);
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(iv_bytes);

        Ok(Self {
            salt: Salt::from_bytes(salt),
            iv: Iv::from_bytes(iv),
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Encode as base64 text
    pub fn to_text(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decode base64 text; surrounding whitespace from pasting is ignored
    pub fn from_text(text: &str) -> SealResult<Self> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| SealError::MalformedEnvelope(format!("invalid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Envelope {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
