//! AES-256-GCM encryption/decryption
//!
//! Thin wrapper over `aes-gcm` that works on raw bytes. The authentication
//! tag is appended to the ciphertext, and every message is sealed under a
//! fresh IV.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{SealError, SealResult};

use super::DerivedKey;

/// Size of the AES-GCM IV in bytes (96 bits)
pub const IV_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Initialization vector for a single AES-GCM encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iv([u8; IV_SIZE]);

impl Iv {
    /// Draw a fresh IV from the OS random source
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap existing IV bytes
    pub fn from_bytes(bytes: [u8; IV_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the IV bytes
    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.0
    }
}

fn cipher(key: &DerivedKey) -> SealResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SealError::KeyDerivation(format!("Derived key rejected by cipher: {}", e)))
}

/// Encrypt plaintext, returning ciphertext with the tag appended
pub fn encrypt(plaintext: &[u8], key: &DerivedKey, iv: &Iv) -> SealResult<Vec<u8>> {
    let cipher = cipher(key)?;
    let nonce = Nonce::from_slice(iv.as_bytes());

    // Only fails for plaintexts beyond the GCM length limit
    cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| SealError::Validation("Message too large to encrypt".to_string()))
}

/// Decrypt ciphertext+tag
///
/// Any tag mismatch is reported as [`SealError::AuthenticationFailure`],
/// whether the key or the data was wrong.
pub fn decrypt(ciphertext: &[u8], key: &DerivedKey, iv: &Iv) -> SealResult<Vec<u8>> {
    let cipher = cipher(key)?;
    let nonce = Nonce::from_slice(iv.as_bytes());

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SealError::AuthenticationFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::{derive_key, Salt, SALT_SIZE};

    fn test_key(password: &str) -> DerivedKey {
        derive_key(password, &Salt::from_bytes([9u8; SALT_SIZE])).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = test_key("test_password");
        let iv = Iv::generate();
        let plaintext = b"Hello, World!";

        let ciphertext = encrypt(plaintext, &key, &iv).unwrap();
        let decrypted = decrypt(&ciphertext, &key, &iv).unwrap();

        assert_eq!(plaintext, decrypted.as_slice());
    }

    #[test]
    fn test_tag_appended() {
        let key = test_key("test_password");
        let ciphertext = encrypt(b"abc", &key, &Iv::generate()).unwrap();
        assert_eq!(ciphertext.len(), 3 + TAG_SIZE);
    }

    #[test]
    fn test_different_ivs() {
        let key = test_key("test_password");
        let plaintext = b"Hello, World!";

        let iv1 = Iv::generate();
        let iv2 = Iv::generate();
        assert_ne!(iv1, iv2);

        let c1 = encrypt(plaintext, &key, &iv1).unwrap();
        let c2 = encrypt(plaintext, &key, &iv2).unwrap();
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = test_key("password_one");
        let key2 = test_key("password_two");
        let iv = Iv::generate();

        let ciphertext = encrypt(b"Hello, World!", &key1, &iv).unwrap();
        let result = decrypt(&ciphertext, &key2, &iv);
        assert!(matches!(result, Err(SealError::AuthenticationFailure)));
    }

    #[test]
    fn test_wrong_iv_fails() {
        let key = test_key("test_password");
        let ciphertext = encrypt(b"Hello", &key, &Iv::from_bytes([1u8; IV_SIZE])).unwrap();
        let result = decrypt(&ciphertext, &key, &Iv::from_bytes([2u8; IV_SIZE]));
        assert!(matches!(result, Err(SealError::AuthenticationFailure)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key("test_password");
        let iv = Iv::generate();
        let mut ciphertext = encrypt(b"Hello, World!", &key, &iv).unwrap();

        ciphertext[0] ^= 0xFF;

        let result = decrypt(&ciphertext, &key, &iv);
        assert!(matches!(result, Err(SealError::AuthenticationFailure)));
    }

    #[test]
    fn test_empty_plaintext() {
        let key = test_key("test_password");
        let iv = Iv::generate();

        let ciphertext = encrypt(b"", &key, &iv).unwrap();
        assert_eq!(ciphertext.len(), TAG_SIZE);
        let decrypted = decrypt(&ciphertext, &key, &iv).unwrap();
        assert!(decrypted.is_empty());
    }
}
