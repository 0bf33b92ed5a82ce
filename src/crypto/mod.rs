//! Cryptographic primitives for SealNote
//!
//! PBKDF2-HMAC-SHA256 key derivation feeding AES-256-GCM, plus zeroizing
//! holders for passwords.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, encrypt, Iv, IV_SIZE, TAG_SIZE};
pub use key_derivation::{derive_key, DerivedKey, Salt, KEY_SIZE, PBKDF2_ITERATIONS, SALT_SIZE};
pub use secure_memory::SecureString;
