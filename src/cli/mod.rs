//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the envelope layer.

pub mod seal;

pub use seal::{handle_decrypt, handle_encrypt, handle_inspect, PasswordArgs};
