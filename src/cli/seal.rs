//! Seal/open CLI commands
//!
//! Encrypt a message into an envelope, decrypt an envelope, or inspect an
//! envelope's framing without a password.

use std::io::Read;

use crate::config::Settings;
use crate::crypto::{SecureString, IV_SIZE, SALT_SIZE, TAG_SIZE};
use crate::envelope::{self, Envelope};
use crate::error::{SealError, SealResult};

/// Arguments shared by commands that need a password
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PasswordArgs {
    /// Read the password from this environment variable instead of prompting
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,
}

/// Encrypt a message and print the envelope text
pub fn handle_encrypt(
    settings: &Settings,
    message: Option<String>,
    time_limit: Option<u64>,
    password: &PasswordArgs,
) -> SealResult<()> {
    let message = match message {
        Some(message) => message,
        None => read_stdin()?,
    };
    let time_limit = time_limit.unwrap_or(settings.default_time_limit_minutes);
    let password = obtain_new_password(password, settings.min_password_length)?;

    println!("{}", seal_message(&message, &password, time_limit)?);
    Ok(())
}

/// Decrypt an envelope and print the message
pub fn handle_decrypt(envelope_text: Option<String>, password: &PasswordArgs) -> SealResult<()> {
    let envelope_text = match envelope_text {
        Some(text) => text,
        None => read_stdin()?,
    };
    let password = obtain_password(password, "Enter password: ")?;

    println!("{}", open_message(&envelope_text, &password)?);
    Ok(())
}

/// Print the framing of an envelope
pub fn handle_inspect(envelope_text: Option<String>) -> SealResult<()> {
    let envelope_text = match envelope_text {
        Some(text) => text,
        None => read_stdin()?,
    };
    print!("{}", describe_envelope(&envelope_text)?);
    Ok(())
}

/// Validate inputs and seal a message
pub fn seal_message(message: &str, password: &SecureString, time_limit: u64) -> SealResult<String> {
    if message.is_empty() || password.is_empty() {
        return Err(SealError::Validation("Please fill in all fields.".into()));
    }
    envelope::encrypt(message, password, time_limit)
}

/// Validate inputs and open an envelope
pub fn open_message(envelope_text: &str, password: &SecureString) -> SealResult<String> {
    if envelope_text.trim().is_empty() || password.is_empty() {
        return Err(SealError::Validation("Please fill in all fields.".into()));
    }
    envelope::decrypt(envelope_text, password)
}

/// Human-readable framing summary
pub fn describe_envelope(envelope_text: &str) -> SealResult<String> {
    let envelope = Envelope::from_text(envelope_text)?;
    let body = envelope.ciphertext().len() - TAG_SIZE;

    Ok(format!(
        "Envelope: {} bytes\n  Salt:       {} bytes\n  IV:         {} bytes\n  Ciphertext: {} bytes (+{} byte tag)\n",
        envelope.byte_len(),
        SALT_SIZE,
        IV_SIZE,
        body,
        TAG_SIZE
    ))
}

/// Prompt for a password used to seal, with confirmation
fn obtain_new_password(args: &PasswordArgs, min_length: usize) -> SealResult<SecureString> {
    if let Some(var) = &args.password_env {
        let password = password_from_env(var)?;
        check_length(&password, min_length)?;
        return Ok(password);
    }

    loop {
        let pass1 = prompt_password("Enter password: ")?;

        if let Err(e) = check_length(&pass1, min_length) {
            eprintln!("{} Please try again.", e);
            continue;
        }

        let pass2 = prompt_password("Confirm password: ")?;

        if pass1 != pass2 {
            eprintln!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(pass1);
    }
}

fn obtain_password(args: &PasswordArgs, prompt: &str) -> SealResult<SecureString> {
    match &args.password_env {
        Some(var) => password_from_env(var),
        None => prompt_password(prompt),
    }
}

fn check_length(password: &SecureString, min_length: usize) -> SealResult<()> {
    if password.chars().count() < min_length {
        return Err(SealError::Validation(format!(
            "Password must be at least {} characters.",
            min_length
        )));
    }
    Ok(())
}

fn password_from_env(var: &str) -> SealResult<SecureString> {
    std::env::var(var)
        .map(SecureString::from)
        .map_err(|_| SealError::Validation(format!("Environment variable {} is not set", var)))
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> SealResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| SealError::Io(format!("Failed to read password: {}", e)))
}

/// Read all of stdin, dropping one trailing line break
fn read_stdin() -> SealResult<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_and_open() {
        let password = SecureString::new("correct horse");
        let text = seal_message("hello", &password, 5).unwrap();
        assert_eq!(open_message(&text, &password).unwrap(), "hello");
    }

    #[test]
    fn test_empty_fields_rejected() {
        let password = SecureString::new("pw");
        assert!(seal_message("", &password, 5).unwrap_err().is_validation());
        assert!(seal_message("hi", &SecureString::new(""), 5)
            .unwrap_err()
            .is_validation());
        assert!(open_message("  ", &password).unwrap_err().is_validation());
    }

    #[test]
    fn test_describe_envelope() {
        let text = seal_message("abc", &SecureString::new("pw"), 5).unwrap();
        let summary = describe_envelope(&text).unwrap();
        assert!(summary.contains("Salt:       16 bytes"));
        assert!(summary.contains("IV:         12 bytes"));
        assert!(summary.contains("+16 byte tag"));
    }

    #[test]
    fn test_describe_malformed() {
        let err = describe_envelope("AAAA").unwrap_err();
        assert!(matches!(err, SealError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_check_length_counts_chars() {
        let password = SecureString::new("ééé");
        assert!(check_length(&password, 3).is_ok());
        assert!(check_length(&password, 4).is_err());
    }

    #[test]
    fn test_password_from_missing_env() {
        let err = password_from_env("SEALNOTE_TEST_UNSET_PASSWORD_VAR").unwrap_err();
        assert!(err.is_validation());
    }
}
