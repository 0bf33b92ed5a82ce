//! Chat lines rendered by the session front end

use std::fmt;

/// Sender name the peer uses for presence notifications
pub const SYSTEM_USER: &str = "System";

/// A single line in the chat transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatLine {
    /// Sent by this user
    Local { user: String, message: String },
    /// Received from the peer
    Remote { user: String, message: String },
    /// Presence and connection notices
    System(String),
}

impl ChatLine {
    pub fn local(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Local {
            user: user.into(),
            message: message.into(),
        }
    }

    /// A line from the peer; messages from [`SYSTEM_USER`] become notices
    pub fn remote(user: impl Into<String>, message: impl Into<String>) -> Self {
        let user = user.into();
        if user == SYSTEM_USER {
            return Self::System(message.into());
        }
        Self::Remote {
            user,
            message: message.into(),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::System(message.into())
    }

    /// Styling class for the line
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Remote { .. } => "remote",
            Self::System(_) => "system",
        }
    }

    /// The message body without the sender prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Local { message, .. } | Self::Remote { message, .. } => message,
            Self::System(message) => message,
        }
    }
}

impl fmt::Display for ChatLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { user, message } | Self::Remote { user, message } => {
                write!(f, "{}: {}", user, message)
            }
            Self::System(message) => f.write_str(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ChatLine::local("Alice", "hi").to_string(), "Alice: hi");
        assert_eq!(ChatLine::remote("Bob", "a:b").to_string(), "Bob: a:b");
        assert_eq!(ChatLine::system("Disconnected").to_string(), "Disconnected");
    }

    #[test]
    fn test_system_user_becomes_notice() {
        let line = ChatLine::remote(SYSTEM_USER, "Bob is online");
        assert_eq!(line.kind(), "system");
        assert_eq!(line.message(), "Bob is online");
    }

    #[test]
    fn test_kind() {
        assert_eq!(ChatLine::local("a", "b").kind(), "local");
        assert_eq!(ChatLine::remote("a", "b").kind(), "remote");
    }
}
