//! Chat and video-call session state
//!
//! Transport-agnostic state machine for one peer conversation:
//!
//! ```text
//! Idle -> Connecting -> Connected <-> InCall
//!   ^                       |            |
//!   +------- disconnect ----+------------+
//! ```
//!
//! The peer transport drives the machine by calling the event methods below
//! and renders the returned [`ChatLine`]s. Sealed envelopes travel as ordinary
//! chat messages.

pub mod chat;

pub use chat::ChatLine;

use chrono::Timelike;
use tracing::debug;

use crate::error::{SealError, SealResult};

/// Username used when none is given
pub const DEFAULT_USERNAME: &str = "bot1";

/// Generate a peer id from the time of day in `HHMM` form
pub fn peer_id_from_time(time: &impl Timelike) -> String {
    format!("{:02}{:02}", time.hour(), time.minute())
}

/// Connection state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No connection
    Idle,
    /// Outgoing connection requested, not yet open
    Connecting { peer_id: String },
    /// Data channel open
    Connected { peer_id: String },
    /// Data channel open and a media call is active
    InCall { peer_id: String },
}

impl SessionState {
    /// The remote peer, if any
    pub fn peer_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Connecting { peer_id }
            | Self::Connected { peer_id }
            | Self::InCall { peer_id } => Some(peer_id),
        }
    }

    /// Whether chat messages can be sent
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Connected { .. } | Self::InCall { .. })
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting { .. } => "connecting",
            Self::Connected { .. } => "connected",
            Self::InCall { .. } => "in-call",
        }
    }
}

/// One chat/call session with explicit lifetime
#[derive(Debug)]
pub struct Session {
    local_peer_id: String,
    username: String,
    state: SessionState,
    media_available: bool,
    muted: bool,
    video_paused: bool,
}

impl Session {
    /// Create an idle session
    pub fn new(local_peer_id: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        let username = if username.trim().is_empty() {
            DEFAULT_USERNAME.to_string()
        } else {
            username
        };

        Self {
            local_peer_id: local_peer_id.into(),
            username,
            state: SessionState::Idle,
            media_available: false,
            muted: false,
            video_paused: false,
        }
    }

    pub fn local_peer_id(&self) -> &str {
        &self.local_peer_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_video_paused(&self) -> bool {
        self.video_paused
    }

    /// Record whether camera and microphone access was granted
    pub fn set_media_available(&mut self, available: bool) {
        self.media_available = available;
        if !available {
            self.muted = false;
            self.video_paused = false;
        }
    }

    /// Request an outgoing connection
    pub fn connect(&mut self, peer_id: &str) -> SealResult<()> {
        let peer_id = peer_id.trim();
        if peer_id.is_empty() {
            return Err(SealError::Validation("Please enter a Peer ID".into()));
        }
        if self.state != SessionState::Idle {
            return Err(self.invalid("connect"));
        }
        self.transition(SessionState::Connecting {
            peer_id: peer_id.to_string(),
        });
        Ok(())
    }

    /// The outgoing connection opened
    pub fn connection_opened(&mut self) -> SealResult<ChatLine> {
        let SessionState::Connecting { peer_id } = &self.state else {
            return Err(self.invalid("open connection"));
        };
        let line = ChatLine::system(format!("Connected to {}", peer_id));
        let peer_id = peer_id.clone();
        self.transition(SessionState::Connected { peer_id });
        Ok(line)
    }

    /// A remote peer connected to us
    ///
    /// Replaces any existing connection, as a new data channel supersedes the
    /// previous one. An active call is dropped and announced first.
    pub fn incoming_connection(&mut self, peer_id: &str) -> Vec<ChatLine> {
        let mut lines = Vec::with_capacity(2);
        if let SessionState::InCall { peer_id: previous } = &self.state {
            lines.push(ChatLine::system(format!("Call with {} ended", previous)));
        }
        self.reset_media_flags();
        self.transition(SessionState::Connected {
            peer_id: peer_id.to_string(),
        });
        lines.push(ChatLine::system(format!("{} is online", peer_id)));
        lines
    }

    /// Greeting sent to the peer once the channel opens
    pub fn online_notice(&self) -> ChatLine {
        ChatLine::remote(chat::SYSTEM_USER, format!("{} is online", self.username))
    }

    /// Send a chat message
    pub fn send(&self, message: &str) -> SealResult<ChatLine> {
        if message.is_empty() {
            return Err(SealError::Validation("Message is empty".into()));
        }
        if !self.state.is_open() {
            return Err(SealError::Validation("Not connected to any peer.".into()));
        }
        Ok(ChatLine::local(&self.username, message))
    }

    /// A chat message arrived from the peer
    pub fn receive(&self, user: &str, message: &str) -> ChatLine {
        ChatLine::remote(user, message)
    }

    /// Close the connection locally
    pub fn disconnect(&mut self) -> Option<ChatLine> {
        if self.state == SessionState::Idle {
            return None;
        }
        self.reset_media_flags();
        self.transition(SessionState::Idle);
        Some(ChatLine::system("Disconnected"))
    }

    /// The peer closed the connection
    pub fn remote_closed(&mut self) -> Option<ChatLine> {
        let peer_id = self.state.peer_id()?.to_string();
        self.reset_media_flags();
        self.transition(SessionState::Idle);
        Some(ChatLine::system(format!("{} is offline", peer_id)))
    }

    /// Start a call to the connected peer
    pub fn start_call(&mut self) -> SealResult<()> {
        let peer_id = match &self.state {
            SessionState::Connected { peer_id } => peer_id.clone(),
            SessionState::InCall { .. } => return Err(self.invalid("start call")),
            _ => return Err(SealError::Validation("Not connected to any peer.".into())),
        };
        if !self.media_available {
            return Err(SealError::Validation(
                "Camera and microphone access denied.".into(),
            ));
        }
        self.transition(SessionState::InCall { peer_id });
        Ok(())
    }

    /// Answer a call from the connected peer
    ///
    /// Calls are rejected when no local media is available.
    pub fn incoming_call(&mut self) -> SealResult<()> {
        if !self.media_available {
            return Err(SealError::Validation(
                "Cannot accept video call: Camera and microphone access denied.".into(),
            ));
        }
        self.start_call()
    }

    /// End the active call, keeping the data connection
    pub fn end_call(&mut self) -> SealResult<()> {
        let SessionState::InCall { peer_id } = &self.state else {
            return Err(self.invalid("end call"));
        };
        let peer_id = peer_id.clone();
        self.reset_media_flags();
        self.transition(SessionState::Connected { peer_id });
        Ok(())
    }

    /// Toggle the microphone; returns the new muted state
    pub fn toggle_mute(&mut self) -> SealResult<bool> {
        self.require_media()?;
        self.muted = !self.muted;
        Ok(self.muted)
    }

    /// Toggle the camera; returns the new paused state
    pub fn toggle_video(&mut self) -> SealResult<bool> {
        self.require_media()?;
        self.video_paused = !self.video_paused;
        Ok(self.video_paused)
    }

    fn require_media(&self) -> SealResult<()> {
        if self.media_available {
            Ok(())
        } else {
            Err(SealError::Validation("No local media stream".into()))
        }
    }

    fn reset_media_flags(&mut self) {
        self.muted = false;
        self.video_paused = false;
    }

    fn invalid(&self, action: &str) -> SealError {
        SealError::Validation(format!("Cannot {} while {}", action, self.state.name()))
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next;
    }
}
