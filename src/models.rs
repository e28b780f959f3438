use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::time;

/// Seeded as the only message when the backend has no stored history.
pub const GREETING: &str = "Hi, I'm Lyra! Lovely to meet you. ❤️";

/// Fixed reply rendered when the chat request fails.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again later.";

/// Render-side conversation role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The local user.
    Sent,
    /// The remote agent.
    Received,
}

impl Role {
    /// Backend role naming maps onto render roles: `"lyra"` is the remote
    /// agent, anything else is the local user.
    pub fn from_backend(role: &str) -> Self {
        if role == "lyra" {
            Role::Received
        } else {
            Role::Sent
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Role::Sent => "sent",
            Role::Received => "received",
        }
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// One rendered conversation entry. Immutable once appended; a message with
/// an audio URL is a voice bubble, otherwise a plain text bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Locally generated key for the keyed message list.
    pub id: u64,
    pub content: String,
    pub role: Role,
    pub audio_url: Option<String>,
    /// RFC 3339; a missing source timestamp becomes arrival time.
    pub timestamp: String,
}

impl Message {
    pub fn new(
        content: impl Into<String>,
        role: Role,
        audio_url: Option<String>,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            content: content.into(),
            role,
            audio_url,
            timestamp: timestamp.unwrap_or_else(time::now_iso),
        }
    }

    pub fn is_voice(&self) -> bool {
        self.audio_url.is_some()
    }
}

/// One stored conversation entry from `GET /api/get-memory`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub output_type: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HistoryEntry {
    /// Audio carries over only when the stored entry was produced as voice.
    pub fn voice_audio(&self) -> Option<String> {
        if self.output_type.as_deref() == Some("voice") {
            self.audio_url.clone()
        } else {
            None
        }
    }
}

impl From<HistoryEntry> for Message {
    fn from(entry: HistoryEntry) -> Self {
        let audio = entry.voice_audio();
        Message::new(
            entry.content,
            Role::from_backend(&entry.role),
            audio,
            entry.timestamp,
        )
    }
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_name: String,
    pub preferred_output: String,
    pub is_voice: bool,
}

/// Response from `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response from `POST /api/speech-to-text`.
#[derive(Debug, Clone, Deserialize)]
pub struct SttResponse {
    #[serde(default)]
    pub text: Option<String>,
}

/// In-memory user preferences. Saving keeps them for the session only;
/// persistence to `/api/set-memory` is reserved and not wired yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPreferences {
    pub name: String,
    pub birthday: String,
    pub interests: String,
    pub output_preference: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            name: String::new(),
            birthday: String::new(),
            interests: String::new(),
            output_preference: "auto".to_string(),
        }
    }
}
