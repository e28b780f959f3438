use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::models::{
    ChatRequest, ChatResponse, HistoryEntry, Message, Role, UserPreferences, APOLOGY, GREETING,
};

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub messages: ReadSignal<Vec<Message>>,
    pub is_typing: ReadSignal<bool>,
    pub is_recording: ReadSignal<bool>,
    pub settings_open: ReadSignal<bool>,
    pub preferences: ReadSignal<UserPreferences>,

    // --- Write signals (for mutating state) ---
    pub set_messages: WriteSignal<Vec<Message>>,
    pub set_is_typing: WriteSignal<bool>,
    pub set_is_recording: WriteSignal<bool>,
    pub set_settings_open: WriteSignal<bool>,
    pub set_preferences: WriteSignal<UserPreferences>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let (messages, set_messages) = signal(Vec::<Message>::new());
        let (is_typing, set_is_typing) = signal(false);
        let (is_recording, set_is_recording) = signal(false);
        let (settings_open, set_settings_open) = signal(false);
        let (preferences, set_preferences) = signal(UserPreferences::default());

        let state = Self {
            messages,
            is_typing,
            is_recording,
            settings_open,
            preferences,
            set_messages,
            set_is_typing,
            set_is_recording,
            set_settings_open,
            set_preferences,
        };

        provide_context(state);
        state
    }

    /// Load stored history from the backend. An empty result seeds the
    /// greeting; a transport failure logs and leaves the view empty.
    pub fn load_history(&self) {
        let state = *self;
        spawn_local(async move {
            match api::fetch_history().await {
                Ok(entries) => state.set_messages.set(map_history(entries)),
                Err(e) => log::error!("Failed to load chat history: {e}"),
            }
        });
    }

    /// Render the outgoing message immediately, then request the reply.
    /// Voice sends carry the local object URL — the backend has not stored
    /// its own copy of the audio yet.
    pub fn send_message(&self, content: String, is_voice: bool, local_audio_url: Option<String>) {
        if !should_send(&content, is_voice) {
            return;
        }

        let audio = if is_voice { local_audio_url } else { None };
        let outgoing = Message::new(content.clone(), Role::Sent, audio, None);
        self.set_messages.update(|msgs| msgs.push(outgoing));
        self.set_is_typing.set(true);

        let prefs = self.preferences.get_untracked();
        let request = ChatRequest {
            message: content,
            user_name: prefs.name,
            preferred_output: prefs.output_preference,
            is_voice,
        };

        let state = *self;
        spawn_local(async move {
            let reply = match api::send_chat(&request).await {
                Ok(resp) => reply_from_response(resp),
                Err(e) => {
                    log::error!("Chat request failed: {e}");
                    apology()
                }
            };
            // Typing clears before the reply lands, success or failure.
            state.set_is_typing.set(false);
            state.set_messages.update(|msgs| msgs.push(reply));
        });
    }
}

/// `true` when a send carries something worth submitting. Whitespace-only
/// text is a no-op unless the message came from a recording.
pub fn should_send(content: &str, is_voice: bool) -> bool {
    is_voice || !content.trim().is_empty()
}

/// Map a history response into render order. Empty history seeds the greeting.
pub fn map_history(entries: Vec<HistoryEntry>) -> Vec<Message> {
    if entries.is_empty() {
        vec![greeting()]
    } else {
        entries.into_iter().map(Message::from).collect()
    }
}

pub fn greeting() -> Message {
    Message::new(GREETING, Role::Received, None, None)
}

pub fn apology() -> Message {
    Message::new(APOLOGY, Role::Received, None, None)
}

/// Assistant reply bubble; a missing timestamp becomes arrival time.
pub fn reply_from_response(resp: ChatResponse) -> Message {
    Message::new(resp.message, Role::Received, resp.audio_url, resp.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: &str, content: &str, ts: &str) -> HistoryEntry {
        HistoryEntry {
            role: role.into(),
            content: content.into(),
            output_type: Some("text".into()),
            audio_url: None,
            timestamp: Some(ts.into()),
        }
    }

    #[test]
    fn history_renders_in_response_order() {
        let view = map_history(vec![
            entry("user", "hi", "2024-01-01T00:00:00Z"),
            entry("lyra", "hello", "2024-01-01T00:00:05Z"),
        ]);

        assert_eq!(view.len(), 2);
        assert_eq!(view[0].role, Role::Sent);
        assert_eq!(view[0].content, "hi");
        assert!(!view[0].is_voice());
        assert_eq!(view[1].role, Role::Received);
        assert_eq!(view[1].content, "hello");
        assert!(!view[1].is_voice());
    }

    #[test]
    fn empty_history_seeds_exactly_one_greeting() {
        let view = map_history(Vec::new());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].role, Role::Received);
        assert_eq!(view[0].content, GREETING);
        assert!(!view[0].is_voice());
    }

    #[test]
    fn empty_text_send_is_a_no_op() {
        assert!(!should_send("", false));
        assert!(!should_send("   \n\t", false));
        assert!(should_send("test", false));
        // A recording with an empty transcript would have been dropped
        // earlier, but voice itself never trips the emptiness guard.
        assert!(should_send("", true));
    }

    #[test]
    fn reply_uses_backend_timestamp_when_present() {
        let reply = reply_from_response(ChatResponse {
            message: "ok".into(),
            audio_url: None,
            timestamp: Some("2024-01-01T00:00:10Z".into()),
        });
        assert_eq!(reply.role, Role::Received);
        assert_eq!(reply.content, "ok");
        assert_eq!(reply.timestamp, "2024-01-01T00:00:10Z");
    }

    #[test]
    fn reply_falls_back_to_arrival_time() {
        let reply = reply_from_response(ChatResponse {
            message: "ok".into(),
            audio_url: None,
            timestamp: None,
        });
        assert!(chrono::DateTime::parse_from_rfc3339(&reply.timestamp).is_ok());
    }

    #[test]
    fn reply_keeps_backend_audio() {
        let reply = reply_from_response(ChatResponse {
            message: "spoken".into(),
            audio_url: Some("/audio/reply.webm".into()),
            timestamp: None,
        });
        assert!(reply.is_voice());
    }

    #[test]
    fn failure_reply_is_plain_apology() {
        let reply = apology();
        assert_eq!(reply.role, Role::Received);
        assert_eq!(reply.content, APOLOGY);
        assert!(!reply.is_voice());
    }

    // The exchange in `send_message` appends the outgoing bubble, then the
    // reply (or apology) once typing has cleared. Replayed over a plain Vec
    // this pins the final view for both outcomes.
    #[test]
    fn send_then_reply_leaves_two_ordered_messages() {
        let mut view = vec![Message::new("test", Role::Sent, None, None)];
        view.push(reply_from_response(ChatResponse {
            message: "ok".into(),
            audio_url: None,
            timestamp: Some("2024-01-01T00:00:10Z".into()),
        }));

        assert_eq!(view.len(), 2);
        assert_eq!(
            (view[0].role, view[0].content.as_str()),
            (Role::Sent, "test")
        );
        assert_eq!((view[1].role, view[1].content.as_str()), (Role::Received, "ok"));
    }

    #[test]
    fn send_then_failure_ends_with_apology() {
        let mut view = vec![Message::new("test", Role::Sent, None, None)];
        view.push(apology());

        assert_eq!(view.len(), 2);
        assert_eq!(view[0].content, "test");
        assert_eq!(view[1].content, APOLOGY);
        assert_eq!(view[1].role, Role::Received);
    }
}
