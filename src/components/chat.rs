use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::models::Message;
use crate::recorder;
use crate::state::AppState;
use crate::time;

/// Main chat area: header, message list, typing indicator, and input row.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let container = NodeRef::<html::Div>::new();

    // Keep the newest entry in view. Bubbles never scroll themselves.
    Effect::new(move |_| {
        state.messages.track();
        state.is_typing.track();
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <main class="chat-area">
            <div class="chat-header">
                <h2>"Lyra"</h2>
                <button
                    class="settings-btn"
                    on:click=move |_| state.set_settings_open.set(true)
                >
                    "⚙"
                </button>
            </div>

            <div class="chat-messages" node_ref=container>
                <For
                    each=move || state.messages.get()
                    key=|m| m.id
                    let:msg
                >
                    <MessageBubble msg=msg />
                </For>
                // Transient placeholder; always renders after the real messages.
                {move || state.is_typing.get().then(|| view! { <TypingIndicator /> })}
            </div>

            <ChatInput />
        </main>
    }
}

/// One message bubble: plain text, or play/pause controls plus a toggleable
/// transcript when the message carries audio.
#[component]
fn MessageBubble(msg: Message) -> impl IntoView {
    let role_class = msg.role.css_class();
    let time_label = time::clock_label(Some(msg.timestamp.as_str()));

    let is_voice = msg.is_voice();
    let transcript = msg.content.clone();
    let (show_transcript, set_show_transcript) = signal(false);
    let audio_ref = NodeRef::<html::Audio>::new();

    // A broken audio URL fails silently at playback time.
    let play = move |_| {
        if let Some(audio) = audio_ref.get_untracked() {
            let _ = audio.play();
        }
    };
    let pause = move |_| {
        if let Some(audio) = audio_ref.get_untracked() {
            let _ = audio.pause();
        }
    };

    view! {
        <div class="message-container">
            <div class=format!("message {role_class}")>
                {if let Some(url) = msg.audio_url.clone() {
                    view! {
                        <div class="voice-controls">
                            <button class="voice-play" on:click=play>"▶"</button>
                            <button class="voice-pause" on:click=pause>"⏸"</button>
                        </div>
                        <audio
                            node_ref=audio_ref
                            src=url
                            preload="metadata"
                            style="display:none"
                        ></audio>
                        <div class=format!("trans-btn-container {role_class}")>
                            <button
                                class="toggle-transcript"
                                on:click=move |_| set_show_transcript.update(|v| *v = !*v)
                            >
                                {move || {
                                    if show_transcript.get() { "hide transcript" } else { "transcript" }
                                }}
                            </button>
                        </div>
                    }
                    .into_any()
                } else {
                    view! { <div class="message-content">{msg.content.clone()}</div> }.into_any()
                }}
            </div>
            {is_voice.then(|| view! {
                <div class="transcript" class:hidden=move || !show_transcript.get()>
                    {transcript}
                </div>
            })}
            <div class=format!("message-time {role_class}")>{time_label}</div>
        </div>
    }
}

/// Transient "assistant is replying" placeholder.
#[component]
fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="message-container typing-indicator">
            <div class="message received">
                <div class="typing-animation">
                    <span></span>
                    <span></span>
                    <span></span>
                </div>
            </div>
        </div>
    }
}

/// Input row: mic button, textarea (Enter sends, Shift+Enter breaks the
/// line), send button, and the recording indicator while capture is live.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let send = move || {
        let text = input.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        set_input.set(String::new());
        state.send_message(text, false, None);
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="input-area">
            {move || state.is_recording.get().then(|| view! { <RecordingIndicator /> })}
            <div class="input-row">
                <button class="mic-btn" on:click=move |_| recorder::start(state)>
                    "🎤"
                </button>
                <textarea
                    rows="1"
                    placeholder="Type a message… (Enter to send, Shift+Enter for newline)"
                    prop:value=input
                    on:input=move |ev| {
                        set_input.set(event_target_value(&ev));
                    }
                    on:keydown=on_keydown
                />
                <button class="send-btn" on:click=move |_| send()>
                    "Send"
                </button>
            </div>
        </div>
    }
}

/// Shown while the microphone is live; its stop button ends the capture.
#[component]
fn RecordingIndicator() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="recording-indicator">
            <span class="recording-dot"></span>
            "Recording…"
            <button class="stop-recording" on:click=move |_| recorder::stop(&state)>
                "Stop"
            </button>
        </div>
    }
}
