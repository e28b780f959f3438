mod api;
mod components;
mod errors;
mod models;
mod recorder;
mod state;
mod time;

use leptos::mount::mount_to_body;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use components::chat::ChatArea;
use components::settings::SettingsPanel;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    // Load stored history on mount.
    state.load_history();
    release_microphone_on_unload(state);

    view! {
        <div class="app-container">
            <ChatArea />
            {move || state.settings_open.get().then(|| view! { <SettingsPanel /> })}
        </div>
    }
}

/// Navigating away must not leave the capture device held.
fn release_microphone_on_unload(state: AppState) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_unload = Closure::<dyn FnMut()>::new(move || recorder::stop(&state));
    if let Err(e) =
        window.add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())
    {
        log::warn!("Failed to register unload cleanup: {e:?}");
    }
    on_unload.forget();
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
