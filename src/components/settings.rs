use leptos::ev;
use leptos::prelude::*;

use crate::models::UserPreferences;
use crate::state::AppState;

/// Settings modal over the in-memory preferences. Saving keeps them for the
/// session and closes the panel; `/api/set-memory` is reserved, not wired.
#[component]
pub fn SettingsPanel() -> impl IntoView {
    let state = expect_context::<AppState>();

    // Seed the form from whatever was saved last.
    let prefs = state.preferences.get_untracked();
    let (name, set_name) = signal(prefs.name);
    let (birthday, set_birthday) = signal(prefs.birthday);
    let (interests, set_interests) = signal(prefs.interests);
    let (output, set_output) = signal(prefs.output_preference);

    let save = move |_| {
        state.set_preferences.set(UserPreferences {
            name: name.get_untracked(),
            birthday: birthday.get_untracked(),
            interests: interests.get_untracked(),
            output_preference: output.get_untracked(),
        });
        state.set_settings_open.set(false);
    };

    view! {
        <div class="modal-backdrop" on:click=move |_| state.set_settings_open.set(false)>
            <div class="settings-modal" on:click=|ev: ev::MouseEvent| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>"Settings"</h3>
                    <button
                        class="close-modal"
                        on:click=move |_| state.set_settings_open.set(false)
                    >
                        "×"
                    </button>
                </div>

                <label>
                    "Name"
                    <input
                        prop:value=name
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Birthday"
                    <input
                        type="date"
                        prop:value=birthday
                        on:input=move |ev| set_birthday.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Interests"
                    <textarea
                        rows="3"
                        prop:value=interests
                        on:input=move |ev| set_interests.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Preferred output"
                    <select
                        prop:value=output
                        on:change=move |ev| set_output.set(event_target_value(&ev))
                    >
                        <option value="auto">"Auto"</option>
                        <option value="text">"Text"</option>
                        <option value="voice">"Voice"</option>
                    </select>
                </label>

                <button class="save-settings" on:click=save>
                    "Save"
                </button>
            </div>
        </div>
    }
}
