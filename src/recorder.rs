//! Microphone capture. One exclusive session at a time: `start` while
//! recording and `stop` while idle are ignored, and every stopped session
//! releases its media tracks before the upload begins.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use leptos::prelude::Set;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobEvent, BlobPropertyBag, MediaRecorder, MediaStream, MediaStreamConstraints,
    MediaStreamTrack, Url,
};

use crate::api;
use crate::state::AppState;

const AUDIO_MIME: &str = "audio/webm";

struct Session {
    recorder: MediaRecorder,
    stream: MediaStream,
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

fn is_recording() -> bool {
    SESSION.with(|s| s.borrow().is_some())
}

/// Ask for the microphone and begin buffering audio. Permission denial logs
/// and leaves the widget idle; it must never take the page down.
pub fn start(state: AppState) {
    if is_recording() {
        return;
    }
    spawn_local(async move {
        if let Err(e) = begin_capture(state).await {
            log::warn!("Microphone capture did not start: {e:?}");
            state.set_is_recording.set(false);
        }
    });
}

/// Halt capture and release the device. The transcription upload runs from
/// the recorder's `stop` event once the final chunk has been flushed.
pub fn stop(state: &AppState) {
    let Some(session) = SESSION.with(|s| s.borrow_mut().take()) else {
        return;
    };
    if let Err(e) = session.recorder.stop() {
        log::warn!("MediaRecorder stop failed: {e:?}");
    }
    stop_tracks(&session.stream);
    state.set_is_recording.set(false);
}

async fn begin_capture(state: AppState) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let devices = window.navigator().media_devices()?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);

    let stream: MediaStream = JsFuture::from(devices.get_user_media_with_constraints(&constraints)?)
        .await?
        .dyn_into()?;

    if is_recording() {
        // A second start won the race while we awaited permission.
        stop_tracks(&stream);
        return Ok(());
    }

    let recorder = MediaRecorder::new_with_media_stream(&stream)?;
    let chunks = Rc::new(RefCell::new(Vec::<Blob>::new()));

    let data_chunks = chunks.clone();
    let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |ev: BlobEvent| {
        if let Some(blob) = ev.data() {
            data_chunks.borrow_mut().push(blob);
        }
    });
    recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
    on_data.forget();

    let on_stop = Closure::<dyn FnMut()>::new(move || {
        let recorded = chunks.borrow_mut().split_off(0);
        spawn_local(async move {
            transcribe_and_send(state, recorded).await;
        });
    });
    recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
    on_stop.forget();

    recorder.start()?;
    state.set_is_recording.set(true);
    SESSION.with(|s| *s.borrow_mut() = Some(Session { recorder, stream }));
    Ok(())
}

/// Upload the finished recording; a non-empty transcript becomes a voice
/// send, anything else is logged and dropped.
async fn transcribe_and_send(state: AppState, recorded: Vec<Blob>) {
    let blob = match assemble(&recorded) {
        Ok(blob) => blob,
        Err(e) => {
            log::warn!("Could not assemble recorded audio: {e:?}");
            return;
        }
    };

    match api::speech_to_text(&blob).await {
        Ok(resp) => match resp.text.filter(|t| !t.trim().is_empty()) {
            Some(text) => {
                // Local playback URL for the outgoing bubble; the backend has
                // no copy of this audio to serve.
                let url = Url::create_object_url_with_blob(&blob).ok();
                state.send_message(text, true, url);
            }
            None => log::warn!("Transcription came back empty; recording dropped"),
        },
        Err(e) => log::warn!("Transcription upload failed: {e}"),
    }
}

fn assemble(chunks: &[Blob]) -> Result<Blob, JsValue> {
    let parts = Array::new();
    for chunk in chunks {
        parts.push(chunk);
    }
    let options = BlobPropertyBag::new();
    options.set_type(AUDIO_MIME);
    Blob::new_with_blob_sequence_and_options(&parts, &options)
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}
