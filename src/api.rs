use gloo_net::http::Request;
use web_sys::{Blob, FormData};

use crate::errors::ApiError;
use crate::models::{ChatRequest, ChatResponse, HistoryEntry, SttResponse};

/// Fetches the stored conversation history, oldest first.
pub async fn fetch_history() -> Result<Vec<HistoryEntry>, ApiError> {
    let resp = Request::get("/api/get-memory")
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status {
            code: resp.status(),
        });
    }

    resp.json::<Vec<HistoryEntry>>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Sends one chat message and returns the assistant reply.
pub async fn send_chat(body: &ChatRequest) -> Result<ChatResponse, ApiError> {
    let resp = Request::post("/api/chat")
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status {
            code: resp.status(),
        });
    }

    resp.json::<ChatResponse>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Uploads a recorded audio blob for transcription (multipart field `audio`).
pub async fn speech_to_text(audio: &Blob) -> Result<SttResponse, ApiError> {
    let form = FormData::new().map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_blob("audio", audio)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

    let resp = Request::post("/api/speech-to-text")
        .body(form)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !resp.ok() {
        return Err(ApiError::Status {
            code: resp.status(),
        });
    }

    resp.json::<SttResponse>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
