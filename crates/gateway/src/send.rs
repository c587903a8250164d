use {
    axum::{
        Json,
        extract::{State, rejection::JsonRejection},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::{Deserialize, Serialize},
    serde_json::json,
    tracing::warn,
};

use groupcast_channels::{ChatSession, is_group_id};

use crate::{media::decode_media, state::FacadeState};

// ── Request/response shapes ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub to: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMediaRequest {
    pub to: Option<String>,
    pub base64: Option<String>,
    pub filename: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMediaMultiRequest {
    #[serde(rename = "toList")]
    pub to_list: Option<Vec<String>>,
    pub base64: Option<String>,
    pub filename: Option<String>,
    pub caption: Option<String>,
}

/// Per-target outcome of a multi-send; response order matches input order.
#[derive(Debug, Serialize)]
pub struct SendOutcome {
    #[serde(rename = "groupId")]
    pub group_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    fn sent(group_id: String) -> Self {
        Self {
            group_id,
            success: true,
            error: None,
        }
    }

    fn failed(group_id: String, error: impl Into<String>) -> Self {
        Self {
            group_id,
            success: false,
            error: Some(error.into()),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /send-message`: text to a single conversation.
pub async fn send_message(
    State(state): State<FacadeState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return client_error(rejection.body_text()),
    };
    let (Some(to), Some(message)) = (non_empty(req.to), non_empty(req.message)) else {
        return client_error("Missing `to` or `message` field.");
    };

    match state.session.send_text(&to, &message).await {
        Ok(()) => sent(),
        Err(e) => server_error(e.to_string()),
    }
}

/// `POST /send-media`: one file to a single conversation.
pub async fn send_media(
    State(state): State<FacadeState>,
    payload: Result<Json<SendMediaRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return client_error(rejection.body_text()),
    };
    let (Some(to), Some(base64), Some(filename)) = (
        non_empty(req.to),
        non_empty(req.base64),
        non_empty(req.filename),
    ) else {
        return client_error("Missing required fields: to/base64/filename");
    };
    let data = match decode_media(&base64) {
        Ok(data) => data,
        Err(e) => return client_error(format!("Invalid base64 payload: {e}")),
    };
    let caption = req.caption.unwrap_or_default();

    match state.session.send_file(&to, &data, &filename, &caption).await {
        Ok(()) => sent(),
        Err(e) => server_error(e.to_string()),
    }
}

/// `POST /send-media-multi`: one file to many groups, sequentially.
///
/// Once the payload itself validates, the response is always `success: true`;
/// per-target failures (bad identifier, transport error) are recorded in
/// `results` and never abort the remaining targets.
pub async fn send_media_multi(
    State(state): State<FacadeState>,
    payload: Result<Json<SendMediaMultiRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return client_error(rejection.body_text()),
    };
    let to_list = match req.to_list {
        Some(list) if !list.is_empty() => list,
        _ => return client_error("Missing toList/base64/filename"),
    };
    let (Some(base64), Some(filename)) = (non_empty(req.base64), non_empty(req.filename)) else {
        return client_error("Missing toList/base64/filename");
    };
    let data = match decode_media(&base64) {
        Ok(data) => data,
        Err(e) => return client_error(format!("Invalid base64 payload: {e}")),
    };
    let caption = req.caption.unwrap_or_default();

    let mut results = Vec::with_capacity(to_list.len());
    for group_id in to_list {
        if !is_group_id(&group_id) {
            results.push(SendOutcome::failed(group_id, "Invalid group ID"));
            continue;
        }
        match state
            .session
            .send_file(&group_id, &data, &filename, &caption)
            .await
        {
            Ok(()) => results.push(SendOutcome::sent(group_id)),
            Err(e) => {
                warn!(group = %group_id, error = %e, "multi-send target failed");
                results.push(SendOutcome::failed(group_id, e.to_string()));
            },
        }
    }

    (
        StatusCode::OK,
        Json(json!({ "success": true, "results": results })),
    )
        .into_response()
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Treat absent and empty-string fields the same way.
fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn sent() -> Response {
    (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}

fn client_error(message: impl Into<String>) -> Response {
    envelope(StatusCode::BAD_REQUEST, message)
}

fn server_error(message: impl Into<String>) -> Response {
    envelope(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn envelope(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}
