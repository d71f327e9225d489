//! HTTP API handlers
//!
//! Thin transport over [`VlcRemote`]: reads return the derived state, writes
//! turn into an [`Intent`] and go through `dispatch`.

use crate::bus::SharedBus;
use crate::remote::{CommandResponse, Intent, PlaylistItem, RemoteState, SeekDirection, VlcRemote};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub remote: VlcRemote,
    pub bus: SharedBus,
}

impl AppState {
    pub fn new(remote: VlcRemote, bus: SharedBus) -> Self {
        Self { remote, bus }
    }
}

/// Build the control API
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/status", get(status_handler))
        // Remote state
        .route("/remote/state", get(remote_state_handler))
        .route("/remote/playlist", get(playlist_handler))
        // Intents
        .route("/remote/control", post(control_handler))
        .route("/remote/volume", post(volume_handler))
        .route("/remote/seek", post(seek_handler))
        .route("/remote/playlist/play", post(playlist_play_handler))
        .route("/remote/playlist/delete", post(playlist_delete_handler))
        .route("/remote/playlist/delete/confirm", post(delete_confirm_handler))
        .route("/remote/playlist/delete/cancel", post(delete_cancel_handler))
        // Event stream (SSE)
        .route("/events", get(events_handler))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(error: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// 200 with the response body, or 502 when VLC refused or was unreachable
fn intent_response(response: CommandResponse) -> Response {
    if response.success {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: response
                    .error
                    .unwrap_or_else(|| "VLC command failed".to_string()),
            }),
        )
            .into_response()
    }
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
    pub vlc_url: String,
    pub vlc_connected: bool,
    pub polling: bool,
    pub bus_subscribers: usize,
}

/// GET /status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "vlc-remote",
        version: env!("VLCR_VERSION"),
        git_sha: env!("VLCR_GIT_SHA"),
        vlc_url: state.remote.base_url().to_string(),
        vlc_connected: state.remote.is_connected().await,
        polling: state.remote.is_running(),
        bus_subscribers: state.bus.subscriber_count(),
    })
}

/// GET /remote/state - Full derived state
pub async fn remote_state_handler(State(state): State<AppState>) -> Json<RemoteState> {
    Json(state.remote.snapshot().await)
}

/// GET /remote/playlist - Playlist entries in server order
pub async fn playlist_handler(State(state): State<AppState>) -> Json<Vec<PlaylistItem>> {
    Json(state.remote.snapshot().await.playlist)
}

/// Control request body
#[derive(Deserialize)]
pub struct ControlRequest {
    pub action: String,
}

/// POST /remote/control - Value-less intents (play_pause, stop, next, ...)
pub async fn control_handler(
    State(state): State<AppState>,
    Json(req): Json<ControlRequest>,
) -> Response {
    match Intent::from_action(&req.action) {
        Some(intent) => intent_response(state.remote.dispatch(intent).await),
        None => bad_request(format!("Unknown action: {}", req.action)),
    }
}

/// Volume request body
#[derive(Deserialize)]
pub struct VolumeRequest {
    /// Percent, 0..100. Wider than `u8` so out-of-range bodies reach the
    /// range check instead of failing extraction.
    pub value: i64,
}

/// POST /remote/volume - Set volume percent
pub async fn volume_handler(
    State(state): State<AppState>,
    Json(req): Json<VolumeRequest>,
) -> Response {
    let Ok(value) = u8::try_from(req.value) else {
        return bad_request(format!("Volume out of range: {}", req.value));
    };
    if value > 100 {
        return bad_request(format!("Volume out of range: {}", value));
    }
    intent_response(state.remote.dispatch(Intent::SetVolume { value }).await)
}

/// Seek request body: absolute percent or a ±10s step
#[derive(Deserialize)]
pub struct SeekRequest {
    pub percent: Option<f64>,
    pub direction: Option<SeekDirection>,
}

/// POST /remote/seek
pub async fn seek_handler(
    State(state): State<AppState>,
    Json(req): Json<SeekRequest>,
) -> Response {
    let intent = match (req.percent, req.direction) {
        (Some(percent), None) => Intent::SeekToPercent { percent },
        (None, Some(direction)) => Intent::SeekRelative { direction },
        _ => return bad_request("Expected exactly one of 'percent' or 'direction'"),
    };
    intent_response(state.remote.dispatch(intent).await)
}

/// Playlist entry reference
#[derive(Deserialize)]
pub struct PlaylistItemRequest {
    pub id: String,
}

/// POST /remote/playlist/play - Jump to an entry
pub async fn playlist_play_handler(
    State(state): State<AppState>,
    Json(req): Json<PlaylistItemRequest>,
) -> Response {
    intent_response(state.remote.dispatch(Intent::PlayItem { id: req.id }).await)
}

/// Delete request body; no id means clear the whole playlist
#[derive(Deserialize, Default)]
pub struct DeleteRequest {
    #[serde(default)]
    pub id: Option<String>,
}

/// POST /remote/playlist/delete - Stage a delete; nothing is sent until confirmed
pub async fn playlist_delete_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Response {
    let intent = match req.id {
        Some(id) => Intent::RequestRemove { id },
        None => Intent::RequestClear,
    };
    intent_response(state.remote.dispatch(intent).await)
}

/// POST /remote/playlist/delete/confirm
pub async fn delete_confirm_handler(State(state): State<AppState>) -> Response {
    intent_response(state.remote.dispatch(Intent::ConfirmDelete).await)
}

/// POST /remote/playlist/delete/cancel
pub async fn delete_cancel_handler(State(state): State<AppState>) -> Response {
    intent_response(state.remote.dispatch(Intent::CancelDelete).await)
}

// =============================================================================
// SSE Events
// =============================================================================

/// GET /events - Server-Sent Events stream
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.bus.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(_) => None,
            },
            Err(_) => None, // Skip lagged messages
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
