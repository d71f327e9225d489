//! Mock VLC HTTP interface for testing
//!
//! Simulates /requests/status.json (with commands) and /requests/playlist.json,
//! including Basic auth and injectable failures.

#![allow(dead_code)]

use axum::{
    extract::{Query, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// One playlist entry
#[derive(Debug, Clone)]
pub struct MockEntry {
    pub id: String,
    pub name: String,
    pub duration: i64,
}

impl MockEntry {
    pub fn new(id: &str, name: &str, duration: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            duration,
        }
    }
}

/// Mock player state
#[derive(Debug, Clone)]
pub struct MockPlayer {
    pub state: String, // "playing", "paused", "stopped"
    pub position: f64,
    pub time: i64,
    pub length: i64,
    pub volume: i64,
    pub random: bool,
    pub repeat: bool,
    pub filename: Option<String>,
    pub artist: Option<String>,
}

impl Default for MockPlayer {
    fn default() -> Self {
        Self {
            state: "stopped".to_string(),
            position: 0.0,
            time: 0,
            length: 0,
            volume: 256,
            random: false,
            repeat: false,
            filename: None,
            artist: None,
        }
    }
}

/// A status.json request as the server saw it
#[derive(Debug, Clone)]
pub struct LoggedRequest {
    /// Undecoded query string
    pub raw_query: String,
    /// Decoded query pairs
    pub params: HashMap<String, String>,
}

impl LoggedRequest {
    pub fn command(&self) -> Option<&str> {
        self.params.get("command").map(String::as_str)
    }

    pub fn val(&self) -> Option<&str> {
        self.params.get("val").map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.params.get("id").map(String::as_str)
    }
}

struct MockVlcState {
    password: String,
    player: MockPlayer,
    playlist: Vec<MockEntry>,
    current_id: Option<String>,
    /// status.json answers 500
    failing: bool,
    /// playlist.json answers 500
    playlist_failing: bool,
    /// playlist.json answers a tree without the playlist group
    playlist_malformed: bool,
    /// Commands are logged but not applied, so the echo is unchanged
    ignore_commands: bool,
    /// Held after the body is built, so a slow answer carries the state
    /// from when it arrived
    status_delay: Duration,
    playlist_delay: Duration,
    commands: Vec<LoggedRequest>,
    status_requests: usize,
    playlist_requests: usize,
}

/// Mock VLC Server
pub struct MockVlcServer {
    addr: SocketAddr,
    state: Arc<RwLock<MockVlcState>>,
    handle: JoinHandle<()>,
}

impl MockVlcServer {
    /// Start a mock VLC on a random port, protected by `password`
    pub async fn start(password: &str) -> Self {
        let state = Arc::new(RwLock::new(MockVlcState {
            password: password.to_string(),
            player: MockPlayer::default(),
            playlist: Vec::new(),
            current_id: None,
            failing: false,
            playlist_failing: false,
            playlist_malformed: false,
            ignore_commands: false,
            status_delay: Duration::ZERO,
            playlist_delay: Duration::ZERO,
            commands: Vec::new(),
            status_requests: 0,
            playlist_requests: 0,
        }));

        let app = Router::new()
            .route("/requests/status.json", get(handle_status))
            .route("/requests/playlist.json", get(handle_playlist))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Get the server address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn set_player(&self, player: MockPlayer) {
        self.state.write().await.player = player;
    }

    pub async fn player(&self) -> MockPlayer {
        self.state.read().await.player.clone()
    }

    pub async fn set_playlist(&self, entries: Vec<MockEntry>, current_id: Option<&str>) {
        let mut state = self.state.write().await;
        state.playlist = entries;
        state.current_id = current_id.map(str::to_string);
    }

    pub async fn set_failing(&self, failing: bool) {
        self.state.write().await.failing = failing;
    }

    pub async fn set_playlist_failing(&self, failing: bool) {
        self.state.write().await.playlist_failing = failing;
    }

    pub async fn set_playlist_malformed(&self, malformed: bool) {
        self.state.write().await.playlist_malformed = malformed;
    }

    pub async fn set_ignore_commands(&self, ignore: bool) {
        self.state.write().await.ignore_commands = ignore;
    }

    /// Delay every status.json answer from now on
    pub async fn set_status_delay(&self, delay: Duration) {
        self.state.write().await.status_delay = delay;
    }

    /// Delay every playlist.json answer from now on
    pub async fn set_playlist_delay(&self, delay: Duration) {
        self.state.write().await.playlist_delay = delay;
    }

    /// Command requests received so far (plain status reads excluded)
    pub async fn commands(&self) -> Vec<LoggedRequest> {
        self.state.read().await.commands.clone()
    }

    pub async fn status_requests(&self) -> usize {
        self.state.read().await.status_requests
    }

    pub async fn playlist_requests(&self) -> usize {
        self.state.read().await.playlist_requests
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

fn authorized(state: &MockVlcState, headers: &HeaderMap) -> bool {
    let expected = vlc_remote::client::basic_auth_header("", &state.password);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

fn status_body(state: &MockVlcState) -> Value {
    let player = &state.player;
    let mut body = json!({
        "state": player.state,
        "position": player.position,
        "time": player.time,
        "length": player.length,
        "volume": player.volume,
        "random": player.random,
        "repeat": player.repeat,
        "fullscreen": false,
        "apiversion": 3,
    });
    if player.filename.is_some() || player.artist.is_some() {
        body["information"] = json!({
            "category": {
                "meta": {
                    "filename": player.filename,
                    "artist": player.artist,
                }
            }
        });
    }
    body
}

fn apply_command(state: &mut MockVlcState, params: &HashMap<String, String>) {
    let Some(command) = params.get("command") else {
        return;
    };
    let val = params.get("val");
    let id = params.get("id");
    let player = &mut state.player;

    match command.as_str() {
        "pl_play" => {
            if let Some(id) = id {
                state.current_id = Some(id.clone());
            }
            player.state = "playing".to_string();
        }
        // VLC's pl_pause toggles
        "pl_pause" => {
            player.state = if player.state == "playing" {
                "paused".to_string()
            } else {
                "playing".to_string()
            };
        }
        "pl_stop" => player.state = "stopped".to_string(),
        "pl_random" => player.random = !player.random,
        "pl_repeat" => player.repeat = !player.repeat,
        "seek" => {
            if let Some(val) = val {
                if let Some(pct) = val.strip_suffix('%') {
                    if let Ok(pct) = pct.parse::<f64>() {
                        player.position = pct / 100.0;
                        player.time = (player.position * player.length as f64) as i64;
                    }
                } else if let Ok(secs) = val.parse::<i64>() {
                    player.time = secs;
                    if player.length > 0 {
                        player.position = secs as f64 / player.length as f64;
                    }
                }
            }
        }
        "volume" => {
            if let Some(v) = val.and_then(|v| v.parse::<i64>().ok()) {
                player.volume = v;
            }
        }
        "pl_delete" => {
            if let Some(id) = id {
                state.playlist.retain(|e| &e.id != id);
            }
        }
        "pl_empty" => state.playlist.clear(),
        _ => {}
    }
}

async fn handle_status(
    State(state): State<Arc<RwLock<MockVlcState>>>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.write().await;
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    state.status_requests += 1;
    if params.contains_key("command") {
        state.commands.push(LoggedRequest {
            raw_query: raw_query.unwrap_or_default(),
            params: params.clone(),
        });
    }

    if state.failing {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if !state.ignore_commands {
        apply_command(&mut state, &params);
    }

    let body = status_body(&state);
    let delay = state.status_delay;
    drop(state);

    tokio::time::sleep(delay).await;
    Json(body).into_response()
}

async fn handle_playlist(
    State(state): State<Arc<RwLock<MockVlcState>>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    state.playlist_requests += 1;
    if state.playlist_failing {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if state.playlist_malformed {
        return Json(json!({ "type": "node", "id": "1", "name": "" })).into_response();
    }

    let leaves: Vec<Value> = state
        .playlist
        .iter()
        .map(|entry| {
            let mut leaf = json!({
                "type": "leaf",
                "id": entry.id,
                "name": entry.name,
                "duration": entry.duration,
                "uri": format!("file:///music/{}", entry.name),
            });
            if state.current_id.as_deref() == Some(entry.id.as_str()) {
                leaf["current"] = json!("current");
            }
            leaf
        })
        .collect();

    let delay = state.playlist_delay;
    drop(state);

    tokio::time::sleep(delay).await;
    Json(json!({
        "type": "node",
        "id": "1",
        "name": "",
        "children": [
            { "type": "node", "id": "2", "name": "Playlist", "children": leaves },
            { "type": "node", "id": "3", "name": "Media Library", "children": [] }
        ]
    }))
    .into_response()
}
