//! VLC HTTP interface client
//!
//! Every control action is a GET on `/requests/status.json` with a `command`
//! query parameter; VLC answers with the full status document, which callers
//! use to reconcile local state. Docs: https://wiki.videolan.org/VLC_HTTP_requests/

pub mod responses;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::VlcConfig;
pub use responses::{Meta, PlaylistNode, StatusResponse};

const STATUS_PATH: &str = "/requests/status.json";
const PLAYLIST_PATH: &str = "/requests/playlist.json";

/// Errors from talking to VLC. Surfaced unmodified; there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid VLC URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection refused, timeout, reset
    #[error("VLC request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Wrong or missing password
    #[error("VLC rejected credentials (401)")]
    Unauthorized,

    #[error("VLC returned {0}")]
    Status(StatusCode),

    #[error("Malformed VLC response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Commands understood by the VLC HTTP interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Previous,
    Next,
    ToggleRandom,
    ToggleRepeat,
    ToggleFullscreen,
    Seek,
    Volume,
    Delete,
    Empty,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "pl_play",
            Self::Pause => "pl_pause",
            Self::Stop => "pl_stop",
            Self::Previous => "pl_previous",
            Self::Next => "pl_next",
            Self::ToggleRandom => "pl_random",
            Self::ToggleRepeat => "pl_repeat",
            Self::ToggleFullscreen => "fullscreen",
            Self::Seek => "seek",
            Self::Volume => "volume",
            Self::Delete => "pl_delete",
            Self::Empty => "pl_empty",
        }
    }
}

/// Which query key carries a command's argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Val,
    Id,
}

impl ValueKind {
    fn key(self) -> &'static str {
        match self {
            Self::Val => "val",
            Self::Id => "id",
        }
    }
}

/// Query pairs for a command. Empty values are dropped.
pub fn command_query(
    command: Command,
    value: Option<&str>,
    kind: ValueKind,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("command", command.as_str().to_string())];
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        query.push((kind.key(), value.to_string()));
    }
    query
}

/// `Authorization` header value for HTTP Basic auth
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

#[derive(Clone)]
pub struct VlcClient {
    http: Client,
    base_url: Url,
    auth: String,
}

impl VlcClient {
    pub fn new(config: &VlcConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url())?;

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            auth: basic_auth_header(&config.username, &config.password),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a command and return the status VLC echoes back
    pub async fn send(
        &self,
        command: Command,
        value: Option<&str>,
        kind: ValueKind,
    ) -> Result<StatusResponse, ClientError> {
        let query = command_query(command, value, kind);
        debug!(command = command.as_str(), value = ?value, "VLC command");
        self.get_json(STATUS_PATH, &query).await
    }

    /// Plain status read, no command
    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.get_json(STATUS_PATH, &[]).await
    }

    pub async fn playlist(&self) -> Result<PlaylistNode, ClientError> {
        self.get_json(PLAYLIST_PATH, &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ClientError> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .query(query)
            .header(header::AUTHORIZATION, &self.auth)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        // Decode from bytes so malformed JSON surfaces as Decode, not Transport
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
