//! Intent handlers
//!
//! Each intent sends one command and reconciles from the status VLC echoes
//! back. On failure the local state keeps its values and the next poll
//! converges. Reconciliation per intent:
//!
//! | Intent                        | Command                       | Local update                         |
//! |-------------------------------|-------------------------------|--------------------------------------|
//! | play/pause                    | `pl_play` if paused else `pl_pause` | phase from echoed state        |
//! | stop, previous, next, fullscreen | `pl_stop` ...              | none                                 |
//! | seek to percent               | `seek val=<p>%`               | progress from echoed position        |
//! | relative seek                 | `seek val=<secs>`             | progress and times from echo         |
//! | volume                        | `volume val=<native>`         | requested percent, once accepted     |
//! | mute                          | `volume val=0` or `256`       | volume and mute from echoed volume   |
//! | shuffle / repeat              | `pl_random` / `pl_repeat`     | flag from echoed `random` / `repeat` |
//! | play item, delete, clear      | `pl_play` / `pl_delete` / `pl_empty` | playlist refetch              |

use tracing::{debug, warn};

use super::sequence::RequestSlot;
use super::state::{
    percent_to_volume, position_to_percent, relative_seek_target, volume_to_percent,
    PendingDelete, Phase, SeekDirection, UNMUTE_VOLUME,
};
use super::traits::CommandResponse;
use super::VlcRemote;
use crate::client::{ClientError, Command, StatusResponse, ValueKind};

/// Everything a presentation layer can ask the remote to do
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    PlayPause,
    Stop,
    Previous,
    Next,
    ToggleFullscreen,
    SeekToPercent { percent: f64 },
    SeekRelative { direction: SeekDirection },
    SetVolume { value: u8 },
    ToggleMute,
    ToggleShuffle,
    ToggleRepeat,
    PlayItem { id: String },
    RequestRemove { id: String },
    RequestClear,
    ConfirmDelete,
    CancelDelete,
    Refresh,
}

impl Intent {
    /// Value-less intents by action name
    pub fn from_action(action: &str) -> Option<Self> {
        Some(match action {
            "play_pause" => Self::PlayPause,
            "stop" => Self::Stop,
            "previous" | "prev" => Self::Previous,
            "next" => Self::Next,
            "fullscreen" | "toggle_fullscreen" => Self::ToggleFullscreen,
            "mute" | "toggle_mute" => Self::ToggleMute,
            "shuffle" | "toggle_shuffle" => Self::ToggleShuffle,
            "repeat" | "toggle_repeat" => Self::ToggleRepeat,
            "refresh" => Self::Refresh,
            _ => return None,
        })
    }
}

impl VlcRemote {
    /// Single entry point for transports
    pub async fn dispatch(&self, intent: Intent) -> CommandResponse {
        debug!(?intent, "Dispatching intent");
        match intent {
            Intent::PlayPause => self.play_pause().await,
            Intent::Stop => self.stop_playback().await,
            Intent::Previous => self.previous().await,
            Intent::Next => self.next().await,
            Intent::ToggleFullscreen => self.toggle_fullscreen().await,
            Intent::SeekToPercent { percent } => self.seek_to_percent(percent).await,
            Intent::SeekRelative { direction } => self.seek_relative(direction).await,
            Intent::SetVolume { value } => self.set_volume(value).await,
            Intent::ToggleMute => self.toggle_mute().await,
            Intent::ToggleShuffle => self.toggle_shuffle().await,
            Intent::ToggleRepeat => self.toggle_repeat().await,
            Intent::PlayItem { id } => self.play_item(&id).await,
            Intent::RequestRemove { id } => self.request_remove(id).await,
            Intent::RequestClear => self.request_clear().await,
            Intent::ConfirmDelete => self.confirm_delete().await,
            Intent::CancelDelete => self.cancel_delete().await,
            Intent::Refresh => self.refresh().await,
        }
    }

    /// Send within a sequencing slot. `Ok(None)` when a newer request in the
    /// same slot went out while this one was in flight.
    async fn send_in_slot(
        &self,
        slot: RequestSlot,
        command: Command,
        value: Option<&str>,
        kind: ValueKind,
    ) -> Result<Option<StatusResponse>, ClientError> {
        let ticket = self.sequence.begin(slot);
        let status = self.client.send(command, value, kind).await?;
        if self.sequence.is_latest(ticket) {
            Ok(Some(status))
        } else {
            debug!(?slot, seq = ticket.seq(), "Discarding stale command response");
            Ok(None)
        }
    }

    /// Send and ignore the echo
    async fn send_unreconciled(
        &self,
        command: Command,
        value: Option<&str>,
        kind: ValueKind,
    ) -> CommandResponse {
        match self.client.send(command, value, kind).await {
            Ok(_) => CommandResponse::ok(),
            Err(e) => command_failed(command, e),
        }
    }

    pub async fn play_pause(&self) -> CommandResponse {
        let command = if self.state.read().await.phase == Phase::Paused {
            Command::Play
        } else {
            Command::Pause
        };

        match self
            .send_in_slot(RequestSlot::PlayPause, command, None, ValueKind::Val)
            .await
        {
            Ok(Some(status)) => {
                // Empty or unknown echo keeps the previous phase
                if let Some(phase) = Phase::from_vlc(&status.state) {
                    self.state.write().await.set_phase(phase);
                    self.signal_phase(phase);
                }
                CommandResponse::ok()
            }
            Ok(None) => CommandResponse::ok(),
            Err(e) => command_failed(command, e),
        }
    }

    /// `pl_stop`. Named to stay clear of [`Startable::stop`](super::Startable::stop).
    pub async fn stop_playback(&self) -> CommandResponse {
        self.send_unreconciled(Command::Stop, None, ValueKind::Val)
            .await
    }

    pub async fn previous(&self) -> CommandResponse {
        self.send_unreconciled(Command::Previous, None, ValueKind::Val)
            .await
    }

    pub async fn next(&self) -> CommandResponse {
        self.send_unreconciled(Command::Next, None, ValueKind::Val)
            .await
    }

    pub async fn toggle_fullscreen(&self) -> CommandResponse {
        self.send_unreconciled(Command::ToggleFullscreen, None, ValueKind::Val)
            .await
    }

    pub async fn seek_to_percent(&self, percent: f64) -> CommandResponse {
        if !percent.is_finite() {
            return CommandResponse::failed(format!("invalid seek percent: {percent}"));
        }
        let value = format!("{}%", percent.clamp(0.0, 100.0));

        match self
            .send_in_slot(RequestSlot::Seek, Command::Seek, Some(&value), ValueKind::Val)
            .await
        {
            Ok(Some(status)) => {
                self.state.write().await.progress = position_to_percent(status.position);
                CommandResponse::ok()
            }
            Ok(None) => CommandResponse::ok(),
            Err(e) => command_failed(Command::Seek, e),
        }
    }

    /// ±10s, clamped to the track. No-op while the length is unknown.
    pub async fn seek_relative(&self, direction: SeekDirection) -> CommandResponse {
        let (elapsed, total) = {
            let state = self.state.read().await;
            (state.elapsed_secs, state.total_secs)
        };

        let Some(target) = relative_seek_target(elapsed, total, direction) else {
            debug!(?direction, "Relative seek ignored, track length unknown");
            return CommandResponse::ok();
        };

        let value = target.to_string();
        match self
            .send_in_slot(RequestSlot::Seek, Command::Seek, Some(&value), ValueKind::Val)
            .await
        {
            Ok(Some(status)) => {
                let mut state = self.state.write().await;
                state.progress = position_to_percent(status.position);
                state.set_times(status.time, status.length);
                CommandResponse::ok()
            }
            Ok(None) => CommandResponse::ok(),
            Err(e) => command_failed(Command::Seek, e),
        }
    }

    /// Speculative: local volume comes from the intent, not the echo, and is
    /// only applied once VLC accepts the request.
    pub async fn set_volume(&self, percent: u8) -> CommandResponse {
        let percent = percent.min(100);
        let value = percent_to_volume(percent).to_string();

        match self
            .send_in_slot(RequestSlot::Volume, Command::Volume, Some(&value), ValueKind::Val)
            .await
        {
            Ok(Some(_)) => {
                let mut state = self.state.write().await;
                state.volume = percent;
                if percent > 0 {
                    state.is_muted = false;
                }
                CommandResponse::ok()
            }
            Ok(None) => CommandResponse::ok(),
            Err(e) => command_failed(Command::Volume, e),
        }
    }

    /// Mute sends native 0, unmute restores 256. State follows the echo only.
    pub async fn toggle_mute(&self) -> CommandResponse {
        let muted = self.state.read().await.is_muted;
        let native = if muted { UNMUTE_VOLUME } else { 0 };
        let value = native.to_string();

        match self
            .send_in_slot(RequestSlot::Mute, Command::Volume, Some(&value), ValueKind::Val)
            .await
        {
            Ok(Some(status)) => {
                let mut state = self.state.write().await;
                state.volume = volume_to_percent(status.volume);
                state.is_muted = status.volume <= 0.0;
                CommandResponse::ok()
            }
            Ok(None) => CommandResponse::ok(),
            Err(e) => command_failed(Command::Volume, e),
        }
    }

    pub async fn toggle_shuffle(&self) -> CommandResponse {
        match self
            .send_in_slot(RequestSlot::Shuffle, Command::ToggleRandom, None, ValueKind::Val)
            .await
        {
            Ok(Some(status)) => {
                self.state.write().await.shuffle = status.random;
                CommandResponse::ok()
            }
            Ok(None) => CommandResponse::ok(),
            Err(e) => command_failed(Command::ToggleRandom, e),
        }
    }

    pub async fn toggle_repeat(&self) -> CommandResponse {
        match self
            .send_in_slot(RequestSlot::Repeat, Command::ToggleRepeat, None, ValueKind::Val)
            .await
        {
            Ok(Some(status)) => {
                self.state.write().await.repeat = status.repeat;
                CommandResponse::ok()
            }
            Ok(None) => CommandResponse::ok(),
            Err(e) => command_failed(Command::ToggleRepeat, e),
        }
    }

    /// Jump to a playlist entry, then refetch the playlist
    pub async fn play_item(&self, id: &str) -> CommandResponse {
        let response = self
            .send_unreconciled(Command::Play, Some(id), ValueKind::Id)
            .await;
        self.poll_playlist().await;
        response
    }

    /// Record a pending removal; nothing is sent until confirmed
    pub async fn request_remove(&self, id: String) -> CommandResponse {
        self.state.write().await.pending_delete = Some(PendingDelete::Item { id });
        CommandResponse::ok()
    }

    pub async fn request_clear(&self) -> CommandResponse {
        self.state.write().await.pending_delete = Some(PendingDelete::ClearAll);
        CommandResponse::ok()
    }

    /// Execute and clear the pending delete. The playlist is refetched
    /// whatever the outcome.
    pub async fn confirm_delete(&self) -> CommandResponse {
        let pending = self.state.write().await.pending_delete.take();

        let response = match pending {
            Some(PendingDelete::Item { id }) => {
                self.send_unreconciled(Command::Delete, Some(&id), ValueKind::Id)
                    .await
            }
            Some(PendingDelete::ClearAll) => {
                self.send_unreconciled(Command::Empty, None, ValueKind::Val)
                    .await
            }
            None => {
                debug!("Delete confirmed with nothing pending");
                return CommandResponse::ok();
            }
        };

        self.poll_playlist().await;
        response
    }

    pub async fn cancel_delete(&self) -> CommandResponse {
        if let Some(pending) = self.state.write().await.pending_delete.take() {
            debug!(?pending, "Delete cancelled");
        }
        CommandResponse::ok()
    }

    /// Pull-to-refresh: one immediate status fetch
    pub async fn refresh(&self) -> CommandResponse {
        self.poll_status().await;
        CommandResponse::ok()
    }
}

fn command_failed(command: Command, error: ClientError) -> CommandResponse {
    warn!(command = command.as_str(), "VLC command failed: {}", error);
    CommandResponse::failed(error)
}
