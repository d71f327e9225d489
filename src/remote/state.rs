//! Derived, presentation-ready playback state and the pure mappings that feed it

use serde::{Deserialize, Serialize};

use crate::client::StatusResponse;

/// VLC native volume that corresponds to 100%
pub const NATIVE_VOLUME_MAX: f64 = 512.0;
/// Native volume sent when un-muting (50%)
pub const UNMUTE_VOLUME: u32 = 256;
/// Step for relative seeks, in seconds
pub const SEEK_STEP_SECS: u64 = 10;
/// Volume percent shown while disconnected
pub const DEFAULT_VOLUME_PERCENT: u8 = 50;

/// Player phase. Drives both the derived state and the status poll cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl Phase {
    /// Parse VLC's `state` string. `None` for anything unrecognised.
    pub fn from_vlc(state: &str) -> Option<Self> {
        match state {
            "playing" => Some(Self::Playing),
            "paused" => Some(Self::Paused),
            "stopped" => Some(Self::Stopped),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: String,
    pub name: String,
    pub duration_secs: u64,
    pub is_current: bool,
}

/// A delete awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingDelete {
    Item { id: String },
    ClearAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekDirection {
    Previous,
    Next,
}

/// Snapshot handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteState {
    pub connected: bool,
    pub phase: Phase,
    pub is_playing: bool,
    /// Percent, 0..100
    pub progress: f64,
    pub elapsed_secs: u64,
    pub total_secs: u64,
    /// `mm:ss`
    pub current_time: String,
    /// `mm:ss`
    pub total_time: String,
    /// Percent, 0..100
    pub volume: u8,
    pub is_muted: bool,
    pub shuffle: bool,
    pub repeat: bool,
    pub media_title: Option<String>,
    pub media_artist: Option<String>,
    pub playlist: Vec<PlaylistItem>,
    pub pending_delete: Option<PendingDelete>,
}

impl Default for RemoteState {
    fn default() -> Self {
        Self {
            connected: false,
            phase: Phase::Stopped,
            is_playing: false,
            progress: 0.0,
            elapsed_secs: 0,
            total_secs: 0,
            current_time: format_clock(0),
            total_time: format_clock(0),
            volume: DEFAULT_VOLUME_PERCENT,
            is_muted: false,
            shuffle: false,
            repeat: false,
            media_title: None,
            media_artist: None,
            playlist: Vec::new(),
            pending_delete: None,
        }
    }
}

impl RemoteState {
    /// Replace every poll-derived field from a status document.
    ///
    /// Toggle flags (shuffle, repeat, mute) are left alone; they only move on
    /// confirmed command responses.
    pub fn apply_status(&mut self, status: &StatusResponse) {
        let phase = Phase::from_vlc(&status.state).unwrap_or(Phase::Stopped);
        self.set_phase(phase);
        self.progress = position_to_percent(status.position);
        self.set_times(status.time, status.length);
        self.volume = volume_to_percent(status.volume);

        let meta = status.meta();
        self.media_title = meta.and_then(|m| m.filename.clone());
        self.media_artist = meta.and_then(|m| m.artist.clone());
    }

    /// Disconnected defaults. Toggle flags and any pending delete survive.
    pub fn reset_disconnected(&mut self) {
        *self = Self {
            shuffle: self.shuffle,
            repeat: self.repeat,
            is_muted: self.is_muted,
            pending_delete: self.pending_delete.take(),
            ..Self::default()
        };
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.is_playing = phase == Phase::Playing;
    }

    /// Elapsed/total from raw VLC seconds; negatives mean unknown
    pub fn set_times(&mut self, time: i64, length: i64) {
        let total = length.max(0) as u64;
        let mut elapsed = time.max(0) as u64;
        if total > 0 {
            elapsed = elapsed.min(total);
        }
        self.elapsed_secs = elapsed;
        self.total_secs = total;
        self.current_time = format_clock(elapsed);
        self.total_time = format_clock(total);
    }
}

/// Zero-padded `mm:ss`. Hours are folded into the minutes, so 3725s is
/// `62:05`, not the `02:05` a clock that discards the hour would show.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// 0..1 fraction to 0..100 percent
pub fn position_to_percent(position: f64) -> f64 {
    if position.is_finite() {
        (position * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// VLC native volume (0..512) to a 0..100 percent
pub fn volume_to_percent(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    (raw / NATIVE_VOLUME_MAX * 100.0).round().clamp(0.0, 100.0) as u8
}

/// 0..100 percent to VLC native volume
pub fn percent_to_volume(percent: u8) -> u32 {
    (f64::from(percent.min(100)) / 100.0 * NATIVE_VOLUME_MAX).round() as u32
}

/// Absolute seek target for a ±10s step, or `None` when the length is unknown
pub fn relative_seek_target(elapsed: u64, total: u64, direction: SeekDirection) -> Option<u64> {
    if total == 0 {
        return None;
    }
    let target = match direction {
        SeekDirection::Previous => elapsed.saturating_sub(SEEK_STEP_SECS),
        SeekDirection::Next => {
            if elapsed >= total || total - elapsed < SEEK_STEP_SECS {
                total
            } else {
                elapsed + SEEK_STEP_SECS
            }
        }
    };
    Some(target)
}
