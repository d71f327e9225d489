//! VLC remote session
//!
//! Owns the derived playback state and the two polling loops that keep it
//! current. Intents (see [`dispatcher`]) go out through the same client and
//! reconcile into the same state.
//!
//! ## Polling
//!
//! ```text
//! status:   playing 200ms | paused 500ms | stopped 2000ms   (re-armed on phase change)
//! playlist: every 3000ms, independent of phase
//! ```
//!
//! The status loop watches the phase channel; when a poll or a command moves
//! the phase, the timer is dropped and recreated with the new period.

pub mod dispatcher;
mod playlist_poller;
pub mod sequence;
pub mod state;
mod status_poller;
pub mod traits;

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::bus::{BusEvent, SharedBus};
use crate::client::{ClientError, VlcClient};
use crate::config::{PollingConfig, VlcConfig};
use crate::impl_startable;

pub use dispatcher::Intent;
pub use playlist_poller::items_from_response;
pub use sequence::{RequestSlot, SequenceTracker};
pub use state::{PendingDelete, Phase, PlaylistItem, RemoteState, SeekDirection};
pub use traits::{CommandResponse, Startable};

/// One remote-control session against a single VLC instance
#[derive(Clone)]
pub struct VlcRemote {
    state: Arc<RwLock<RemoteState>>,
    client: VlcClient,
    bus: SharedBus,
    polling: PollingConfig,
    /// Current phase, watched by the status loop to re-arm its timer
    phase: Arc<watch::Sender<Phase>>,
    sequence: Arc<SequenceTracker>,
    /// Wrapped in RwLock to allow creating fresh token on restart
    shutdown: Arc<RwLock<CancellationToken>>,
    running: Arc<AtomicBool>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    /// Held for the whole of start and stop so the two never interleave
    lifecycle: Arc<Mutex<()>>,
}

impl VlcRemote {
    pub fn new(
        vlc: &VlcConfig,
        polling: &PollingConfig,
        bus: SharedBus,
    ) -> Result<Self, ClientError> {
        let (phase, _) = watch::channel(Phase::Stopped);
        Ok(Self {
            state: Arc::new(RwLock::new(RemoteState::default())),
            client: VlcClient::new(vlc)?,
            bus,
            polling: polling.clone(),
            phase: Arc::new(phase),
            sequence: Arc::new(SequenceTracker::new()),
            shutdown: Arc::new(RwLock::new(CancellationToken::new())),
            running: Arc::new(AtomicBool::new(false)),
            tasks: Arc::new(Mutex::new(Vec::new())),
            lifecycle: Arc::new(Mutex::new(())),
        })
    }

    /// Read-only copy of the current state
    pub async fn snapshot(&self) -> RemoteState {
        self.state.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.connected
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn base_url(&self) -> &Url {
        self.client.base_url()
    }

    /// Subscribe to phase changes (the value the status loop re-arms on)
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Move the phase channel; publishes `PhaseChanged` only on an actual change
    fn signal_phase(&self, phase: Phase) {
        let changed = self.phase.send_if_modified(|current| {
            if *current == phase {
                return false;
            }
            *current = phase;
            true
        });
        if changed {
            debug!(%phase, "VLC phase changed");
            self.bus.publish(BusEvent::PhaseChanged { phase });
        }
    }

    async fn start_internal(&self) -> Result<()> {
        let _lifecycle = self.lifecycle.lock().await;
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        // Create fresh cancellation token for this run (previous token may be cancelled)
        let shutdown = {
            let mut token = self.shutdown.write().await;
            *token = CancellationToken::new();
            token.clone()
        };

        info!(url = %self.client.base_url(), "Starting VLC remote session");

        let status = tokio::spawn(self.clone().run_status_polling(shutdown.clone()));
        let playlist = tokio::spawn(self.clone().run_playlist_polling(shutdown));

        self.tasks.lock().await.extend([status, playlist]);
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stop polling (internal - use Startable trait)
    async fn stop_internal(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        if !self.running.load(Ordering::SeqCst) {
            return;
        }

        // Cancel timers and in-flight polls first
        self.shutdown.read().await.cancel();

        let handles = std::mem::take(&mut *self.tasks.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                debug!("VLC poller task ended abnormally: {}", e);
            }
        }

        {
            let mut state = self.state.write().await;
            *state = RemoteState::default();
        }
        self.phase.send_replace(Phase::Stopped);
        self.running.store(false, Ordering::SeqCst);

        info!("VLC remote session stopped");
        self.bus.publish(BusEvent::Stopped);
    }
}

impl_startable!(VlcRemote, "vlc");
