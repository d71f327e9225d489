//! Status polling: phase-dependent cadence, connect/disconnect edge detection

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::sequence::RequestSlot;
use super::state::Phase;
use super::VlcRemote;
use crate::bus::BusEvent;

impl VlcRemote {
    /// One status fetch. Success replaces the derived state; failure resets it
    /// to disconnected defaults. Notifications fire on edges only.
    pub async fn poll_status(&self) {
        let ticket = self.sequence.begin(RequestSlot::Status);
        let result = self.client.status().await;

        if !self.sequence.is_latest(ticket) {
            debug!(seq = ticket.seq(), "Discarding stale status response");
            return;
        }

        let url = self.client.base_url().to_string();
        match result {
            Ok(status) => {
                let (was_connected, phase) = {
                    let mut state = self.state.write().await;
                    let was_connected = state.connected;
                    state.apply_status(&status);
                    state.connected = true;
                    (was_connected, state.phase)
                };

                self.signal_phase(phase);
                if !was_connected {
                    info!(%url, "Connected to VLC");
                    self.bus.publish(BusEvent::Connected { url });
                }
            }
            Err(e) => {
                let was_connected = {
                    let mut state = self.state.write().await;
                    let was_connected = state.connected;
                    state.reset_disconnected();
                    was_connected
                };

                self.signal_phase(Phase::Stopped);
                if was_connected {
                    warn!(%url, "Lost connection to VLC: {}", e);
                    self.bus.publish(BusEvent::ConnectionError {
                        url,
                        error: e.to_string(),
                    });
                } else {
                    debug!(%url, "VLC still unreachable: {}", e);
                }
            }
        }
    }

    /// Immediate poll, then poll at the phase's interval until shutdown.
    pub(super) async fn run_status_polling(self, shutdown: CancellationToken) {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = self.poll_status() => {}
        }

        let mut phase_rx = self.phase.subscribe();
        let mut current = *phase_rx.borrow_and_update();
        let mut period = self.polling.status_interval(current);
        let mut poll_timer = interval_at(Instant::now() + period, period);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("VLC status polling shutting down");
                    break;
                }
                changed = phase_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let phase = *phase_rx.borrow_and_update();
                    if phase != current {
                        let next = self.polling.status_interval(phase);
                        debug!(
                            "Re-arming status poll: {} {:?} -> {} {:?}",
                            current, period, phase, next
                        );
                        current = phase;
                        period = next;
                        poll_timer = interval_at(Instant::now() + period, period);
                        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    }
                }
                _ = poll_timer.tick() => {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = self.poll_status() => {}
                    }
                }
            }
        }

        debug!("VLC status polling stopped");
    }
}
