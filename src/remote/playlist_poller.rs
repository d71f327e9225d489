//! Playlist polling on a fixed interval
//!
//! Unlike the status poller, a failed fetch keeps the previous list.

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::sequence::RequestSlot;
use super::state::PlaylistItem;
use super::VlcRemote;
use crate::bus::BusEvent;
use crate::client::PlaylistNode;

/// Entries of the first playlist group, in server order.
/// `None` when the tree has no group at all.
pub fn items_from_response(root: &PlaylistNode) -> Option<Vec<PlaylistItem>> {
    let entries = root.first_group_entries()?;
    Some(
        entries
            .iter()
            .map(|node| PlaylistItem {
                id: node.id.clone(),
                name: node.name.clone(),
                duration_secs: node.duration.max(0) as u64,
                is_current: node.current,
            })
            .collect(),
    )
}

impl VlcRemote {
    /// One playlist fetch. Replaces the local list on success.
    pub async fn poll_playlist(&self) {
        let ticket = self.sequence.begin(RequestSlot::Playlist);
        let result = self.client.playlist().await;

        if !self.sequence.is_latest(ticket) {
            debug!(seq = ticket.seq(), "Discarding stale playlist response");
            return;
        }

        let root = match result {
            Ok(root) => root,
            Err(e) => {
                debug!("Playlist fetch failed, keeping previous list: {}", e);
                return;
            }
        };

        let Some(items) = items_from_response(&root) else {
            debug!("Playlist response has no group, keeping previous list");
            return;
        };

        let count = items.len();
        let changed = {
            let mut state = self.state.write().await;
            if state.playlist == items {
                false
            } else {
                state.playlist = items;
                true
            }
        };

        if changed {
            debug!(count, "Playlist updated");
            self.bus.publish(BusEvent::PlaylistUpdated { count });
        }
    }

    /// Immediate fetch, then one every `playlist_ms` until shutdown.
    pub(super) async fn run_playlist_polling(self, shutdown: CancellationToken) {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = self.poll_playlist() => {}
        }

        let period = self.polling.playlist_interval();
        let mut poll_timer = interval_at(Instant::now() + period, period);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("VLC playlist polling shutting down");
                    break;
                }
                _ = poll_timer.tick() => {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = self.poll_playlist() => {}
                    }
                }
            }
        }

        debug!("VLC playlist polling stopped");
    }
}
