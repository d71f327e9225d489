//! Per-slot request sequencing
//!
//! Overlapping requests can complete out of order. Each request takes a ticket
//! for its slot before it goes out; when the response lands, it is applied only
//! if no newer ticket has been issued for that slot since.

use std::sync::atomic::{AtomicU64, Ordering};

/// Independent sequencing lanes. Requests in different slots never invalidate each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestSlot {
    Status,
    Playlist,
    PlayPause,
    Seek,
    Volume,
    Mute,
    Shuffle,
    Repeat,
}

impl RequestSlot {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        match self {
            Self::Status => 0,
            Self::Playlist => 1,
            Self::PlayPause => 2,
            Self::Seek => 3,
            Self::Volume => 4,
            Self::Mute => 5,
            Self::Shuffle => 6,
            Self::Repeat => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    slot: RequestSlot,
    seq: u64,
}

impl Ticket {
    pub fn slot(&self) -> RequestSlot {
        self.slot
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
pub struct SequenceTracker {
    latest: [AtomicU64; RequestSlot::COUNT],
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket for a slot
    pub fn begin(&self, slot: RequestSlot) -> Ticket {
        let seq = self.latest[slot.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { slot, seq }
    }

    /// True while no newer ticket exists for the ticket's slot
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest[ticket.slot.index()].load(Ordering::SeqCst) == ticket.seq
    }
}
