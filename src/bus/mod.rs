//! Event bus for inter-component communication
//!
//! Uses tokio::sync::broadcast for pub/sub pattern.
//! The remote session publishes connection edges and state changes here;
//! presentation layers (the control API's SSE stream, the binary's log sink)
//! subscribe.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::remote::Phase;

/// Event types that can be published on the bus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum BusEvent {
    /// First successful status poll after being disconnected
    Connected { url: String },
    /// First failed status poll after being connected
    ConnectionError { url: String, error: String },
    PhaseChanged { phase: Phase },
    PlaylistUpdated { count: usize },
    /// Session stopped; pollers are gone
    Stopped,
}

impl BusEvent {
    /// User-facing one-shot notification text, for events that carry one
    pub fn notification(&self) -> Option<&'static str> {
        match self {
            Self::Connected { .. } => Some("Connected to VLC"),
            Self::ConnectionError { .. } => Some("Connection Error: Can't connect to VLC"),
            _ => None,
        }
    }
}

/// Event bus handle for publishing and subscribing
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BusEvent>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: BusEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    /// Get the number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Shared event bus wrapped in Arc for thread-safe sharing
pub type SharedBus = Arc<EventBus>;

/// Create a new shared event bus
pub fn create_bus() -> SharedBus {
    Arc::new(EventBus::default())
}
