//! Mock servers for integration testing
//!
//! Simulates the VLC HTTP interface so the remote session can be exercised
//! end to end without a running player.

pub mod vlc;

#[allow(unused_imports)]
pub use vlc::{LoggedRequest, MockEntry, MockPlayer, MockVlcServer};
