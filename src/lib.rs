//! VLC Remote - Rust Implementation
//!
//! A remote-control bridge for VLC's HTTP interface.
//!
//! This library provides:
//! - Phase-aware status polling with connect/disconnect notifications
//! - Playlist synchronisation
//! - Command dispatch with confirmed or speculative reconciliation
//! - Server-Sent Events and a small JSON control API

pub mod api;
pub mod bus;
pub mod client;
pub mod config;
pub mod remote;
