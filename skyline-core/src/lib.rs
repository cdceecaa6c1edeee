//! Board-agnostic logic for Skyline display nodes
//!
//! This crate contains everything a node does that does not depend on a
//! specific chip:
//!
//! - Node configuration
//! - Peer discovery and pairing bookkeeping
//! - Master-side scheduler: render, encode, broadcast, pace
//! - Receiver-side frame dispatch
//! - Operator input collaborator interface

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod input;
pub mod peers;
pub mod sync;

pub use config::{NodeConfig, NodeRole};
pub use input::{ClickGesture, ControlInput, ControlSample};
pub use peers::{advertised_name, PairStatus, PeerRegistry, ESP_NOW_PEER_MAX, LEGACY_PEER_MAX};
pub use sync::{FrameReceiver, MasterState, SyncError, SyncScheduler};
