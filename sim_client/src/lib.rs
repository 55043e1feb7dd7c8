//! `sim_client`
//!
//! Client-side systems:
//! - Input sampling (held keys, mouse look)
//! - Per-tick `PlayerMoveCommand` generation
//! - Hand-off of encoded command frames to the send queue

pub mod client;
pub mod input;

pub use client::GameClient;
