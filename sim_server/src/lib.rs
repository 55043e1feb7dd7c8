//! `sim_server`
//!
//! Server-side systems:
//! - Drains encoded command frames from connected clients
//! - Dispatches each frame through the command registry
//! - Drops clients that send malformed frames
//! - Hands every accepted command to the simulation exactly once

pub mod server;

pub use server::{CommandInbox, MoveIntent};
