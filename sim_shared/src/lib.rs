//! `sim_shared`
//!
//! Shared libraries used by both client and server.
//!
//! Design goals:
//! - Deterministic encode/decode: the same input produces the same bytes on
//!   every machine, so prediction replay matches the server.
//! - Compact per-tick commands (quantized angles, bit-packed intents).
//! - Traits at the command seam so new command kinds plug into the registry.
//! - No `unsafe`.

pub mod commands;
pub mod config;
pub mod math;
pub mod net;
pub mod wire;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::commands::*;
    pub use crate::config::*;
    pub use crate::math::*;
    pub use crate::net::*;
    pub use crate::wire::*;
}
