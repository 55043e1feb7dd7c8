//! Hand-off types between the client send queue and the server inbox.
//!
//! Transport itself (framing for reliability, congestion control) lives
//! outside this crate; these types only name who sent which frame.

use std::sync::atomic::{AtomicU32, Ordering};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

static NEXT_CLIENT_ID: AtomicU32 = AtomicU32::new(1);

/// Identifies a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub u32);

impl ClientId {
    pub fn new_unique() -> Self {
        ClientId(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An encoded command frame tagged with its sender. Immutable once queued.
pub type Frame = (ClientId, Bytes);
