//! Server command inbox.
//!
//! Decoding rules:
//! - A frame that fails to decode is a protocol violation. The sender is
//!   dropped and every later frame from it is refused.
//! - Commands whose sequence is not newer than the last accepted one for that
//!   client are duplicates and are discarded.
//! - Accepted commands are queued in arrival order and drained once.
//!
//! Determinism notes:
//! - Clients are tracked in a `BTreeMap` so iteration order is stable.
//! - No wall-clock reads; timing comes from the command headers.

use std::collections::{BTreeMap, VecDeque};

use anyhow::Context;
use sim_shared::{
    commands::{registry, CommandRegistry, PlayerMoveCommand, PredictedCommand, TranslationMask},
    math::{Quat, Vec3},
    net::{ClientId, Frame},
    wire::WireError,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A decoded movement command ready for the simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveIntent {
    pub client: ClientId,
    pub sequence: u32,
    pub time_delta: f32,
    pub translation: TranslationMask,
    /// Resolved per-axis intent in view space; opposing flags cancel.
    pub wish: Vec3,
    pub view: Quat,
}

impl MoveIntent {
    fn from_command(client: ClientId, cmd: &PlayerMoveCommand) -> Self {
        let translation = cmd.translation();
        Self {
            client,
            sequence: cmd.header.sequence,
            time_delta: cmd.header.time_delta,
            translation,
            wish: translation.axis_intent(),
            view: cmd.rotation(),
        }
    }

    /// Wish direction rotated into world space by the view orientation.
    pub fn world_wish(&self) -> Vec3 {
        self.view.rotate(self.wish)
    }

    pub fn crouching(&self) -> bool {
        self.translation.contains(TranslationMask::CROUCH)
    }

    pub fn jumping(&self) -> bool {
        self.translation.contains(TranslationMask::JUMP)
    }
}

/// Per-client receive state.
#[derive(Debug, Default, Clone, Copy)]
struct ClientState {
    last_sequence: Option<u32>,
    dropped: bool,
}

/// Outcome of receiving one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReceiveStats {
    pub accepted: usize,
    pub duplicates: usize,
    pub ignored: usize,
}

/// Receives command frames and queues decoded movement intents.
pub struct CommandInbox {
    registry: &'static CommandRegistry,
    clients: BTreeMap<ClientId, ClientState>,
    pending: VecDeque<MoveIntent>,
}

impl Default for CommandInbox {
    fn default() -> Self {
        Self::new(registry())
    }
}

impl CommandInbox {
    pub fn new(registry: &'static CommandRegistry) -> Self {
        Self {
            registry,
            clients: BTreeMap::new(),
            pending: VecDeque::new(),
        }
    }

    /// Whether `client` has been dropped for a protocol violation.
    pub fn is_dropped(&self, client: ClientId) -> bool {
        self.clients.get(&client).is_some_and(|c| c.dropped)
    }

    /// Last accepted sequence for `client`.
    pub fn last_sequence(&self, client: ClientId) -> Option<u32> {
        self.clients.get(&client).and_then(|c| c.last_sequence)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Decodes one frame (one or more commands) from `client`.
    ///
    /// Nothing from a malformed frame is queued.
    pub fn receive(&mut self, client: ClientId, frame: &[u8]) -> anyhow::Result<ReceiveStats> {
        let state = self.clients.entry(client).or_default();
        if state.dropped {
            anyhow::bail!("client {} was dropped; frame refused", client.0);
        }

        let cmds = match self.registry.decode_batch(frame) {
            Ok(cmds) => cmds,
            Err(e) => {
                state.dropped = true;
                warn!(
                    client = client.0,
                    error = %e,
                    bytes = frame.len(),
                    "Malformed command frame; dropping client"
                );
                return Err(e).context("decode command frame");
            }
        };

        let mut stats = ReceiveStats::default();
        for cmd in cmds {
            let sequence = cmd.header().sequence;
            if state.last_sequence.is_some_and(|last| sequence <= last) {
                debug!(client = client.0, sequence, "Duplicate command discarded");
                stats.duplicates += 1;
                continue;
            }

            match cmd.as_any().downcast_ref::<PlayerMoveCommand>() {
                Some(mv) => {
                    state.last_sequence = Some(sequence);
                    self.pending.push_back(MoveIntent::from_command(client, mv));
                    stats.accepted += 1;
                }
                None => {
                    debug!(
                        client = client.0,
                        type_id = %cmd.command_type(),
                        "No handler for command"
                    );
                    stats.ignored += 1;
                }
            }
        }
        Ok(stats)
    }

    /// Hands out every queued intent, oldest first. Each intent is returned once.
    pub fn drain(&mut self) -> Vec<MoveIntent> {
        self.pending.drain(..).collect()
    }

    /// Drains `rx` until every sender is gone.
    ///
    /// Malformed frames drop their sender but do not stop the loop.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<Frame>) -> ReceiveStats {
        let mut total = ReceiveStats::default();
        while let Some((client, frame)) = rx.recv().await {
            match self.receive(client, &frame) {
                Ok(stats) => {
                    total.accepted += stats.accepted;
                    total.duplicates += stats.duplicates;
                    total.ignored += stats.ignored;
                }
                Err(e) => debug!(client = client.0, error = %e, "Frame rejected"),
            }
        }
        info!(
            accepted = total.accepted,
            duplicates = total.duplicates,
            pending = self.pending.len(),
            "Inbox closed"
        );
        total
    }
}

/// Returns true if `err` came from a truncated frame.
pub fn is_truncation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<WireError>(),
        Some(WireError::Truncated { .. })
    )
}
