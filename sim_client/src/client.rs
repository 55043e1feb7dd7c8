//! Client implementation.
//!
//! The client samples input once per fixed tick, builds a `PlayerMoveCommand`,
//! encodes it with its type id and hands the frame to the send queue. Once a
//! frame is queued it is never touched again.

use anyhow::Context;
use bytes::Bytes;
use sim_shared::{
    commands::{encode_command, CommandHeader, PlayerMoveCommand},
    config::SimConfig,
    net::{ClientId, Frame},
    wire::WireWriter,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::input::{build_command, InputState};

/// High-level game client.
pub struct GameClient {
    pub client_id: ClientId,
    tx: mpsc::Sender<Frame>,
    sequence: u32,
    time: f32,
    tick_dt: f32,
}

impl GameClient {
    /// Creates a client feeding `tx` at the configured tick rate.
    pub fn new(client_id: ClientId, cfg: &SimConfig, tx: mpsc::Sender<Frame>) -> Self {
        info!(client_id = client_id.0, tick_hz = cfg.tick_hz, "Client created");
        Self {
            client_id,
            tx,
            sequence: 0,
            time: 0.0,
            tick_dt: cfg.tick_seconds(),
        }
    }

    /// Builds a send queue sized from config and a client attached to it.
    pub fn with_queue(
        client_id: ClientId,
        cfg: &SimConfig,
    ) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(cfg.inbox_capacity.max(1));
        (Self::new(client_id, cfg, tx), rx)
    }

    /// Sequence number the next command will carry.
    pub fn next_sequence(&self) -> u32 {
        self.sequence + 1
    }

    fn next_header(&mut self) -> CommandHeader {
        self.sequence += 1;
        let header = CommandHeader {
            sequence: self.sequence,
            time: self.time,
            time_delta: self.tick_dt,
        };
        self.time += self.tick_dt;
        header
    }

    /// Advances one client tick: build the input command, encode and queue it.
    pub async fn tick(&mut self, input: &InputState) -> anyhow::Result<PlayerMoveCommand> {
        let cmd = build_command(self.next_header(), input);
        let frame = encode_frame(&cmd);
        debug!(
            sequence = cmd.header.sequence,
            mask = cmd.translation().bits(),
            bytes = frame.len(),
            "Queued move command"
        );
        self.tx
            .send((self.client_id, frame))
            .await
            .context("send queue closed")?;
        Ok(cmd)
    }
}

/// Encodes a single command as `[type_id][header][fields]`.
pub fn encode_frame(cmd: &PlayerMoveCommand) -> Bytes {
    let mut w = WireWriter::with_capacity(32);
    encode_command(cmd, &mut w);
    w.freeze()
}
