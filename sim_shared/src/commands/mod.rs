//! Predicted simulation commands.
//!
//! A predicted command is generated on the client, applied locally right away
//! (prediction), and sent to the server to be re-applied authoritatively.
//!
//! Every command kind:
//! - carries a [`CommandHeader`] (sequence and timing), written first,
//! - writes its own fields after the header in a fixed order,
//! - is identified on the wire by a stable [`CommandTypeId`].
//!
//! Receivers look the id up in a [`CommandRegistry`] to get a fresh, empty
//! command and then [`PredictedCommand::read`] it.

mod angle;
mod player_move;
mod registry;
mod translation;

use std::{any::Any, fmt};

use serde::{Deserialize, Serialize};

use crate::wire::{WireError, WireReader, WireWriter};

pub use angle::{quantize, truncate_code, unquantize, STEP_DEGREES, UNQUANT_CONST};
pub use player_move::{PlayerMoveCommand, PLAYER_MOVE_FIELDS_LEN};
pub use registry::{
    decode_batch, encode_batch, encode_command, registry, CommandFactory, CommandRegistry,
    CommandRegistryBuilder,
};
pub use translation::TranslationMask;

/// Module identifier for the commands defined in this crate.
pub const SIM_MODULE_ID: u8 = 0x01;

/// Bits of a type id reserved for the per-module ordinal.
const ORDINAL_BITS: u32 = 24;
const ORDINAL_MASK: u32 = (1 << ORDINAL_BITS) - 1;

/// Stable numeric tag identifying a command's wire schema.
///
/// ```text
/// ┌───────────────┬────────────────────────────────┐
/// │ module (8)    │ command-kind ordinal (24)       │
/// └───────────────┴────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandTypeId(pub u32);

impl CommandTypeId {
    /// Combines a module id and an ordinal, checked at compile time when used
    /// in a `const` context.
    pub const fn new(module_id: u8, ordinal: u32) -> Self {
        assert!(ordinal <= ORDINAL_MASK, "command ordinal exceeds 24 bits");
        Self(((module_id as u32) << ORDINAL_BITS) | ordinal)
    }

    pub const fn module_id(self) -> u8 {
        (self.0 >> ORDINAL_BITS) as u8
    }

    pub const fn ordinal(self) -> u32 {
        self.0 & ORDINAL_MASK
    }
}

impl fmt::Display for CommandTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}:{}", self.module_id(), self.ordinal())
    }
}

/// Builds a type id from runtime values.
pub fn create_type_id(module_id: u8, ordinal: u32) -> Result<CommandTypeId, WireError> {
    if ordinal > ORDINAL_MASK {
        return Err(WireError::OrdinalOutOfRange(ordinal));
    }
    Ok(CommandTypeId::new(module_id, ordinal))
}

/// Command kinds defined by this module, in wire-ordinal order.
///
/// New kinds are appended; existing ordinals never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CommandType {
    PlayerMove = 0,
}

impl CommandType {
    pub const fn type_id(self) -> CommandTypeId {
        CommandTypeId::new(SIM_MODULE_ID, self as u32)
    }
}

/// Sequencing and timing fields shared by every predicted command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandHeader {
    /// Client-assigned, strictly increasing per sender.
    pub sequence: u32,
    /// Client simulation time when the command was sampled, in seconds.
    pub time: f32,
    /// Length of the tick the command covers, in seconds.
    pub time_delta: f32,
}

impl CommandHeader {
    /// Encoded size in bytes.
    pub const LEN: usize = 12;

    pub fn write(&self, w: &mut WireWriter) {
        w.write_u32(self.sequence);
        w.write_f32(self.time);
        w.write_f32(self.time_delta);
    }

    pub fn read(r: &mut WireReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            sequence: r.read_u32()?,
            time: r.read_f32()?,
            time_delta: r.read_f32()?,
        })
    }
}

/// A serializable, replayable, typed command.
///
/// `write` and `read` must agree exactly: every byte written is consumed by
/// `read`, in the same order.
pub trait PredictedCommand: Any + Send + fmt::Debug {
    fn command_type(&self) -> CommandTypeId;

    fn header(&self) -> &CommandHeader;

    fn header_mut(&mut self) -> &mut CommandHeader;

    /// Writes the command-specific fields (after the header).
    fn write_fields(&self, w: &mut WireWriter);

    /// Reads the command-specific fields (after the header).
    fn read_fields(&mut self, r: &mut WireReader<'_>) -> Result<(), WireError>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    /// Writes the header followed by the command fields.
    fn write(&self, w: &mut WireWriter) {
        self.header().write(w);
        self.write_fields(w);
    }

    /// Reads the header followed by the command fields.
    ///
    /// The header is only stored once the fields have been read.
    fn read(&mut self, r: &mut WireReader<'_>) -> Result<(), WireError> {
        let header = CommandHeader::read(r)?;
        self.read_fields(r)?;
        *self.header_mut() = header;
        Ok(())
    }
}

/// Static registration info for a command kind.
pub trait CommandKind: PredictedCommand + Sized {
    const TYPE_ID: CommandTypeId;

    /// A fresh command ready to be populated by [`PredictedCommand::read`].
    fn new_empty() -> Self;
}
