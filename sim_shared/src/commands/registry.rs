//! Command type registry.
//!
//! Maps a [`CommandTypeId`] to a factory producing an empty command of that
//! kind. The registry is assembled once through [`CommandRegistryBuilder`] and
//! is read-only afterwards; [`registry`] exposes the process-wide instance
//! holding every built-in kind.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::OnceLock,
};

use bytes::Bytes;
use tracing::{debug, trace};

use super::{CommandKind, CommandTypeId, PlayerMoveCommand, PredictedCommand};
use crate::wire::{WireError, WireReader, WireWriter};

/// Produces a fresh, empty command ready to be read into.
pub type CommandFactory = fn() -> Box<dyn PredictedCommand>;

fn factory_for<C: CommandKind>() -> Box<dyn PredictedCommand> {
    Box::new(C::new_empty())
}

/// Every command kind defined in this crate.
const BUILTIN: &[(CommandTypeId, CommandFactory)] = &[(
    PlayerMoveCommand::TYPE_ID,
    factory_for::<PlayerMoveCommand> as CommandFactory,
)];

const fn ids_are_unique(entries: &[(CommandTypeId, CommandFactory)]) -> bool {
    let mut i = 0;
    while i < entries.len() {
        let mut j = i + 1;
        while j < entries.len() {
            if entries[i].0 .0 == entries[j].0 .0 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(ids_are_unique(BUILTIN), "duplicate built-in command type id");

/// Accumulates registrations before the registry is frozen.
#[derive(Default)]
pub struct CommandRegistryBuilder {
    factories: HashMap<CommandTypeId, CommandFactory>,
}

impl CommandRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers command kind `C` under `C::TYPE_ID`.
    pub fn register<C: CommandKind>(self) -> Result<Self, WireError> {
        self.register_factory(C::TYPE_ID, factory_for::<C>)
    }

    /// Registers an explicit factory for `id`.
    pub fn register_factory(
        mut self,
        id: CommandTypeId,
        factory: CommandFactory,
    ) -> Result<Self, WireError> {
        match self.factories.entry(id) {
            Entry::Occupied(_) => Err(WireError::DuplicateCommandType(id)),
            Entry::Vacant(slot) => {
                debug!(type_id = %id, "Registered command type");
                slot.insert(factory);
                Ok(self)
            }
        }
    }

    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            factories: self.factories,
        }
    }
}

/// Read-only lookup from type id to command factory.
#[derive(Debug)]
pub struct CommandRegistry {
    factories: HashMap<CommandTypeId, CommandFactory>,
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::new()
    }

    /// Registry holding every command kind defined in this crate.
    pub fn with_builtin() -> Result<Self, WireError> {
        Self::from_factories(BUILTIN)
    }

    /// Builds a registry from `(id, factory)` pairs, rejecting repeated ids.
    pub fn from_factories(entries: &[(CommandTypeId, CommandFactory)]) -> Result<Self, WireError> {
        entries
            .iter()
            .try_fold(Self::builder(), |b, &(id, factory)| b.register_factory(id, factory))
            .map(CommandRegistryBuilder::build)
    }

    pub fn contains(&self, id: CommandTypeId) -> bool {
        self.factories.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Creates an empty command for `id`.
    pub fn create(&self, id: CommandTypeId) -> Result<Box<dyn PredictedCommand>, WireError> {
        self.factories
            .get(&id)
            .map(|factory| factory())
            .ok_or(WireError::UnknownCommandType(id))
    }

    /// Reads one `[type_id][command]` record from `r`.
    pub fn read_command(
        &self,
        r: &mut WireReader<'_>,
    ) -> Result<Box<dyn PredictedCommand>, WireError> {
        let id = CommandTypeId(r.read_u32()?);
        let mut cmd = self.create(id)?;
        cmd.read(r)?;
        trace!(type_id = %id, sequence = cmd.header().sequence, "Decoded command");
        Ok(cmd)
    }

    /// Decodes a frame holding exactly one command.
    pub fn decode(&self, frame: &[u8]) -> Result<Box<dyn PredictedCommand>, WireError> {
        let mut r = WireReader::new(frame);
        let cmd = self.read_command(&mut r)?;
        if !r.is_empty() {
            return Err(WireError::TrailingBytes(r.remaining()));
        }
        Ok(cmd)
    }

    /// Decodes consecutive commands until the frame is exhausted.
    ///
    /// Fails as a whole if any command is malformed.
    pub fn decode_batch(&self, frame: &[u8]) -> Result<Vec<Box<dyn PredictedCommand>>, WireError> {
        let mut r = WireReader::new(frame);
        let mut out = Vec::new();
        while !r.is_empty() {
            out.push(self.read_command(&mut r)?);
        }
        Ok(out)
    }
}

/// The process-wide registry of built-in command kinds.
pub fn registry() -> &'static CommandRegistry {
    static REGISTRY: OnceLock<CommandRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        CommandRegistry::with_builtin().expect("built-in command type ids are unique")
    })
}

/// Writes `[type_id][command]` into `w`.
pub fn encode_command(cmd: &dyn PredictedCommand, w: &mut WireWriter) {
    w.write_u32(cmd.command_type().0);
    cmd.write(w);
}

/// Encodes a batch of commands into a single frame.
pub fn encode_batch<'a>(cmds: impl IntoIterator<Item = &'a dyn PredictedCommand>) -> Bytes {
    let mut w = WireWriter::new();
    for cmd in cmds {
        encode_command(cmd, &mut w);
    }
    w.freeze()
}

/// Decodes a batch frame with the process-wide registry.
pub fn decode_batch(frame: &[u8]) -> Result<Vec<Box<dyn PredictedCommand>>, WireError> {
    registry().decode_batch(frame)
}
