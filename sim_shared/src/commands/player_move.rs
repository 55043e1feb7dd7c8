//! Player movement command.
//!
//! Sent from client to server every tick to carry the player's movement
//! intent. Part of the prediction system.
//!
//! Wire layout after the [`CommandHeader`]:
//!
//! ```text
//! ┌──────────┬───────────┬─────────────┬────────────┐
//! │ mask u8  │ yaw i16   │ pitch i16   │ roll i16   │
//! └──────────┴───────────┴─────────────┴────────────┘
//! ```

use std::any::Any;

use super::{
    angle::{quantize, unquantize},
    CommandHeader, CommandKind, CommandType, CommandTypeId, PredictedCommand, TranslationMask,
};
use crate::{
    math::Quat,
    wire::{WireError, WireReader, WireWriter},
};

/// Size of the command-specific fields.
pub const PLAYER_MOVE_FIELDS_LEN: usize = 7;

/// Movement intent for one tick: translation flags plus quantized view angles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerMoveCommand {
    pub header: CommandHeader,
    translation: TranslationMask,
    yaw: i16,
    pitch: i16,
    roll: i16,
}

impl PlayerMoveCommand {
    pub fn new(header: CommandHeader, translation: TranslationMask) -> Self {
        Self {
            header,
            translation,
            ..Self::default()
        }
    }

    pub fn translation(&self) -> TranslationMask {
        self.translation
    }

    pub fn set_translation(&mut self, translation: TranslationMask) {
        self.translation = translation;
    }

    /// Sets the view rotation from Euler angles in radians.
    ///
    /// Each angle is quantized independently; previous values are replaced.
    pub fn set_angles(&mut self, yaw: f64, pitch: f64, roll: f64) {
        self.yaw = quantize(yaw);
        self.pitch = quantize(pitch);
        self.roll = quantize(roll);
    }

    /// Quantized `(yaw, pitch, roll)` codes as sent on the wire.
    pub fn angle_codes(&self) -> (i16, i16, i16) {
        (self.yaw, self.pitch, self.roll)
    }

    /// Unquantized `(yaw, pitch, roll)` in radians.
    pub fn angles(&self) -> (f64, f64, f64) {
        (unquantize(self.yaw), unquantize(self.pitch), unquantize(self.roll))
    }

    /// View rotation, applying yaw, pitch and roll in Z-Y-X order.
    pub fn rotation(&self) -> Quat {
        let (yaw, pitch, roll) = self.angles();
        Quat::from_euler_zyx(yaw, pitch, roll)
    }
}

impl PredictedCommand for PlayerMoveCommand {
    fn command_type(&self) -> CommandTypeId {
        Self::TYPE_ID
    }

    fn header(&self) -> &CommandHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut CommandHeader {
        &mut self.header
    }

    fn write_fields(&self, w: &mut WireWriter) {
        w.write_u8(self.translation.bits());
        w.write_i16(self.yaw);
        w.write_i16(self.pitch);
        w.write_i16(self.roll);
    }

    fn read_fields(&mut self, r: &mut WireReader<'_>) -> Result<(), WireError> {
        let remaining = r.remaining();
        if remaining < PLAYER_MOVE_FIELDS_LEN {
            return Err(WireError::Truncated {
                needed: PLAYER_MOVE_FIELDS_LEN,
                remaining,
            });
        }

        self.translation = TranslationMask::from_bits_retain(r.read_u8()?);
        self.yaw = r.read_i16()?;
        self.pitch = r.read_i16()?;
        self.roll = r.read_i16()?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl CommandKind for PlayerMoveCommand {
    const TYPE_ID: CommandTypeId = CommandType::PlayerMove.type_id();

    fn new_empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn encode(cmd: &PlayerMoveCommand) -> Vec<u8> {
        let mut w = WireWriter::new();
        cmd.write(&mut w);
        w.freeze().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<PlayerMoveCommand, WireError> {
        let mut cmd = PlayerMoveCommand::new_empty();
        let mut r = WireReader::new(bytes);
        cmd.read(&mut r)?;
        assert!(r.is_empty(), "read left {} bytes", r.remaining());
        Ok(cmd)
    }

    #[test]
    fn yaw_pi_scenario() {
        let mut cmd = PlayerMoveCommand::new(
            CommandHeader {
                sequence: 9,
                time: 0.5,
                time_delta: 1.0 / 64.0,
            },
            TranslationMask::POS_Z,
        );
        cmd.set_angles(PI, 0.0, 0.0);
        assert_eq!(cmd.angle_codes(), (16383, 0, 0));

        let bytes = encode(&cmd);
        assert_eq!(
            &bytes[CommandHeader::LEN..],
            &[0x10, 0x3F, 0xFF, 0x00, 0x00, 0x00, 0x00]
        );

        let back = decode(&bytes).unwrap();
        assert_eq!(back, cmd);

        let q = back.rotation();
        let expected = Quat::from_euler_zyx(PI, 0.0, 0.0);
        assert!(q.angle_to(expected) <= (crate::commands::STEP_DEGREES as f32).to_radians());
        assert!(q.x.abs() < 1e-6 && q.y.abs() < 1e-6);
        assert!((q.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn every_mask_byte_roundtrips() {
        for b in 0..=u8::MAX {
            let cmd = PlayerMoveCommand::new(
                CommandHeader::default(),
                TranslationMask::from_bits_retain(b),
            );
            let back = decode(&encode(&cmd)).unwrap();
            assert_eq!(back.translation().bits(), b);
        }
    }

    #[test]
    fn jump_pos_x_roundtrips() {
        let cmd = PlayerMoveCommand::new(
            CommandHeader::default(),
            TranslationMask::JUMP | TranslationMask::POS_X,
        );
        let bytes = encode(&cmd);
        assert_eq!(bytes[CommandHeader::LEN], 129);
        assert_eq!(decode(&bytes).unwrap().translation(), cmd.translation());
    }

    #[test]
    fn fields_are_always_seven_bytes() {
        let samples = [
            (0u8, 0.0, 0.0, 0.0),
            (0xFF, PI, -PI, 3.0),
            (0x41, -0.001, 100.0, f64::NAN),
            (0x80, 1e9, -1e9, f64::INFINITY),
        ];
        for (mask, yaw, pitch, roll) in samples {
            let mut cmd =
                PlayerMoveCommand::new(CommandHeader::default(), TranslationMask::from_bits_retain(mask));
            cmd.set_angles(yaw, pitch, roll);
            let mut w = WireWriter::new();
            cmd.write_fields(&mut w);
            assert_eq!(w.len(), PLAYER_MOVE_FIELDS_LEN);
            assert_eq!(encode(&cmd).len(), CommandHeader::LEN + PLAYER_MOVE_FIELDS_LEN);
        }
    }

    #[test]
    fn every_short_prefix_fails() {
        let mut cmd = PlayerMoveCommand::new(CommandHeader::default(), TranslationMask::NEG_Y);
        cmd.set_angles(0.3, -0.2, 0.1);
        let bytes = encode(&cmd);
        for len in 0..bytes.len() {
            let err = decode(&bytes[..len]).unwrap_err();
            assert!(matches!(err, WireError::Truncated { .. }), "len {len}: {err}");
        }
    }

    #[test]
    fn short_fields_leave_command_untouched() {
        let mut cmd = PlayerMoveCommand::new_empty();
        let mut r = WireReader::new(&[0xFF, 0x01, 0x02, 0x03]);
        assert_eq!(
            cmd.read_fields(&mut r),
            Err(WireError::Truncated {
                needed: PLAYER_MOVE_FIELDS_LEN,
                remaining: 4
            })
        );
        assert_eq!(cmd, PlayerMoveCommand::new_empty());
    }

    #[test]
    fn set_angles_overwrites() {
        let mut cmd = PlayerMoveCommand::new_empty();
        cmd.set_angles(1.0, 1.0, 1.0);
        cmd.set_angles(0.0, PI / 2.0, -PI / 2.0);
        assert_eq!(cmd.angle_codes(), (0, 8191, -8191));
        let (_, pitch, roll) = cmd.angles();
        assert!((pitch - PI / 2.0).abs() < crate::commands::STEP_DEGREES.to_radians());
        assert!((roll + PI / 2.0).abs() < crate::commands::STEP_DEGREES.to_radians());
    }
}
