//! Input handling.
//!
//! In a real client this would integrate with windowing, raw mouse/keyboard
//! and action bindings. Here it focuses on turning the sampled state into a
//! deterministic per-tick `PlayerMoveCommand`.
//!
//! Axis convention (right-handed, Z up, looking down +X), matching the
//! yaw-about-Z view rotation: forward `POS_X`, back `NEG_X`, left `POS_Y`,
//! right `NEG_Y`, up `POS_Z`, down `NEG_Z`. Positive yaw turns left and
//! positive pitch looks down.

use std::f64::consts::FRAC_PI_2;

use sim_shared::{
    commands::{CommandHeader, PlayerMoveCommand, TranslationMask},
    config::InputSettings,
};

/// Radians of view rotation per unit of raw mouse delta at sensitivity 1.0.
pub const MOUSE_RADIANS_PER_COUNT: f64 = 0.0025;

/// Keys held during the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub crouch: bool,
    pub jump: bool,
}

impl HeldKeys {
    /// Packs the held keys into a translation mask.
    ///
    /// Opposing keys are both reported; the receiver resolves them.
    pub fn translation(self) -> TranslationMask {
        let mut mask = TranslationMask::empty();
        mask.set(TranslationMask::POS_X, self.forward);
        mask.set(TranslationMask::NEG_X, self.back);
        mask.set(TranslationMask::POS_Y, self.left);
        mask.set(TranslationMask::NEG_Y, self.right);
        mask.set(TranslationMask::POS_Z, self.up);
        mask.set(TranslationMask::NEG_Z, self.down);
        mask.set(TranslationMask::CROUCH, self.crouch);
        mask.set(TranslationMask::JUMP, self.jump);
        mask
    }
}

/// View orientation in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewAngles {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl ViewAngles {
    /// Applies a raw mouse delta.
    ///
    /// Positive `dx` turns right and positive `dy` (mouse moved toward the
    /// user) looks down. Yaw is left unbounded (the quantizer wraps it);
    /// pitch is clamped to straight up/down.
    pub fn apply_mouse(&mut self, dx: f64, dy: f64, settings: &InputSettings) {
        let scale = MOUSE_RADIANS_PER_COUNT * settings.mouse_sensitivity;
        let dy = if settings.invert_mouse_y { -dy } else { dy };
        self.yaw -= dx * scale;
        self.pitch = (self.pitch + dy * scale).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

/// User input state at a moment in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub keys: HeldKeys,
    pub view: ViewAngles,
}

/// Turns sampled input into a `PlayerMoveCommand` for a tick.
pub fn build_command(header: CommandHeader, input: &InputState) -> PlayerMoveCommand {
    let mut cmd = PlayerMoveCommand::new(header, input.keys.translation());
    cmd.set_angles(input.view.yaw, input.view.pitch, input.view.roll);
    cmd
}

#[cfg(test)]
mod tests {
    use sim_shared::commands::quantize;

    use super::*;

    #[test]
    fn keys_map_to_mask() {
        let keys = HeldKeys {
            forward: true,
            right: true,
            jump: true,
            ..HeldKeys::default()
        };
        assert_eq!(
            keys.translation(),
            TranslationMask::POS_X | TranslationMask::NEG_Y | TranslationMask::JUMP
        );
        assert_eq!(HeldKeys::default().translation(), TranslationMask::empty());
    }

    #[test]
    fn opposing_keys_are_kept() {
        let keys = HeldKeys {
            left: true,
            right: true,
            ..HeldKeys::default()
        };
        let mask = keys.translation();
        assert!(mask.contains(TranslationMask::POS_Y | TranslationMask::NEG_Y));
    }

    #[test]
    fn mouse_turn_steers_forward_key() {
        let input = InputState {
            keys: HeldKeys {
                forward: true,
                ..HeldKeys::default()
            },
            view: ViewAngles::default(),
        };
        let wish = input.keys.translation().axis_intent();
        let straight = build_command(CommandHeader::default(), &input)
            .rotation()
            .rotate(wish);
        assert!((straight.x - 1.0).abs() < 1e-6);

        // Mouse right turns right: forward swings toward -Y.
        let mut view = ViewAngles::default();
        view.apply_mouse(FRAC_PI_2 / MOUSE_RADIANS_PER_COUNT, 0.0, &InputSettings::default());
        let turned = build_command(CommandHeader::default(), &InputState { view, ..input })
            .rotation()
            .rotate(wish);
        assert!(turned.x.abs() < 1e-3);
        assert!((turned.y + 1.0).abs() < 1e-3);
        assert!(turned.z.abs() < 1e-3);
    }

    #[test]
    fn mouse_down_pitches_forward_toward_floor() {
        let mut view = ViewAngles::default();
        view.apply_mouse(0.0, 0.5 / MOUSE_RADIANS_PER_COUNT, &InputSettings::default());
        let input = InputState {
            keys: HeldKeys {
                forward: true,
                ..HeldKeys::default()
            },
            view,
        };
        let dir = build_command(CommandHeader::default(), &input)
            .rotation()
            .rotate(input.keys.translation().axis_intent());
        assert!(dir.x > 0.0);
        assert!(dir.z < 0.0);
        assert!(dir.y.abs() < 1e-6);
    }

    #[test]
    fn mouse_scales_with_sensitivity() {
        let mut slow = ViewAngles::default();
        let mut fast = ViewAngles::default();
        slow.apply_mouse(100.0, 0.0, &InputSettings::from_slider(25));
        fast.apply_mouse(100.0, 0.0, &InputSettings::from_slider(100));
        assert!((fast.yaw / slow.yaw - 4.0).abs() < 1e-9);
        assert!(fast.yaw < 0.0);
    }

    #[test]
    fn pitch_clamps_and_inverts() {
        let mut view = ViewAngles::default();
        view.apply_mouse(0.0, 1e6, &InputSettings::default());
        assert_eq!(view.pitch, FRAC_PI_2);

        let inverted = InputSettings {
            invert_mouse_y: true,
            ..InputSettings::default()
        };
        let mut view = ViewAngles::default();
        view.apply_mouse(0.0, 10.0, &inverted);
        assert!(view.pitch < 0.0);
    }

    #[test]
    fn build_command_quantizes_view() {
        let input = InputState {
            keys: HeldKeys {
                crouch: true,
                ..HeldKeys::default()
            },
            view: ViewAngles {
                yaw: 7.0,
                pitch: -0.4,
                roll: 0.0,
            },
        };
        let cmd = build_command(CommandHeader::default(), &input);
        assert_eq!(cmd.translation(), TranslationMask::CROUCH);
        assert_eq!(cmd.angle_codes(), (quantize(7.0), quantize(-0.4), 0));
    }
}
