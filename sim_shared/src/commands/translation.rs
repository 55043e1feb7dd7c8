//! Translation intents packed into a single byte.

use crate::math::Vec3;

bitflags::bitflags! {
    /// Movement directions and stance intents held during a tick.
    ///
    /// Flags combine freely. Contradictory pairs such as `POS_X | NEG_X` are
    /// legal here and are left to the consumer to resolve.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TranslationMask: u8 {
        const POS_X = 1 << 0;
        const NEG_X = 1 << 1;
        const POS_Y = 1 << 2;
        const NEG_Y = 1 << 3;
        const POS_Z = 1 << 4;
        const NEG_Z = 1 << 5;
        const CROUCH = 1 << 6;
        const JUMP = 1 << 7;
    }
}

impl TranslationMask {
    /// Per-axis intent in `{-1, 0, 1}`; opposite flags cancel.
    pub fn axis_intent(self) -> Vec3 {
        let axis = |pos: Self, neg: Self| -> f32 {
            f32::from(u8::from(self.contains(pos))) - f32::from(u8::from(self.contains(neg)))
        };
        Vec3::new(
            axis(Self::POS_X, Self::NEG_X),
            axis(Self::POS_Y, Self::NEG_Y),
            axis(Self::POS_Z, Self::NEG_Z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_distinct_single_bits() {
        let all = [
            TranslationMask::POS_X,
            TranslationMask::NEG_X,
            TranslationMask::POS_Y,
            TranslationMask::NEG_Y,
            TranslationMask::POS_Z,
            TranslationMask::NEG_Z,
            TranslationMask::CROUCH,
            TranslationMask::JUMP,
        ];
        for (i, flag) in all.iter().enumerate() {
            assert_eq!(flag.bits(), 1 << i);
        }
        assert_eq!(TranslationMask::all().bits(), 0xFF);
    }

    #[test]
    fn jump_and_pos_x_is_129() {
        let mask = TranslationMask::JUMP | TranslationMask::POS_X;
        assert_eq!(mask.bits(), 129);
        assert!(mask.contains(TranslationMask::JUMP));
        assert!(!mask.contains(TranslationMask::CROUCH));
    }

    #[test]
    fn every_byte_is_a_valid_mask() {
        for b in 0..=u8::MAX {
            assert_eq!(TranslationMask::from_bits_retain(b).bits(), b);
            assert!(TranslationMask::from_bits(b).is_some());
        }
    }

    #[test]
    fn opposite_flags_cancel_in_axis_intent() {
        let mask = TranslationMask::POS_X | TranslationMask::NEG_X | TranslationMask::NEG_Z;
        assert_eq!(mask.axis_intent(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(
            (TranslationMask::POS_Y | TranslationMask::JUMP).axis_intent(),
            Vec3::new(0.0, 1.0, 0.0)
        );
    }
}
