//! Angle quantization.
//!
//! View angles travel as 16-bit codes in steps of `360 / 32767` degrees
//! (about 0.011°), half the size of an `f32` per angle.
//!
//! The mapping is carried out in `f64` end to end so that client and server
//! produce identical codes for the same input angle.

use std::f64::consts::PI;

use tracing::trace;

/// Codes per full turn.
const CODES_PER_TURN: f64 = 32767.0;

/// Radians per code: `(1 / 32767) * 360 * (pi / 180)`.
pub const UNQUANT_CONST: f64 = 1.0 / CODES_PER_TURN * 360.0 * PI / 180.0;

/// Size of one quantization step, in degrees.
pub const STEP_DEGREES: f64 = 360.0 / CODES_PER_TURN;

/// Scaled values this close to the next integer away from zero are taken as
/// that integer. Absorbs the round-off of the radian/degree conversions so
/// that decoded codes re-quantize to themselves.
const SNAP_EPSILON: f64 = 1e-6;

/// Quantizes an angle in radians to a 16-bit code.
///
/// Degrees are reduced with the floating-point remainder, so the sign of the
/// result follows the sign of the input: `-90°` and `270°` produce different
/// codes. Multi-turn inputs of the same sign alias to the same code.
///
/// Non-finite input quantizes to `0`.
pub fn quantize(radians: f64) -> i16 {
    let degrees = radians.to_degrees() % 360.0;
    truncate_code(degrees / 360.0 * CODES_PER_TURN)
}

/// Recovers the angle in radians encoded by `code`.
pub fn unquantize(code: i16) -> f64 {
    f64::from(code) * UNQUANT_CONST
}

/// Truncates a scaled angle toward zero into a code.
///
/// A value that reaches a full turn (`|code| >= 32767`) folds back to `0`, so
/// the result always lies in `[-32766, 32766]`.
pub fn truncate_code(scaled: f64) -> i16 {
    if !scaled.is_finite() {
        trace!(scaled, "non-finite angle quantized to 0");
        return 0;
    }

    let toward_zero = scaled.trunc();
    let away = toward_zero + scaled.signum();
    let code = if (away - scaled).abs() <= SNAP_EPSILON {
        away
    } else {
        toward_zero
    };

    if code.abs() >= CODES_PER_TURN {
        0
    } else {
        code as i16
    }
}
