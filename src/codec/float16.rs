//! IEEE-754 binary16 conversion.
//!
//! Encoding rounds to nearest, ties to even, working from the original double for
//! values near the overflow threshold and in the subnormal range.

/// Smallest positive normal half: 2^-14
const MIN_NORMAL: f64 = 6.103515625e-5;
/// Smallest positive subnormal half: 2^-24
const MIN_SUBNORMAL: f64 = 5.9604644775390625e-8;

const EXP_MASK: u16 = 0x7c00;
/// The NaN pattern every NaN narrows to
pub const QUIET_NAN: u16 = 0x7e00;
const MAX_FINITE: u16 = 0x7bff;

/// Widen half-precision bits to an `f32`.
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    let negative = bits & 0x8000 != 0;
    let exponent = (bits >> 10) & 0x1f;
    let mantissa = bits & 0x3ff;

    let magnitude = match (exponent, mantissa) {
        (0, 0) => 0.0f32,
        (0, m) => (f64::from(m) / 1024.0 * MIN_NORMAL) as f32,
        (31, 0) => f32::INFINITY,
        (31, _) => return f32::NAN,
        (e, m) => ((1.0 + f64::from(m) / 1024.0) * 2f64.powi(i32::from(e) - 15)) as f32,
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Narrow a double to half-precision bits.
pub fn f64_to_f16_bits(value: f64) -> u16 {
    let single = value as f32;
    if single.is_nan() {
        return QUIET_NAN;
    }

    let sign = ((single.to_bits() >> 31) as u16) << 15;
    if single.is_infinite() {
        return sign | EXP_MASK;
    }
    let abs_single = single.abs();
    if abs_single == 0.0 {
        return sign;
    }

    // 65504 is the largest finite half; [65504, 65520) rounds down to it
    let abs_double = value.abs();
    if abs_double >= 65520.0 {
        return sign | EXP_MASK;
    }
    if abs_double > 65504.0 {
        return sign | MAX_FINITE;
    }

    if abs_single < MIN_NORMAL as f32 {
        let mantissa = round_half_even(abs_double / MIN_SUBNORMAL);
        // A carry into bit 10 lands exactly on the smallest normal
        return sign | mantissa as u16;
    }

    let bits = single.to_bits();
    let mut exponent = ((bits >> 23) & 0xff) as i32 - 127 + 15;
    if exponent >= 31 {
        return sign | EXP_MASK;
    }

    let mant32 = bits & 0x7f_ffff;
    let dropped = mant32 & 0x1fff;
    let mut mantissa = mant32 >> 13;
    if dropped > 0x1000 || (dropped == 0x1000 && mantissa & 1 != 0) {
        mantissa += 1;
    }
    if mantissa >= 0x400 {
        exponent += 1;
        mantissa = 0;
        if exponent >= 31 {
            return sign | EXP_MASK;
        }
    }

    sign | ((exponent as u16) << 10) | mantissa as u16
}

fn round_half_even(ratio: f64) -> u32 {
    let base = ratio.trunc();
    let fraction = ratio - base;
    let base = base as u32;
    if fraction > 0.5 || (fraction == 0.5 && base & 1 != 0) {
        base + 1
    } else {
        base
    }
}
