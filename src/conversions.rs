//! Numeric Conversions
//!
//! Coerces an arbitrary script value into the domain of each fixed storage width.
//! Integer widths go through ToInt32 and wrap; `to_uint8_clamp` goes through ToNumber
//! and saturates, rounding ties to even. Every typed-view setter runs one of these
//! before bytes are written; getters never do.

use crate::value::{number_to_int32, number_to_uint32, Value};

/// ToInt8: reduce modulo 2^8, results >= 128 wrap negative.
pub fn to_int8(value: &Value) -> i8 {
    int8_from_number(value.to_number())
}

/// ToUint8: reduce modulo 2^8.
pub fn to_uint8(value: &Value) -> u8 {
    uint8_from_number(value.to_number())
}

/// ToUint8Clamp: saturate into [0, 255], ties to even.
pub fn to_uint8_clamp(value: &Value) -> u8 {
    uint8_clamp(value.to_number())
}

/// ToInt16: reduce modulo 2^16, results >= 32768 wrap negative.
pub fn to_int16(value: &Value) -> i16 {
    int16_from_number(value.to_number())
}

/// ToUint16: reduce modulo 2^16.
pub fn to_uint16(value: &Value) -> u16 {
    uint16_from_number(value.to_number())
}

/// ToInt32.
pub fn to_int32(value: &Value) -> i32 {
    value.to_int32()
}

/// ToUint32.
pub fn to_uint32(value: &Value) -> u32 {
    value.to_uint32()
}

/// Round a number to the nearest `f32`.
pub fn to_float32(value: &Value) -> f32 {
    value.to_number() as f32
}

pub fn to_float64(value: &Value) -> f64 {
    value.to_number()
}

pub fn int8_from_number(n: f64) -> i8 {
    number_to_int32(n) as i8
}

pub fn uint8_from_number(n: f64) -> u8 {
    number_to_int32(n) as u8
}

pub fn int16_from_number(n: f64) -> i16 {
    number_to_int32(n) as i16
}

pub fn uint16_from_number(n: f64) -> u16 {
    number_to_int32(n) as u16
}

pub fn uint32_from_number(n: f64) -> u32 {
    number_to_uint32(n)
}

/// Clamp a number into [0, 255]. NaN maps to 0; exact halves round to the even neighbour.
pub fn uint8_clamp(d: f64) -> u8 {
    if !(d > 0.0) {
        return 0;
    }
    if d >= 255.0 {
        return 255;
    }
    let f = d.floor();
    if f + 0.5 < d {
        return (f + 1.0) as u8;
    }
    if d < f + 0.5 {
        return f as u8;
    }
    let i = f as u8;
    if i % 2 != 0 {
        i + 1
    } else {
        i
    }
}
