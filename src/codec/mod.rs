//! Byte Codec
//!
//! Marshals fixed-width integers and IEEE-754 floats to and from a byte slice at an
//! arbitrary offset with an explicit byte order. Floats travel as the bit pattern of
//! the same-width unsigned integer.
//!
//! All functions index the slice directly: callers validate `offset + width <= len`
//! before calling, and an unchecked out-of-range offset panics.
//!
//! ```text
//! value 0x0102 as 16 bits   big-endian:    [01 02]
//!                           little-endian: [02 01]
//! ```

mod float16;

pub use float16::{f16_bits_to_f32, f64_to_f16_bits, QUIET_NAN as F16_QUIET_NAN};

#[inline]
fn take<const N: usize>(buf: &[u8], offset: usize) -> [u8; N] {
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&buf[offset..offset + N]);
    bytes
}

#[inline]
fn put<const N: usize>(buf: &mut [u8], offset: usize, bytes: [u8; N]) {
    buf[offset..offset + N].copy_from_slice(&bytes);
}

// ============================================================================
// 8-bit (byte order does not apply)
// ============================================================================

pub fn read_int8(buf: &[u8], offset: usize) -> i8 {
    buf[offset] as i8
}

pub fn write_int8(buf: &mut [u8], offset: usize, value: i8) {
    buf[offset] = value as u8;
}

pub fn read_uint8(buf: &[u8], offset: usize) -> u8 {
    buf[offset]
}

pub fn write_uint8(buf: &mut [u8], offset: usize, value: u8) {
    buf[offset] = value;
}

// ============================================================================
// 16-bit
// ============================================================================

pub fn read_uint16(buf: &[u8], offset: usize, little_endian: bool) -> u16 {
    let bytes = take::<2>(buf, offset);
    if little_endian {
        u16::from_le_bytes(bytes)
    } else {
        u16::from_be_bytes(bytes)
    }
}

pub fn write_uint16(buf: &mut [u8], offset: usize, value: u16, little_endian: bool) {
    let bytes = if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    };
    put(buf, offset, bytes);
}

pub fn read_int16(buf: &[u8], offset: usize, little_endian: bool) -> i16 {
    read_uint16(buf, offset, little_endian) as i16
}

pub fn write_int16(buf: &mut [u8], offset: usize, value: i16, little_endian: bool) {
    write_uint16(buf, offset, value as u16, little_endian);
}

// ============================================================================
// 32-bit
// ============================================================================

pub fn read_uint32(buf: &[u8], offset: usize, little_endian: bool) -> u32 {
    let bytes = take::<4>(buf, offset);
    if little_endian {
        u32::from_le_bytes(bytes)
    } else {
        u32::from_be_bytes(bytes)
    }
}

pub fn write_uint32(buf: &mut [u8], offset: usize, value: u32, little_endian: bool) {
    let bytes = if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    };
    put(buf, offset, bytes);
}

pub fn read_int32(buf: &[u8], offset: usize, little_endian: bool) -> i32 {
    read_uint32(buf, offset, little_endian) as i32
}

pub fn write_int32(buf: &mut [u8], offset: usize, value: i32, little_endian: bool) {
    write_uint32(buf, offset, value as u32, little_endian);
}

// ============================================================================
// 64-bit
// ============================================================================

pub fn read_uint64(buf: &[u8], offset: usize, little_endian: bool) -> u64 {
    let bytes = take::<8>(buf, offset);
    if little_endian {
        u64::from_le_bytes(bytes)
    } else {
        u64::from_be_bytes(bytes)
    }
}

pub fn write_uint64(buf: &mut [u8], offset: usize, value: u64, little_endian: bool) {
    let bytes = if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    };
    put(buf, offset, bytes);
}

pub fn read_int64(buf: &[u8], offset: usize, little_endian: bool) -> i64 {
    read_uint64(buf, offset, little_endian) as i64
}

pub fn write_int64(buf: &mut [u8], offset: usize, value: i64, little_endian: bool) {
    write_uint64(buf, offset, value as u64, little_endian);
}

// ============================================================================
// Floats (bit-pattern reuse of the integer codec)
// ============================================================================

pub fn read_float32(buf: &[u8], offset: usize, little_endian: bool) -> f32 {
    f32::from_bits(read_uint32(buf, offset, little_endian))
}

pub fn write_float32(buf: &mut [u8], offset: usize, value: f32, little_endian: bool) {
    write_uint32(buf, offset, value.to_bits(), little_endian);
}

pub fn read_float64(buf: &[u8], offset: usize, little_endian: bool) -> f64 {
    f64::from_bits(read_uint64(buf, offset, little_endian))
}

pub fn write_float64(buf: &mut [u8], offset: usize, value: f64, little_endian: bool) {
    write_uint64(buf, offset, value.to_bits(), little_endian);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int16_byte_order() {
        let mut buf = [0u8; 4];
        write_uint16(&mut buf, 1, 0x0102, false);
        assert_eq!(buf, [0, 1, 2, 0]);
        write_uint16(&mut buf, 1, 0x0102, true);
        assert_eq!(buf, [0, 2, 1, 0]);
        assert_eq!(read_int16(&[0xff, 0xfe], 0, false), -2);
        assert_eq!(read_int16(&[0xfe, 0xff], 0, true), -2);
        assert_eq!(read_uint16(&[0xff, 0xfe], 0, false), 0xfffe);
    }

    #[test]
    fn test_int32_byte_order() {
        let mut buf = [0u8; 4];
        write_int32(&mut buf, 0, -2, false);
        assert_eq!(buf, [0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(read_int32(&buf, 0, false), -2);
        assert_eq!(read_uint32(&buf, 0, false), 0xffff_fffe);
        assert_eq!(read_uint32(&buf, 0, true), 0xfeff_ffff);
    }

    #[test]
    fn test_int8_ignores_order() {
        let mut buf = [0u8; 1];
        write_int8(&mut buf, 0, -128);
        assert_eq!(buf[0], 0x80);
        assert_eq!(read_int8(&buf, 0), -128);
        assert_eq!(read_uint8(&buf, 0), 128);
    }

    #[test]
    fn test_unaligned_64bit() {
        let mut buf = [0u8; 11];
        write_uint64(&mut buf, 3, 0x0102_0304_0506_0708, false);
        assert_eq!(&buf[3..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(read_uint64(&buf, 3, true), 0x0807_0605_0403_0201);
        assert_eq!(read_int64(&buf, 3, false), 0x0102_0304_0506_0708);

        write_int64(&mut buf, 0, -2, true);
        assert_eq!(&buf[..8], &[0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(read_int64(&buf, 0, true), -2);
    }

    #[test]
    fn test_float_bit_patterns() {
        let mut buf = [0u8; 8];
        write_float32(&mut buf, 0, 1.0, false);
        assert_eq!(&buf[..4], &[0x3f, 0x80, 0, 0]);
        write_float64(&mut buf, 0, -2.0, true);
        assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0, 0xc0]);
        assert_eq!(read_float64(&buf, 0, true), -2.0);

        write_float64(&mut buf, 0, f64::NAN, false);
        assert!(read_float64(&buf, 0, false).is_nan());
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_offset_panics() {
        let buf = [0u8; 3];
        read_uint32(&buf, 0, false);
    }
}
