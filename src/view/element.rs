//! Element Kinds
//!
//! One [`Element`] implementation per typed-view flavour. Each fixes the element width,
//! the conversion applied on store, the byte codec used for load and store, and the
//! boxed hash the host collection adapter reports.

use crate::codec;
use crate::conversions;
use crate::value::Value;
use crate::view::{AnyTypedArray, TypedArray};
use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// The ten typed-view flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float16,
    Float32,
    Float64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Int8,
        ElementKind::Uint8,
        ElementKind::Uint8Clamped,
        ElementKind::Int16,
        ElementKind::Uint16,
        ElementKind::Int32,
        ElementKind::Uint32,
        ElementKind::Float16,
        ElementKind::Float32,
        ElementKind::Float64,
    ];

    pub const fn bytes_per_element(self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::Uint8 | ElementKind::Uint8Clamped => 1,
            ElementKind::Int16 | ElementKind::Uint16 | ElementKind::Float16 => 2,
            ElementKind::Int32 | ElementKind::Uint32 | ElementKind::Float32 => 4,
            ElementKind::Float64 => 8,
        }
    }

    /// Script constructor name, e.g. `"Int16Array"`.
    pub const fn class_name(self) -> &'static str {
        match self {
            ElementKind::Int8 => "Int8Array",
            ElementKind::Uint8 => "Uint8Array",
            ElementKind::Uint8Clamped => "Uint8ClampedArray",
            ElementKind::Int16 => "Int16Array",
            ElementKind::Uint16 => "Uint16Array",
            ElementKind::Int32 => "Int32Array",
            ElementKind::Uint32 => "Uint32Array",
            ElementKind::Float16 => "Float16Array",
            ElementKind::Float32 => "Float32Array",
            ElementKind::Float64 => "Float64Array",
        }
    }

    pub fn from_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.class_name() == name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// A fixed-width numeric type a [`TypedArray`] can store.
///
/// Sealed: the set of element kinds is closed.
pub trait Element: sealed::Sealed + Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: ElementKind;
    const BYTES_PER_ELEMENT: usize = Self::KIND.bytes_per_element();

    /// Apply this kind's store conversion to a script value.
    fn from_value(value: &Value) -> Self;

    /// The natural script value of this element.
    fn to_value(self) -> Value;

    fn read(bytes: &[u8], offset: usize, little_endian: bool) -> Self;

    fn write(self, bytes: &mut [u8], offset: usize, little_endian: bool);

    /// Hash of the boxed host value (the collection adapter sums these).
    fn hash_code(self) -> i32;

    /// Equality of the boxed host values. Floating kinds compare bit patterns with
    /// NaN collapsed, so NaN equals NaN and `0.0` differs from `-0.0`. Always agrees
    /// with [`hash_code`](Element::hash_code).
    fn boxed_eq(self, other: Self) -> bool;

    fn wrap(array: TypedArray<Self>) -> AnyTypedArray;

    fn unwrap(array: &AnyTypedArray) -> Option<&TypedArray<Self>>;
}

/// Uint8 storage with saturating, ties-to-even stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U8Clamped(pub u8);

impl From<u8> for U8Clamped {
    fn from(value: u8) -> Self {
        U8Clamped(value)
    }
}

/// IEEE-754 binary16 value, kept as its bit pattern.
///
/// Equality compares bit patterns with every NaN treated as one value, so the two
/// zeroes differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct F16 {
    bits: u16,
}

impl F16 {
    pub const fn from_bits(bits: u16) -> Self {
        F16 { bits }
    }

    /// Round a double to the nearest half, ties to even.
    pub fn from_f64(value: f64) -> Self {
        F16 {
            bits: codec::f64_to_f16_bits(value),
        }
    }

    pub const fn to_bits(self) -> u16 {
        self.bits
    }

    pub fn to_f32(self) -> f32 {
        codec::f16_bits_to_f32(self.bits)
    }
}

impl F16 {
    fn canonical_bits(self) -> u16 {
        if self.to_f32().is_nan() {
            codec::F16_QUIET_NAN
        } else {
            self.bits
        }
    }
}

impl PartialEq for F16 {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for F16 {}

impl From<F16> for f64 {
    fn from(value: F16) -> f64 {
        f64::from(value.to_f32())
    }
}

// Boxed floats and doubles: the bit pattern, NaN collapsed to one pattern
fn float_bits(value: f32) -> u32 {
    if value.is_nan() {
        0x7fc0_0000
    } else {
        value.to_bits()
    }
}

fn double_bits(value: f64) -> u64 {
    if value.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        value.to_bits()
    }
}

fn float_hash(value: f32) -> i32 {
    float_bits(value) as i32
}

fn double_hash(value: f64) -> i32 {
    let bits = double_bits(value);
    (bits ^ (bits >> 32)) as i32
}

macro_rules! element {
    (
        $ty:ty, $kind:ident,
        from_value: $from:expr,
        to_number: $to:expr,
        read: $read:expr,
        write: $write:expr,
        hash: $hash:expr,
        eq: $eq:expr $(,)?
    ) => {
        impl sealed::Sealed for $ty {}

        impl Element for $ty {
            const KIND: ElementKind = ElementKind::$kind;

            fn from_value(value: &Value) -> Self {
                $from(value)
            }

            fn to_value(self) -> Value {
                Value::Number($to(self))
            }

            fn read(bytes: &[u8], offset: usize, little_endian: bool) -> Self {
                $read(bytes, offset, little_endian)
            }

            fn write(self, bytes: &mut [u8], offset: usize, little_endian: bool) {
                $write(bytes, offset, self, little_endian)
            }

            fn hash_code(self) -> i32 {
                $hash(self)
            }

            fn boxed_eq(self, other: Self) -> bool {
                $eq(self, other)
            }

            fn wrap(array: TypedArray<Self>) -> AnyTypedArray {
                AnyTypedArray::$kind(array)
            }

            fn unwrap(array: &AnyTypedArray) -> Option<&TypedArray<Self>> {
                match array {
                    AnyTypedArray::$kind(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

element!(
    i8, Int8,
    from_value: conversions::to_int8,
    to_number: f64::from,
    read: |b: &[u8], o, _| codec::read_int8(b, o),
    write: |b: &mut [u8], o, v, _| codec::write_int8(b, o, v),
    hash: i32::from,
    eq: |a: i8, b: i8| a == b,
);

element!(
    u8, Uint8,
    from_value: conversions::to_uint8,
    to_number: f64::from,
    read: |b: &[u8], o, _| codec::read_uint8(b, o),
    write: |b: &mut [u8], o, v, _| codec::write_uint8(b, o, v),
    hash: i32::from,
    eq: |a: u8, b: u8| a == b,
);

element!(
    U8Clamped, Uint8Clamped,
    from_value: |v| U8Clamped(conversions::to_uint8_clamp(v)),
    to_number: |v: U8Clamped| f64::from(v.0),
    read: |b: &[u8], o, _| U8Clamped(codec::read_uint8(b, o)),
    write: |b: &mut [u8], o, v: U8Clamped, _| codec::write_uint8(b, o, v.0),
    hash: |v: U8Clamped| i32::from(v.0),
    eq: |a: U8Clamped, b: U8Clamped| a == b,
);

element!(
    i16, Int16,
    from_value: conversions::to_int16,
    to_number: f64::from,
    read: codec::read_int16,
    write: codec::write_int16,
    hash: i32::from,
    eq: |a: i16, b: i16| a == b,
);

element!(
    u16, Uint16,
    from_value: conversions::to_uint16,
    to_number: f64::from,
    read: codec::read_uint16,
    write: codec::write_uint16,
    hash: i32::from,
    eq: |a: u16, b: u16| a == b,
);

element!(
    i32, Int32,
    from_value: conversions::to_int32,
    to_number: f64::from,
    read: codec::read_int32,
    write: codec::write_int32,
    hash: |v: i32| v,
    eq: |a: i32, b: i32| a == b,
);

element!(
    u32, Uint32,
    from_value: conversions::to_uint32,
    to_number: f64::from,
    read: codec::read_uint32,
    write: codec::write_uint32,
    // boxed as a 64-bit Long: high word is zero
    hash: |v: u32| v as i32,
    eq: |a: u32, b: u32| a == b,
);

element!(
    F16, Float16,
    from_value: |v: &Value| F16::from_f64(v.to_number()),
    to_number: f64::from,
    read: |b: &[u8], o, le| F16::from_bits(codec::read_uint16(b, o, le)),
    write: |b: &mut [u8], o, v: F16, le| codec::write_uint16(b, o, v.to_bits(), le),
    hash: |v: F16| float_hash(v.to_f32()),
    eq: |a: F16, b: F16| a == b,
);

element!(
    f32, Float32,
    from_value: conversions::to_float32,
    to_number: f64::from,
    read: codec::read_float32,
    write: codec::write_float32,
    hash: float_hash,
    eq: |a: f32, b: f32| float_bits(a) == float_bits(b),
);

element!(
    f64, Float64,
    from_value: conversions::to_float64,
    to_number: |v: f64| v,
    read: codec::read_float64,
    write: codec::write_float64,
    hash: double_hash,
    eq: |a: f64, b: f64| double_bits(a) == double_bits(b),
);
