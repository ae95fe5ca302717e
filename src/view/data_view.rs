//! DataView
//!
//! Unaligned, width-agnostic access to a buffer window with the byte order chosen per
//! call. Positions are relative to the view's own window and are bounds-checked
//! against its `byte_length`, which may be narrower than the buffer behind it.

use crate::buffer::ArrayBuffer;
use crate::error::{ViewError, ViewResult};
use crate::value::{arg, Object, Value};
use crate::view::{ArrayBufferView, Element, ViewRegion, F16};

/// A DataView over a shared [`ArrayBuffer`].
#[derive(Clone, Debug)]
pub struct DataView {
    region: ViewRegion,
}

impl ArrayBufferView for DataView {
    fn region(&self) -> &ViewRegion {
        &self.region
    }
}

fn position(value: f64) -> ViewResult<i64> {
    if value.is_infinite() {
        return Err(ViewError::range("offset out of range"));
    }
    Ok(i64::from(crate::value::number_to_int32(value)))
}

impl DataView {
    pub const CLASS_NAME: &'static str = "DataView";

    /// View `buffer` from `byte_offset` (default 0) for `byte_length` bytes (default:
    /// the rest of the buffer). Both go through ToInt32; infinities are rejected.
    pub fn new(
        buffer: &ArrayBuffer,
        byte_offset: Option<f64>,
        byte_length: Option<f64>,
    ) -> ViewResult<Self> {
        let buffer_length = buffer.byte_length() as i64;
        let offset = byte_offset.map_or(Ok(0), position)?;
        let length = match byte_length {
            Some(length) => position(length)?,
            None => buffer_length - offset,
        };

        if length < 0 {
            return Err(ViewError::range("length out of range"));
        }
        if offset < 0 || offset + length > buffer_length {
            return Err(ViewError::range("offset out of range"));
        }
        Ok(Self {
            region: ViewRegion::new(buffer.clone(), offset as usize, length as usize)?,
        })
    }

    /// Script constructor: `new DataView(buffer, byteOffset, byteLength)`.
    pub fn construct(args: &[Value]) -> ViewResult<Self> {
        let buffer = match arg(args, 0) {
            Some(Value::Object(Object::ArrayBuffer(buffer))) => buffer,
            _ => return Err(ViewError::type_error("Missing parameters")),
        };
        Self::new(
            buffer,
            arg(args, 1).map(Value::to_number),
            arg(args, 2).map(Value::to_number),
        )
    }

    fn check(&self, pos: i64, width: usize) -> ViewResult<usize> {
        let end = pos.checked_add(width as i64);
        match end {
            Some(end) if pos >= 0 && end <= self.byte_length() as i64 => Ok(pos as usize),
            _ => Err(ViewError::range("offset out of range")),
        }
    }

    /// Read an `E` at `pos`. Single-byte kinds ignore `little_endian`.
    pub fn get<E: Element>(&self, pos: i64, little_endian: bool) -> ViewResult<E> {
        let pos = self.check(pos, E::BYTES_PER_ELEMENT)?;
        Ok(self.region.read(|bytes| E::read(bytes, pos, little_endian)))
    }

    /// Convert `value` to `E` and store it at `pos`.
    pub fn set<E: Element>(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        if pos < 0 {
            return Err(ViewError::range("offset out of range"));
        }
        let converted = E::from_value(value);
        self.write(pos, converted, little_endian)
    }

    /// Store an already-converted `E` at `pos`.
    pub fn write<E: Element>(&self, pos: i64, value: E, little_endian: bool) -> ViewResult<()> {
        let pos = self.check(pos, E::BYTES_PER_ELEMENT)?;
        self.region
            .write(|bytes| value.write(bytes, pos, little_endian));
        Ok(())
    }

    pub fn get_int8(&self, pos: i64) -> ViewResult<i8> {
        self.get(pos, false)
    }

    pub fn get_uint8(&self, pos: i64) -> ViewResult<u8> {
        self.get(pos, false)
    }

    pub fn get_int16(&self, pos: i64, little_endian: bool) -> ViewResult<i16> {
        self.get(pos, little_endian)
    }

    pub fn get_uint16(&self, pos: i64, little_endian: bool) -> ViewResult<u16> {
        self.get(pos, little_endian)
    }

    pub fn get_int32(&self, pos: i64, little_endian: bool) -> ViewResult<i32> {
        self.get(pos, little_endian)
    }

    pub fn get_uint32(&self, pos: i64, little_endian: bool) -> ViewResult<u32> {
        self.get(pos, little_endian)
    }

    pub fn get_float16(&self, pos: i64, little_endian: bool) -> ViewResult<f32> {
        self.get::<F16>(pos, little_endian).map(F16::to_f32)
    }

    pub fn get_float32(&self, pos: i64, little_endian: bool) -> ViewResult<f32> {
        self.get(pos, little_endian)
    }

    pub fn get_float64(&self, pos: i64, little_endian: bool) -> ViewResult<f64> {
        self.get(pos, little_endian)
    }

    pub fn set_int8(&self, pos: i64, value: &Value) -> ViewResult<()> {
        self.set::<i8>(pos, value, false)
    }

    pub fn set_uint8(&self, pos: i64, value: &Value) -> ViewResult<()> {
        self.set::<u8>(pos, value, false)
    }

    pub fn set_int16(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        self.set::<i16>(pos, value, little_endian)
    }

    pub fn set_uint16(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        self.set::<u16>(pos, value, little_endian)
    }

    pub fn set_int32(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        self.set::<i32>(pos, value, little_endian)
    }

    pub fn set_uint32(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        self.set::<u32>(pos, value, little_endian)
    }

    pub fn set_float16(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        self.set::<F16>(pos, value, little_endian)
    }

    pub fn set_float32(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        self.set::<f32>(pos, value, little_endian)
    }

    pub fn set_float64(&self, pos: i64, value: &Value, little_endian: bool) -> ViewResult<()> {
        self.set::<f64>(pos, value, little_endian)
    }

    /// Script method call, e.g. `invoke("getUint16", [pos, littleEndian])` or
    /// `invoke("setFloat32", [pos, value, littleEndian])`.
    ///
    /// A missing position reads as 0 and a missing value as `undefined`.
    pub fn invoke(&self, method: &str, args: &[Value]) -> ViewResult<Value> {
        let pos = arg(args, 0).map_or(Ok(0), |v| position(v.to_number()))?;
        let flag = |index: usize| arg(args, index).is_some_and(Value::to_boolean);
        let undefined = Value::Undefined;
        let value = args.get(1).unwrap_or(&undefined);

        match method {
            "getInt8" => self.get::<i8>(pos, false).map(Element::to_value),
            "getUint8" => self.get::<u8>(pos, false).map(Element::to_value),
            "getInt16" => self.get::<i16>(pos, flag(1)).map(Element::to_value),
            "getUint16" => self.get::<u16>(pos, flag(1)).map(Element::to_value),
            "getInt32" => self.get::<i32>(pos, flag(1)).map(Element::to_value),
            "getUint32" => self.get::<u32>(pos, flag(1)).map(Element::to_value),
            "getFloat16" => self.get::<F16>(pos, flag(1)).map(Element::to_value),
            "getFloat32" => self.get::<f32>(pos, flag(1)).map(Element::to_value),
            "getFloat64" => self.get::<f64>(pos, flag(1)).map(Element::to_value),
            "setInt8" => self.set::<i8>(pos, value, false).map(|_| Value::Undefined),
            "setUint8" => self.set::<u8>(pos, value, false).map(|_| Value::Undefined),
            "setInt16" => self.set::<i16>(pos, value, flag(2)).map(|_| Value::Undefined),
            "setUint16" => self.set::<u16>(pos, value, flag(2)).map(|_| Value::Undefined),
            "setInt32" => self.set::<i32>(pos, value, flag(2)).map(|_| Value::Undefined),
            "setUint32" => self.set::<u32>(pos, value, flag(2)).map(|_| Value::Undefined),
            "setFloat16" => self.set::<F16>(pos, value, flag(2)).map(|_| Value::Undefined),
            "setFloat32" => self.set::<f32>(pos, value, flag(2)).map(|_| Value::Undefined),
            "setFloat64" => self.set::<f64>(pos, value, flag(2)).map(|_| Value::Undefined),
            _ => Err(ViewError::type_error(format!(
                "DataView.prototype.{} is not a function",
                method
            ))),
        }
    }

    /// Same buffer, same window.
    pub fn same_view(&self, other: &DataView) -> bool {
        self.region.same_region(&other.region)
    }
}
