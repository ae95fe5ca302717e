//! Typed Arrays
//!
//! [`TypedArray<E>`] segments a view window into `length` elements of one numeric kind.
//! It exposes the script-facing contract: out-of-range reads produce
//! [`Value::Undefined`] and out-of-range writes are ignored. The host collection
//! contract, which reports out-of-range access as an error, lives on
//! [`ElementList`](crate::view::ElementList).

use crate::buffer::ArrayBuffer;
use crate::config;
use crate::error::{ViewError, ViewResult};
use crate::value::{arg, value_to_join_string, Object, Value};
use crate::view::{
    AnyTypedArray, ArrayBufferView, Element, ElementList, SetSource, ViewRegion, ViewSource,
};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

/// A typed view over a shared [`ArrayBuffer`].
///
/// Cloning produces another handle to the same window, not a copy of the elements.
pub struct TypedArray<E: Element> {
    region: ViewRegion,
    length: usize,
    little_endian: bool,
    _element: PhantomData<E>,
}

impl<E: Element> Clone for TypedArray<E> {
    fn clone(&self) -> Self {
        Self {
            region: self.region.clone(),
            length: self.length,
            little_endian: self.little_endian,
            _element: PhantomData,
        }
    }
}

impl<E: Element> fmt::Debug for TypedArray<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(E::KIND.class_name())
            .field("length", &self.length)
            .field("byte_offset", &self.region.byte_offset())
            .field("little_endian", &self.little_endian)
            .finish()
    }
}

impl<E: Element> ArrayBufferView for TypedArray<E> {
    fn region(&self) -> &ViewRegion {
        &self.region
    }
}

impl<E: Element> TypedArray<E> {
    pub const BYTES_PER_ELEMENT: usize = E::BYTES_PER_ELEMENT;

    fn over(
        buffer: ArrayBuffer,
        byte_offset: usize,
        length: usize,
        little_endian: bool,
    ) -> ViewResult<Self> {
        let byte_length = length
            .checked_mul(E::BYTES_PER_ELEMENT)
            .ok_or_else(|| ViewError::range("length out of range"))?;
        Ok(Self {
            region: ViewRegion::new(buffer, byte_offset, byte_length)?,
            length,
            little_endian,
            _element: PhantomData,
        })
    }

    fn allocate(length: f64) -> ViewResult<Self> {
        let buffer = ArrayBuffer::new(length * E::BYTES_PER_ELEMENT as f64)?;
        let length = buffer.byte_length() / E::BYTES_PER_ELEMENT;
        Self::over(buffer, 0, length, config::current().views.little_endian)
    }

    /// A zero-filled view of `length` elements over a fresh buffer.
    pub fn new(length: usize) -> ViewResult<Self> {
        Self::allocate(length as f64)
    }

    /// Share `buffer` from `byte_offset`, covering `length` elements or the rest of the
    /// buffer.
    pub fn from_buffer(
        buffer: &ArrayBuffer,
        byte_offset: usize,
        length: Option<usize>,
    ) -> ViewResult<Self> {
        let byte_offset = i64::try_from(byte_offset).unwrap_or(i64::MAX);
        let length = length.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
        Self::share(
            buffer,
            byte_offset,
            length,
            config::current().views.little_endian,
        )
    }

    fn share(
        buffer: &ArrayBuffer,
        byte_offset: i64,
        length: Option<i64>,
        little_endian: bool,
    ) -> ViewResult<Self> {
        let bpe = E::BYTES_PER_ELEMENT as i64;
        let buffer_length = buffer.byte_length() as i64;
        let byte_length = match length {
            Some(n) => n.saturating_mul(bpe),
            None => buffer_length - byte_offset,
        };

        if byte_offset < 0 || byte_offset > buffer_length {
            return Err(ViewError::range("offset out of range"));
        }
        let fits = byte_offset
            .checked_add(byte_length)
            .is_some_and(|end| end <= buffer_length);
        if byte_length < 0 || !fits {
            return Err(ViewError::range("length out of range"));
        }
        if byte_offset % bpe != 0 {
            return Err(ViewError::range("offset must be a multiple of the byte size"));
        }
        if byte_length % bpe != 0 {
            return Err(ViewError::range(
                "offset and buffer must be a multiple of the byte size",
            ));
        }

        Self::over(
            buffer.clone(),
            byte_offset as usize,
            (byte_length / bpe) as usize,
            little_endian,
        )
    }

    /// Copy of a script array, each value converted to this kind.
    pub fn from_values(values: &[Value]) -> ViewResult<Self> {
        let array = Self::new(values.len())?;
        for (index, value) in values.iter().enumerate() {
            array.set_index(index, value);
        }
        Ok(array)
    }

    /// Copy of another typed view, converting each element's natural value.
    pub fn from_typed(source: &AnyTypedArray) -> ViewResult<Self> {
        let array = Self::new(source.length())?;
        tracing::debug!(
            from = %source.kind(),
            to = %E::KIND,
            length = source.length(),
            "copy-constructing typed array"
        );
        for index in 0..source.length() {
            array.set_index(index, &source.get(index as i64));
        }
        Ok(array)
    }

    /// Build a view from one of the five construction forms.
    pub fn construct(source: ViewSource<'_>) -> ViewResult<Self> {
        match source {
            ViewSource::Empty => Self::over(
                ArrayBuffer::empty(),
                0,
                0,
                config::current().views.little_endian,
            ),
            ViewSource::Length(value) => Self::allocate(f64::from(value.to_int32())),
            ViewSource::TypedArray(array) => Self::from_typed(array),
            ViewSource::Buffer {
                buffer,
                byte_offset,
                length,
            } => Self::share(
                buffer,
                byte_offset.map_or(0, |v| i64::from(v.to_int32())),
                length.map(|v| i64::from(v.to_int32())),
                config::current().views.little_endian,
            ),
            ViewSource::ArrayLike(values) => Self::from_values(values),
        }
    }

    /// Script constructor: `new Int16Array(...)`.
    pub fn construct_from_args(args: &[Value]) -> ViewResult<Self> {
        Self::construct(ViewSource::from_args(args)?)
    }

    /// Number of elements.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Byte order of the element storage, fixed at construction.
    pub fn little_endian(&self) -> bool {
        self.little_endian
    }

    // ========================================================================
    // Element access
    // ========================================================================

    /// The element at `index`, if in range.
    pub fn get_element(&self, index: usize) -> Option<E> {
        if index >= self.length {
            return None;
        }
        let offset = index * E::BYTES_PER_ELEMENT;
        Some(self.region.read(|bytes| E::read(bytes, offset, self.little_endian)))
    }

    /// Store an already-converted element. Returns false when `index` is out of range.
    pub fn set_element(&self, index: usize, value: E) -> bool {
        if index >= self.length {
            return false;
        }
        let offset = index * E::BYTES_PER_ELEMENT;
        self.region
            .write(|bytes| value.write(bytes, offset, self.little_endian));
        true
    }

    fn set_index(&self, index: usize, value: &Value) {
        if index < self.length {
            self.set_element(index, E::from_value(value));
        }
    }

    /// Script read: the natural value, or `undefined` when out of range.
    pub fn get(&self, index: i64) -> Value {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get_element(i))
            .map_or(Value::Undefined, Element::to_value)
    }

    /// Script write: convert and store, or do nothing when out of range.
    pub fn set(&self, index: i64, value: &Value) {
        if let Ok(index) = usize::try_from(index) {
            self.set_index(index, value);
        }
    }

    /// `at(index)`: negative indices count back from the end.
    pub fn at(&self, relative_index: f64) -> Value {
        let relative = if relative_index.is_nan() {
            0.0
        } else {
            relative_index.trunc()
        };
        let k = if relative >= 0.0 {
            relative
        } else {
            self.length as f64 + relative
        };
        if k < 0.0 || k >= self.length as f64 {
            return Value::Undefined;
        }
        self.get(k as i64)
    }

    pub fn at_from_args(&self, args: &[Value]) -> Value {
        self.at(args.first().map_or(0.0, Value::to_number))
    }

    /// Whether `index` names an element.
    pub fn has(&self, index: i64) -> bool {
        usize::try_from(index).is_ok_and(|i| i < self.length)
    }

    /// Element indices, in order.
    pub fn keys(&self) -> Range<usize> {
        0..self.length
    }

    /// Natural values, in order.
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.keys().map(move |i| self.get(i as i64))
    }

    /// Copy of every element.
    pub fn to_vec(&self) -> Vec<E> {
        let little_endian = self.little_endian;
        self.region.read(|bytes| {
            (0..self.length)
                .map(|i| E::read(bytes, i * E::BYTES_PER_ELEMENT, little_endian))
                .collect()
        })
    }

    pub fn join(&self, separator: &str) -> String {
        self.values()
            .map(|value| value_to_join_string(&value))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Script `toString()`.
    pub fn to_display_string(&self) -> String {
        self.join(",")
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Copy `source` into this view starting at element `offset`.
    ///
    /// A typed source sharing this view's buffer is read out in full before anything
    /// is written, so overlapping windows of any width copy correctly.
    pub fn set_range(&self, source: SetSource<'_>, offset: i64) -> ViewResult<()> {
        match source {
            SetSource::TypedArray(src) => self.set_range_typed(src, offset),
            SetSource::Array(values) => self.set_range_values(values, offset),
            SetSource::Other => {
                tracing::warn!(
                    target_kind = %E::KIND,
                    "set() called with a non-array object; nothing copied"
                );
                Ok(())
            }
        }
    }

    fn set_range_typed(&self, src: &AnyTypedArray, offset: i64) -> ViewResult<()> {
        let length = self.length as i64;
        if offset < 0 || offset >= length {
            return Err(ViewError::range("offset out of range"));
        }
        if src.length() as i64 > length - offset {
            return Err(ViewError::range("source array too long"));
        }
        let offset = offset as usize;

        if src.buffer().same_storage(self.buffer()) {
            tracing::trace!(
                count = src.length(),
                source_offset = src.byte_offset(),
                target_offset = self.byte_offset() + offset * E::BYTES_PER_ELEMENT,
                "copying through scratch space"
            );
            let scratch: Vec<Value> = (0..src.length()).map(|i| src.get(i as i64)).collect();
            for (i, value) in scratch.iter().enumerate() {
                self.set_index(offset + i, value);
            }
        } else {
            for i in 0..src.length() {
                self.set_index(offset + i, &src.get(i as i64));
            }
        }
        Ok(())
    }

    fn set_range_values(&self, values: &[Value], offset: i64) -> ViewResult<()> {
        let length = self.length as i64;
        if offset < 0 || offset > length {
            return Err(ViewError::range("offset out of range"));
        }
        if offset + values.len() as i64 > length {
            return Err(ViewError::range("offset + length out of range"));
        }
        for (i, value) in values.iter().enumerate() {
            self.set_index(offset as usize + i, value);
        }
        Ok(())
    }

    /// Script `set(...)`: a bulk copy from a typed view or array, a silent no-op for
    /// other objects, or a single `(index, value)` store.
    pub fn set_from_args(&self, args: &[Value]) -> ViewResult<()> {
        let first = args
            .first()
            .ok_or_else(|| ViewError::invalid_argument("invalid arguments"))?;
        if let Some(source) = SetSource::from_value(first) {
            let offset = arg(args, 1).map_or(0, |v| i64::from(v.to_int32()));
            return self.set_range(source, offset);
        }
        match args.get(1) {
            Some(value) => {
                self.set(i64::from(first.to_int32()), value);
                Ok(())
            }
            None => Err(ViewError::invalid_argument("invalid arguments")),
        }
    }

    /// A view of elements `[start, end)` sharing this view's buffer.
    ///
    /// Negative positions count back from the end; both are clamped into
    /// `[0, length]`. The result keeps this view's byte order.
    pub fn subarray(&self, start: i64, end: i64) -> ViewResult<Self> {
        let length = self.length as i64;
        let resolve = |pos: i64| (if pos < 0 { length + pos } else { pos }).clamp(0, length);
        let (start, end) = (resolve(start), resolve(end));
        let count = (end - start).max(0);
        let byte_offset = (self.byte_offset() as i64 + start * E::BYTES_PER_ELEMENT as i64)
            .min(self.buffer().byte_length() as i64);
        Self::share(self.buffer(), byte_offset, Some(count), self.little_endian)
    }

    /// Script `subarray(start, end)` with `start = 0` and `end = length` defaults.
    pub fn subarray_from_args(&self, args: &[Value]) -> ViewResult<Self> {
        let start = arg(args, 0).map_or(0, |v| i64::from(v.to_int32()));
        let end = arg(args, 1).map_or(self.length as i64, |v| i64::from(v.to_int32()));
        self.subarray(start, end)
    }

    /// Host collection adapter over the same storage.
    pub fn to_list(&self) -> ElementList<E> {
        ElementList::new(self.clone())
    }

    /// Same kind, same buffer and same window.
    pub fn same_view(&self, other: &TypedArray<E>) -> bool {
        self.region.same_region(&other.region) && self.length == other.length
    }

    /// Whether `value` is a typed view or DataView over this view's buffer.
    pub fn shares_buffer_with(&self, value: &Value) -> bool {
        match value {
            Value::Object(Object::TypedArray(array)) => {
                array.buffer().same_storage(self.buffer())
            }
            Value::Object(Object::DataView(view)) => view.buffer().same_storage(self.buffer()),
            Value::Object(Object::ArrayBuffer(buffer)) => buffer.same_storage(self.buffer()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{F16, U8Clamped};

    fn values(items: &[f64]) -> Vec<Value> {
        items.iter().map(|n| Value::from(*n)).collect()
    }

    #[test]
    fn test_new_is_zeroed() {
        let array = TypedArray::<i32>::new(4).unwrap();
        assert_eq!(array.length(), 4);
        assert_eq!(array.byte_length(), 16);
        assert_eq!(array.to_vec(), vec![0, 0, 0, 0]);
        assert!(!array.little_endian());
    }

    #[test]
    fn test_script_access_out_of_range() {
        let array = TypedArray::<u8>::new(2).unwrap();
        assert_eq!(array.get(-1), Value::Undefined);
        assert_eq!(array.get(2), Value::Undefined);
        array.set(2, &Value::from(5));
        array.set(-1, &Value::from(5));
        assert_eq!(array.buffer().to_vec(), vec![0, 0]);
    }

    #[test]
    fn test_element_storage_is_big_endian_by_default() {
        let array = TypedArray::<u16>::new(1).unwrap();
        array.set(0, &Value::from(0x0102));
        assert_eq!(array.buffer().to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_construct_forms() {
        let empty = TypedArray::<f32>::construct_from_args(&[]).unwrap();
        assert!(empty.is_empty());

        let sized = TypedArray::<f32>::construct_from_args(&[Value::from("3")]).unwrap();
        assert_eq!(sized.length(), 3);

        let copied = TypedArray::<i8>::construct_from_args(&[Value::from(values(&[1.0, 300.0]))])
            .unwrap();
        assert_eq!(copied.to_vec(), vec![1, 44]);

        let err = TypedArray::<u8>::construct_from_args(&[Value::Boolean(true)]).unwrap_err();
        assert_eq!(err.kind(), "Error");

        let err = TypedArray::<u8>::construct_from_args(&[Value::from(-1)]).unwrap_err();
        assert_eq!(err.kind(), "RangeError");
    }

    #[test]
    fn test_copy_construct_converts_values() {
        let source = TypedArray::<f64>::from_values(&values(&[-1.0, 1.5, 256.0])).unwrap();
        let source = AnyTypedArray::from(source);

        let clamped = TypedArray::<U8Clamped>::from_typed(&source).unwrap();
        assert_eq!(clamped.to_vec(), vec![U8Clamped(0), U8Clamped(2), U8Clamped(255)]);

        let wrapped = TypedArray::<u8>::from_typed(&source).unwrap();
        assert_eq!(wrapped.to_vec(), vec![255, 1, 0]);
        assert!(!wrapped.buffer().same_storage(source.buffer()));
    }

    #[test]
    fn test_buffer_form_validation_order() {
        let buffer = ArrayBuffer::new(8.0).unwrap();

        let err = TypedArray::<i32>::from_buffer(&buffer, 9, None).unwrap_err();
        assert_eq!(err.message(), "offset out of range");

        let err = TypedArray::<i32>::from_buffer(&buffer, 4, Some(2)).unwrap_err();
        assert_eq!(err.message(), "length out of range");

        let err = TypedArray::<i32>::from_buffer(&buffer, 2, Some(1)).unwrap_err();
        assert_eq!(err.message(), "offset must be a multiple of the byte size");

        let odd = ArrayBuffer::new(6.0).unwrap();
        let err = TypedArray::<i32>::from_buffer(&odd, 0, None).unwrap_err();
        assert_eq!(
            err.message(),
            "offset and buffer must be a multiple of the byte size"
        );

        let view = TypedArray::<i32>::from_buffer(&buffer, 4, None).unwrap();
        assert_eq!(view.length(), 1);
        assert!(view.buffer().same_storage(&buffer));
    }

    #[test]
    fn test_buffer_form_from_args() {
        let buffer = ArrayBuffer::new(8.0).unwrap();
        let args = vec![Value::from(buffer.clone()), Value::from(2), Value::from(3)];
        let view = TypedArray::<u16>::construct_from_args(&args).unwrap();
        assert_eq!(view.byte_offset(), 2);
        assert_eq!(view.length(), 3);

        let args = vec![Value::from(buffer), Value::from(-2)];
        let err = TypedArray::<u16>::construct_from_args(&args).unwrap_err();
        assert_eq!(err.message(), "offset out of range");
    }

    #[test]
    fn test_at() {
        let array = TypedArray::<i16>::from_values(&values(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(array.at(0.0), Value::from(1));
        assert_eq!(array.at(-1.0), Value::from(3));
        assert_eq!(array.at(-3.0), Value::from(1));
        assert_eq!(array.at(-4.0), Value::Undefined);
        assert_eq!(array.at(3.0), Value::Undefined);
        assert_eq!(array.at(1.9), Value::from(2));
        assert_eq!(array.at(f64::NAN), Value::from(1));
        assert_eq!(array.at_from_args(&[]), Value::from(1));
    }

    #[test]
    fn test_keys_values_has() {
        let array = TypedArray::<u32>::from_values(&values(&[7.0, 8.0])).unwrap();
        assert_eq!(array.keys().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(
            array.values().collect::<Vec<_>>(),
            vec![Value::from(7), Value::from(8)]
        );
        assert!(array.has(1));
        assert!(!array.has(2));
        assert!(!array.has(-1));
    }

    #[test]
    fn test_join_and_display() {
        let floats = TypedArray::<f64>::from_values(&values(&[
            1.0,
            -0.0,
            0.5,
            f64::NAN,
            f64::NEG_INFINITY,
        ]))
        .unwrap();
        assert_eq!(floats.to_display_string(), "1,0,0.5,NaN,-Infinity");
        assert_eq!(floats.join(" | "), "1 | 0 | 0.5 | NaN | -Infinity");
        assert_eq!(TypedArray::<u8>::new(0).unwrap().to_display_string(), "");

        let halves = TypedArray::<F16>::from_values(&values(&[0.1])).unwrap();
        assert_eq!(halves.to_display_string(), "0.0999755859375");
    }

    #[test]
    fn test_set_range_other_buffer() {
        let target = TypedArray::<i16>::new(4).unwrap();
        let source = AnyTypedArray::from(
            TypedArray::<f64>::from_values(&values(&[1.5, 70000.0])).unwrap(),
        );
        target.set_range(SetSource::TypedArray(&source), 2).unwrap();
        assert_eq!(target.to_vec(), vec![0, 0, 1, 4464]);
    }

    #[test]
    fn test_set_range_bounds() {
        let target = TypedArray::<u8>::new(3).unwrap();
        let source = AnyTypedArray::from(TypedArray::<u8>::new(2).unwrap());

        let err = target.set_range(SetSource::TypedArray(&source), 3).unwrap_err();
        assert_eq!(err.message(), "offset out of range");
        let err = target.set_range(SetSource::TypedArray(&source), -1).unwrap_err();
        assert_eq!(err.message(), "offset out of range");
        let err = target.set_range(SetSource::TypedArray(&source), 2).unwrap_err();
        assert_eq!(err.message(), "source array too long");

        let items = values(&[1.0, 2.0]);
        let err = target.set_range(SetSource::Array(&items), 4).unwrap_err();
        assert_eq!(err.message(), "offset out of range");
        let err = target.set_range(SetSource::Array(&items), 2).unwrap_err();
        assert_eq!(err.message(), "offset + length out of range");

        // an empty array may be placed at the very end
        target.set_range(SetSource::Array(&[]), 3).unwrap();
        target.set_range(SetSource::Array(&items), 1).unwrap();
        assert_eq!(target.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_set_from_args() {
        let array = TypedArray::<u8>::new(3).unwrap();
        array
            .set_from_args(&[Value::from(values(&[9.0])), Value::from(2)])
            .unwrap();
        array.set_from_args(&[Value::from(0), Value::from(4)]).unwrap();
        array
            .set_from_args(&[Value::Object(Object::Plain), Value::from(1)])
            .unwrap();
        assert_eq!(array.to_vec(), vec![4, 0, 9]);

        assert!(array.set_from_args(&[]).is_err());
        let err = array.set_from_args(&[Value::from(1)]).unwrap_err();
        assert_eq!(err, ViewError::InvalidArgument("invalid arguments".into()));
    }

    #[test]
    fn test_subarray_aliases() {
        let array = TypedArray::<i32>::from_values(&values(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        let sub = array.subarray(1, -1).unwrap();
        assert_eq!(sub.length(), 2);
        assert_eq!(sub.byte_offset(), 4);
        assert!(sub.buffer().same_storage(array.buffer()));

        sub.set(0, &Value::from(20));
        assert_eq!(array.get(1), Value::from(20));
    }

    #[test]
    fn test_subarray_clamps() {
        let array = TypedArray::<u16>::new(4).unwrap();
        assert_eq!(array.subarray(3, 1).unwrap().length(), 0);
        assert_eq!(array.subarray(-100, 100).unwrap().length(), 4);

        let tail = array.subarray(10, 20).unwrap();
        assert_eq!(tail.length(), 0);
        assert_eq!(tail.byte_offset(), 8);

        let nested = array.subarray(1, 4).unwrap().subarray(1, 2).unwrap();
        assert_eq!(nested.byte_offset(), 4);
        assert_eq!(array.subarray_from_args(&[]).unwrap().length(), 4);
    }

    #[test]
    fn test_same_view_and_buffer() {
        let array = TypedArray::<u8>::new(4).unwrap();
        let alias = array.clone();
        let sub = array.subarray(0, 2).unwrap();
        assert!(array.same_view(&alias));
        assert!(!array.same_view(&sub));
        assert!(array.shares_buffer_with(&Value::from(sub)));
        assert!(!array.shares_buffer_with(&Value::from(TypedArray::<u8>::new(4).unwrap())));
    }
}
