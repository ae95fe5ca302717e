//! Property-key access for views and buffers.
//!
//! Typed views are integer-indexed: any key that is a canonical numeric string is an
//! element access, never an ordinary property, even when it is out of range or not an
//! integer. The metadata properties are read-only. Every other key returns `None` and
//! is left to the embedding engine's own property lookup.

use crate::buffer::ArrayBuffer;
use crate::value::{number_to_string, string_to_number, Value};
use crate::view::any::dispatch;
use crate::view::{AnyTypedArray, ArrayBufferView, DataView, Element, TypedArray};

/// CanonicalNumericIndexString: the number `key` names, if `key` is exactly how that
/// number prints. `"-0"` is the one exception that does not round-trip.
pub fn canonical_numeric_index(key: &str) -> Option<f64> {
    if key == "-0" {
        return Some(-0.0);
    }
    let n = string_to_number(key);
    if number_to_string(n) == key {
        Some(n)
    } else {
        None
    }
}

fn element_index(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n >= 0.0 && n.is_sign_positive() && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

fn is_view_metadata(key: &str) -> bool {
    matches!(key, "buffer" | "byteOffset" | "byteLength")
}

fn view_metadata(view: &impl ArrayBufferView, key: &str) -> Option<Value> {
    match key {
        "buffer" => Some(Value::from(view.buffer().clone())),
        "byteOffset" => Some(Value::from(view.byte_offset() as f64)),
        "byteLength" => Some(Value::from(view.byte_length() as f64)),
        _ => None,
    }
}

impl<E: Element> TypedArray<E> {
    fn is_metadata(key: &str) -> bool {
        is_view_metadata(key) || matches!(key, "length" | "BYTES_PER_ELEMENT")
    }

    /// Property read. `Some(Value::Undefined)` for numeric keys that name no element.
    pub fn get_property(&self, key: &str) -> Option<Value> {
        if let Some(n) = canonical_numeric_index(key) {
            return Some(element_index(n).map_or(Value::Undefined, |i| self.get(i)));
        }
        match key {
            "length" => Some(Value::from(self.length() as f64)),
            "BYTES_PER_ELEMENT" => Some(Value::from(E::BYTES_PER_ELEMENT as f64)),
            _ => view_metadata(self, key),
        }
    }

    /// Property write. Numeric keys always report handled, whether or not an element
    /// was stored; metadata keys report `Some(false)` and change nothing.
    pub fn put_property(&self, key: &str, value: &Value) -> Option<bool> {
        if let Some(n) = canonical_numeric_index(key) {
            if let Some(i) = element_index(n) {
                self.set(i, value);
            }
            return Some(true);
        }
        if Self::is_metadata(key) {
            return Some(false);
        }
        None
    }

    pub fn has_property(&self, key: &str) -> Option<bool> {
        if let Some(n) = canonical_numeric_index(key) {
            return Some(element_index(n).is_some_and(|i| self.has(i)));
        }
        if Self::is_metadata(key) {
            return Some(true);
        }
        None
    }
}

impl AnyTypedArray {
    pub fn get_property(&self, key: &str) -> Option<Value> {
        dispatch!(self, a => a.get_property(key))
    }

    pub fn put_property(&self, key: &str, value: &Value) -> Option<bool> {
        dispatch!(self, a => a.put_property(key, value))
    }

    pub fn has_property(&self, key: &str) -> Option<bool> {
        dispatch!(self, a => a.has_property(key))
    }
}

impl DataView {
    /// `buffer`, `byteOffset` or `byteLength`.
    pub fn get_property(&self, key: &str) -> Option<Value> {
        view_metadata(self, key)
    }

    pub fn put_property(&self, key: &str) -> Option<bool> {
        is_view_metadata(key).then_some(false)
    }
}

impl ArrayBuffer {
    /// `byteLength`.
    pub fn get_property(&self, key: &str) -> Option<Value> {
        match key {
            "byteLength" => Some(Value::from(self.byte_length() as f64)),
            _ => None,
        }
    }
}
