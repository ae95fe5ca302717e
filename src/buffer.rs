//! Array Buffer
//!
//! A fixed-length, zero-initialized byte region shared by every view created over it.
//! Cloning an [`ArrayBuffer`] clones the handle, never the bytes: writes through any
//! handle or view are visible through all of them.

use crate::config;
use crate::error::{ViewError, ViewResult};
use crate::value::{arg, number_to_string, Object, Value};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

type Storage = Arc<RwLock<Box<[u8]>>>;

/// Every zero-length buffer shares this allocation.
static EMPTY: Lazy<Storage> = Lazy::new(|| Arc::new(RwLock::new(Box::default())));

/// Shared handle to a fixed-length byte region.
///
/// The lock only keeps individual reads and writes memory-safe; it does not make a
/// sequence of operations atomic. Callers running scripts on several threads over one
/// buffer must serialize them.
#[derive(Clone)]
pub struct ArrayBuffer {
    storage: Storage,
}

impl ArrayBuffer {
    pub const CLASS_NAME: &'static str = "ArrayBuffer";

    /// A zero-length buffer.
    pub fn empty() -> Self {
        Self {
            storage: Arc::clone(&EMPTY),
        }
    }

    /// Allocate `length` zero bytes, with the length given as a script number.
    ///
    /// NaN, negative lengths and lengths at or above the configured maximum are
    /// rejected. Fractional lengths truncate.
    pub fn new(length: f64) -> ViewResult<Self> {
        let max = config::current().limits.max_byte_length;
        if length >= max as f64 {
            return Err(ViewError::range(format!(
                "length parameter ({}) is too large",
                number_to_string(length)
            )));
        }
        if length.is_nan() {
            return Err(ViewError::range("Invalid array length NaN"));
        }
        let truncated = length.trunc();
        if truncated < 0.0 {
            return Err(ViewError::range(format!(
                "Negative array length {}",
                number_to_string(length)
            )));
        }
        Ok(Self::zeroed(truncated as usize))
    }

    /// Script constructor: `new ArrayBuffer(length)`, length defaulting to 0.
    pub fn construct(args: &[Value]) -> ViewResult<Self> {
        let length = arg(args, 0).map_or(0.0, Value::to_number);
        Self::new(length)
    }

    /// Allocate `length` zero bytes without the script-level checks.
    pub(crate) fn zeroed(length: usize) -> Self {
        if length == 0 {
            return Self::empty();
        }
        if config::current().diagnostics.log_allocations {
            tracing::info!(byte_length = length, "allocating array buffer");
        } else {
            tracing::debug!(byte_length = length, "allocating array buffer");
        }
        Self {
            storage: Arc::new(RwLock::new(vec![0u8; length].into_boxed_slice())),
        }
    }

    /// Wrap existing bytes in a new buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Self::empty();
        }
        Self {
            storage: Arc::new(RwLock::new(bytes.into_boxed_slice())),
        }
    }

    /// Number of bytes in the buffer. Never changes.
    pub fn byte_length(&self) -> usize {
        self.storage.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.byte_length() == 0
    }

    /// Whether both handles refer to the same storage.
    pub fn same_storage(&self, other: &ArrayBuffer) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// `ArrayBuffer.isView`: true for typed views and DataViews.
    pub fn is_view(value: &Value) -> bool {
        matches!(
            value,
            Value::Object(Object::TypedArray(_)) | Value::Object(Object::DataView(_))
        )
    }

    /// Copy of `[start, end)` in a brand-new buffer.
    ///
    /// Negative positions count from the end. `end` is clamped into `[0, length]`
    /// first, then `start` into `[0, end]`; NaN positions count as 0.
    pub fn slice(&self, start: f64, end: f64) -> Self {
        let length = self.byte_length() as f64;
        let end = clamp_position(relative(end, length), 0.0, length);
        let start = clamp_position(relative(start, length), 0.0, end);
        let (start, end) = (start as usize, end as usize);

        tracing::debug!(start, end, source_length = length, "slicing array buffer");
        let copy = Self::zeroed(end - start);
        if end > start {
            let source = self.storage.read();
            copy.storage.write().copy_from_slice(&source[start..end]);
        }
        copy
    }

    /// Script `slice(start, end)` with `start = 0` and `end = byteLength` defaults.
    pub fn slice_from_args(&self, args: &[Value]) -> Self {
        let start = arg(args, 0).map_or(0.0, Value::to_number);
        let end = arg(args, 1).map_or(self.byte_length() as f64, Value::to_number);
        self.slice(start, end)
    }

    /// Copy of the current contents.
    pub fn to_vec(&self) -> Vec<u8> {
        self.storage.read().to_vec()
    }

    /// Run `f` over the bytes. Do not touch this buffer's views from inside `f`.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.storage.read())
    }

    /// Run `f` over the mutable bytes. Do not touch this buffer's views from inside `f`.
    pub fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        f(&mut self.storage.write())
    }
}

impl Default for ArrayBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ArrayBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayBuffer")
            .field("byte_length", &self.byte_length())
            .finish()
    }
}

impl From<Vec<u8>> for ArrayBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8]> for ArrayBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes.to_vec())
    }
}

fn relative(position: f64, length: f64) -> f64 {
    if position < 0.0 {
        length + position
    } else {
        position
    }
}

fn clamp_position(position: f64, low: f64, high: f64) -> f64 {
    if position.is_nan() {
        return low;
    }
    position.clamp(low, high).trunc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let buf = ArrayBuffer::new(16.0).unwrap();
        assert_eq!(buf.byte_length(), 16);
        assert!(buf.to_vec().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_new_truncates_fraction() {
        assert_eq!(ArrayBuffer::new(3.9).unwrap().byte_length(), 3);
        assert_eq!(ArrayBuffer::new(-0.5).unwrap().byte_length(), 0);
    }

    #[test]
    fn test_new_rejects_bad_lengths() {
        let err = ArrayBuffer::new(-1.0).unwrap_err();
        assert_eq!(err, ViewError::Range("Negative array length -1".to_string()));

        let err = ArrayBuffer::new(f64::NEG_INFINITY).unwrap_err();
        assert_eq!(err.message(), "Negative array length -Infinity");

        let err = ArrayBuffer::new(f64::INFINITY).unwrap_err();
        assert_eq!(err.message(), "length parameter (Infinity) is too large");

        let err = ArrayBuffer::new(2147483647.0).unwrap_err();
        assert_eq!(err.message(), "length parameter (2147483647) is too large");

        assert!(ArrayBuffer::new(f64::NAN).is_err());
    }

    #[test]
    fn test_zero_length_shares_canonical_allocation() {
        let a = ArrayBuffer::new(0.0).unwrap();
        let b = ArrayBuffer::empty();
        assert!(a.same_storage(&b));
        assert!(a.is_empty());
    }

    #[test]
    fn test_independent_allocations_do_not_alias() {
        let a = ArrayBuffer::new(4.0).unwrap();
        let b = ArrayBuffer::new(4.0).unwrap();
        assert!(!a.same_storage(&b));
        a.with_bytes_mut(|bytes| bytes[0] = 9);
        assert_eq!(b.to_vec(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = ArrayBuffer::new(2.0).unwrap();
        let b = a.clone();
        b.with_bytes_mut(|bytes| bytes[1] = 7);
        assert_eq!(a.to_vec(), vec![0, 7]);
    }

    #[test]
    fn test_slice_copies() {
        let buf = ArrayBuffer::from_bytes(vec![1, 2, 3, 4, 5]);
        let sliced = buf.slice(1.0, 4.0);
        assert_eq!(sliced.to_vec(), vec![2, 3, 4]);

        sliced.with_bytes_mut(|bytes| bytes[0] = 99);
        assert_eq!(buf.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_slice_clamping() {
        let buf = ArrayBuffer::from_bytes(vec![1, 2, 3, 4, 5]);
        assert_eq!(buf.slice(-2.0, 5.0).to_vec(), vec![4, 5]);
        assert_eq!(buf.slice(0.0, -1.0).to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(buf.slice(3.0, 1.0).to_vec(), Vec::<u8>::new());
        assert_eq!(buf.slice(-100.0, 100.0).to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(buf.slice(f64::NAN, 2.0).to_vec(), vec![1, 2]);
        assert_eq!(buf.slice(1.0, f64::NAN).to_vec(), Vec::<u8>::new());
    }

    #[test]
    fn test_slice_from_args_defaults() {
        let buf = ArrayBuffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(buf.slice_from_args(&[]).to_vec(), vec![1, 2, 3]);
        assert_eq!(buf.slice_from_args(&[Value::from(1)]).to_vec(), vec![2, 3]);
        assert!(!buf.slice_from_args(&[]).same_storage(&buf));
    }

    #[test]
    fn test_construct_defaults_to_empty() {
        assert_eq!(ArrayBuffer::construct(&[]).unwrap().byte_length(), 0);
        assert_eq!(
            ArrayBuffer::construct(&[Value::from("8")]).unwrap().byte_length(),
            8
        );
    }

    #[test]
    fn test_is_view() {
        let buf = ArrayBuffer::new(4.0).unwrap();
        assert!(!ArrayBuffer::is_view(&Value::from(buf)));
        assert!(!ArrayBuffer::is_view(&Value::from(1)));
    }
}
