//! Buffer Views
//!
//! Every view describes a byte window `[byte_offset, byte_offset + byte_length)` over a
//! shared [`ArrayBuffer`]. Views never own the buffer: dropping one leaves the buffer
//! and its sibling views intact, and a write through any view is observed by every
//! other view overlapping the same bytes.
//!
//! ```text
//!  ArrayBuffer  [ 00 01 02 03 04 05 06 07 ]
//!  Int32Array   [ ---- 0 ---- ---- 1 ---- ]   offset 0, length 2
//!  Int16Array               [ -2- -3- ]        offset 4, length 2
//!  DataView           [ any width, any position, per-call byte order ]
//! ```
//!
//! Typed views come in two flavours: the statically-typed [`TypedArray<E>`] and the
//! kind-erased [`AnyTypedArray`] a script value carries.

mod any;
mod data_view;
mod element;
mod list;
mod properties;
mod source;
mod typed_array;

pub use any::AnyTypedArray;
pub use data_view::DataView;
pub use element::{Element, ElementKind, F16, U8Clamped};
pub use list::{ElementList, Iter, ListCursor};
pub use properties::canonical_numeric_index;
pub use source::{SetSource, ViewSource};
pub use typed_array::TypedArray;

use crate::buffer::ArrayBuffer;
use crate::error::{ViewError, ViewResult};

/// The byte window a view covers.
#[derive(Clone, Debug)]
pub struct ViewRegion {
    buffer: ArrayBuffer,
    byte_offset: usize,
    byte_length: usize,
}

impl ViewRegion {
    /// Validate `byte_offset + byte_length <= buffer.byte_length()`.
    pub fn new(buffer: ArrayBuffer, byte_offset: usize, byte_length: usize) -> ViewResult<Self> {
        let fits = byte_offset
            .checked_add(byte_length)
            .is_some_and(|end| end <= buffer.byte_length());
        if !fits {
            return Err(ViewError::range("offset/length out of range"));
        }
        Ok(Self {
            buffer,
            byte_offset,
            byte_length,
        })
    }

    pub fn buffer(&self) -> &ArrayBuffer {
        &self.buffer
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Same buffer, same window.
    pub fn same_region(&self, other: &ViewRegion) -> bool {
        self.buffer.same_storage(&other.buffer)
            && self.byte_offset == other.byte_offset
            && self.byte_length == other.byte_length
    }

    /// Run `f` over this window's bytes.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let range = self.byte_offset..self.byte_offset + self.byte_length;
        self.buffer.with_bytes(|bytes| f(&bytes[range]))
    }

    /// Run `f` over this window's bytes, mutably.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let range = self.byte_offset..self.byte_offset + self.byte_length;
        self.buffer.with_bytes_mut(|bytes| f(&mut bytes[range]))
    }
}

/// Read-only metadata shared by typed views and DataViews.
pub trait ArrayBufferView {
    fn region(&self) -> &ViewRegion;

    fn buffer(&self) -> &ArrayBuffer {
        self.region().buffer()
    }

    fn byte_offset(&self) -> usize {
        self.region().byte_offset()
    }

    fn byte_length(&self) -> usize {
        self.region().byte_length()
    }
}
