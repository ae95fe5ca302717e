//! Bufview - Shared Byte Buffers with Typed and Data Views
//!
//! The binary-buffer memory model a script engine exposes to scripts: one fixed-length,
//! zero-initialized byte region shared by any number of differently-typed views, with
//! every value crossing between the script number domain and fixed-width storage going
//! through the exact truncation, wrapping and clamping rules scripts expect.
//!
//! # Features
//!
//! - **Shared storage**: views alias their buffer; a write through one is seen by all
//! - **Ten element kinds**: Int8 through Float64, plus Uint8Clamped and Float16
//! - **Explicit byte order**: typed views use a configured order, DataView picks per call
//! - **Overlap-safe bulk copies**: `set` between views of one buffer goes through scratch space
//! - **Two failure contracts**: script access yields `undefined`, host collection access errors
//!
//! # Example
//!
//! ```rust
//! use bufview::{ArrayBuffer, ArrayBufferView, DataView, TypedArray, Value};
//!
//! let buffer = ArrayBuffer::new(8.0).unwrap();
//! let words = TypedArray::<i16>::from_buffer(&buffer, 0, None).unwrap();
//! words.set(0, &Value::from(70000));
//! assert_eq!(words.get(0), Value::from(4464));
//!
//! let view = DataView::new(&buffer, None, None).unwrap();
//! assert_eq!(view.get_uint8(1).unwrap(), 0x70);
//! assert_eq!(words.get(4), Value::Undefined);
//! assert_eq!(view.byte_length(), 8);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │  Value / ViewSource / SetSource           │  script arguments
//! └─────────────────────┬─────────────────────┘
//!                       │
//!       ┌───────────────┼────────────────┐
//!       ▼               ▼                ▼
//! ┌───────────┐  ┌─────────────┐  ┌────────────┐
//! │TypedArray │  │ElementList  │  │  DataView  │
//! │   <E>     │──│(host list)  │  │            │
//! └─────┬─────┘  └─────────────┘  └─────┬──────┘
//!       │   conversions    codec        │
//!       └───────────────┬───────────────┘
//!                       ▼
//! ┌───────────────────────────────────────────┐
//! │  ArrayBuffer (Arc<RwLock<[u8]>>)          │
//! └───────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]

pub mod buffer;
pub mod codec;
pub mod config;
pub mod conversions;
pub mod error;
pub mod value;
pub mod view;

pub use buffer::ArrayBuffer;
pub use config::{BufferConfig, ConfigError, ConfigResult};
pub use error::{CollectionError, CollectionResult, ViewError, ViewResult};
pub use value::{Object, Value};
pub use view::{
    canonical_numeric_index, AnyTypedArray, ArrayBufferView, DataView, Element, ElementKind,
    ElementList, ListCursor, SetSource, TypedArray, ViewRegion, ViewSource, F16, U8Clamped,
};
