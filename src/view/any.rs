//! Kind-erased typed views, as carried by script values.

use crate::error::ViewResult;
use crate::value::Value;
use crate::view::{
    ArrayBufferView, Element, ElementKind, TypedArray, ViewRegion, F16, U8Clamped,
};

/// A typed view of any element kind.
#[derive(Clone, Debug)]
pub enum AnyTypedArray {
    Int8(TypedArray<i8>),
    Uint8(TypedArray<u8>),
    Uint8Clamped(TypedArray<U8Clamped>),
    Int16(TypedArray<i16>),
    Uint16(TypedArray<u16>),
    Int32(TypedArray<i32>),
    Uint32(TypedArray<u32>),
    Float16(TypedArray<F16>),
    Float32(TypedArray<f32>),
    Float64(TypedArray<f64>),
}

macro_rules! dispatch {
    ($self:expr, $array:ident => $body:expr) => {
        match $self {
            $crate::view::AnyTypedArray::Int8($array) => $body,
            $crate::view::AnyTypedArray::Uint8($array) => $body,
            $crate::view::AnyTypedArray::Uint8Clamped($array) => $body,
            $crate::view::AnyTypedArray::Int16($array) => $body,
            $crate::view::AnyTypedArray::Uint16($array) => $body,
            $crate::view::AnyTypedArray::Int32($array) => $body,
            $crate::view::AnyTypedArray::Uint32($array) => $body,
            $crate::view::AnyTypedArray::Float16($array) => $body,
            $crate::view::AnyTypedArray::Float32($array) => $body,
            $crate::view::AnyTypedArray::Float64($array) => $body,
        }
    };
}

pub(crate) use dispatch;

macro_rules! for_kind {
    ($kind:expr, $ty:ident => $body:expr) => {
        match $kind {
            ElementKind::Int8 => { type $ty = i8; $body }
            ElementKind::Uint8 => { type $ty = u8; $body }
            ElementKind::Uint8Clamped => { type $ty = U8Clamped; $body }
            ElementKind::Int16 => { type $ty = i16; $body }
            ElementKind::Uint16 => { type $ty = u16; $body }
            ElementKind::Int32 => { type $ty = i32; $body }
            ElementKind::Uint32 => { type $ty = u32; $body }
            ElementKind::Float16 => { type $ty = F16; $body }
            ElementKind::Float32 => { type $ty = f32; $body }
            ElementKind::Float64 => { type $ty = f64; $body }
        }
    };
}

impl AnyTypedArray {
    /// Script constructor for the given kind.
    pub fn construct(kind: ElementKind, args: &[Value]) -> ViewResult<Self> {
        for_kind!(kind, T => TypedArray::<T>::construct_from_args(args).map(Self::from))
    }

    /// Script constructor looked up by class name, e.g. `"Float32Array"`.
    pub fn construct_named(class_name: &str, args: &[Value]) -> Option<ViewResult<Self>> {
        ElementKind::from_class_name(class_name).map(|kind| Self::construct(kind, args))
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            AnyTypedArray::Int8(_) => ElementKind::Int8,
            AnyTypedArray::Uint8(_) => ElementKind::Uint8,
            AnyTypedArray::Uint8Clamped(_) => ElementKind::Uint8Clamped,
            AnyTypedArray::Int16(_) => ElementKind::Int16,
            AnyTypedArray::Uint16(_) => ElementKind::Uint16,
            AnyTypedArray::Int32(_) => ElementKind::Int32,
            AnyTypedArray::Uint32(_) => ElementKind::Uint32,
            AnyTypedArray::Float16(_) => ElementKind::Float16,
            AnyTypedArray::Float32(_) => ElementKind::Float32,
            AnyTypedArray::Float64(_) => ElementKind::Float64,
        }
    }

    pub fn bytes_per_element(&self) -> usize {
        self.kind().bytes_per_element()
    }

    pub fn length(&self) -> usize {
        dispatch!(self, a => a.length())
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn get(&self, index: i64) -> Value {
        dispatch!(self, a => a.get(index))
    }

    pub fn set(&self, index: i64, value: &Value) {
        dispatch!(self, a => a.set(index, value))
    }

    pub fn at(&self, relative_index: f64) -> Value {
        dispatch!(self, a => a.at(relative_index))
    }

    pub fn has(&self, index: i64) -> bool {
        dispatch!(self, a => a.has(index))
    }

    pub fn join(&self, separator: &str) -> String {
        dispatch!(self, a => a.join(separator))
    }

    pub fn to_display_string(&self) -> String {
        self.join(",")
    }

    pub fn set_from_args(&self, args: &[Value]) -> ViewResult<()> {
        dispatch!(self, a => a.set_from_args(args))
    }

    /// Aliasing view of the same kind.
    pub fn subarray(&self, start: i64, end: i64) -> ViewResult<Self> {
        dispatch!(self, a => a.subarray(start, end).map(Self::from))
    }

    pub fn subarray_from_args(&self, args: &[Value]) -> ViewResult<Self> {
        dispatch!(self, a => a.subarray_from_args(args).map(Self::from))
    }

    /// Same kind over the same window.
    pub fn same_view(&self, other: &AnyTypedArray) -> bool {
        self.kind() == other.kind() && self.region().same_region(other.region())
    }

    /// The statically-typed view, if this one holds `E`.
    pub fn downcast<E: Element>(&self) -> Option<&TypedArray<E>> {
        E::unwrap(self)
    }
}

impl ArrayBufferView for AnyTypedArray {
    fn region(&self) -> &ViewRegion {
        dispatch!(self, a => a.region())
    }
}

impl<E: Element> From<TypedArray<E>> for AnyTypedArray {
    fn from(array: TypedArray<E>) -> Self {
        E::wrap(array)
    }
}
