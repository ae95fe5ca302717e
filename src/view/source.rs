//! Construction and bulk-set sources.

use crate::buffer::ArrayBuffer;
use crate::error::{ViewError, ViewResult};
use crate::value::{arg, Object, Value};
use crate::view::AnyTypedArray;

/// The five ways a typed view can be constructed, selected by the first argument.
#[derive(Debug, Clone, Copy)]
pub enum ViewSource<'a> {
    /// No argument, `undefined` or `null`: an empty view over a zero-length buffer
    Empty,
    /// A number or numeric string: a fresh zero-filled buffer of that many elements
    Length(&'a Value),
    /// Another typed view: a fresh buffer, element values converted one by one
    TypedArray(&'a AnyTypedArray),
    /// An existing buffer, shared without copying
    Buffer {
        buffer: &'a ArrayBuffer,
        byte_offset: Option<&'a Value>,
        length: Option<&'a Value>,
    },
    /// A script array: a fresh buffer, values converted positionally
    ArrayLike(&'a [Value]),
}

impl<'a> ViewSource<'a> {
    /// Classify constructor arguments. Anything that is none of the five forms is an
    /// "invalid argument" error.
    pub fn from_args(args: &'a [Value]) -> ViewResult<Self> {
        let first = match arg(args, 0) {
            None | Some(Value::Null) => return Ok(ViewSource::Empty),
            Some(first) => first,
        };
        match first {
            Value::Number(_) | Value::String(_) => Ok(ViewSource::Length(first)),
            Value::Object(Object::TypedArray(array)) => Ok(ViewSource::TypedArray(array)),
            Value::Object(Object::ArrayBuffer(buffer)) => Ok(ViewSource::Buffer {
                buffer,
                byte_offset: arg(args, 1),
                length: arg(args, 2),
            }),
            Value::Object(Object::Array(items)) => Ok(ViewSource::ArrayLike(items)),
            _ => Err(ViewError::invalid_argument("invalid argument")),
        }
    }
}

/// Source of a bulk `set`.
#[derive(Debug, Clone, Copy)]
pub enum SetSource<'a> {
    TypedArray(&'a AnyTypedArray),
    Array(&'a [Value]),
    /// Any other object. Setting from one changes nothing.
    Other,
}

impl<'a> SetSource<'a> {
    /// `None` for primitives, which are not bulk sources at all.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(Object::TypedArray(array)) => Some(SetSource::TypedArray(array)),
            Value::Object(Object::Array(items)) => Some(SetSource::Array(items)),
            Value::Object(_) => Some(SetSource::Other),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SetSource::TypedArray(array) => array.length(),
            SetSource::Array(items) => items.len(),
            SetSource::Other => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::TypedArray;

    #[test]
    fn test_empty_forms() {
        assert!(matches!(ViewSource::from_args(&[]), Ok(ViewSource::Empty)));
        assert!(matches!(
            ViewSource::from_args(&[Value::Undefined]),
            Ok(ViewSource::Empty)
        ));
        assert!(matches!(
            ViewSource::from_args(&[Value::Null]),
            Ok(ViewSource::Empty)
        ));
    }

    #[test]
    fn test_length_forms() {
        assert!(matches!(
            ViewSource::from_args(&[Value::from(4)]),
            Ok(ViewSource::Length(_))
        ));
        assert!(matches!(
            ViewSource::from_args(&[Value::from("4")]),
            Ok(ViewSource::Length(_))
        ));
    }

    #[test]
    fn test_buffer_form_collects_optional_args() {
        let args = vec![
            Value::from(ArrayBuffer::new(8.0).unwrap()),
            Value::Undefined,
            Value::from(1),
        ];
        match ViewSource::from_args(&args).unwrap() {
            ViewSource::Buffer {
                byte_offset,
                length,
                ..
            } => {
                assert!(byte_offset.is_none());
                assert_eq!(length, Some(&Value::from(1)));
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_rejected_forms() {
        for value in [
            Value::Boolean(true),
            Value::Object(Object::Plain),
            Value::from(crate::view::DataView::new(&ArrayBuffer::empty(), None, None).unwrap()),
        ] {
            let err = ViewSource::from_args(std::slice::from_ref(&value)).unwrap_err();
            assert_eq!(err, ViewError::InvalidArgument("invalid argument".into()));
        }
    }

    #[test]
    fn test_set_source_classification() {
        let typed = Value::from(TypedArray::<u8>::new(3).unwrap());
        assert_eq!(SetSource::from_value(&typed).map(|s| s.len()), Some(3));

        let array = Value::from(vec![Value::from(1), Value::from(2)]);
        assert!(matches!(
            SetSource::from_value(&array),
            Some(SetSource::Array(items)) if items.len() == 2
        ));

        let plain = Value::Object(Object::Plain);
        assert!(matches!(SetSource::from_value(&plain), Some(SetSource::Other)));
        assert!(SetSource::from_value(&Value::from(1)).is_none());
    }
}
