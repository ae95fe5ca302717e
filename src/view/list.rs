//! Host Collection Adapter
//!
//! [`ElementList`] presents a typed view as a fixed-size ordered collection to host
//! code. It reads and writes the same storage as the script-facing [`TypedArray`]
//! accessors but reports out-of-range indices as [`CollectionError::IndexOutOfBounds`]
//! instead of returning `undefined`. Operations that would change the size are rejected
//! with [`CollectionError::Unsupported`] and never touch the storage.

use crate::error::{CollectionError, CollectionResult};
use crate::value::{Object, Value};
use crate::view::{Element, TypedArray};
use std::iter::FusedIterator;

/// Fixed-size list view over a [`TypedArray`].
#[derive(Clone, Debug)]
pub struct ElementList<E: Element> {
    array: TypedArray<E>,
}

impl<E: Element> ElementList<E> {
    pub fn new(array: TypedArray<E>) -> Self {
        Self { array }
    }

    pub fn typed_array(&self) -> &TypedArray<E> {
        &self.array
    }

    pub fn size(&self) -> usize {
        self.array.length()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn check_index(&self, index: i64) -> CollectionResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.size())
            .ok_or(CollectionError::IndexOutOfBounds {
                index,
                len: self.size(),
            })
    }

    pub fn get(&self, index: i64) -> CollectionResult<E> {
        let index = self.check_index(index)?;
        self.array
            .get_element(index)
            .ok_or(CollectionError::IndexOutOfBounds {
                index: index as i64,
                len: self.size(),
            })
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn set(&self, index: i64, value: E) -> CollectionResult<E> {
        let previous = self.get(index)?;
        self.array.set_element(index as usize, value);
        Ok(previous)
    }

    pub fn index_of(&self, value: &E) -> Option<usize> {
        self.iter().position(|e| e.boxed_eq(*value))
    }

    pub fn last_index_of(&self, value: &E) -> Option<usize> {
        self.iter().rposition(|e| e.boxed_eq(*value))
    }

    pub fn contains(&self, value: &E) -> bool {
        self.index_of(value).is_some()
    }

    pub fn contains_all<'a>(&self, values: impl IntoIterator<Item = &'a E>) -> bool {
        values.into_iter().all(|v| self.contains(v))
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.array.to_vec()
    }

    /// Element-wise equality against any value. Anything that is not a typed view of
    /// the same kind and length compares unequal.
    pub fn equals(&self, other: &Value) -> bool {
        match other {
            Value::Object(Object::TypedArray(any)) => E::unwrap(any)
                .is_some_and(|array| self.eq(&ElementList::new(array.clone()))),
            _ => false,
        }
    }

    /// Sum of the elements' boxed hashes, wrapping on overflow.
    pub fn hash_code(&self) -> i32 {
        self.iter()
            .fold(0i32, |hash, e| hash.wrapping_add(e.hash_code()))
    }

    pub fn iter(&self) -> Iter<'_, E> {
        Iter {
            array: &self.array,
            front: 0,
            back: self.size(),
        }
    }

    /// Bidirectional cursor positioned before the first element.
    pub fn list_iter(&self) -> ListCursor<'_, E> {
        ListCursor {
            list: self,
            cursor: 0,
            last: None,
        }
    }

    /// Bidirectional cursor positioned before element `start`.
    pub fn list_iter_at(&self, start: i64) -> CollectionResult<ListCursor<'_, E>> {
        let cursor = self.check_index(start)?;
        Ok(ListCursor {
            list: self,
            cursor,
            last: None,
        })
    }

    // ========================================================================
    // Size-changing operations
    // ========================================================================

    pub fn add(&self, _value: E) -> CollectionResult<bool> {
        Err(CollectionError::Unsupported("add"))
    }

    pub fn insert(&self, _index: i64, _value: E) -> CollectionResult<()> {
        Err(CollectionError::Unsupported("insert"))
    }

    pub fn add_all(&self, _values: &[E]) -> CollectionResult<bool> {
        Err(CollectionError::Unsupported("add_all"))
    }

    pub fn insert_all(&self, _index: i64, _values: &[E]) -> CollectionResult<bool> {
        Err(CollectionError::Unsupported("insert_all"))
    }

    pub fn remove_at(&self, _index: i64) -> CollectionResult<E> {
        Err(CollectionError::Unsupported("remove_at"))
    }

    pub fn remove(&self, _value: &E) -> CollectionResult<bool> {
        Err(CollectionError::Unsupported("remove"))
    }

    pub fn remove_all(&self, _values: &[E]) -> CollectionResult<bool> {
        Err(CollectionError::Unsupported("remove_all"))
    }

    pub fn retain_all(&self, _values: &[E]) -> CollectionResult<bool> {
        Err(CollectionError::Unsupported("retain_all"))
    }

    pub fn clear(&self) -> CollectionResult<()> {
        Err(CollectionError::Unsupported("clear"))
    }

    pub fn sub_list(&self, _from: i64, _to: i64) -> CollectionResult<ElementList<E>> {
        Err(CollectionError::Unsupported("sub_list"))
    }
}

/// Element-wise boxed equality: NaN elements are equal, `-0.0` differs from `0.0`.
/// Equal lists always have equal [`hash_code`](ElementList::hash_code)s.
impl<E: Element> PartialEq for ElementList<E> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size()
            && self.iter().zip(other.iter()).all(|(a, b)| a.boxed_eq(b))
    }
}

impl<'a, E: Element> IntoIterator for &'a ElementList<E> {
    type Item = E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward and backward iterator over a list's elements.
#[derive(Clone, Debug)]
pub struct Iter<'a, E: Element> {
    array: &'a TypedArray<E>,
    front: usize,
    back: usize,
}

impl<E: Element> Iterator for Iter<'_, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        if self.front >= self.back {
            return None;
        }
        let value = self.array.get_element(self.front);
        self.front += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<E: Element> DoubleEndedIterator for Iter<'_, E> {
    fn next_back(&mut self) -> Option<E> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.array.get_element(self.back)
    }
}

impl<E: Element> ExactSizeIterator for Iter<'_, E> {}

impl<E: Element> FusedIterator for Iter<'_, E> {}

/// Bidirectional cursor over an [`ElementList`].
///
/// The cursor sits between elements: `next` returns the element after it and advances,
/// `previous` steps back and returns the element it passed. `set` overwrites whichever
/// element was returned last.
#[derive(Debug)]
pub struct ListCursor<'a, E: Element> {
    list: &'a ElementList<E>,
    cursor: usize,
    last: Option<usize>,
}

impl<E: Element> ListCursor<'_, E> {
    pub fn has_next(&self) -> bool {
        self.cursor < self.list.size()
    }

    pub fn next(&mut self) -> CollectionResult<E> {
        if !self.has_next() {
            return Err(CollectionError::NoSuchElement);
        }
        let value = self.list.get(self.cursor as i64)?;
        self.last = Some(self.cursor);
        self.cursor += 1;
        Ok(value)
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn previous(&mut self) -> CollectionResult<E> {
        if !self.has_previous() {
            return Err(CollectionError::NoSuchElement);
        }
        self.cursor -= 1;
        self.last = Some(self.cursor);
        self.list.get(self.cursor as i64)
    }

    pub fn next_index(&self) -> usize {
        self.cursor
    }

    /// `None` when the cursor is before the first element.
    pub fn previous_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Overwrite the element most recently returned by `next` or `previous`.
    pub fn set(&mut self, value: E) -> CollectionResult<()> {
        let index = self.last.ok_or(CollectionError::IllegalState)?;
        self.list.set(index as i64, value).map(|_| ())
    }

    pub fn remove(&mut self) -> CollectionResult<()> {
        Err(CollectionError::Unsupported("remove"))
    }

    pub fn add(&mut self, _value: E) -> CollectionResult<()> {
        Err(CollectionError::Unsupported("add"))
    }
}
