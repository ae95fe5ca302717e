//! Host collection contract for every element kind
//!
//! Each kind runs the same two-element scenario: bounds errors, rejected size changes,
//! searching, iteration and cursor writes.

use bufview::{
    ArrayBuffer, CollectionError, Element, ElementList, TypedArray, U8Clamped, Value, F16,
};

fn two_list<E: Element>(a: E, b: E, bogus: E) {
    let list = TypedArray::<E>::new(2).unwrap().to_list();

    assert_eq!(list.size(), 2);
    assert!(!list.is_empty());
    list.set(0, a).unwrap();
    assert_eq!(list.get(0), Ok(a));
    list.set(1, b).unwrap();
    assert_eq!(list.get(1), Ok(b));

    assert!(matches!(
        list.get(3),
        Err(CollectionError::IndexOutOfBounds { index: 3, len: 2 })
    ));
    assert!(matches!(
        list.set(-1, a),
        Err(CollectionError::IndexOutOfBounds { index: -1, .. })
    ));

    assert_eq!(list.add(a), Err(CollectionError::Unsupported("add")));
    assert_eq!(list.remove_at(0), Err(CollectionError::Unsupported("remove_at")));
    assert_eq!(list.remove(&a), Err(CollectionError::Unsupported("remove")));
    assert!(list.remove_all(&[a, b]).is_err());
    assert!(list.retain_all(&[a, b]).is_err());
    assert!(list.insert(0, a).is_err());
    assert!(list.add_all(&[]).is_err());
    assert!(list.insert_all(0, &[]).is_err());
    assert!(list.sub_list(0, 1).is_err());
    assert!(list.clear().is_err());
    assert_eq!(list.to_vec(), vec![a, b]);

    assert!(list.contains(&a));
    assert!(!list.contains(&bogus));
    assert!(list.contains_all(&[a, b]));
    assert!(!list.contains_all(&[a, b, bogus]));
    assert_eq!(list.index_of(&a), Some(0));
    assert_eq!(list.index_of(&b), Some(1));
    assert_eq!(list.index_of(&bogus), None);
    assert_eq!(list.last_index_of(&a), Some(0));
    assert_eq!(list.last_index_of(&b), Some(1));
    assert_eq!(list.last_index_of(&bogus), None);

    let mut iter = list.iter();
    assert_eq!(iter.next(), Some(a));
    assert_eq!(iter.next(), Some(b));
    assert_eq!(iter.next(), None);

    let mut cursor = list.list_iter();
    assert!(cursor.has_next());
    assert!(!cursor.has_previous());
    assert_eq!(cursor.next_index(), 0);
    assert_eq!(cursor.previous_index(), None);
    assert_eq!(cursor.next(), Ok(a));
    assert_eq!(cursor.next(), Ok(b));
    assert!(cursor.has_previous());
    assert!(!cursor.has_next());
    assert_eq!(cursor.next_index(), 2);
    assert_eq!(cursor.previous_index(), Some(1));
    assert_eq!(cursor.previous(), Ok(b));
    assert_eq!(cursor.previous(), Ok(a));

    let mut from_one = list.list_iter_at(1).unwrap();
    assert!(from_one.has_next());
    assert!(from_one.has_previous());
    assert_eq!(from_one.next(), Ok(b));
    assert!(!from_one.has_next());
    assert_eq!(from_one.previous(), Ok(b));
    assert_eq!(from_one.previous(), Ok(a));

    let mut writer = list.list_iter();
    assert_eq!(writer.set(bogus), Err(CollectionError::IllegalState));
    assert_eq!(writer.next(), Ok(a));
    writer.set(bogus).unwrap();
    assert_eq!(list.get(0), Ok(bogus));
    assert_eq!(writer.next(), Ok(b));
    assert_eq!(writer.previous(), Ok(b));
    writer.set(bogus).unwrap();
    assert_eq!(list.get(1), Ok(bogus));
    assert_eq!(writer.previous(), Ok(bogus));

    assert_eq!(writer.remove(), Err(CollectionError::Unsupported("remove")));
    assert_eq!(writer.add(bogus), Err(CollectionError::Unsupported("add")));
}

// ============================================================================
// Per-kind contract
// ============================================================================

#[test]
fn test_int8_list() {
    two_list::<i8>(1, 2, 3);
}

#[test]
fn test_uint8_list() {
    two_list::<u8>(1, 2, 3);
}

#[test]
fn test_uint8_clamped_list() {
    two_list(U8Clamped(1), U8Clamped(2), U8Clamped(3));
}

#[test]
fn test_int16_list() {
    two_list::<i16>(1, 2, 3);
}

#[test]
fn test_uint16_list() {
    two_list::<u16>(1, 2, 3);
}

#[test]
fn test_int32_list() {
    two_list::<i32>(1, 2, 3);
}

#[test]
fn test_uint32_list() {
    two_list::<u32>(1, 2, 3);
}

#[test]
fn test_float16_list() {
    two_list(F16::from_f64(1.0), F16::from_f64(2.0), F16::from_f64(3.0));
}

#[test]
fn test_float32_list() {
    two_list::<f32>(1.0, 2.0, 3.0);
}

#[test]
fn test_float64_list() {
    two_list::<f64>(1.0, 2.0, 3.0);
}

// ============================================================================
// Equality and hashing
// ============================================================================

fn int8_pair(first: i8, second: i8) -> ElementList<i8> {
    let list = TypedArray::<i8>::from_buffer(&ArrayBuffer::new(2.0).unwrap(), 0, Some(2))
        .unwrap()
        .to_list();
    list.set(0, first).unwrap();
    list.set(1, second).unwrap();
    list
}

#[test]
fn test_int8_equals() {
    let list = int8_pair(3, 4);
    let same = int8_pair(3, 4);
    assert_eq!(list, same);
    assert!(list.equals(&Value::from(same.typed_array().clone())));
    assert_eq!(list.hash_code(), same.hash_code());
    assert_eq!(list.hash_code(), 7);
    assert!(!list.equals(&Value::from(3)));

    let swapped = int8_pair(4, 3);
    assert_ne!(list, swapped);
    assert!(!list.equals(&Value::from(swapped.typed_array().clone())));
    // sums collide regardless of order
    assert_eq!(list.hash_code(), swapped.hash_code());
}

#[test]
fn test_equals_rejects_other_kinds_and_lengths() {
    let list = int8_pair(1, 2);
    let unsigned = TypedArray::<u8>::from_values(&[Value::from(1), Value::from(2)]).unwrap();
    assert!(!list.equals(&Value::from(unsigned)));

    let longer = TypedArray::<i8>::from_values(&[Value::from(1), Value::from(2), Value::from(0)])
        .unwrap();
    assert!(!list.equals(&Value::from(longer)));
    assert!(!list.equals(&Value::from(vec![Value::from(1), Value::from(2)])));
}

#[test]
fn test_float_hashes_follow_boxed_rules() {
    let list = TypedArray::<f64>::from_values(&[Value::from(1.0), Value::from(f64::NAN)])
        .unwrap()
        .to_list();
    let expected = 0x3ff0_0000i32.wrapping_add(0x7ff8_0000);
    assert_eq!(list.hash_code(), expected);
}
