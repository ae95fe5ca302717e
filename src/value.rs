//! Script Values
//!
//! The slice of the engine's value model this crate needs: the primitive values a
//! script can hand to a view, the objects that select a construction form, and the
//! `ToNumber`/`ToInt32`/`ToUint32`/`ToBoolean` primitives the numeric conversions
//! build on.

use crate::buffer::ArrayBuffer;
use crate::view::{AnyTypedArray, DataView, Element, TypedArray};

const TWO_32: f64 = 4_294_967_296.0;

/// A script value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The "undefined" sentinel
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(Object),
}

/// Objects that buffers and views recognize.
#[derive(Debug, Clone)]
pub enum Object {
    ArrayBuffer(ArrayBuffer),
    TypedArray(AnyTypedArray),
    DataView(DataView),
    /// A script array, passed by value
    Array(Vec<Value>),
    /// Any other object
    Plain,
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Number payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// ToNumber.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Object(Object::Array(items)) => string_to_number(&join_array(items)),
            Value::Object(_) => f64::NAN,
        }
    }

    /// ToInt32.
    pub fn to_int32(&self) -> i32 {
        number_to_int32(self.to_number())
    }

    /// ToUint32.
    pub fn to_uint32(&self) -> u32 {
        number_to_uint32(self.to_number())
    }

    /// ToBoolean.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !(*n == 0.0 || n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }
}

/// Arguments at `index` that are present and not undefined.
pub(crate) fn arg(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index).filter(|v| !v.is_undefined())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Object {
    /// Identity for buffers and views, element-wise for arrays.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::ArrayBuffer(a), Object::ArrayBuffer(b)) => a.same_storage(b),
            (Object::TypedArray(a), Object::TypedArray(b)) => a.same_view(b),
            (Object::DataView(a), Object::DataView(b)) => a.same_view(b),
            (Object::Array(a), Object::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ArrayBuffer> for Value {
    fn from(buffer: ArrayBuffer) -> Self {
        Value::Object(Object::ArrayBuffer(buffer))
    }
}

impl From<AnyTypedArray> for Value {
    fn from(array: AnyTypedArray) -> Self {
        Value::Object(Object::TypedArray(array))
    }
}

impl<E: Element> From<TypedArray<E>> for Value {
    fn from(array: TypedArray<E>) -> Self {
        Value::Object(Object::TypedArray(E::wrap(array)))
    }
}

impl From<DataView> for Value {
    fn from(view: DataView) -> Self {
        Value::Object(Object::DataView(view))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Object(Object::Array(items))
    }
}

/// ToInt32 on a number: truncate, reduce modulo 2^32, remap into the signed range.
pub fn number_to_int32(n: f64) -> i32 {
    number_to_uint32(n) as i32
}

/// ToUint32 on a number: truncate and reduce modulo 2^32.
pub fn number_to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let m = n.trunc() % TWO_32;
    let m = if m < 0.0 { m + TWO_32 } else { m };
    m as u32
}

fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// StringToNumber.
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        return parse_radix(&s[2..], radix);
    }

    // Rust also accepts "inf"/"nan"; scripts only accept plain decimal literals here.
    let decimal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal || !s.chars().any(|c| c.is_ascii_digit()) {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    value
}

/// Number::toString for radix 10.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, e.g. "1.2345e3"
    let sci = format!("{:e}", n.abs());
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return format!("{}{}", sign, sci),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int_part, frac_part) = digits.split_at(point as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let exp = point - 1;
        let exp_sign = if exp < 0 { "-" } else { "+" };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, exp_sign, exp.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, exp_sign, exp.abs())
        }
    };
    format!("{}{}", sign, body)
}

/// ToString for the values arrays can hold when joined.
pub(crate) fn value_to_join_string(value: &Value) -> String {
    match value {
        Value::Undefined | Value::Null => String::new(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::String(s) => s.clone(),
        Value::Object(Object::Array(items)) => join_array(items),
        Value::Object(Object::TypedArray(array)) => array.join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn join_array(items: &[Value]) -> String {
    items
        .iter()
        .map(value_to_join_string)
        .collect::<Vec<_>>()
        .join(",")
}
