//! Values accepted by [`Cache::store`](super::Cache::store).
//!
//! A [`Value`] is serialized to bytes before it reaches the store, so a
//! later `retrieve` returns the byte form, not the variant. The typed
//! decoders at the bottom of this module turn those bytes back into Rust
//! values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// A storable value.
///
/// Serializes as a tagged JSON object (`{"type":"text","value":"foo"}`), which
/// is the format used for call history entries. Byte payloads are carried as
/// standard base64; non-finite floats as the strings `inf`, `-inf` and `nan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Text(String),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    Integer(i64),
    Float(#[serde(with = "float_text")] f64),
}

impl Value {
    /// Byte encoding written to the store.
    ///
    /// Text is UTF-8, bytes pass through, numbers are rendered as decimal
    /// text so that `retrieve_integer` / `retrieve_float` can parse them.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Text(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
            Value::Integer(n) => n.to_string().into_bytes(),
            Value::Float(f) => format_float(*f).into_bytes(),
        }
    }

    /// Literal rendering used inside replayed argument tuples.
    ///
    /// Text is single-quoted, bytes use a `b'..'` literal. Control characters
    /// and non-printable bytes are written as `\xNN` escapes.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('\'');
                for c in s.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("\\'"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
                        c => out.push(c),
                    }
                }
                out.push('\'');
                out
            }
            Value::Bytes(b) => {
                let mut out = String::with_capacity(b.len() + 3);
                out.push_str("b'");
                for &byte in b {
                    match byte {
                        b'\\' => out.push_str("\\\\"),
                        b'\'' => out.push_str("\\'"),
                        b'\n' => out.push_str("\\n"),
                        b'\r' => out.push_str("\\r"),
                        b'\t' => out.push_str("\\t"),
                        0x20..=0x7e => out.push(byte as char),
                        other => out.push_str(&format!("\\x{:02x}", other)),
                    }
                }
                out.push('\'');
                out
            }
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
        }
    }
}

/// Text renders bare; every other kind renders as its [`repr`](Value::repr).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            other => f.write_str(&other.repr()),
        }
    }
}

/// Render positional arguments as a tuple literal: `()`, `('foo',)`, `(1, 2)`.
pub fn render_args(args: &[Value]) -> String {
    match args {
        [] => "()".to_string(),
        [single] => format!("({},)", single.repr()),
        many => {
            let parts: Vec<String> = many.iter().map(Value::repr).collect();
            format!("({})", parts.join(", "))
        }
    }
}

/// Shortest round-trip decimal, laid out like Python's `repr(float)`:
/// positional for exponents in `-4..16` (always with a fractional part),
/// scientific with a signed two-digit exponent otherwise.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    } else if f == f64::INFINITY {
        return "inf".to_string();
    } else if f == f64::NEG_INFINITY {
        return "-inf".to_string();
    }

    // `{:e}` yields the shortest digits, e.g. "-1.25e3".
    let sci = format!("{:e}", f);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => (mantissa, exp),
            Err(_) => return sci,
        },
        None => return sci,
    };

    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.abs());
    }

    let (sign, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = unsigned.chars().filter(|c| *c != '.').collect();

    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        return format!("{sign}0.{zeros}{digits}");
    }

    let point = exp as usize + 1;
    if digits.len() <= point {
        let zeros = "0".repeat(point - digits.len());
        format!("{sign}{digits}{zeros}.0")
    } else {
        format!("{sign}{}.{}", &digits[..point], &digits[point..])
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

// =============================================================================
// Decoders
// =============================================================================

/// Decode stored bytes as UTF-8 text.
pub fn decode_text(bytes: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(bytes)?)
}

/// Decode stored bytes as a base-10 integer.
pub fn decode_integer(bytes: Vec<u8>) -> Result<i64> {
    let text = std::str::from_utf8(&bytes).map_err(|e| CacheError::format(&bytes, e))?;
    text.trim()
        .parse::<i64>()
        .map_err(|e| CacheError::format(&bytes, e))
}

/// Decode stored bytes as a floating-point number.
pub fn decode_float(bytes: Vec<u8>) -> Result<f64> {
    let text = std::str::from_utf8(&bytes).map_err(|e| CacheError::format(&bytes, e))?;
    text.trim()
        .parse::<f64>()
        .map_err(|e| CacheError::format(&bytes, e))
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Finite floats stay JSON numbers. JSON has no literal for the non-finite
/// ones, so those travel as their text form.
mod float_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&super::format_float(*value))
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text.parse::<f64>().map_err(serde::de::Error::custom),
        }
    }
}
