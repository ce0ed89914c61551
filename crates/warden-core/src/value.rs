//! Result values and their transport normalisation
//!
//! Drivers hand back whatever the engine produced, including raw byte
//! strings and lazily read large objects. [`Value::normalize`] turns all of
//! them into plain scalars or text so a result grid can be serialised as-is.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Failure while reading a large object's content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("LOB read failed: {0}")]
pub struct LobReadError(pub String);

/// Content of a large object after reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobData {
    Text(String),
    Binary(Vec<u8>),
}

/// Lazily readable large object handed back by a driver
pub trait LobSource: Send + Sync {
    fn read_all(&self) -> Result<LobData, LobReadError>;
}

/// Handle to a large object that has not been read yet
#[derive(Clone)]
pub struct Lob(Arc<dyn LobSource>);

impl Lob {
    pub fn new(source: impl LobSource + 'static) -> Self {
        Self(Arc::new(source))
    }

    pub fn read(&self) -> Result<LobData, LobReadError> {
        self.0.read_all()
    }
}

impl fmt::Debug for Lob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lob(..)")
    }
}

impl PartialEq for Lob {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A single cell of a result grid
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Lob(Lob),
}

impl Value {
    /// Convert to a transport-safe value.
    ///
    /// - large objects are read in full; text content becomes text and
    ///   binary content follows the byte rule below
    /// - byte strings become text when they are valid UTF-8 and uppercase
    ///   hexadecimal otherwise
    /// - a large object that cannot be read becomes a short placeholder
    ///   string instead of failing the row
    ///
    /// Everything else is returned unchanged. The result never contains
    /// `Bytes` or `Lob`, so normalising twice is the same as once.
    pub fn normalize(self) -> Value {
        match self {
            Value::Bytes(bytes) => bytes_to_text(bytes),
            Value::Lob(lob) => match lob.read() {
                Ok(LobData::Text(text)) => Value::Text(text),
                Ok(LobData::Binary(bytes)) => bytes_to_text(bytes),
                Err(e) => {
                    warn!(error = %e, "Could not read LOB value");
                    Value::Text(format!("<{e}>"))
                }
            },
            other => other,
        }
    }

    /// True for values that [`normalize`](Self::normalize) leaves alone
    pub fn is_transport_safe(&self) -> bool {
        !matches!(self, Value::Bytes(_) | Value::Lob(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of the value, parsing text and truncating floats
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Text view of the value; `None` for nulls and unread binary data
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Free-function form of [`Value::normalize`]
pub fn normalize(value: Value) -> Value {
    value.normalize()
}

fn bytes_to_text(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(text) => Value::Text(text),
        Err(e) => Value::Text(hex::encode_upper(e.into_bytes())),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&hex::encode_upper(b)),
            Value::Lob(_) => f.write_str("<LOB>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&hex::encode_upper(b)),
            Value::Lob(_) => serializer.serialize_str("<LOB>"),
        }
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FixedLob(Result<LobData, LobReadError>);

    impl LobSource for FixedLob {
        fn read_all(&self) -> Result<LobData, LobReadError> {
            self.0.clone()
        }
    }

    #[test]
    fn utf8_bytes_become_text() {
        assert_eq!(
            Value::Bytes(b"ORCL".to_vec()).normalize(),
            Value::Text("ORCL".into())
        );
    }

    #[test]
    fn binary_bytes_become_upper_hex() {
        assert_eq!(
            Value::Bytes(vec![0x00, 0xC0, 0xFF, 0x1A]).normalize(),
            Value::Text("00C0FF1A".into())
        );
    }

    #[test]
    fn character_lob_is_read() {
        let lob = Lob::new(FixedLob(Ok(LobData::Text("long plan text".into()))));
        assert_eq!(Value::Lob(lob).normalize(), Value::Text("long plan text".into()));
    }

    #[test]
    fn binary_lob_follows_byte_rule() {
        let lob = Lob::new(FixedLob(Ok(LobData::Binary(vec![0xDE, 0xAD, 0xBE, 0xEF]))));
        assert_eq!(Value::Lob(lob).normalize(), Value::Text("DEADBEEF".into()));
    }

    #[test]
    fn unreadable_lob_becomes_placeholder() {
        let lob = Lob::new(FixedLob(Err(LobReadError("ORA-22922".into()))));
        match Value::Lob(lob).normalize() {
            Value::Text(text) => assert!(text.contains("ORA-22922"), "{text}"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn scalars_pass_through() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Integer(-7),
            Value::Float(2.5),
            Value::Text("x".into()),
        ] {
            assert_eq!(value.clone().normalize(), value);
        }
    }

    #[test]
    fn serializes_as_plain_json() {
        let row = vec![Value::Null, Value::Integer(3), Value::Text("a".into())];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[null,3,"a"]"#);
    }

    fn any_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            ".{0,16}".prop_map(Value::Text),
            prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
            prop::collection::vec(any::<u8>(), 0..16)
                .prop_map(|b| Value::Lob(Lob::new(FixedLob(Ok(LobData::Binary(b)))))),
        ]
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(value in any_value()) {
            let once = value.normalize();
            prop_assert!(once.is_transport_safe());
            prop_assert_eq!(once.clone().normalize(), once);
        }
    }
}
