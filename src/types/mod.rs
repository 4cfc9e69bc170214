//! Typed values stored in composite keys

mod sql_type;

pub use sql_type::{SqlType, NO_ARGUMENT};

use crate::{Result, StorageError};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Capability a value must provide to live inside a [`CompositeKey`](crate::CompositeKey)
///
/// Implementations must keep `type_tag`, `type_argument` and `as_bytes`
/// consistent with `Eq`: two values that compare equal produce the same tag
/// and the same bytes. The key hash is derived from those, not from `Hash`.
pub trait TypedValue: Clone + Eq + Hash + fmt::Debug {
    /// Discriminator of the value's logical type
    fn type_tag(&self) -> i32;

    /// Type parameter (length, precision, ...) or [`NO_ARGUMENT`]
    fn type_argument(&self) -> i32;

    /// Raw payload bytes
    fn as_bytes(&self) -> Vec<u8>;

    /// Rebuild a value from its tag, argument and payload
    fn from_bytes(type_tag: i32, type_argument: i32, bytes: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// Built-in value type covering the common SQL scalars
#[derive(Debug, Clone)]
pub enum Value {
    /// 32-bit integer
    Integer(i32),

    /// 64-bit integer
    BigInt(i64),

    /// Double precision float
    Double(f64),

    /// UTF-8 string
    Varchar(String),
}

impl Value {
    /// Logical type of this value
    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Integer(_) => SqlType::Integer,
            Value::BigInt(_) => SqlType::BigInt,
            Value::Double(_) => SqlType::Double,
            Value::Varchar(_) => SqlType::Varchar,
        }
    }
}

// Doubles compare by bit pattern so Eq stays reflexive (NaN == NaN) and
// agrees with the byte encoding the key hash is built from.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Varchar(a), Value::Varchar(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sql_type().hash(state);
        match self {
            Value::Integer(v) => v.hash(state),
            Value::BigInt(v) => v.hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Varchar(v) => v.hash(state),
        }
    }
}

impl TypedValue for Value {
    fn type_tag(&self) -> i32 {
        self.sql_type().tag()
    }

    fn type_argument(&self) -> i32 {
        match self {
            Value::Varchar(s) => i32::try_from(s.chars().count()).unwrap_or(i32::MAX),
            _ => NO_ARGUMENT,
        }
    }

    fn as_bytes(&self) -> Vec<u8> {
        match self {
            Value::Integer(v) => v.to_be_bytes().to_vec(),
            Value::BigInt(v) => v.to_be_bytes().to_vec(),
            Value::Double(v) => v.to_be_bytes().to_vec(),
            Value::Varchar(s) => s.as_bytes().to_vec(),
        }
    }

    fn from_bytes(type_tag: i32, _type_argument: i32, bytes: &[u8]) -> Result<Self> {
        let sql_type = SqlType::from_tag(type_tag)
            .ok_or_else(|| StorageError::TypeError(format!("unknown type tag {}", type_tag)))?;

        if let Some(size) = sql_type.fixed_size() {
            if bytes.len() != size {
                return Err(StorageError::TypeError(format!(
                    "{} expects {} bytes, got {}",
                    sql_type,
                    size,
                    bytes.len()
                )));
            }
        }

        let value = match sql_type {
            SqlType::Integer => Value::Integer(i32::from_be_bytes(fixed(bytes)?)),
            SqlType::BigInt => Value::BigInt(i64::from_be_bytes(fixed(bytes)?)),
            SqlType::Double => Value::Double(f64::from_be_bytes(fixed(bytes)?)),
            SqlType::Varchar => Value::Varchar(
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| StorageError::TypeError(format!("invalid VARCHAR payload: {}", e)))?,
            ),
        };

        Ok(value)
    }
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| StorageError::TypeError(format!("expected {} bytes, got {}", N, bytes.len())))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Varchar(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Varchar(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Varchar(v)
    }
}
