//! SQL type descriptors carried alongside every encoded value

use std::fmt;

/// Argument reported by types that take no parameter
pub const NO_ARGUMENT: i32 = -1;

/// Logical value type
///
/// Tags reuse the JDBC/ANSI SQL type codes so encoded keys stay readable by
/// other engines that speak the same wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// IEEE-754 double
    Double,
    /// Variable-length UTF-8 string
    Varchar,
}

impl SqlType {
    pub const INTEGER_TAG: i32 = 4;
    pub const BIGINT_TAG: i32 = -5;
    pub const DOUBLE_TAG: i32 = 8;
    pub const VARCHAR_TAG: i32 = 12;

    /// Wire discriminator for this type
    pub fn tag(&self) -> i32 {
        match self {
            SqlType::Integer => Self::INTEGER_TAG,
            SqlType::BigInt => Self::BIGINT_TAG,
            SqlType::Double => Self::DOUBLE_TAG,
            SqlType::Varchar => Self::VARCHAR_TAG,
        }
    }

    /// Resolve a wire discriminator
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            Self::INTEGER_TAG => Some(SqlType::Integer),
            Self::BIGINT_TAG => Some(SqlType::BigInt),
            Self::DOUBLE_TAG => Some(SqlType::Double),
            Self::VARCHAR_TAG => Some(SqlType::Varchar),
            _ => None,
        }
    }

    /// Payload size in bytes, `None` for variable-length types
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            SqlType::Integer => Some(4),
            SqlType::BigInt | SqlType::Double => Some(8),
            SqlType::Varchar => None,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE",
            SqlType::Varchar => "VARCHAR",
        };
        f.write_str(name)
    }
}
