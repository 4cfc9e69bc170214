//! Binary encoding of composite keys
//!
//! Layout:
//! ```text
//! header   bincode { version: u32, table_name: String, fields: Vec<String> }
//! count    i32 (big-endian), must equal fields.len()
//! count x  i32 type_tag | i32 type_argument | i32 byte_length | payload
//! ```
//! The value records are the stable part of the format and are written
//! exactly like the engine's stream format (big-endian 32-bit integers).

use super::CompositeKey;
use crate::types::TypedValue;
use crate::{Result, StorageError};
use bincode::Options;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io::{ErrorKind, Read, Write};
use tracing::debug;

/// Version stamped into every encoded header
pub const FORMAT_VERSION: u32 = 1;

/// Upper bound on the encoded header (table name + field names)
pub const MAX_HEADER_BYTES: u64 = 64 * 1024;

#[derive(Serialize)]
struct KeyHeaderRef<'a> {
    version: u32,
    table_name: &'a str,
    fields: &'a [String],
}

#[derive(Deserialize)]
struct KeyHeader {
    version: u32,
    table_name: String,
    fields: Vec<String>,
}

fn header_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(MAX_HEADER_BYTES)
}

fn malformed(reason: impl Into<String>) -> StorageError {
    StorageError::MalformedEncoding(reason.into())
}

fn header_error(err: bincode::Error) -> StorageError {
    match *err {
        bincode::ErrorKind::Io(io) if io.kind() != ErrorKind::UnexpectedEof => StorageError::Io(io),
        other => malformed(format!("invalid key header: {}", other)),
    }
}

fn header_write_error(err: bincode::Error) -> StorageError {
    match *err {
        bincode::ErrorKind::Io(io) => StorageError::Io(io),
        other => StorageError::Serialization(format!("key header: {}", other)),
    }
}

fn write_i32<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R, what: &str) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => malformed(format!("truncated before {}", what)),
        _ => StorageError::Io(e),
    })?;
    Ok(i32::from_be_bytes(buf))
}

fn len_as_i32(len: usize, what: &str) -> Result<i32> {
    i32::try_from(len).map_err(|_| StorageError::Serialization(format!("{} too large: {}", what, len)))
}

impl<V: TypedValue> CompositeKey<V> {
    /// Encode into a fresh buffer
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Encode onto the end of `writer`
    pub fn encode_into<W: Write>(&self, writer: &mut W) -> Result<()> {
        let header = KeyHeaderRef {
            version: FORMAT_VERSION,
            table_name: &self.table_name,
            fields: &self.fields,
        };
        header_options()
            .serialize_into(&mut *writer, &header)
            .map_err(header_write_error)?;

        write_i32(writer, len_as_i32(self.values.len(), "value count")?)?;
        for value in &self.values {
            let bytes = value.as_bytes();
            write_i32(writer, value.type_tag())?;
            write_i32(writer, value.type_argument())?;
            write_i32(writer, len_as_i32(bytes.len(), "value payload")?)?;
            writer.write_all(&bytes)?;
        }

        Ok(())
    }

    /// Decode a key occupying all of `bytes`
    ///
    /// Truncated input, trailing bytes, or any inconsistency in the header
    /// or value records yields [`StorageError::MalformedEncoding`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = bytes;
        let key = Self::decode_from(&mut cursor).and_then(|key| {
            if cursor.is_empty() {
                Ok(key)
            } else {
                Err(malformed(format!("{} trailing bytes after key", cursor.len())))
            }
        });

        if let Err(ref e) = key {
            debug!(error = %e, len = bytes.len(), "rejected composite key encoding");
        }
        key
    }

    /// Decode one key from `reader`, leaving any following bytes unread
    pub fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let header: KeyHeader = header_options()
            .deserialize_from(&mut *reader)
            .map_err(header_error)?;

        if header.version != FORMAT_VERSION {
            return Err(malformed(format!(
                "unsupported key format version {} (expected {})",
                header.version, FORMAT_VERSION
            )));
        }

        let count = read_i32(reader, "value count")?;
        if count < 0 || count as usize != header.fields.len() {
            return Err(malformed(format!(
                "value count {} does not match {} fields",
                count,
                header.fields.len()
            )));
        }

        let mut values = Vec::with_capacity(header.fields.len());
        for i in 0..header.fields.len() {
            let type_tag = read_i32(reader, "type tag")?;
            let type_argument = read_i32(reader, "type argument")?;
            let byte_length = read_i32(reader, "payload length")?;
            if byte_length < 0 {
                return Err(malformed(format!("negative payload length {} for value {}", byte_length, i)));
            }

            // Read through `take` so a corrupt length cannot force a huge allocation
            let mut payload = Vec::new();
            reader
                .by_ref()
                .take(byte_length as u64)
                .read_to_end(&mut payload)?;
            if payload.len() != byte_length as usize {
                return Err(malformed(format!(
                    "value {} payload truncated: {} of {} bytes",
                    i,
                    payload.len(),
                    byte_length
                )));
            }

            let value = V::from_bytes(type_tag, type_argument, &payload)
                .map_err(|e| malformed(format!("value {}: {}", i, e)))?;
            values.push(value);
        }

        Self::from_parts(header.table_name, header.fields, values)
    }
}

/// Keys embed in serde structures as their encoded byte string
impl<V: TypedValue> Serialize for CompositeKey<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let bytes = self.encode().map_err(S::Error::custom)?;
        serializer.serialize_bytes(&bytes)
    }
}

impl<'de, V: TypedValue> Deserialize<'de> for CompositeKey<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Self::decode(&bytes).map_err(D::Error::custom)
    }
}
