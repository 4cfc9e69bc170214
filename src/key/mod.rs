//! Composite record key
//!
//! Identifies a row by table name plus an ordered list of (field, value)
//! pairs. Keys are immutable once built, and equality is structural and
//! order-sensitive. The hash is computed once at construction from a fixed
//! fold, so it is stable across processes and survives an encode/decode
//! round trip.
//!
//! Multi-field keys are assembled through [`CompositeKeyBuilder`]; the
//! single-field form is available directly through [`CompositeKey::new`].

mod builder;
mod codec;

pub use builder::CompositeKeyBuilder;
pub use codec::{FORMAT_VERSION, MAX_HEADER_BYTES};

use crate::index::SearchKey;
use crate::types::{TypedValue, Value};
use crate::{Result, StorageError};
use std::fmt;
use std::hash::{Hash, Hasher};

const HASH_SEED: i32 = 17;
const HASH_MULTIPLIER: i32 = 31;

/// Row identity: table name + ordered field names + ordered typed values
#[derive(Debug, Clone)]
pub struct CompositeKey<V: TypedValue = Value> {
    table_name: String,
    fields: Vec<String>,
    values: Vec<V>,
    /// Precomputed from all of the above
    hash: i32,
}

impl<V: TypedValue> CompositeKey<V> {
    /// Single-field key
    pub fn new(table_name: impl Into<String>, field: impl Into<String>, value: V) -> Self {
        Self::assemble(table_name.into(), vec![field.into()], vec![value])
    }

    /// Array-pair form, reached through [`CompositeKeyBuilder`] and the decoder
    pub(crate) fn from_parts(table_name: String, fields: Vec<String>, values: Vec<V>) -> Result<Self> {
        if fields.len() != values.len() {
            return Err(StorageError::InvalidArgument(format!(
                "key for table '{}' has {} fields but {} values",
                table_name,
                fields.len(),
                values.len()
            )));
        }

        Ok(Self::assemble(table_name, fields, values))
    }

    fn assemble(table_name: String, fields: Vec<String>, values: Vec<V>) -> Self {
        let hash = compute_hash(&table_name, &fields, &values);
        Self {
            table_name,
            fields,
            values,
            hash,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field name at `index`
    pub fn field_at(&self, index: usize) -> Result<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or(StorageError::OutOfRange {
                index,
                len: self.fields.len(),
            })
    }

    /// Value at `index`
    pub fn value_at(&self, index: usize) -> Result<&V> {
        self.values.get(index).ok_or(StorageError::OutOfRange {
            index,
            len: self.values.len(),
        })
    }

    /// Value of the named field
    ///
    /// Field names are not checked for uniqueness; the first occurrence wins.
    pub fn value_of(&self, field: &str) -> Option<&V> {
        self.fields
            .iter()
            .position(|f| f == field)
            .map(|i| &self.values[i])
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Values of `fields`, in the order requested
    ///
    /// Fails with [`StorageError::FieldNotFound`] on the first name the key
    /// does not carry; no partial result is returned.
    pub fn project<S: AsRef<str>>(&self, fields: &[S]) -> Result<Vec<V>> {
        fields
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.value_of(name)
                    .cloned()
                    .ok_or_else(|| StorageError::FieldNotFound(name.to_string()))
            })
            .collect()
    }

    /// Projection packaged for an index lookup over `indexed_fields`
    pub fn to_search_key<S: AsRef<str>>(&self, indexed_fields: &[S]) -> Result<SearchKey<V>> {
        self.project(indexed_fields).map(SearchKey::new)
    }

    /// `(field, value)` pairs in declaration order
    ///
    /// This is the equality conjunction a predicate builder turns into a
    /// filter on the key's table.
    pub fn equality_terms(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.fields.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Precomputed hash
    pub fn hash_code(&self) -> i32 {
        self.hash
    }
}

fn fold(hash: i32, part: i32) -> i32 {
    hash.wrapping_mul(HASH_MULTIPLIER).wrapping_add(part)
}

fn str_hash(s: &str) -> i32 {
    s.bytes().fold(0, |h, b| fold(h, i32::from(b)))
}

fn value_hash<V: TypedValue>(value: &V) -> i32 {
    value
        .as_bytes()
        .iter()
        .fold(value.type_tag(), |h, b| fold(h, i32::from(*b)))
}

fn compute_hash<V: TypedValue>(table_name: &str, fields: &[String], values: &[V]) -> i32 {
    let mut hash = fold(HASH_SEED, str_hash(table_name));
    for (field, value) in fields.iter().zip(values) {
        hash = fold(hash, str_hash(field));
        hash = fold(hash, value_hash(value));
    }
    hash
}

impl<V: TypedValue> PartialEq for CompositeKey<V> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.table_name == other.table_name
            && self.fields == other.fields
            && self.values == other.values
    }
}

impl<V: TypedValue> Eq for CompositeKey<V> {}

impl<V: TypedValue> Hash for CompositeKey<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash);
    }
}

impl<V: TypedValue + fmt::Display> fmt::Display for CompositeKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.table_name)?;
        for (i, (field, value)) in self.equality_terms().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{}{} -> {}", sep, field, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn key(table: &str, fields: &[&str], values: &[i32]) -> CompositeKey {
        let mut builder = CompositeKeyBuilder::new(table);
        for (f, v) in fields.iter().zip(values) {
            builder = builder.add(*f, Value::Integer(*v));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_single_field_key() {
        let k = CompositeKey::new("users", "id", Value::Integer(42));

        assert_eq!(k.table_name(), "users");
        assert_eq!(k.field_count(), 1);
        assert_eq!(k.field_at(0).unwrap(), "id");
        assert_eq!(k.value_at(0).unwrap(), &Value::Integer(42));
        assert_eq!(k.value_of("id"), Some(&Value::Integer(42)));
        assert!(k.contains_field("id"));
        assert!(!k.contains_field("name"));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = CompositeKey::from_parts(
            "T".to_string(),
            vec!["a".to_string(), "b".to_string()],
            vec![Value::Integer(1)],
        );
        assert!(matches!(result, Err(StorageError::InvalidArgument(_))));
    }

    #[test]
    fn test_index_out_of_range() {
        let k = key("T", &["a", "b"], &[1, 2]);

        assert!(matches!(
            k.field_at(2),
            Err(StorageError::OutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(k.value_at(5), Err(StorageError::OutOfRange { .. })));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab = key("T", &["a", "b"], &[1, 2]);
        let ba = key("T", &["b", "a"], &[2, 1]);

        assert_ne!(ab, ba);
        assert_eq!(ab, key("T", &["a", "b"], &[1, 2]));
    }

    #[test]
    fn test_equality_covers_every_component() {
        let base = key("T", &["a"], &[1]);

        assert_ne!(base, key("U", &["a"], &[1]));
        assert_ne!(base, key("T", &["x"], &[1]));
        assert_ne!(base, key("T", &["a"], &[2]));
        assert_ne!(base, CompositeKey::new("T", "a", Value::BigInt(1)));
    }

    #[test]
    fn test_hash_matches_equality() {
        let k1 = key("orders", &["w_id", "d_id", "o_id"], &[1, 3, 3001]);
        let k2 = key("orders", &["w_id", "d_id", "o_id"], &[1, 3, 3001]);

        assert_eq!(k1.hash_code(), k2.hash_code());

        let mut set = HashSet::new();
        set.insert(k1);
        assert!(set.contains(&k2));
    }

    #[test]
    fn test_project_reorders() {
        let k = key("T", &["a", "b"], &[1, 2]);

        assert_eq!(
            k.project(&["b", "a"]).unwrap(),
            vec![Value::Integer(2), Value::Integer(1)]
        );
        assert!(k.project::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_project_missing_field() {
        let k = key("T", &["a", "b"], &[1, 2]);

        match k.project(&["a", "c"]) {
            Err(StorageError::FieldNotFound(name)) => assert_eq!(name, "c"),
            other => panic!("expected FieldNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_field_first_wins() {
        let k = key("T", &["a", "a"], &[1, 2]);

        assert_eq!(k.value_of("a"), Some(&Value::Integer(1)));
        assert_eq!(k.project(&["a"]).unwrap(), vec![Value::Integer(1)]);
    }

    #[test]
    fn test_search_key_projection() {
        let k = key("stock", &["s_w_id", "s_i_id"], &[7, 1024]);
        let search = k.to_search_key(&["s_i_id".to_string(), "s_w_id".to_string()]).unwrap();

        assert_eq!(search.len(), 2);
        assert_eq!(search.values(), &[Value::Integer(1024), Value::Integer(7)]);
        assert!(matches!(
            k.to_search_key(&["s_qty"]),
            Err(StorageError::FieldNotFound(_))
        ));
    }

    #[test]
    fn test_equality_terms_in_order() {
        let k = key("T", &["b", "a"], &[2, 1]);
        let terms: Vec<_> = k.equality_terms().collect();

        assert_eq!(terms, vec![("b", &Value::Integer(2)), ("a", &Value::Integer(1))]);
    }

    #[test]
    fn test_display() {
        let k = CompositeKeyBuilder::new("item")
            .add("i_id", Value::Integer(5))
            .add("i_name", Value::from("pen"))
            .build()
            .unwrap();

        assert_eq!(k.to_string(), "{item: i_id -> 5, i_name -> pen}");
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i32>().prop_map(Value::Integer),
            any::<i64>().prop_map(Value::BigInt),
            any::<f64>().prop_map(Value::Double),
            "[a-z]{0,8}".prop_map(Value::Varchar),
        ]
    }

    fn arb_key() -> impl Strategy<Value = CompositeKey> {
        ("[a-z]{1,6}", prop::collection::vec(("[a-z]{1,4}", arb_value()), 0..5)).prop_map(
            |(table, pairs)| {
                let (fields, values): (Vec<String>, Vec<Value>) = pairs.into_iter().unzip();
                CompositeKey::<Value>::from_parts(table, fields, values).unwrap()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_equal_keys_hash_equal(k in arb_key()) {
            let copy = CompositeKey::from_parts(
                k.table_name().to_string(),
                k.fields().to_vec(),
                k.values().to_vec(),
            ).unwrap();
            prop_assert_eq!(&copy, &k);
            prop_assert_eq!(copy.hash_code(), k.hash_code());
        }

        #[test]
        fn prop_equality_implies_hash(a in arb_key(), b in arb_key()) {
            if a == b {
                prop_assert_eq!(a.hash_code(), b.hash_code());
            }
        }

        #[test]
        fn prop_encode_decode(k in arb_key()) {
            let bytes = k.encode().unwrap();
            let back = CompositeKey::<Value>::decode(&bytes).unwrap();
            prop_assert_eq!(back.hash_code(), k.hash_code());
            prop_assert_eq!(back, k);
        }
    }
}
