//! Builder for multi-field composite keys

use super::CompositeKey;
use crate::types::{TypedValue, Value};
use crate::Result;

/// Collects `(field, value)` pairs in order and produces a [`CompositeKey`]
#[derive(Debug, Clone)]
pub struct CompositeKeyBuilder<V: TypedValue = Value> {
    table_name: String,
    fields: Vec<String>,
    values: Vec<V>,
}

impl<V: TypedValue> CompositeKeyBuilder<V> {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            fields: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a field; order of calls is the key's field order
    pub fn add(mut self, field: impl Into<String>, value: V) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: V) {
        self.fields.push(field.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn build(self) -> Result<CompositeKey<V>> {
        CompositeKey::from_parts(self.table_name, self.fields, self.values)
    }

    /// Build directly from parallel field and value arrays
    ///
    /// Fails with `InvalidArgument` when the arrays differ in length.
    pub fn with_values(
        table_name: impl Into<String>,
        fields: Vec<String>,
        values: Vec<V>,
    ) -> Result<CompositeKey<V>> {
        CompositeKey::from_parts(table_name.into(), fields, values)
    }
}
