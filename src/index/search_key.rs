//! Search key passed to index lookups

use crate::types::{TypedValue, Value};
use std::ops::Index;

/// Ordered values matching an index's field list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey<V: TypedValue = Value> {
    values: Vec<V>,
}

impl<V: TypedValue> SearchKey<V> {
    pub fn new(values: Vec<V>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

impl<V: TypedValue> Index<usize> for SearchKey<V> {
    type Output = V;

    fn index(&self, index: usize) -> &V {
        &self.values[index]
    }
}

impl<V: TypedValue> From<Vec<V>> for SearchKey<V> {
    fn from(values: Vec<V>) -> Self {
        Self::new(values)
    }
}
