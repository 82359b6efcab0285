//! Insertion-ordered set of configuration keys.
//!
//! Table rows follow the order in which configurations first appear in the
//! log, so discovery order is tracked explicitly next to the membership index.

use crate::parser::schema::Record;
use std::collections::HashMap;

/// Configuration keys in first-seen order, each stored once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOrder {
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl ConfigOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the distinct keys of `records` in record order
    pub fn from_records(records: &[Record]) -> Self {
        let mut order = Self::new();
        for record in records {
            order.insert(&record.config_key);
        }
        order
    }

    /// Add a key; returns `false` if it was already present
    pub fn insert(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.index.insert(key.to_string(), self.keys.len());
        self.keys.push(key.to_string());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Position of a key in discovery order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}
