//! Record data model shared by the parser, aggregator and table writer.
//!
//! A record is one benchmark run: the configuration it belongs to, which of
//! the two compared variants produced it, the resolved scale parameters and
//! a fixed-width vector of metric values laid out by a [`Schema`].

use std::collections::HashMap;
use std::fmt;

/// One of the two run modes being compared
///
/// The primary variant's value is always written first in a column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Primary,
    Secondary,
}

impl Variant {
    /// Both variants in column order
    pub const ALL: [Variant; 2] = [Variant::Primary, Variant::Secondary];

    /// Position of this variant inside a column pair
    pub fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Server and client counts for one configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleParams {
    pub server_count: u64,
    pub client_count: u64,
}

impl ScaleParams {
    pub fn new(server_count: u64, client_count: u64) -> Self {
        Self {
            server_count,
            client_count,
        }
    }
}

/// Index of a metric inside a record's value vector
pub type FieldId = usize;

/// Ordered metric names; the order is the output column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
    index: HashMap<String, FieldId>,
}

impl Schema {
    /// Build a schema, returning the first duplicated name on failure
    pub fn new(fields: Vec<String>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(fields.len());
        for (id, name) in fields.iter().enumerate() {
            if index.insert(name.clone(), id).is_some() {
                return Err(name.clone());
            }
        }
        Ok(Self { fields, index })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<FieldId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: FieldId) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }
}

/// A single benchmark run (or, after aggregation, the mean of several)
///
/// Metrics a log never supplied stay at `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub config_key: String,
    pub variant: Variant,
    pub scale: ScaleParams,
    pub metrics: Vec<f64>,
}

impl Record {
    /// Create a record with every metric zeroed
    pub fn new(config_key: impl Into<String>, variant: Variant, scale: ScaleParams, width: usize) -> Self {
        Self {
            config_key: config_key.into(),
            variant,
            scale,
            metrics: vec![0.0; width],
        }
    }
}
