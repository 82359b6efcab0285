//! Aggregation of parsed runs into per-configuration averages.
//!
//! This module transforms the flat record list into:
//! - An ordered set of configurations (first-seen order)
//! - One averaged record per configuration and variant

pub mod averages;
pub mod ordered;

// Re-export main types and functions
pub use averages::{aggregate, average_runs, AveragedRecord, AveragedRuns};
pub use ordered::ConfigOrder;
