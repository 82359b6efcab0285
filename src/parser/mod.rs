//! Benchmark log parsing.
//!
//! This module handles:
//! - Describing a log's grammar and metric schedule (pipelines)
//! - Classifying raw lines
//! - Resolving per-configuration scale parameters
//! - Rebuilding one record per benchmark run

pub mod builder;
pub mod classifier;
pub mod pipeline;
pub mod scale;
pub mod schema;

// Re-export main types
pub use builder::{parse_log, parse_records, ParseStats, ParsedLog, RecordBuilder};
pub use classifier::{LineClassifier, LineEvent};
pub use pipeline::{load_pipeline, BoundaryRule, Pipeline, PipelineDef, ScaleLayout, ScaleSource};
pub use scale::{resolver_for, FileScaleResolver, InlineScaleResolver, ScaleResolver};
pub use schema::{Record, ScaleParams, Schema, Variant};
