//! Line classification for benchmark logs.
//!
//! Every line of a log is mapped to exactly one [`LineEvent`]. Rules are
//! checked in a fixed order: blank, record boundary, metric line,
//! named-statistics line, and finally unrecognized.

use super::pipeline::{BoundaryRule, Pipeline};
use super::schema::Variant;

/// Semantic category of one log line
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent<'a> {
    Blank,

    /// Start of a new run
    Boundary { variant: Variant, config_key: &'a str },

    /// Numeric tokens of a metric-summary line, in line order
    Metric(Vec<f64>),

    /// Values of a named-statistics line after the leading label pair;
    /// `None` marks a pair whose value was not numeric
    NamedStat { phase: usize, values: Vec<Option<f64>> },

    Unrecognized,
}

/// Classifies lines according to a pipeline's grammar
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'p> {
    pipeline: &'p Pipeline,
}

impl<'p> LineClassifier<'p> {
    pub fn new(pipeline: &'p Pipeline) -> Self {
        Self { pipeline }
    }

    /// Classify a single raw line (surrounding whitespace is ignored)
    pub fn classify<'a>(&self, raw: &'a str) -> LineEvent<'a> {
        let line = raw.trim();
        if line.is_empty() {
            return LineEvent::Blank;
        }

        if let Some((variant, config_key)) = match_boundary(&self.pipeline.boundary, line) {
            return LineEvent::Boundary {
                variant,
                config_key,
            };
        }

        if line.starts_with(self.pipeline.metric_keyword.as_str()) {
            return LineEvent::Metric(numeric_tokens(line));
        }

        if let Some(phase) = self
            .pipeline
            .phases
            .iter()
            .position(|phase| line.starts_with(phase.keyword.as_str()))
        {
            return LineEvent::NamedStat {
                phase,
                values: labelled_values(line),
            };
        }

        LineEvent::Unrecognized
    }
}

/// Match a trimmed line against a boundary rule
fn match_boundary<'a>(rule: &BoundaryRule, line: &'a str) -> Option<(Variant, &'a str)> {
    match rule {
        BoundaryRule::Keyword {
            keyword,
            primary_tag,
        } => {
            if !line.starts_with(keyword.as_str()) {
                return None;
            }
            let mut parts = line.split(':');
            let tag = parts.nth(1).map(str::trim).unwrap_or("");
            let variant = if tag.starts_with(primary_tag.as_str()) {
                Variant::Primary
            } else {
                Variant::Secondary
            };
            let config_key = line.rsplit(':').next().unwrap_or("").trim();
            Some((variant, config_key))
        }
        BoundaryRule::Suffix { primary, secondary } => {
            let (variant, rest) = if let Some(rest) = line.strip_suffix(primary.as_str()) {
                (Variant::Primary, rest)
            } else if let Some(rest) = line.strip_suffix(secondary.as_str()) {
                (Variant::Secondary, rest)
            } else {
                return None;
            };
            let config_key = rest.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
            Some((variant, config_key))
        }
    }
}

/// Whitespace-split tokens that parse as floating point
pub fn numeric_tokens(line: &str) -> Vec<f64> {
    line.split_whitespace()
        .filter_map(|token| token.parse::<f64>().ok())
        .collect()
}

/// Values of comma-separated `label:value` pairs, skipping the leading pair
///
/// Segments without a colon carry no value and are skipped entirely.
pub fn labelled_values(line: &str) -> Vec<Option<f64>> {
    line.split(',')
        .filter_map(|segment| {
            let segment = segment.trim();
            segment
                .contains(':')
                .then(|| segment.rsplit(':').next().unwrap_or("").trim())
        })
        .skip(1)
        .map(|value| value.parse::<f64>().ok())
        .collect()
}
