//! Record reconstruction from classified log lines.
//!
//! Several metric lines of a run share the same leading keyword, so the
//! builder tells them apart purely by position: each metric line consumes
//! the next slot of the pipeline's schedule. Lines past the end of the
//! schedule are absorbed and counted, never written.

use super::classifier::{LineClassifier, LineEvent};
use super::pipeline::Pipeline;
use super::scale::ScaleResolver;
use super::schema::{Record, Variant};
use crate::utils::error::ParseError;
use log::{debug, info, warn};

/// Counters describing how tolerant a parse had to be
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub blank: usize,
    pub boundaries: usize,
    pub metric_lines: usize,
    pub named_stat_lines: usize,
    pub unrecognized: usize,
    /// Metric or stat lines outside any schedule slot or before the first boundary
    pub absorbed: usize,
    /// Records finalized before their schedule and phases were filled
    pub incomplete_records: usize,
}

impl ParseStats {
    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Lines: {} | Records: {} | Metric: {} | Stat: {} | Ignored: {} | Absorbed: {} | Incomplete: {}",
            self.lines,
            self.boundaries,
            self.metric_lines,
            self.named_stat_lines,
            self.unrecognized,
            self.absorbed,
            self.incomplete_records
        )
    }
}

/// Records recovered from one log, in input order
#[derive(Debug, Clone)]
pub struct ParsedLog {
    pub records: Vec<Record>,
    pub stats: ParseStats,
}

/// Stateful accumulator turning line events into records
pub struct RecordBuilder<'a> {
    pipeline: &'a Pipeline,
    resolver: &'a mut dyn ScaleResolver,
    current: Option<Record>,
    cursor: usize,
    /// One flag per pipeline phase, set once its statistics line arrives
    phases_seen: Vec<bool>,
    records: Vec<Record>,
    stats: ParseStats,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(pipeline: &'a Pipeline, resolver: &'a mut dyn ScaleResolver) -> Self {
        Self {
            pipeline,
            resolver,
            current: None,
            cursor: 0,
            phases_seen: vec![false; pipeline.phases.len()],
            records: Vec::new(),
            stats: ParseStats::default(),
        }
    }

    /// Close the open record (if any) and open a new one
    ///
    /// # Errors
    /// * `ParseError::Resolve` - the configuration's scale parameters cannot be read
    pub fn on_boundary(&mut self, variant: Variant, config_key: &str) -> Result<(), ParseError> {
        self.finalize_current();

        let index = self.records.len();
        let scale = self
            .resolver
            .resolve(config_key)
            .map_err(|source| ParseError::Resolve { index, source })?;

        debug!(
            "Record {} opened: '{}' ({} variant)",
            index, config_key, variant
        );
        self.stats.boundaries += 1;
        self.current = Some(Record::new(
            config_key,
            variant,
            scale,
            self.pipeline.schema.len(),
        ));
        self.cursor = 0;
        self.phases_seen = vec![false; self.pipeline.phases.len()];
        Ok(())
    }

    /// Consume the next schedule slot with the line's first numeric value
    pub fn on_metric_line(&mut self, values: &[f64]) {
        self.stats.metric_lines += 1;
        let Some(record) = self.current.as_mut() else {
            debug!("Metric line before first record boundary, absorbed");
            self.stats.absorbed += 1;
            return;
        };

        let slot = self.cursor;
        self.cursor += 1;

        match self.pipeline.schedule.get(slot) {
            Some(Some(field)) => match values.first() {
                Some(&value) => record.metrics[*field] = value,
                None => warn!(
                    "Metric line for '{}' in '{}' has no numeric value",
                    self.pipeline.schema.name(*field).unwrap_or("?"),
                    record.config_key
                ),
            },
            Some(None) => {}
            None => {
                debug!(
                    "Metric line {} of '{}' is past the schedule, absorbed",
                    slot + 1,
                    record.config_key
                );
                self.stats.absorbed += 1;
            }
        }
    }

    /// Write mean, std-dev, low and high of one phase
    pub fn on_named_stat_line(&mut self, index: usize, values: &[Option<f64>]) {
        self.stats.named_stat_lines += 1;
        let (Some(record), Some(phase)) = (self.current.as_mut(), self.pipeline.phases.get(index))
        else {
            debug!("Named statistics line outside a record, absorbed");
            self.stats.absorbed += 1;
            return;
        };
        self.phases_seen[index] = true;

        if values.len() < phase.fields.len() {
            warn!(
                "'{}' line in '{}' carries {} of {} values",
                phase.keyword,
                record.config_key,
                values.len(),
                phase.fields.len()
            );
        }
        for (field, value) in phase.fields.iter().zip(values) {
            if let Some(value) = value {
                record.metrics[*field] = *value;
            }
        }
    }

    /// Finalize the last record and return everything built so far
    pub fn finish(mut self) -> Vec<Record> {
        self.finalize_current();
        self.records
    }

    /// Like [`finish`](Self::finish) but keeps the tolerance counters
    pub fn finish_with_stats(mut self) -> ParsedLog {
        self.finalize_current();
        ParsedLog {
            records: self.records,
            stats: self.stats,
        }
    }

    fn finalize_current(&mut self) {
        let Some(record) = self.current.take() else {
            return;
        };
        // Unfilled slots stay at zero and will be averaged as such
        let short_schedule = self.cursor < self.pipeline.schedule.len();
        if short_schedule {
            warn!(
                "Record '{}' ({} variant) ended after {} of {} metric lines",
                record.config_key,
                record.variant,
                self.cursor,
                self.pipeline.schedule.len()
            );
        }

        let missing: Vec<&str> = self
            .pipeline
            .phases
            .iter()
            .zip(&self.phases_seen)
            .filter(|(_, seen)| !**seen)
            .map(|(phase, _)| phase.keyword.as_str())
            .collect();
        if !missing.is_empty() {
            warn!(
                "Record '{}' ({} variant) has no statistics for: {}",
                record.config_key,
                record.variant,
                missing.join(", ")
            );
        }

        if short_schedule || !missing.is_empty() {
            self.stats.incomplete_records += 1;
        }
        self.records.push(record);
    }

    fn note(&mut self, event: &LineEvent<'_>) {
        self.stats.lines += 1;
        match event {
            LineEvent::Blank => self.stats.blank += 1,
            LineEvent::Unrecognized => self.stats.unrecognized += 1,
            _ => {}
        }
    }
}

/// Parse a whole log into records
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `input` - Full log text
/// * `pipeline` - Grammar, schedule and schema to parse with
/// * `resolver` - Source of scale parameters for each configuration key
///
/// # Errors
/// * `ParseError::Resolve` - a configuration file could not be read
pub fn parse_log(
    input: &str,
    pipeline: &Pipeline,
    resolver: &mut dyn ScaleResolver,
) -> Result<ParsedLog, ParseError> {
    let classifier = LineClassifier::new(pipeline);
    let mut builder = RecordBuilder::new(pipeline, resolver);

    for line in input.lines() {
        let event = classifier.classify(line);
        builder.note(&event);
        match event {
            LineEvent::Boundary {
                variant,
                config_key,
            } => builder.on_boundary(variant, config_key)?,
            LineEvent::Metric(values) => builder.on_metric_line(&values),
            LineEvent::NamedStat { phase, values } => builder.on_named_stat_line(phase, &values),
            LineEvent::Blank | LineEvent::Unrecognized => {}
        }
    }

    let parsed = builder.finish_with_stats();
    info!("Parsed {} records ({})", parsed.records.len(), parsed.stats.summary());
    Ok(parsed)
}

/// Parse a log and return only the records
pub fn parse_records(
    input: &str,
    pipeline: &Pipeline,
    resolver: &mut dyn ScaleResolver,
) -> Result<Vec<Record>, ParseError> {
    parse_log(input, pipeline, resolver).map(|parsed| parsed.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scale::InlineScaleResolver;
    use crate::parser::schema::ScaleParams;
    use crate::utils::error::ConfigError;

    struct FixedResolver(ScaleParams);

    impl ScaleResolver for FixedResolver {
        fn resolve(&mut self, _config_key: &str) -> Result<ScaleParams, ConfigError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_schedule_positions() {
        let pipeline = Pipeline::dispatch().unwrap();
        let mut resolver = FixedResolver(ScaleParams::new(2, 3));
        let mut builder = RecordBuilder::new(&pipeline, &mut resolver);

        builder.on_boundary(Variant::Primary, "a.conf").unwrap();
        for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
            builder.on_metric_line(&[value]);
        }
        let records = builder.finish();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metrics, vec![3.0, 4.0]);
        assert_eq!(records[0].scale, ScaleParams::new(2, 3));
    }

    #[test]
    fn test_boundary_resets_cursor() {
        let pipeline = Pipeline::scaling().unwrap();
        let mut resolver = InlineScaleResolver;
        let mut builder = RecordBuilder::new(&pipeline, &mut resolver);

        builder.on_boundary(Variant::Primary, "s:1, c:1").unwrap();
        builder.on_metric_line(&[9.0]);
        builder.on_boundary(Variant::Secondary, "s:1, c:1").unwrap();
        builder.on_metric_line(&[7.0]);
        let records = builder.finish();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].metrics[0], 9.0);
        assert_eq!(records[1].metrics[0], 7.0);
    }

    #[test]
    fn test_metric_before_boundary_is_absorbed() {
        let pipeline = Pipeline::scaling().unwrap();
        let mut resolver = InlineScaleResolver;
        let parsed = parse_log("average 1.0\nservers:1, clients:2, iih\naverage 5.0\n", &pipeline, &mut resolver)
            .unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].metrics[0], 5.0);
        assert_eq!(parsed.stats.absorbed, 1);
        assert_eq!(parsed.stats.incomplete_records, 1);
    }

    #[test]
    fn test_named_stat_partial_values() {
        let pipeline = Pipeline::scaling().unwrap();
        let mut resolver = InlineScaleResolver;
        let mut builder = RecordBuilder::new(&pipeline, &mut resolver);

        builder.on_boundary(Variant::Primary, "s:1, c:1").unwrap();
        builder.on_named_stat_line(0, &[Some(1.5), None]);
        let records = builder.finish();

        assert_eq!(&records[0].metrics[2..6], &[1.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_phase_lines_mark_record_incomplete() {
        let pipeline = Pipeline::scaling().unwrap();
        let mut resolver = InlineScaleResolver;
        let log = "servers:1, clients:2, iih\n\
                   average 1\naverage 2\naverage 3\naverage 4\n\
                   servers:1, clients:2, iiv\n\
                   average 1\naverage 2\n\
                   Server add_request_timer count:1, mean:1, std:1, low:1, high:1\n\
                   Server request_complete_timer count:1, mean:1, std:1, low:1, high:1\n\
                   average 3\naverage 4\n";

        let parsed = parse_log(log, &pipeline, &mut resolver).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.stats.incomplete_records, 1);
        assert!(parsed.records[0].metrics[2..10].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_empty_input_has_no_records() {
        let pipeline = Pipeline::dispatch().unwrap();
        let mut resolver = FixedResolver(ScaleParams::default());
        let records = parse_records("\n\nnothing here\n", &pipeline, &mut resolver).unwrap();
        assert!(records.is_empty());
    }
}
