//! Reduce repeated runs of a configuration to per-metric means.
//!
//! Every configuration key discovered in the log is expected to have runs
//! for both variants. A missing variant is reported as an error instead of
//! being filled with a guess.

use super::ordered::ConfigOrder;
use crate::parser::schema::{Record, Variant};
use crate::utils::error::AggregateError;
use log::debug;

/// Mean of all runs for one (configuration, variant) pair
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedRecord {
    pub record: Record,
    /// Number of runs that contributed
    pub runs: usize,
}

/// Averages for every discovered configuration, both variants each
#[derive(Debug, Clone)]
pub struct AveragedRuns {
    pub order: ConfigOrder,
    pub averages: Vec<AveragedRecord>,
}

impl AveragedRuns {
    /// Find the averaged record for a configuration and variant
    ///
    /// Averages are stored per key in discovery order, both variants each.
    pub fn get(&self, config_key: &str, variant: Variant) -> Option<&AveragedRecord> {
        let slot = self.order.position(config_key)? * Variant::ALL.len() + variant.index();
        self.averages
            .get(slot)
            .filter(|avg| avg.record.variant == variant && avg.record.config_key == config_key)
    }

    /// Total number of runs folded into the averages
    pub fn total_runs(&self) -> usize {
        self.averages.iter().map(|avg| avg.runs).sum()
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Configurations: {} | Averaged records: {} | Runs: {}",
            self.order.len(),
            self.averages.len(),
            self.total_runs()
        )
    }
}

/// Average every run of `config_key` recorded under `variant`
///
/// Scale parameters are copied from the first matching run; all runs of a
/// configuration are assumed to share them.
///
/// # Errors
/// * `AggregateError::NoRuns` - no record matches the pair
pub fn average_runs(
    records: &[Record],
    config_key: &str,
    variant: Variant,
) -> Result<AveragedRecord, AggregateError> {
    let mut matching = records
        .iter()
        .filter(|r| r.variant == variant && r.config_key == config_key);

    let Some(first) = matching.next() else {
        return Err(AggregateError::NoRuns {
            config_key: config_key.to_string(),
            variant,
        });
    };

    let mut sums = first.metrics.clone();
    let mut runs = 1usize;
    for record in matching {
        for (sum, value) in sums.iter_mut().zip(&record.metrics) {
            *sum += value;
        }
        runs += 1;
    }

    let divisor = runs as f64;
    for sum in &mut sums {
        *sum /= divisor;
    }

    debug!(
        "Averaged {} run(s) of '{}' ({} variant)",
        runs, config_key, variant
    );

    Ok(AveragedRecord {
        record: Record {
            config_key: config_key.to_string(),
            variant,
            scale: first.scale,
            metrics: sums,
        },
        runs,
    })
}

/// Average all records, grouped by configuration and variant
///
/// **Public** - main entry point for aggregation
///
/// Configurations are visited in first-seen order; for each, the primary
/// average precedes the secondary.
///
/// # Errors
/// * `AggregateError::NoRuns` - a discovered configuration lacks one variant
pub fn aggregate(records: &[Record]) -> Result<AveragedRuns, AggregateError> {
    let order = ConfigOrder::from_records(records);
    let mut averages = Vec::with_capacity(order.len() * Variant::ALL.len());

    for config_key in order.iter() {
        for variant in Variant::ALL {
            averages.push(average_runs(records, config_key, variant)?);
        }
    }

    Ok(AveragedRuns { order, averages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::ScaleParams;

    fn record(key: &str, variant: Variant, metrics: &[f64]) -> Record {
        Record {
            config_key: key.to_string(),
            variant,
            scale: ScaleParams::new(1, 2),
            metrics: metrics.to_vec(),
        }
    }

    #[test]
    fn test_average_runs_mean() {
        let records = vec![
            record("a", Variant::Primary, &[1.0, 10.0]),
            record("a", Variant::Secondary, &[100.0, 100.0]),
            record("a", Variant::Primary, &[2.0, 20.0]),
            record("a", Variant::Primary, &[6.0, 0.0]),
        ];

        let avg = average_runs(&records, "a", Variant::Primary).unwrap();
        assert_eq!(avg.runs, 3);
        assert!((avg.record.metrics[0] - 3.0).abs() < 1e-12);
        assert!((avg.record.metrics[1] - 10.0).abs() < 1e-12);
        assert_eq!(avg.record.scale, ScaleParams::new(1, 2));
    }

    #[test]
    fn test_average_runs_without_runs_fails() {
        let records = vec![record("a", Variant::Primary, &[1.0])];
        let err = average_runs(&records, "a", Variant::Secondary).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::NoRuns { ref config_key, variant: Variant::Secondary } if config_key == "a"
        ));
    }

    #[test]
    fn test_aggregate_requires_both_variants() {
        let records = vec![
            record("a", Variant::Primary, &[1.0]),
            record("a", Variant::Secondary, &[2.0]),
            record("b", Variant::Primary, &[3.0]),
        ];
        assert!(aggregate(&records).is_err());
    }

    #[test]
    fn test_aggregate_orders_pairs() {
        let records = vec![
            record("b", Variant::Secondary, &[1.0]),
            record("a", Variant::Primary, &[2.0]),
            record("b", Variant::Primary, &[3.0]),
            record("a", Variant::Secondary, &[4.0]),
        ];
        let runs = aggregate(&records).unwrap();

        let keys: Vec<_> = runs
            .averages
            .iter()
            .map(|avg| (avg.record.config_key.as_str(), avg.record.variant))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("b", Variant::Primary),
                ("b", Variant::Secondary),
                ("a", Variant::Primary),
                ("a", Variant::Secondary),
            ]
        );
        assert_eq!(runs.get("a", Variant::Secondary).unwrap().record.metrics, vec![4.0]);
        assert_eq!(runs.total_runs(), 4);
    }
}
