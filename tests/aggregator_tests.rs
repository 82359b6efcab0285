use bench_digest::aggregator::{aggregate, average_runs, ConfigOrder};
use bench_digest::parser::{Record, ScaleParams, Variant};
use bench_digest::utils::error::AggregateError;

fn run(key: &str, variant: Variant, metrics: &[f64]) -> Record {
    Record {
        config_key: key.to_string(),
        variant,
        scale: ScaleParams::new(3, 4),
        metrics: metrics.to_vec(),
    }
}

#[test]
fn test_mean_of_duplicate_runs() {
    let values = [0.1, 0.2, 0.3, 0.4, 0.5];
    let records: Vec<Record> = values
        .iter()
        .map(|v| run("cfg", Variant::Secondary, &[*v, v * 10.0]))
        .collect();

    let avg = average_runs(&records, "cfg", Variant::Secondary).unwrap();

    assert_eq!(avg.runs, 5);
    assert!((avg.record.metrics[0] - 0.3).abs() < 1e-9);
    assert!((avg.record.metrics[1] - 3.0).abs() < 1e-9);
    assert_eq!(avg.record.scale, ScaleParams::new(3, 4));
}

#[test]
fn test_zero_runs_is_an_error() {
    let records: Vec<Record> = Vec::new();
    let result = average_runs(&records, "cfg", Variant::Primary);
    assert!(matches!(result, Err(AggregateError::NoRuns { .. })));
}

#[test]
fn test_missing_variant_aborts_aggregation() {
    let records = vec![
        run("a", Variant::Primary, &[1.0]),
        run("a", Variant::Secondary, &[1.0]),
        run("b", Variant::Secondary, &[1.0]),
    ];

    let err = aggregate(&records).unwrap_err();
    assert_eq!(
        err.to_string(),
        "No runs recorded for configuration 'b' (primary variant)"
    );
}

#[test]
fn test_discovery_order_is_stable() {
    let keys = ["c", "a", "c", "b", "a", "a", "c"];
    let mut records = Vec::new();
    for key in keys {
        records.push(run(key, Variant::Primary, &[1.0]));
        records.push(run(key, Variant::Secondary, &[2.0]));
    }

    let runs = aggregate(&records).unwrap();
    assert_eq!(runs.order.iter().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    assert_eq!(runs.get("a", Variant::Primary).unwrap().runs, 3);
    assert_eq!(runs.get("b", Variant::Secondary).unwrap().runs, 1);
    assert_eq!(runs.total_runs(), records.len());
}

#[test]
fn test_config_order_from_records() {
    let records = vec![
        run("x", Variant::Primary, &[]),
        run("y", Variant::Primary, &[]),
        run("x", Variant::Secondary, &[]),
    ];
    let order = ConfigOrder::from_records(&records);
    assert_eq!(order.len(), 2);
    assert_eq!(order.position("y"), Some(1));
}
