//! Paired comparison table writer.
//!
//! One header row, then one row per configuration in discovery order.
//! Each metric becomes two adjacent columns: primary variant first,
//! secondary second.

use super::validate_path;
use crate::aggregator::AveragedRuns;
use crate::parser::pipeline::{Pipeline, ScaleLayout};
use crate::parser::schema::{Record, ScaleParams, Variant};
use crate::utils::config::{LABEL_SCALE_HEADER, SPLIT_SCALE_HEADERS};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Column names for a pipeline, in output order
pub fn header(pipeline: &Pipeline) -> Vec<String> {
    let mut columns: Vec<String> = match pipeline.scale_layout {
        ScaleLayout::Split => SPLIT_SCALE_HEADERS.iter().map(|s| s.to_string()).collect(),
        ScaleLayout::Label => vec![LABEL_SCALE_HEADER.to_string()],
    };

    for field in pipeline.schema.fields() {
        for suffix in &pipeline.variant_suffixes {
            columns.push(format!("{}_{}", field, suffix));
        }
    }
    columns
}

/// Cells of one data row
pub fn row(pipeline: &Pipeline, primary: &Record, secondary: &Record) -> Vec<String> {
    let mut cells = scale_cells(pipeline.scale_layout, primary.scale);

    for (a, b) in primary.metrics.iter().zip(&secondary.metrics) {
        cells.push(format_value(*a, pipeline.precision));
        cells.push(format_value(*b, pipeline.precision));
    }
    cells
}

fn scale_cells(layout: ScaleLayout, scale: ScaleParams) -> Vec<String> {
    match layout {
        ScaleLayout::Split => vec![
            scale.server_count.to_string(),
            scale.client_count.to_string(),
        ],
        ScaleLayout::Label => vec![format!(
            "s:{}_c:{}",
            scale.server_count, scale.client_count
        )],
    }
}

/// Format a metric value
///
/// Without a precision the shortest representation that round-trips is used.
pub fn format_value(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!("{:.*}", digits, value),
        None => value.to_string(),
    }
}

/// Render the complete table in memory
///
/// **Public** - main entry point for table rendering
///
/// # Errors
/// * `OutputError::MissingVariant` - a configuration lacks one of its two averages
/// * `OutputError::EncodeFailed` - a row's width differs from the header's
pub fn render_table(pipeline: &Pipeline, runs: &AveragedRuns) -> Result<Vec<u8>, OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(pipeline.delimiter)
        .from_writer(Vec::new());

    writer.write_record(header(pipeline))?;

    for config_key in runs.order.iter() {
        let [primary, secondary] = Variant::ALL.map(|variant| {
            runs.get(config_key, variant)
                .map(|avg| &avg.record)
                .ok_or_else(|| OutputError::MissingVariant {
                    config_key: config_key.to_string(),
                    variant,
                })
        });
        writer.write_record(row(pipeline, primary?, secondary?))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::WriteFailed(e.into_error()))?;
    debug!(
        "Rendered {} row(s), {} bytes",
        runs.order.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Write a rendered table to disk atomically
///
/// The bytes go to a temporary file next to the target which is then
/// renamed over it, so a failed run never leaves a partial table behind.
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write or rename
pub fn write_table(contents: &[u8], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing table to: {}", output_path.display());
    validate_path(output_path)?;

    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        debug!("Creating parent directories: {}", parent.display());
        fs::create_dir_all(parent).map_err(|e| {
            OutputError::InvalidPath(format!(
                "Cannot create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged
        .persist(output_path)
        .map_err(|e| OutputError::WriteFailed(e.error))?;

    info!("Table written successfully ({} bytes)", contents.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(12.5, None), "12.5");
        assert_eq!(format_value(3.0, None), "3");
        assert_eq!(format_value(0.1, Some(6)), "0.100000");
    }

    #[test]
    fn test_dispatch_header() {
        let pipeline = Pipeline::dispatch().unwrap();
        assert_eq!(
            header(&pipeline),
            vec![
                "nserver",
                "nclient",
                "add_req_h",
                "add_req_pq",
                "complete_req_h",
                "complete_req_pq"
            ]
        );
    }

    #[test]
    fn test_label_layout() {
        let mut pipeline = Pipeline::dispatch().unwrap();
        pipeline.scale_layout = ScaleLayout::Label;
        pipeline.precision = Some(2);

        let primary = Record {
            config_key: "a".to_string(),
            variant: Variant::Primary,
            scale: ScaleParams::new(3, 4),
            metrics: vec![1.0, 2.0],
        };
        let secondary = Record {
            variant: Variant::Secondary,
            metrics: vec![5.0, 6.0],
            ..primary.clone()
        };

        assert_eq!(header(&pipeline)[0], LABEL_SCALE_HEADER);
        assert_eq!(
            row(&pipeline, &primary, &secondary),
            vec!["s:3_c:4", "1.00", "5.00", "2.00", "6.00"]
        );
    }

    #[test]
    fn test_render_empty_table_has_header_only() {
        let pipeline = Pipeline::scaling().unwrap();
        let runs = aggregate(&[]).unwrap();
        let bytes = render_table(&pipeline, &runs).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("nserver,nclient,cl_track_response_h,cl_track_response_v,"));
    }
}
