//! Pipeline definitions: boundary grammar, metric schedule and output schema.
//!
//! A pipeline is plain data. The two benchmark harnesses this tool grew up
//! with are available as presets; anything else can be described in TOML
//! and loaded with [`load_pipeline`].

use super::schema::{FieldId, Schema};
use crate::utils::config::{
    DISPATCH_PIPELINE, SCALING_PIPELINE, STAT_FIELD_SUFFIXES, UNTRACKED_SLOT,
};
use crate::utils::error::PipelineError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How a record-boundary line is recognized
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryRule {
    /// `<keyword>:<tag>...:<config key>`; a tag starting with `primary_tag`
    /// selects the primary variant
    Keyword { keyword: String, primary_tag: String },

    /// Line ends with one of two variant suffixes; the rest of the line is
    /// the configuration key
    Suffix { primary: String, secondary: String },
}

/// Where a record's scale parameters come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleSource {
    /// The configuration key names an auxiliary `key=value` file
    File,
    /// The configuration key itself carries `label:count` segments
    Inline,
}

/// How scale parameters are laid out in the output table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleLayout {
    /// Separate `nserver` and `nclient` columns
    #[default]
    Split,
    /// One `s:<servers>_c:<clients>` column
    Label,
}

/// A named-statistics line and the column prefix its four values land in
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhaseDef {
    pub keyword: String,
    pub prefix: String,
}

/// Serialized form of a pipeline, as written in a TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineDef {
    pub name: String,

    pub boundary: BoundaryRule,

    #[serde(default = "default_scale_source")]
    pub scale_source: ScaleSource,

    #[serde(default = "default_metric_keyword")]
    pub metric_keyword: String,

    /// Column names consumed one per metric line; `_` absorbs a line
    pub schedule: Vec<String>,

    #[serde(default)]
    pub phases: Vec<PhaseDef>,

    /// Output column order
    pub columns: Vec<String>,

    /// Header suffixes for the primary and secondary variant
    pub variant_suffixes: [String; 2],

    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    #[serde(default)]
    pub scale_layout: ScaleLayout,

    /// Fixed number of decimals; shortest round-trip form when absent
    #[serde(default)]
    pub precision: Option<usize>,

    #[serde(default)]
    pub default_input: Option<PathBuf>,

    #[serde(default)]
    pub default_output: Option<PathBuf>,
}

fn default_scale_source() -> ScaleSource {
    ScaleSource::File
}

fn default_metric_keyword() -> String {
    "average".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// A named-statistics phase resolved against the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub keyword: String,
    /// Destinations for mean, std-dev, low and high
    pub fields: [FieldId; 4],
}

/// A validated pipeline ready to drive the parser and table writer
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub name: String,
    pub boundary: BoundaryRule,
    pub scale_source: ScaleSource,
    pub metric_keyword: String,
    /// Slot per metric line; `None` slots are consumed but not recorded
    pub schedule: Vec<Option<FieldId>>,
    pub phases: Vec<Phase>,
    pub schema: Schema,
    pub variant_suffixes: [String; 2],
    pub delimiter: u8,
    pub scale_layout: ScaleLayout,
    pub precision: Option<usize>,
    pub default_input: Option<PathBuf>,
    pub default_output: Option<PathBuf>,
}

impl Pipeline {
    /// Validate a definition and resolve every column reference
    pub fn compile(def: PipelineDef) -> Result<Self, PipelineError> {
        if def.columns.is_empty() {
            return invalid(format!("pipeline '{}' declares no columns", def.name));
        }
        let schema = Schema::new(def.columns)
            .map_err(|dup| PipelineError::Invalid(format!("duplicate column '{}'", dup)))?;

        if def.metric_keyword.trim().is_empty() {
            return invalid("metric keyword is empty".to_string());
        }
        validate_boundary(&def.boundary)?;

        let [primary, secondary] = &def.variant_suffixes;
        if primary.is_empty() || secondary.is_empty() || primary == secondary {
            return invalid(format!(
                "variant suffixes must be two distinct non-empty strings, got '{}' and '{}'",
                primary, secondary
            ));
        }

        let delimiter = match def.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => {
                return invalid(format!(
                    "delimiter must be a single ASCII character, got '{}'",
                    def.delimiter
                ))
            }
        };

        let schedule = def
            .schedule
            .iter()
            .map(|name| {
                if name == UNTRACKED_SLOT {
                    Ok(None)
                } else {
                    column(&schema, name).map(Some)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let phases = def
            .phases
            .iter()
            .map(|phase| compile_phase(&schema, phase))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Compiled pipeline '{}': {} columns, {} schedule slots, {} phases",
            def.name,
            schema.len(),
            schedule.len(),
            phases.len()
        );

        Ok(Self {
            name: def.name,
            boundary: def.boundary,
            scale_source: def.scale_source,
            metric_keyword: def.metric_keyword,
            schedule,
            phases,
            schema,
            variant_suffixes: def.variant_suffixes,
            delimiter,
            scale_layout: def.scale_layout,
            precision: def.precision,
            default_input: def.default_input,
            default_output: def.default_output,
        })
    }

    /// Look up a built-in pipeline by name
    pub fn preset(name: &str) -> Result<Self, PipelineError> {
        match name {
            DISPATCH_PIPELINE => Self::compile(dispatch_def()),
            SCALING_PIPELINE => Self::compile(scaling_def()),
            other => invalid(format!(
                "unknown pipeline '{}' (expected '{}' or '{}')",
                other, DISPATCH_PIPELINE, SCALING_PIPELINE
            )),
        }
    }

    /// Heap vs priority-queue dispatch benchmark
    pub fn dispatch() -> Result<Self, PipelineError> {
        Self::preset(DISPATCH_PIPELINE)
    }

    /// Horizontal vs vertical scaling benchmark
    pub fn scaling() -> Result<Self, PipelineError> {
        Self::preset(SCALING_PIPELINE)
    }

    /// Number of schedule slots that actually record a value
    pub fn tracked_slots(&self) -> usize {
        self.schedule.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Load and validate a pipeline from a TOML file
///
/// # Errors
/// * `PipelineError::Io` - file cannot be read
/// * `PipelineError::Toml` - file is not a valid pipeline definition
/// * `PipelineError::Invalid` - definition references unknown columns etc.
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<Pipeline, PipelineError> {
    let path = path.as_ref();
    debug!("Loading pipeline definition from: {}", path.display());
    let contents = fs::read_to_string(path)?;
    let def: PipelineDef = toml::from_str(&contents)?;
    Pipeline::compile(def)
}

fn invalid<T>(message: String) -> Result<T, PipelineError> {
    Err(PipelineError::Invalid(message))
}

fn column(schema: &Schema, name: &str) -> Result<FieldId, PipelineError> {
    schema
        .index_of(name)
        .ok_or_else(|| PipelineError::Invalid(format!("'{}' is not a declared column", name)))
}

fn compile_phase(schema: &Schema, phase: &PhaseDef) -> Result<Phase, PipelineError> {
    if phase.keyword.trim().is_empty() {
        return invalid(format!("phase '{}' has an empty keyword", phase.prefix));
    }
    let mut fields = [0; 4];
    for (slot, suffix) in fields.iter_mut().zip(STAT_FIELD_SUFFIXES) {
        *slot = column(schema, &format!("{}_{}", phase.prefix, suffix))?;
    }
    Ok(Phase {
        keyword: phase.keyword.clone(),
        fields,
    })
}

fn validate_boundary(rule: &BoundaryRule) -> Result<(), PipelineError> {
    match rule {
        BoundaryRule::Keyword {
            keyword,
            primary_tag,
        } => {
            if keyword.is_empty() || primary_tag.is_empty() {
                return invalid("keyword boundary needs a keyword and a primary tag".to_string());
            }
        }
        BoundaryRule::Suffix { primary, secondary } => {
            if primary.is_empty() || secondary.is_empty() || primary == secondary {
                return invalid("suffix boundary needs two distinct suffixes".to_string());
            }
        }
    }
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn dispatch_def() -> PipelineDef {
    PipelineDef {
        name: DISPATCH_PIPELINE.to_string(),
        boundary: BoundaryRule::Keyword {
            keyword: "file_name".to_string(),
            primary_tag: "heap".to_string(),
        },
        scale_source: ScaleSource::File,
        metric_keyword: default_metric_keyword(),
        // The first two averages of a run are warm-up figures
        schedule: strings(&[UNTRACKED_SLOT, UNTRACKED_SLOT, "add_req", "complete_req"]),
        phases: Vec::new(),
        columns: strings(&["add_req", "complete_req"]),
        variant_suffixes: ["h".to_string(), "pq".to_string()],
        delimiter: " ".to_string(),
        scale_layout: ScaleLayout::Split,
        precision: None,
        default_input: Some(PathBuf::from("data.log")),
        default_output: Some(PathBuf::from("data.log.dat")),
    }
}

fn scaling_def() -> PipelineDef {
    PipelineDef {
        name: SCALING_PIPELINE.to_string(),
        boundary: BoundaryRule::Suffix {
            primary: "iih".to_string(),
            secondary: "iiv".to_string(),
        },
        scale_source: ScaleSource::Inline,
        metric_keyword: default_metric_keyword(),
        schedule: strings(&[
            "cl_track_response",
            "cl_req_param",
            "sr_total_time_to_add_req",
            "sr_total_time_to_complete_req",
        ]),
        phases: vec![
            PhaseDef {
                keyword: "Server add_request_timer".to_string(),
                prefix: "sr_add_req_time".to_string(),
            },
            PhaseDef {
                keyword: "Server request_complete_timer".to_string(),
                prefix: "sr_req_complete_time".to_string(),
            },
        ],
        columns: strings(&[
            "cl_track_response",
            "cl_req_param",
            "sr_add_req_time_mean",
            "sr_add_req_time_std",
            "sr_add_req_time_low",
            "sr_add_req_time_high",
            "sr_req_complete_time_mean",
            "sr_req_complete_time_std",
            "sr_req_complete_time_low",
            "sr_req_complete_time_high",
            "sr_total_time_to_add_req",
            "sr_total_time_to_complete_req",
        ]),
        variant_suffixes: ["h".to_string(), "v".to_string()],
        delimiter: ",".to_string(),
        scale_layout: ScaleLayout::Split,
        precision: None,
        default_input: Some(PathBuf::from("result.log")),
        default_output: Some(PathBuf::from("result.csv")),
    }
}
