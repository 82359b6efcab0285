use crate::parser::Pipeline;
use anyhow::{bail, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Arguments for the tabulate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct TabulateArgs {
    /// Grammar, schedule and table layout to use
    pub pipeline: Pipeline,

    /// Benchmark log to read
    pub input: PathBuf,

    /// Table to write
    pub output: PathBuf,

    /// Directory auxiliary configuration files are resolved against
    pub config_root: Option<PathBuf>,

    /// Print the finished table to stdout
    pub print_summary: bool,
}

impl TabulateArgs {
    /// Fill in the pipeline's default file names where none were given
    ///
    /// Without a pipeline default, the output is the input name plus `.dat`.
    pub fn with_defaults(
        pipeline: Pipeline,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<Self> {
        let Some(input) = input.or_else(|| pipeline.default_input.clone()) else {
            bail!(
                "Pipeline '{}' has no default input; pass --input",
                pipeline.name
            );
        };
        let output = output
            .or_else(|| pipeline.default_output.clone())
            .unwrap_or_else(|| dat_path(&input));

        Ok(Self {
            pipeline,
            input,
            output,
            config_root: None,
            print_summary: false,
        })
    }
}

/// Summary of a finished tabulate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabulateReport {
    pub records: usize,
    pub configurations: usize,
    pub output: PathBuf,
}

fn dat_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".dat");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::pipeline::load_pipeline;
    use std::io::Write;

    #[test]
    fn test_preset_defaults() {
        let args = TabulateArgs::with_defaults(Pipeline::dispatch().unwrap(), None, None).unwrap();
        assert_eq!(args.input, PathBuf::from("data.log"));
        assert_eq!(args.output, PathBuf::from("data.log.dat"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let args = TabulateArgs::with_defaults(
            Pipeline::scaling().unwrap(),
            Some(PathBuf::from("runs/a.log")),
            Some(PathBuf::from("out/a.csv")),
        )
        .unwrap();
        assert_eq!(args.input, PathBuf::from("runs/a.log"));
        assert_eq!(args.output, PathBuf::from("out/a.csv"));
    }

    #[test]
    fn test_custom_pipeline_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name = "custom"
schedule = ["latency"]
columns = ["latency"]
variant_suffixes = ["a", "b"]

[boundary]
kind = "suffix"
primary = "run-a"
secondary = "run-b"
"#
        )
        .unwrap();
        let pipeline = load_pipeline(file.path()).unwrap();

        assert!(TabulateArgs::with_defaults(pipeline.clone(), None, None).is_err());

        let args =
            TabulateArgs::with_defaults(pipeline, Some(PathBuf::from("bench.log")), None).unwrap();
        assert_eq!(args.output, PathBuf::from("bench.log.dat"));
    }
}
