//! Scale parameter resolution.
//!
//! Each record carries the server and client counts of the configuration it
//! ran under. Depending on the pipeline those counts live either in an
//! auxiliary `key=value` file named by the configuration key, or inline in
//! the key itself as `label:count` segments.

use super::pipeline::ScaleSource;
use super::schema::ScaleParams;
use crate::utils::config::{CLIENT_COUNT_KEY, SERVER_COUNT_KEY};
use crate::utils::error::ConfigError;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves a configuration key to its scale parameters
pub trait ScaleResolver {
    fn resolve(&mut self, config_key: &str) -> Result<ScaleParams, ConfigError>;
}

/// Reads auxiliary configuration files, relative to an optional root
#[derive(Debug, Default)]
pub struct FileScaleResolver {
    root: Option<PathBuf>,
    cache: HashMap<String, ScaleParams>,
}

impl FileScaleResolver {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            cache: HashMap::new(),
        }
    }

    fn path_for(&self, config_key: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(config_key),
            None => PathBuf::from(config_key),
        }
    }
}

impl ScaleResolver for FileScaleResolver {
    fn resolve(&mut self, config_key: &str) -> Result<ScaleParams, ConfigError> {
        if let Some(params) = self.cache.get(config_key) {
            return Ok(*params);
        }

        let path = self.path_for(config_key);
        let params = read_scale_file(&path)?;
        debug!(
            "Resolved {} -> {} servers, {} clients",
            path.display(),
            params.server_count,
            params.client_count
        );
        self.cache.insert(config_key.to_string(), params);
        Ok(params)
    }
}

/// Extracts counts from `label:count` segments of the key itself
///
/// The first count is the server count and the last the client count.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineScaleResolver;

impl ScaleResolver for InlineScaleResolver {
    fn resolve(&mut self, config_key: &str) -> Result<ScaleParams, ConfigError> {
        Ok(parse_inline_scale(config_key))
    }
}

/// Create the resolver a pipeline's scale source calls for
pub fn resolver_for(source: ScaleSource, root: Option<PathBuf>) -> Box<dyn ScaleResolver> {
    match source {
        ScaleSource::File => Box::new(FileScaleResolver::new(root)),
        ScaleSource::Inline => Box::new(InlineScaleResolver),
    }
}

/// Read and sum the scale keys of an auxiliary configuration file
///
/// # Errors
/// * `ConfigError::Io` - the file cannot be read
pub fn read_scale_file(path: &Path) -> Result<ScaleParams, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_scale_file(&String::from_utf8_lossy(&bytes)))
}

/// Sum every `server_count=` and `client_count=` line
///
/// Keys may repeat (one declaration per include section); each occurrence
/// adds to the total. A file without either key resolves to zero counts.
pub fn parse_scale_file(contents: &str) -> ScaleParams {
    let mut params = ScaleParams::default();

    for (number, line) in contents.lines().enumerate() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let target = match key.trim() {
            SERVER_COUNT_KEY => &mut params.server_count,
            CLIENT_COUNT_KEY => &mut params.client_count,
            _ => continue,
        };
        match value.trim().parse::<u64>() {
            Ok(count) => match target.checked_add(count) {
                Some(total) => *target = total,
                None => warn!(
                    "Ignoring {} on line {}: total would overflow ({} + {})",
                    key.trim(),
                    number + 1,
                    target,
                    count
                ),
            },
            Err(e) => warn!(
                "Ignoring non-integer {} on line {}: '{}' ({})",
                key.trim(),
                number + 1,
                value.trim(),
                e
            ),
        }
    }

    params
}

/// Pull `label:count` integers out of a comma-separated key
pub fn parse_inline_scale(config_key: &str) -> ScaleParams {
    let counts: Vec<u64> = config_key
        .split(',')
        .filter_map(|segment| {
            let (_, value) = segment.trim().rsplit_once(':')?;
            value.trim().parse::<u64>().ok()
        })
        .collect();

    match (counts.first(), counts.last()) {
        (Some(&servers), Some(&clients)) => ScaleParams::new(servers, clients),
        _ => {
            debug!("No inline scale counts in '{}'", config_key);
            ScaleParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_scale_file_sums_repeated_keys() {
        let params = parse_scale_file("server_count=3\nclient_count = 2\n\n# comment\nclient_count=3\n");
        assert_eq!(params, ScaleParams::new(3, 5));
    }

    #[test]
    fn test_parse_scale_file_without_keys_is_zero() {
        assert_eq!(parse_scale_file("threads=8\nport=9000"), ScaleParams::default());
    }

    #[test]
    fn test_parse_scale_file_skips_bad_values() {
        assert_eq!(
            parse_scale_file("server_count=two\nserver_count=2"),
            ScaleParams::new(2, 0)
        );
    }

    #[test]
    fn test_parse_scale_file_skips_overflowing_value() {
        let params = parse_scale_file("client_count=18446744073709551615\nclient_count=1\nserver_count=2\n");
        assert_eq!(params, ScaleParams::new(2, u64::MAX));
    }

    #[test]
    fn test_read_scale_file_tolerates_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"server_count=2\n# \xff\xfe junk\nclient_count=7\n").unwrap();

        assert_eq!(read_scale_file(file.path()).unwrap(), ScaleParams::new(2, 7));
    }

    #[test]
    fn test_key_must_match_exactly() {
        assert_eq!(
            parse_scale_file("server_count_max=10\nclient_count=1"),
            ScaleParams::new(0, 1)
        );
    }

    #[test]
    fn test_parse_inline_scale() {
        assert_eq!(
            parse_inline_scale("servers:4, queue:2, clients:16"),
            ScaleParams::new(4, 16)
        );
        assert_eq!(parse_inline_scale("no counts here"), ScaleParams::default());
    }

    #[test]
    fn test_file_resolver_reads_and_caches() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "server_count=1\nclient_count=6").unwrap();

        let mut resolver = FileScaleResolver::new(None);
        let key = file.path().to_str().unwrap().to_string();
        assert_eq!(resolver.resolve(&key).unwrap(), ScaleParams::new(1, 6));

        // Served from cache once the file is gone
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
        assert_eq!(resolver.resolve(&key).unwrap(), ScaleParams::new(1, 6));
    }

    #[test]
    fn test_file_resolver_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = FileScaleResolver::new(Some(dir.path().to_path_buf()));
        assert!(matches!(
            resolver.resolve("missing.conf"),
            Err(ConfigError::Io { .. })
        ));
    }
}
