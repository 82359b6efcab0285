//! Configuration and constants for the CLI.

/// Auxiliary file key whose values sum to the server count
pub const SERVER_COUNT_KEY: &str = "server_count";

/// Auxiliary file key whose values sum to the client count
pub const CLIENT_COUNT_KEY: &str = "client_count";

/// Schedule entry that consumes a metric line without recording it
pub const UNTRACKED_SLOT: &str = "_";

/// Field suffixes written by a named-statistics line, in ordinal order
pub const STAT_FIELD_SUFFIXES: [&str; 4] = ["mean", "std", "low", "high"];

/// Header names used when scale parameters get their own columns
pub const SPLIT_SCALE_HEADERS: [&str; 2] = ["nserver", "nclient"];

/// Header name used when scale parameters are folded into one label column
pub const LABEL_SCALE_HEADER: &str = "nserver_nclient(config_file)";

// Built-in pipeline presets
pub const DISPATCH_PIPELINE: &str = "dispatch";
pub const SCALING_PIPELINE: &str = "scaling";
