//! Bench Digest
//!
//! Turns the text logs of repeated client/server load-test runs into a
//! fixed-schema table comparing two run variants per configuration.
//!
//! The pipeline is strictly one-directional:
//! raw lines → classified events → records → averaged runs → table rows.
//!
//! ```bash
//! bench-digest tabulate dispatch
//! bench-digest tabulate scaling --input result.log --summary
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
