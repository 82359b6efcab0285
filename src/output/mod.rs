//! Output writers for comparison tables.
//!
//! This module handles turning averaged runs into a delimited table
//! and writing it to disk without leaving partial files behind.

pub mod table;

// Re-export main functions
pub use table::{format_value, header, render_table, row, write_table};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
