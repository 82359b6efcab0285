//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod tabulate;
pub mod utils;

// Re-export main command functions
pub use models::{TabulateArgs, TabulateReport};
pub use tabulate::{execute_tabulate, validate_args};
pub use utils::{display_schema, display_version};
