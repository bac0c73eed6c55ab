//! CLI command handlers, one file per command.

mod probe;
mod run;
mod scan;

pub use probe::run_probe;
pub use run::{run_pipeline, RunOptions};
pub use scan::run_scan;
