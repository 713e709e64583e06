//! First-run setup

use runlet_core::{log_op_end, log_op_error, log_op_start};
use runlet_store::{Layout, Result, SetupReport};
use std::time::Instant;

const OP: &str = "setup";

/// Create the script directory, the empty index and the readme
///
/// Safe to run repeatedly; existing files are never overwritten.
pub fn setup(layout: &Layout) -> Result<SetupReport> {
    let start = Instant::now();
    log_op_start!(OP, index = %layout.index_file().display());

    match layout.setup() {
        Ok(report) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            log_op_end!(
                OP,
                duration_ms = duration_ms,
                created_index = report.created_index,
                wrote_readme = report.wrote_readme
            );
            Ok(report)
        }
        Err(e) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            log_op_error!(OP, e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}
