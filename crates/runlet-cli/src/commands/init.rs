//! First-run setup
//!
//! Usage: run init

use runlet_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use runlet_store::Layout;

use super::user_error;

pub fn execute(layout: &Layout) -> Result<(), Box<dyn std::error::Error>> {
    match apply_engine_command(EngineCommand::Init, layout).map_err(user_error)? {
        EngineCommandResult::Init(report) => {
            if report.created_index {
                println!("Created {}", layout.index_file().display());
            } else {
                println!("Already set up: {}", layout.index_file().display());
            }
            println!("Put your scripts in {}", layout.script_dir().display());
            Ok(())
        }
        other => Err(format!("unexpected engine result: {:?}", other).into()),
    }
}
