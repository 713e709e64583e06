//! Move registered scripts into the script directory
//!
//! Usage: run tidy

use runlet_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use runlet_store::Layout;

use super::user_error;

pub fn execute(layout: &Layout) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = match apply_engine_command(EngineCommand::Tidy, layout).map_err(user_error)? {
        EngineCommandResult::Tidy(outcome) => outcome,
        other => return Err(format!("unexpected engine result: {:?}", other).into()),
    };

    for moved in &outcome.moved {
        if moved.renamed() {
            println!(
                "Renaming {} to {} because of a script name collision in {}.",
                moved.from.display(),
                moved.to.display(),
                layout.script_dir().display()
            );
        } else {
            println!("Moved {} to {}", moved.from.display(), moved.to.display());
        }
    }
    for failed in &outcome.failed {
        println!(
            "Failed to move {:?} ({}): {}",
            failed.command,
            failed.path.display(),
            failed.reason
        );
    }
    println!(
        "{} moved, {} already in place, {} failed.",
        outcome.moved.len(),
        outcome.already_managed,
        outcome.failed.len()
    );
    Ok(())
}
