//! Show built-in and registered commands
//!
//! Usage: run list

use runlet_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use runlet_store::Layout;

use super::user_error;

pub fn execute(layout: &Layout) -> Result<(), Box<dyn std::error::Error>> {
    let listing = match apply_engine_command(EngineCommand::List, layout).map_err(user_error)? {
        EngineCommandResult::List(listing) => listing,
        other => return Err(format!("unexpected engine result: {:?}", other).into()),
    };

    println!("run commands:");
    println!("{:<10} {}", "Name", "Location");
    for builtin in listing.builtins {
        println!("{:<10} internal", builtin);
    }
    for cmd in &listing.commands {
        println!("{:<10} {}", cmd.name, cmd.script_path.display());
    }
    Ok(())
}
