//! Engine-level commands, one per `run` subcommand.

#![allow(clippy::result_large_err)]

use crate::commands::registry::{DeleteOutcome, Listing};
use crate::commands::resolve::Invocation;
use crate::commands::tidy::TidyOutcome;
use runlet_core::Command;
use runlet_store::{Layout, Result, SetupReport};

/// Engine-level commands that touch the index or the script directory.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Create the script directory and an empty index.
    Init,
    /// Register a command from `<name> <scriptPath> [<min> [<max>]]`.
    Create { args: Vec<String> },
    /// Update a command from `<newName> [<scriptPath> [<min> [<max>]]]`.
    Modify { name: String, args: Vec<String> },
    /// Remove commands by name.
    Delete { names: Vec<String> },
    /// Move every script into the script directory.
    Tidy,
    /// Built-ins and registered commands.
    List,
    /// Resolve `<name> [args...]` to a program to start.
    Resolve { args: Vec<String> },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Init(SetupReport),
    Create(Command),
    Modify(Command),
    Delete(DeleteOutcome),
    Tidy(TidyOutcome),
    List(Listing),
    Resolve(Invocation),
}

/// Apply an engine command against one home layout.
pub fn apply_engine_command(cmd: EngineCommand, layout: &Layout) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Init => crate::commands::setup::setup(layout).map(EngineCommandResult::Init),
        EngineCommand::Create { args } => {
            crate::commands::registry::command_create(layout, &args).map(EngineCommandResult::Create)
        }
        EngineCommand::Modify { name, args } => {
            crate::commands::registry::command_modify(layout, &name, &args)
                .map(EngineCommandResult::Modify)
        }
        EngineCommand::Delete { names } => {
            crate::commands::registry::command_delete(layout, &names)
                .map(EngineCommandResult::Delete)
        }
        EngineCommand::Tidy => {
            crate::commands::tidy::command_tidy(layout).map(EngineCommandResult::Tidy)
        }
        EngineCommand::List => {
            crate::commands::registry::command_list(layout).map(EngineCommandResult::List)
        }
        EngineCommand::Resolve { args } => {
            crate::commands::resolve::resolve_invocation(layout, &args)
                .map(EngineCommandResult::Resolve)
        }
    }
}
