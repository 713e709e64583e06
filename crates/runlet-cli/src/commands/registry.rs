//! Register, change and remove commands
//!
//! Usage:
//!   run new <name> <scriptPath> [<minArgs> [<maxArgs>]]
//!   run mod <name> <newName> [<scriptPath> [<minArgs> [<maxArgs>]]]
//!   run del <name> [<name> ...]

use clap::Args;
use runlet_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use runlet_store::Layout;

use super::user_error;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Name to type after `run`
    pub name: String,

    /// Script to execute
    pub script_path: String,

    /// Fewest arguments accepted
    #[arg(allow_negative_numbers = true)]
    pub min_args: Option<String>,

    /// Most arguments accepted; -1 for no limit
    #[arg(allow_negative_numbers = true)]
    pub max_args: Option<String>,
}

/// Any value may be `_` to keep the current one
#[derive(Debug, Args)]
pub struct ModArgs {
    /// Command to change
    pub name: String,

    /// New name
    pub new_name: String,

    /// New script path
    pub script_path: Option<String>,

    /// New minimum argument count
    #[arg(allow_negative_numbers = true)]
    pub min_args: Option<String>,

    /// New maximum argument count; -1 for no limit
    #[arg(allow_negative_numbers = true)]
    pub max_args: Option<String>,
}

#[derive(Debug, Args)]
pub struct DelArgs {
    /// Commands to remove
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub fn execute_new(layout: &Layout, args: NewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = [Some(args.name), Some(args.script_path), args.min_args, args.max_args]
        .into_iter()
        .flatten()
        .collect();

    match apply_engine_command(EngineCommand::Create { args: tokens }, layout)
        .map_err(user_error)?
    {
        EngineCommandResult::Create(cmd) => {
            println!("Added {:?} -> {}", cmd.name, cmd.script_path.display());
            Ok(())
        }
        other => Err(format!("unexpected engine result: {:?}", other).into()),
    }
}

pub fn execute_mod(layout: &Layout, args: ModArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = [Some(args.new_name), args.script_path, args.min_args, args.max_args]
        .into_iter()
        .flatten()
        .collect();
    let cmd = EngineCommand::Modify {
        name: args.name,
        args: tokens,
    };

    match apply_engine_command(cmd, layout).map_err(user_error)? {
        EngineCommandResult::Modify(cmd) => {
            let max = cmd
                .max_args
                .map_or_else(|| "any".to_string(), |m| m.to_string());
            println!(
                "Updated {:?} -> {} (args: {}..{})",
                cmd.name,
                cmd.script_path.display(),
                cmd.min_args,
                max
            );
            Ok(())
        }
        other => Err(format!("unexpected engine result: {:?}", other).into()),
    }
}

pub fn execute_del(layout: &Layout, args: DelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = match apply_engine_command(EngineCommand::Delete { names: args.names }, layout)
        .map_err(user_error)?
    {
        EngineCommandResult::Delete(outcome) => outcome,
        other => return Err(format!("unexpected engine result: {:?}", other).into()),
    };

    for name in &outcome.removed {
        println!("Deleted {:?}.", name);
    }
    if !outcome.unmatched.is_empty() {
        for name in &outcome.unmatched {
            println!("Cannot delete non-existent command {:?}.", name);
        }
        println!("See all commands:\n\trun list");
    }
    Ok(())
}
