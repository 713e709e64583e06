//! run CLI
//!
//! Personal command launcher: bind short names to scripts, then `run <name>`.

use clap::{Parser, Subcommand};
use runlet_core::logging_facility;

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "run")]
#[command(about = "run - launch your scripts by short name", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: config::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the script directory and an empty command index
    Init,
    /// Register a script under a name
    New(commands::registry::NewArgs),
    /// Change a registered command (`_` keeps a value)
    Mod(commands::registry::ModArgs),
    /// Remove registered commands
    Del(commands::registry::DelArgs),
    /// Move every registered script into the script directory
    Tidy,
    /// Show built-in and registered commands
    List,
    /// Run a command: run <name> [args...]
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.global.profile());

    let result = cli
        .global
        .layout()
        .map_err(commands::user_error)
        .and_then(|layout| match cli.command {
            Commands::Init => commands::init::execute(&layout).map(|()| 0),
            Commands::New(args) => commands::registry::execute_new(&layout, args).map(|()| 0),
            Commands::Mod(args) => commands::registry::execute_mod(&layout, args).map(|()| 0),
            Commands::Del(args) => commands::registry::execute_del(&layout, args).map(|()| 0),
            Commands::Tidy => commands::tidy::execute(&layout).map(|()| 0),
            Commands::List => commands::list::execute(&layout).map(|()| 0),
            Commands::External(args) => commands::exec::execute(&layout, args),
        });

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
