//! Start a resolved script
//!
//! Usage: run <name> [args...]

use runlet_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use runlet_engine::commands::resolve::Invocation;
use runlet_store::Layout;
use std::io;
use std::process::{Command, ExitStatus};

use super::user_error;

const MISSING_SHEBANG: &str = "\
You need to add a shebang to your script.
A shebang is the first line of your script, for example:
  #!/bin/sh
or
  #!/bin/bash";

/// Resolve and run `args[0]`, returning the script's exit code
pub fn execute(layout: &Layout, args: Vec<String>) -> Result<i32, Box<dyn std::error::Error>> {
    let invocation = match apply_engine_command(EngineCommand::Resolve { args }, layout)
        .map_err(user_error)?
    {
        EngineCommandResult::Resolve(invocation) => invocation,
        other => return Err(format!("unexpected engine result: {:?}", other).into()),
    };

    let status = spawn(&invocation).map_err(|e| -> Box<dyn std::error::Error> {
        if is_missing_interpreter(&e) {
            MISSING_SHEBANG.into()
        } else {
            format!("cannot start {}: {}", invocation.program.display(), e).into()
        }
    })?;

    tracing::debug!(program = %invocation.program.display(), status = %status, "script finished");
    Ok(exit_code(status))
}

/// Run with the launcher's stdin, stdout and stderr
fn spawn(invocation: &Invocation) -> io::Result<ExitStatus> {
    Command::new(&invocation.program)
        .args(&invocation.args)
        .status()
}

/// The kernel refused the file as an executable (no `#!` line)
#[cfg(unix)]
fn is_missing_interpreter(err: &io::Error) -> bool {
    const ENOEXEC: i32 = 8;
    err.raw_os_error() == Some(ENOEXEC)
}

#[cfg(not(unix))]
fn is_missing_interpreter(_err: &io::Error) -> bool {
    false
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
