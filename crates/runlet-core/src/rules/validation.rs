use std::path::{Path, PathBuf};

use crate::errors::{Result, RunletError};
use crate::model::{Command, CommandUpdate, Field, KEEP_TOKEN};

/// Subcommand names the CLI claims for itself
pub const RESERVED_NAMES: &[&str] = &["init", "new", "mod", "del", "tidy", "list", "help"];

/// Check that `name` can be typed as the first token after `run`
///
/// # Errors
/// * `InvalidName` - Empty, leading `-`, whitespace or path separators
/// * `ReservedName` - Clashes with a built-in subcommand
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| RunletError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.starts_with('-') {
        return Err(invalid("name cannot start with '-'"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("name cannot contain whitespace"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    if name == KEEP_TOKEN {
        return Err(invalid("'_' means \"keep the current value\""));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(RunletError::ReservedName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Parse a `minArgs` token
///
/// # Errors
/// * `InvalidBound` - Not an integer, or negative
pub fn parse_min_args(raw: &str) -> Result<u32> {
    let value = parse_int("minArgs", raw)?;
    u32::try_from(value).map_err(|_| RunletError::InvalidBound {
        field: "minArgs".to_string(),
        value: raw.to_string(),
        reason: "must be between 0 and 4294967295".to_string(),
    })
}

/// Parse a `maxArgs` token; `-1` means unbounded
///
/// # Errors
/// * `InvalidBound` - Not an integer, or negative other than -1
pub fn parse_max_args(raw: &str) -> Result<Option<u32>> {
    match parse_int("maxArgs", raw)? {
        -1 => Ok(None),
        value => u32::try_from(value)
            .map(Some)
            .map_err(|_| RunletError::InvalidBound {
                field: "maxArgs".to_string(),
                value: raw.to_string(),
                reason: "must be -1 or between 0 and 4294967295".to_string(),
            }),
    }
}

fn parse_int(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| RunletError::InvalidBound {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Make a user-supplied script path absolute against the working directory
///
/// # Errors
/// * `UnresolvablePath` - Empty path or no working directory
pub fn absolute_script_path(raw: &Path) -> Result<PathBuf> {
    std::path::absolute(raw).map_err(|e| RunletError::UnresolvablePath {
        path: raw.display().to_string(),
        reason: e.to_string(),
    })
}

/// Build a record from `new` arguments: `<name> <scriptPath> [<min> [<max>]]`
///
/// Bounds default to "any number of arguments". The script's existence is
/// not checked here.
///
/// # Errors
/// * `WrongArgCount` - Fewer than 2 or more than 4 tokens
/// * `InvalidName`, `ReservedName`, `InvalidBound`, `BoundsOutOfOrder`
pub fn parse_new_args(args: &[String]) -> Result<Command> {
    let (name, script, rest) = match args {
        [name, script, rest @ ..] if rest.len() <= 2 => (name, script, rest),
        _ => {
            return Err(RunletError::WrongArgCount {
                expected: "2 to 4".to_string(),
                found: args.len(),
            })
        }
    };

    validate_name(name)?;
    let script_path = absolute_script_path(Path::new(script))?;

    let min = match rest.first() {
        Some(raw) => parse_min_args(raw)?,
        None => 0,
    };
    let max = match rest.get(1) {
        Some(raw) => parse_max_args(raw)?,
        None => None,
    };

    Command::new(name.clone(), script_path).with_bounds(min, max)
}

/// Build an update from `mod` arguments: `<newName> [<scriptPath> [<min> [<max>]]]`
///
/// Any token may be [`KEEP_TOKEN`].
///
/// # Errors
/// * `WrongArgCount` - Zero or more than 4 tokens
/// * `InvalidName`, `ReservedName`, `InvalidBound`
pub fn parse_update_args(args: &[String]) -> Result<CommandUpdate> {
    if args.is_empty() || args.len() > 4 {
        return Err(RunletError::WrongArgCount {
            expected: "1 to 4".to_string(),
            found: args.len(),
        });
    }

    let token = |i: usize| args.get(i).map(String::as_str).filter(|t| *t != KEEP_TOKEN);

    let name = match token(0) {
        Some(n) => {
            validate_name(n)?;
            Field::Set(n.to_string())
        }
        None => Field::Keep,
    };
    let script_path = match token(1) {
        Some(p) => Field::Set(absolute_script_path(Path::new(p))?),
        None => Field::Keep,
    };
    let min_args = match token(2) {
        Some(raw) => Field::Set(parse_min_args(raw)?),
        None => Field::Keep,
    };
    let max_args = match token(3) {
        Some(raw) => Field::Set(parse_max_args(raw)?),
        None => Field::Keep,
    };

    Ok(CommandUpdate {
        name,
        script_path,
        min_args,
        max_args,
    })
}
