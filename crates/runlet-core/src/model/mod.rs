pub mod command;
pub mod update;

pub use command::{check_bounds, Command};
pub use update::{CommandUpdate, Field, KEEP_TOKEN};
