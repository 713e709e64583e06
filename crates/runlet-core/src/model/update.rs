use std::path::PathBuf;

use super::command::{check_bounds, Command};
use crate::errors::Result;

/// Token that means "keep the existing value" in a modify request
pub const KEEP_TOKEN: &str = "_";

/// One field of a modify request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// Retain the record's current value
    #[default]
    Keep,
    /// Replace it with this value
    Set(T),
}

impl<T> Field<T> {
    /// Resolve against the current value
    pub fn resolve(self, current: T) -> T {
        match self {
            Field::Keep => current,
            Field::Set(v) => v,
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Field::Keep)
    }
}

/// Field-level overrides applied to one record by `mod`
///
/// Values are already parsed; the merged record is re-validated as a whole
/// in [`CommandUpdate::apply`], since a new `min_args` may be fine on its own
/// and still conflict with the kept `max_args`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandUpdate {
    pub name: Field<String>,
    pub script_path: Field<PathBuf>,
    pub min_args: Field<u32>,
    pub max_args: Field<Option<u32>>,
}

impl CommandUpdate {
    /// An update that changes nothing
    pub fn keep_all() -> Self {
        Self::default()
    }

    /// True when every field is `Keep`
    pub fn is_noop(&self) -> bool {
        self.name.is_keep()
            && self.script_path.is_keep()
            && self.min_args.is_keep()
            && self.max_args.is_keep()
    }

    /// The name the record will carry after the update
    pub fn new_name(&self) -> Option<&str> {
        match &self.name {
            Field::Set(n) => Some(n.as_str()),
            Field::Keep => None,
        }
    }

    /// Merge into `cmd` in place
    ///
    /// `cmd` is left untouched when the merged bounds are invalid.
    ///
    /// # Errors
    /// * `BoundsOutOfOrder` - If the merged `max_args` is below `min_args`
    pub fn apply(&self, cmd: &mut Command) -> Result<()> {
        let min = self.min_args.clone().resolve(cmd.min_args);
        let max = self.max_args.clone().resolve(cmd.max_args);
        check_bounds(min, max)?;

        cmd.name = self.name.clone().resolve(std::mem::take(&mut cmd.name));
        cmd.script_path = self
            .script_path
            .clone()
            .resolve(std::mem::take(&mut cmd.script_path));
        cmd.min_args = min;
        cmd.max_args = max;
        Ok(())
    }
}
