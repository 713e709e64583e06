use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{Result, RunletError};

/// A registered command: a short name bound to a script file
///
/// Serialized as one element of the index array:
/// `{"name":"build","scriptPath":"/s/b.sh","minArgs":0,"maxArgs":-1}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Name typed after `run`
    pub name: String,

    /// Absolute path of the script to execute
    pub script_path: PathBuf,

    /// Fewest arguments the script accepts
    pub min_args: u32,

    /// Most arguments the script accepts; `None` (stored as -1) means unbounded
    #[serde(with = "unbounded")]
    pub max_args: Option<u32>,
}

impl Command {
    /// Create a command that accepts any number of arguments
    pub fn new(name: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            script_path: script_path.into(),
            min_args: 0,
            max_args: None,
        }
    }

    /// Set the argument bounds
    ///
    /// # Errors
    /// * `BoundsOutOfOrder` - If `max` is bounded and smaller than `min`
    pub fn with_bounds(mut self, min: u32, max: Option<u32>) -> Result<Self> {
        check_bounds(min, max)?;
        self.min_args = min;
        self.max_args = max;
        Ok(self)
    }

    /// File name of the script, if the path has one
    pub fn script_file_name(&self) -> Option<&str> {
        self.script_path.file_name().and_then(|n| n.to_str())
    }

    /// Whether the script already lives somewhere below `dir`
    pub fn is_under(&self, dir: &Path) -> bool {
        self.script_path.starts_with(dir)
    }

    /// Whether `count` user arguments fall inside the bounds
    pub fn accepts(&self, count: usize) -> bool {
        let above_min = count >= self.min_args as usize;
        let below_max = self.max_args.map_or(true, |max| count <= max as usize);
        above_min && below_max
    }

    /// Check an invocation's argument count against the bounds
    ///
    /// # Errors
    /// * `ArgsOutOfRange` - If `count` is outside `[min_args, max_args]`
    pub fn check_arity(&self, count: usize) -> Result<()> {
        if self.accepts(count) {
            return Ok(());
        }

        let (qualifier, limit) = match self.max_args {
            Some(max) if count > max as usize => ("at most", max),
            _ => ("at least", self.min_args),
        };

        Err(RunletError::ArgsOutOfRange {
            name: self.name.clone(),
            qualifier,
            limit,
            plural: if limit == 1 { "" } else { "s" },
        })
    }

    /// Serialize to the compact JSON form written into the index
    ///
    /// # Errors
    /// * `Serialization` - If the record cannot be encoded (non-UTF-8 path)
    pub fn to_record_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Validate a `(min, max)` pair
///
/// # Errors
/// * `BoundsOutOfOrder` - If `max` is bounded and smaller than `min`
pub fn check_bounds(min: u32, max: Option<u32>) -> Result<()> {
    match max {
        Some(max) if max < min => Err(RunletError::BoundsOutOfOrder { min, max }),
        _ => Ok(()),
    }
}

/// `Option<u32>` on the wire as an integer where -1 means `None`
mod unbounded {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_i64(i64::from(*v)),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let raw = i64::deserialize(d)?;
        match raw {
            -1 => Ok(None),
            v => u32::try_from(v)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("maxArgs out of range: {}", v))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_uses_minus_one_for_unbounded() {
        let cmd = Command::new("build", "/s/b.sh");
        let json = String::from_utf8(cmd.to_record_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"build","scriptPath":"/s/b.sh","minArgs":0,"maxArgs":-1}"#
        );
    }

    #[test]
    fn test_decode_bounded_record() {
        let cmd: Command = serde_json::from_str(
            r#"{"name":"deploy","scriptPath":"/s/d.sh","minArgs":1,"maxArgs":2}"#,
        )
        .unwrap();
        assert_eq!(cmd.min_args, 1);
        assert_eq!(cmd.max_args, Some(2));
    }

    #[test]
    fn test_decode_rejects_negative_max_other_than_minus_one() {
        let result = serde_json::from_str::<Command>(
            r#"{"name":"x","scriptPath":"/x","minArgs":0,"maxArgs":-2}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let cmd: Command = serde_json::from_str(
            r#"{"name":"x","scriptPath":"/x","minArgs":0,"maxArgs":-1,"note":"hi"}"#,
        )
        .unwrap();
        assert_eq!(cmd.name, "x");
    }

    #[test]
    fn test_accepts_respects_bounds() {
        let cmd = Command::new("x", "/x").with_bounds(1, Some(2)).unwrap();
        assert!(!cmd.accepts(0));
        assert!(cmd.accepts(1));
        assert!(cmd.accepts(2));
        assert!(!cmd.accepts(3));

        let open = Command::new("y", "/y");
        assert!(open.accepts(0));
        assert!(open.accepts(1000));
    }

    #[test]
    fn test_check_arity_messages() {
        let cmd = Command::new("deploy", "/d").with_bounds(1, Some(3)).unwrap();

        let too_few = cmd.check_arity(0).unwrap_err();
        assert_eq!(too_few.to_string(), "\"deploy\" expects at least 1 argument.");

        let too_many = cmd.check_arity(4).unwrap_err();
        assert_eq!(too_many.to_string(), "\"deploy\" expects at most 3 arguments.");
    }

    #[test]
    fn test_with_bounds_rejects_inverted_range() {
        let err = Command::new("x", "/x").with_bounds(3, Some(1)).unwrap_err();
        assert_eq!(err, RunletError::BoundsOutOfOrder { min: 3, max: 1 });
    }

    #[test]
    fn test_is_under_compares_whole_components() {
        let cmd = Command::new("x", "/home/u/.run/cmd/unix/x.sh");
        assert!(cmd.is_under(Path::new("/home/u/.run/cmd/unix")));
        assert!(!cmd.is_under(Path::new("/home/u/.run/cmd/uni")));
    }
}
