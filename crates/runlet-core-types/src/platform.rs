//! Host platform detection
//!
//! Scripts are namespaced per platform family so a shared home directory can
//! hold both shell scripts and batch files without mixing them up.

use std::fmt;

/// Platform family a script directory belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Detect the platform of the running binary
    ///
    /// Returns `None` on targets that have no script namespace.
    pub fn current() -> Option<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` value to a platform family
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "linux" | "macos" => Some(Platform::Unix),
            "windows" => Some(Platform::Windows),
            _ => None,
        }
    }

    /// Directory name used under the script root
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
