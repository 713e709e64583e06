//! Global flags and home directory resolution

use clap::Args;
use runlet_core::errors::{ExError, ExErrorKind};
use runlet_core::logging_facility::Profile;
use runlet_core_types::Platform;
use runlet_store::Layout;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding `.run` (defaults to the invoking user's home)
    #[arg(long, env = "RUNLET_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Human-readable debug logs on stderr
    #[arg(short, long, conflicts_with = "log_json")]
    pub verbose: bool,

    /// JSON logs on stderr
    #[arg(long)]
    pub log_json: bool,
}

impl GlobalArgs {
    pub fn profile(&self) -> Profile {
        if self.verbose {
            Profile::Development
        } else if self.log_json {
            Profile::Production
        } else {
            Profile::Quiet
        }
    }

    /// Paths for the selected home and the running platform
    pub fn layout(&self) -> Result<Layout, ExError> {
        let platform = Platform::current().ok_or_else(|| {
            ExError::new(ExErrorKind::Unsupported)
                .with_op("resolve_layout")
                .with_message(format!(
                    "run does not support {:?} as a platform",
                    std::env::consts::OS
                ))
        })?;

        let home = match &self.home {
            Some(dir) => dir.clone(),
            None => invoking_user_home()?,
        };
        let home = std::path::absolute(&home).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("resolve_layout")
                .with_path(&home)
                .with_message(e.to_string())
        })?;

        tracing::debug!(home = %home.display(), platform = %platform, "resolved layout");
        Ok(Layout::for_home(&home, platform))
    }
}

/// Home of the user who typed the command, even under `sudo`
///
/// `sudo` resets `$HOME` to root's, but tidy may need elevated rights to move
/// scripts, and the index that matters is the caller's.
fn invoking_user_home() -> Result<PathBuf, ExError> {
    let sudo_user = sudo_caller(running_as_root(), std::env::var("SUDO_USER").ok());
    if let Some(user) = sudo_user {
        if let Some(home) = sudo_user_home(&user) {
            return Ok(home);
        }
        tracing::warn!(user = user.as_str(), "SUDO_USER has no passwd entry, using $HOME");
    }

    dirs::home_dir().ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("resolve_layout")
            .with_message("cannot determine the home directory; pass --home")
    })
}

/// `SUDO_USER` only names the caller while we actually run as root; a stale
/// value in an ordinary shell must not redirect to someone else's index
pub fn sudo_caller(as_root: bool, sudo_user: Option<String>) -> Option<String> {
    if !as_root {
        return None;
    }
    sudo_user.filter(|u| !u.is_empty())
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

#[cfg(unix)]
fn sudo_user_home(user: &str) -> Option<PathBuf> {
    let passwd = std::fs::read_to_string("/etc/passwd").ok()?;
    home_from_passwd(&passwd, user)
}

#[cfg(not(unix))]
fn sudo_user_home(_user: &str) -> Option<PathBuf> {
    None
}

/// Look up the home field (6th) of `user` in passwd(5) formatted text
pub fn home_from_passwd(passwd: &str, user: &str) -> Option<PathBuf> {
    passwd
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split(':').collect::<Vec<_>>())
        .find(|fields| fields.len() >= 7 && fields[0] == user)
        .map(|fields| PathBuf::from(fields[5]))
        .filter(|home| !home.as_os_str().is_empty())
}
