//! Builder command construction
//!
//! Builders are external executables resolved from `PATH`. When a
//! `telegram-notify` wrapper is installed and configured, builder
//! invocations are routed through it so that build results are pushed to
//! the operator; builders themselves never know about the wrapper.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolves an executable name on `PATH`, like a shell would.
pub fn locate_binary(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Builds the command for a builder binary, wrapping it with
/// `telegram-notify` when the notifier is installed and both
/// `TELEGRAM_NOTIFY_TOKEN` and `TELEGRAM_NOTIFY_CHAT_ID` are set.
///
/// The child inherits the parent environment either way; callers append
/// builder arguments, `OUTPUT_DIR`, and the working directory on top.
pub fn builder_command(binary: &str) -> Command {
    if let Some(notify) = locate_binary("telegram-notify") {
        let token_set = env::var_os("TELEGRAM_NOTIFY_TOKEN").is_some();
        let chat_set = env::var_os("TELEGRAM_NOTIFY_CHAT_ID").is_some();
        if token_set && chat_set {
            let mut cmd = Command::new(notify);
            cmd.arg("-id=sitewright").arg("-success").arg("--").arg(binary);
            return cmd;
        }
    }

    Command::new(binary)
}
