// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for the files that dotedit edits, and
//! present them in a friendly way in outcome messages.

use std::path::{Path, PathBuf};

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Expand `~` and environment variables in path.
///
/// # Errors
///
/// - Return [`shellexpand::LookupError`] if a referenced variable is unset.
pub fn expand(
    path: impl AsRef<Path>,
) -> Result<PathBuf, shellexpand::LookupError<std::env::VarError>> {
    let path = path.as_ref().to_string_lossy();
    shellexpand::full(&path).map(|expanded| PathBuf::from(expanded.into_owned()))
}

/// Render path for humans, abbreviating the home directory to `~`.
pub fn display(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match home_dir() {
        Ok(home) => display_relative_to(path, &home),
        Err(_) => path.display().to_string(),
    }
}

fn display_relative_to(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".into(),
        Ok(rest) => Path::new("~").join(rest).display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
