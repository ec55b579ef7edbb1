// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Text file persistence.
//!
//! Dotedit reads a whole file, computes the new content in memory, and only
//! then writes the whole file back if anything changed. The [`TextStore`]
//! trait is the seam between that logic and the actual file system.
//!
//! # Atomic Replacement
//!
//! [`LocalStore`] never patches a file in place. New content goes into a
//! temporary file inside the same directory, which is then renamed over the
//! target. A concurrent reader observes either the old content or the new
//! content, never a torn file, and a failed write leaves the old content
//! intact.
//!
//! # Symbolic Links
//!
//! Dotfiles are frequently symlinked into place. Renaming over a symlink would
//! replace the link itself with a regular file. Thus, writes through a
//! symlink are redirected to the file the link points at.

use atomic_write_file::AtomicWriteFile;
use std::{
    fs::{self, create_dir_all, read_to_string},
    io::{Error as IoError, ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Maximum number of symlinks followed before giving up.
const MAX_LINK_HOPS: usize = 40;

/// What currently sits at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Nothing exists at the path.
    Missing,

    /// Path is a regular file, possibly through a symlink.
    Regular,
}

/// Whole-file text persistence.
pub trait TextStore {
    /// Check what exists at path.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::NotAFile`] if path exists but is not a regular
    ///   file.
    /// - Return [`StoreError::Probe`] if path cannot be inspected.
    fn probe(&self, path: &Path) -> Result<FileState>;

    /// Read entire file as text.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::NotFound`] if file does not exist.
    /// - Return [`StoreError::Read`] if file cannot be read.
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Replace entire file with text, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Write`] if file cannot be written.
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;
}

/// Text persistence through the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
    /// Construct new local store.
    pub fn new() -> Self {
        Self
    }
}

impl TextStore for LocalStore {
    fn probe(&self, path: &Path) -> Result<FileState> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(FileState::Regular),
            Ok(_) => Err(StoreError::NotAFile { path: path.into() }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(FileState::Missing),
            Err(err) => Err(StoreError::Probe {
                source: err,
                path: path.into(),
            }),
        }
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound { path: path.into() },
            _ => StoreError::Read {
                source: err,
                path: path.into(),
            },
        })
    }

    #[instrument(skip(self, text), level = "debug")]
    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        let write_error = |source: IoError| StoreError::Write {
            source,
            path: path.into(),
        };

        let target = resolve_links(path).map_err(write_error)?;
        if target != path {
            debug!("write through symlink to {:?}", target.display());
        }

        // INVARIANT: Parent directories must exist before the temporary file
        // can be created next to the target.
        if let Some(parent) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_dir_all(parent).map_err(write_error)?;
        }

        let mut file = AtomicWriteFile::options().open(&target).map_err(write_error)?;
        file.write_all(text.as_bytes()).map_err(write_error)?;
        file.commit().map_err(write_error)?;
        debug!("wrote {} bytes", text.len());

        Ok(())
    }
}

/// Follow symlinks at `path` down to the path that should be written.
fn resolve_links(path: &Path) -> std::io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_LINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
            }
            _ => return Ok(current),
        }
    }

    Err(IoError::other(format!(
        "too many levels of symbolic links at {:?}",
        path.display()
    )))
}

/// Text persistence error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// File is required but missing.
    #[error("file {:?} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// Path exists, but is a directory or some other non-regular file.
    #[error("{:?} exists but is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    /// Path cannot be inspected.
    #[error("failed to check if {:?} exists", path.display())]
    Probe {
        #[source]
        source: IoError,
        path: PathBuf,
    },

    /// File cannot be read from.
    #[error("failed to read from {:?}", path.display())]
    Read {
        #[source]
        source: IoError,
        path: PathBuf,
    },

    /// File cannot be written to.
    #[error("failed to write to {:?}", path.display())]
    Write {
        #[source]
        source: IoError,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
