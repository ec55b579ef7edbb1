// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Reconciliation plan layout.
//!
//! A __plan__ is a TOML file listing file edits that should hold on a machine,
//! e.g., "`~/.gitconfig` has `[user] email` set to this", or "`~/.bashrc`
//! contains this alias". Applying a plan runs every step through a
//! [`FileEditor`]. Since every step is idempotent, a plan can be applied on
//! every deployment, and only performs writes where the machine drifted.
//!
//! # General Layout
//!
//! Each step is a `[[step]]` table whose `kind` field selects the operation.
//! All other fields are the arguments of that operation:
//!
//! ```toml
//! [[step]]
//! kind = "ini-set"
//! path = "~/.config/app/app.ini"
//! section = "db"
//! key = "host"
//! value = "localhost"
//!
//! [[step]]
//! kind = "replace-lines"
//! path = "$HOME/.profile"
//! prefix = "export EDITOR="
//! replacement = "export EDITOR=vim"
//! append = true
//! ```
//!
//! Paths go through shell expansion when the plan is parsed, so `~` and
//! environment variables can be used.

use crate::{
    editor::{EditError, FileEditor},
    outcome::{Outcome, OutcomeSet},
    path::expand,
    store::TextStore,
    text::{ini::EntryFormat, LineMatch},
};

use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{info, instrument, warn};

/// Ordered listing of idempotent file edits.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Plan {
    /// Steps to apply in order.
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Plan {
    /// Load plan from file.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if plan file cannot be read.
    /// - Return [`ConfigError::Deserialize`] if plan is malformed.
    /// - Return [`ConfigError::ShellExpansion`] if a path cannot be expanded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        read_to_string(path)
            .map_err(|err| ConfigError::Read {
                source: err,
                path: path.into(),
            })?
            .parse()
    }

    /// Apply every step, continuing past failures.
    #[instrument(skip(self, editor), level = "debug")]
    pub fn apply<S>(&self, editor: &FileEditor<S>) -> OutcomeSet
    where
        S: TextStore,
    {
        let mut outcomes = OutcomeSet::new();
        for step in &self.steps {
            let result = step.apply(editor);
            if let Err(error) = &result {
                warn!("step {} failed: {error}", step.kind());
            }
            outcomes.record(result);
        }

        info!("{}", outcomes.message());
        outcomes
    }
}

impl FromStr for Plan {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut plan: Plan = toml::de::from_str(data)?;

        // INVARIANT: Perform shell expansion on every path field.
        for step in &mut plan.steps {
            for path in step.paths_mut() {
                *path = expand(&*path)?;
            }
        }

        Ok(plan)
    }
}

/// Single idempotent file edit.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Step {
    /// Set key in section of INI file.
    IniSet {
        path: PathBuf,
        #[serde(default)]
        section: String,
        key: String,
        value: String,
        #[serde(default)]
        spaced: bool,
        #[serde(default)]
        require_file: bool,
    },

    /// Remove key from section of INI file.
    IniRemove {
        path: PathBuf,
        #[serde(default)]
        section: String,
        key: String,
    },

    /// Replace lines of file by prefix.
    ReplaceLines {
        path: PathBuf,
        prefix: String,
        replacement: String,
        #[serde(default)]
        append: bool,
    },

    /// Remove lines of file by prefix or exact match.
    RemoveLines {
        path: PathBuf,
        target: String,
        #[serde(default)]
        exact: bool,
    },

    /// Append block of lines to file unless present.
    Append { path: PathBuf, block: String },

    /// Copy template to file, replacing lines by prefix.
    Copy {
        source: PathBuf,
        path: PathBuf,
        prefix: String,
        replacement: String,
        #[serde(default)]
        append: bool,
    },

    /// Write whole file content.
    Write {
        path: PathBuf,
        content: String,
        #[serde(default = "default_overwrite")]
        overwrite: bool,
    },
}

impl Step {
    /// Name of step kind as written in plan files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IniSet { .. } => "ini-set",
            Self::IniRemove { .. } => "ini-remove",
            Self::ReplaceLines { .. } => "replace-lines",
            Self::RemoveLines { .. } => "remove-lines",
            Self::Append { .. } => "append",
            Self::Copy { .. } => "copy",
            Self::Write { .. } => "write",
        }
    }

    /// Run step through file editor.
    ///
    /// # Errors
    ///
    /// - Return [`EditError`] if underlying file operation fails.
    pub fn apply<S>(&self, editor: &FileEditor<S>) -> Result<Outcome, EditError>
    where
        S: TextStore,
    {
        match self {
            Self::IniSet {
                path,
                section,
                key,
                value,
                spaced,
                require_file,
            } => {
                let format = if *spaced {
                    EntryFormat::Spaced
                } else {
                    EntryFormat::Compact
                };
                editor.set_ini_value(path, section, key, value, *require_file, format)
            }
            Self::IniRemove { path, section, key } => editor.remove_ini_value(path, section, key),
            Self::ReplaceLines {
                path,
                prefix,
                replacement,
                append,
            } => editor.replace_lines_in_file(path, prefix, replacement, *append),
            Self::RemoveLines {
                path,
                target,
                exact,
            } => {
                let mode = if *exact {
                    LineMatch::Exact
                } else {
                    LineMatch::Prefix
                };
                editor.remove_lines_in_file(path, target, mode)
            }
            Self::Append { path, block } => editor.append_if_absent(path, block),
            Self::Copy {
                source,
                path,
                prefix,
                replacement,
                append,
            } => editor.copy_file_with_line_update(source, path, prefix, replacement, *append),
            Self::Write {
                path,
                content,
                overwrite,
            } => editor.write_text_file(path, content, *overwrite),
        }
    }

    fn paths_mut(&mut self) -> Vec<&mut PathBuf> {
        match self {
            Self::Copy { source, path, .. } => vec![source, path],
            Self::IniSet { path, .. }
            | Self::IniRemove { path, .. }
            | Self::ReplaceLines { path, .. }
            | Self::RemoveLines { path, .. }
            | Self::Append { path, .. }
            | Self::Write { path, .. } => vec![path],
        }
    }
}

fn default_overwrite() -> bool {
    true
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read plan file.
    #[error("failed to read plan at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
