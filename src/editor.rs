// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! File level editing operations.
//!
//! Glue between the in-memory edits of [`Document`] and a [`TextStore`].
//! Each operation follows the same contract:
//!
//! 1. Read current content from the store. Nothing is cached between calls.
//! 2. Compute the complete new content in memory.
//! 3. Write it back as a whole if, and only if, it differs.
//! 4. Report an [`Outcome`] describing what happened.
//!
//! Running any operation twice with the same arguments thus performs at most
//! one real write. Because the new content is fully computed before any
//! write, a failed write never leaves a half-applied edit behind.

use crate::{
    outcome::Outcome,
    path::display,
    store::{FileState, LocalStore, StoreError, TextStore},
    text::{
        ini::{check_entry, EntryFormat, MalformedEntry, SetEffect},
        Document, LineMatch,
    },
};

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Idempotent text file editor.
#[derive(Debug, Default, Clone)]
pub struct FileEditor<S = LocalStore>
where
    S: TextStore,
{
    store: S,
}

impl<S> FileEditor<S>
where
    S: TextStore,
{
    /// Construct new file editor over given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying text store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get value of `key` in `section` of INI file.
    ///
    /// A missing file is treated as an empty one unless
    /// `fail_if_file_missing` is set. A missing key yields `None` unless
    /// `fail_if_key_missing` is set.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::Store`] if file cannot be probed or read, or if
    ///   it is required but missing.
    /// - Return [`EditError::KeyNotFound`] if key is required but missing.
    #[instrument(skip(self, path), level = "debug")]
    pub fn get_ini_value(
        &self,
        path: impl AsRef<Path>,
        section: &str,
        key: &str,
        fail_if_file_missing: bool,
        fail_if_key_missing: bool,
    ) -> Result<Option<String>> {
        let path = path.as_ref();
        let document = if fail_if_file_missing {
            Document::from(self.read_existing(path)?)
        } else {
            self.read_optional(path)?.map(Document::from).unwrap_or_default()
        };

        match document.ini_get(section, key) {
            Some(value) => Ok(Some(value.to_owned())),
            None if fail_if_key_missing => Err(EditError::KeyNotFound {
                path: path.into(),
                section: section.into(),
                key: key.into(),
            }),
            None => Ok(None),
        }
    }

    /// Set value of `key` in `section` of INI file.
    ///
    /// Creates the file as `[section]\nkey=value\n` if it is missing, unless
    /// `fail_if_file_missing` is set. Key and value are stored trimmed.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::MalformedInput`] if the entry would not read
    ///   back as written. Nothing is read or written in that case.
    /// - Return [`EditError::Store`] if file cannot be probed, read, or
    ///   written, or if it is required but missing.
    #[instrument(skip(self, path), level = "debug")]
    pub fn set_ini_value(
        &self,
        path: impl AsRef<Path>,
        section: &str,
        key: &str,
        value: &str,
        fail_if_file_missing: bool,
        format: EntryFormat,
    ) -> Result<Outcome> {
        let path = path.as_ref();
        check_entry(section, key, value).map_err(|source| EditError::MalformedInput {
            path: path.into(),
            source,
        })?;

        let name = display(path);
        let entry = format!("[{}] {}", section.trim(), key.trim());
        let value = value.trim();

        let content = if fail_if_file_missing {
            Some(self.read_existing(path)?)
        } else {
            self.read_optional(path)?
        };

        let Some(content) = content else {
            let (document, _) = Document::new().ini_set(section, key, value, format);
            self.store.write_text(path, format!("{document}\n").as_str())?;
            info!("created {name}");
            return Ok(Outcome::created(format!(
                "{name} created with {entry} set to {value:?}"
            )));
        };

        let (document, effect) =
            Document::from(content.as_str()).ini_set(section, key, value, format);
        if !self.save(path, &content, &document)? {
            debug!("{entry} already set in {name}");
            return Ok(Outcome::unchanged(format!(
                "{name}: {entry} already has value {value:?}"
            )));
        }

        let outcome = match effect {
            SetEffect::AddedSection => Outcome::created(format!(
                "{name}: section [{}] created with {} set to {value:?}",
                section.trim(),
                key.trim()
            )),
            SetEffect::AddedEntry => {
                Outcome::created(format!("{name}: {entry} created with value {value:?}"))
            }
            SetEffect::Replaced | SetEffect::Unchanged => {
                Outcome::updated(format!("{name}: {entry} updated, value is now {value:?}"))
            }
        };
        info!("{}", outcome.message());

        Ok(outcome)
    }

    /// Remove `key` from `section` of INI file.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::Store`] if file is missing, or cannot be probed,
    ///   read, or written.
    #[instrument(skip(self, path), level = "debug")]
    pub fn remove_ini_value(
        &self,
        path: impl AsRef<Path>,
        section: &str,
        key: &str,
    ) -> Result<Outcome> {
        let path = path.as_ref();
        let name = display(path);
        let entry = format!("[{}] {}", section.trim(), key.trim());

        let content = self.read_existing(path)?;
        let (document, removed) = Document::from(content.as_str()).ini_remove(section, key);
        if !removed || !self.save(path, &content, &document)? {
            return Ok(Outcome::unchanged(format!("{name}: {entry} does not exist")));
        }

        info!("removed {entry} from {name}");

        Ok(Outcome::removed(format!("{name}: {entry} removed")))
    }

    /// Replace every line of file starting with `prefix` by `replacement`.
    ///
    /// Appends the replacement instead if nothing matched and
    /// `append_if_no_match` is set.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::Store`] if file is missing, or cannot be probed,
    ///   read, or written.
    #[instrument(skip(self, path), level = "debug")]
    pub fn replace_lines_in_file(
        &self,
        path: impl AsRef<Path>,
        prefix: &str,
        replacement: &str,
        append_if_no_match: bool,
    ) -> Result<Outcome> {
        let path = path.as_ref();
        let name = display(path);
        let content = self.read_existing(path)?;
        let document = Document::from(content.as_str()).replace_lines(
            prefix,
            replacement,
            append_if_no_match,
        );

        if !self.save(path, &content, &document)? {
            return Ok(Outcome::unchanged(format!(
                "{name} lines starting with {prefix:?} already up to date"
            )));
        }

        Ok(Outcome::updated(format!(
            "{name} lines starting with {prefix:?} updated"
        )))
    }

    /// Remove every line of file matching `target`.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::Store`] if file is missing, or cannot be probed,
    ///   read, or written.
    #[instrument(skip(self, path), level = "debug")]
    pub fn remove_lines_in_file(
        &self,
        path: impl AsRef<Path>,
        target: &str,
        mode: LineMatch,
    ) -> Result<Outcome> {
        let path = path.as_ref();
        let name = display(path);
        let content = self.read_existing(path)?;
        let document = Document::from(content.as_str()).remove_lines(target, mode);
        let relation = match mode {
            LineMatch::Prefix => "starting with",
            LineMatch::Exact => "equal to",
        };

        if !self.save(path, &content, &document)? {
            return Ok(Outcome::unchanged(format!(
                "{name} does not have lines {relation} {target:?}"
            )));
        }

        Ok(Outcome::removed(format!(
            "{name} lines {relation} {target:?} removed"
        )))
    }

    /// Append `block` to file unless its lines already appear in it.
    ///
    /// Creates the file with the block as content if it is missing.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::Store`] if file cannot be probed, read, or
    ///   written.
    #[instrument(skip(self, path, block), level = "debug")]
    pub fn append_if_absent(&self, path: impl AsRef<Path>, block: &str) -> Result<Outcome> {
        let path = path.as_ref();
        let name = display(path);

        let Some(content) = self.read_optional(path)? else {
            self.store.write_text(path, block)?;
            return Ok(Outcome::created(format!("{name} created with expected content")));
        };

        let (document, appended) = Document::from(content.as_str()).append_block_if_absent(block);
        if !appended || !self.save(path, &content, &document)? {
            return Ok(Outcome::unchanged(format!("{name} already contains expected content")));
        }

        Ok(Outcome::updated(format!("{name} updated with expected content")))
    }

    /// Write `src` to `dst`, replacing lines of `src` starting with `prefix`.
    ///
    /// The destination is only written if its current content differs from
    /// the computed content.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::Store`] if source is missing, or if either file
    ///   cannot be probed, read, or written.
    #[instrument(skip(self, src, dst), level = "debug")]
    pub fn copy_file_with_line_update(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        prefix: &str,
        replacement: &str,
        append_if_no_match: bool,
    ) -> Result<Outcome> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        let (src_name, dst_name) = (display(src), display(dst));
        let template = self.read_existing(src)?;
        let current = self.read_optional(dst)?;
        let expected = Document::from(template.as_str())
            .replace_lines(prefix, replacement, append_if_no_match)
            .to_string();

        let edit = format!("content of {src_name} with lines starting with {prefix:?} updated");
        match current {
            Some(current) if current == expected && current == template => {
                Ok(Outcome::unchanged(format!(
                    "{dst_name} is the same as {src_name} with no line starting with {prefix:?}"
                )))
            }
            Some(current) if current == expected => {
                Ok(Outcome::unchanged(format!("{dst_name} already has {edit}")))
            }
            Some(_) => {
                self.store.write_text(dst, expected.as_str())?;
                Ok(Outcome::updated(format!("{dst_name} written with {edit}")))
            }
            None => {
                self.store.write_text(dst, expected.as_str())?;
                Ok(Outcome::created(format!("{dst_name} created with {edit}")))
            }
        }
    }

    /// Write `content` to file.
    ///
    /// An existing file with other content is only replaced if `overwrite` is
    /// set, otherwise it is considered user defined and left alone.
    ///
    /// # Errors
    ///
    /// - Return [`EditError::Store`] if file cannot be probed, read, or
    ///   written.
    #[instrument(skip(self, path, content), level = "debug")]
    pub fn write_text_file(
        &self,
        path: impl AsRef<Path>,
        content: &str,
        overwrite: bool,
    ) -> Result<Outcome> {
        let path = path.as_ref();
        let name = display(path);

        match self.read_optional(path)? {
            None => {
                self.store.write_text(path, content)?;
                Ok(Outcome::created(format!("{name} created")))
            }
            Some(current) if current == content => {
                Ok(Outcome::unchanged(format!("{name} already has expected content")))
            }
            Some(_) if overwrite => {
                self.store.write_text(path, content)?;
                Ok(Outcome::updated(format!("{name} updated")))
            }
            Some(_) => Ok(Outcome::unchanged(format!(
                "{name} user defined content left unchanged"
            ))),
        }
    }

    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        match self.store.probe(path)? {
            FileState::Regular => Ok(Some(self.store.read_text(path)?)),
            FileState::Missing => Ok(None),
        }
    }

    fn read_existing(&self, path: &Path) -> Result<String> {
        self.read_optional(path)?
            .ok_or_else(|| StoreError::NotFound { path: path.into() }.into())
    }

    /// Write document back if it differs from original content.
    ///
    /// Returns whether a write happened.
    fn save(&self, path: &Path, original: &str, document: &Document) -> Result<bool> {
        let content = document.to_string();
        if content == original {
            debug!("{:?} left untouched", path.display());
            return Ok(false);
        }

        self.store.write_text(path, content.as_str())?;
        Ok(true)
    }
}

impl FileEditor<LocalStore> {
    /// Construct new file editor over the local file system.
    pub fn local() -> Self {
        Self::new(LocalStore::new())
    }
}

/// File editing error types.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// File cannot be accessed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Entry would not read back as written.
    #[error("cannot write entry to {:?}", path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: MalformedEntry,
    },

    /// Required key is missing.
    #[error("key {key:?} not found in section [{section}] of {:?}", path.display())]
    KeyNotFound {
        path: PathBuf,
        section: String,
        key: String,
    },
}

impl From<EditError> for Outcome {
    fn from(error: EditError) -> Self {
        Outcome::from_error(&error)
    }
}

/// Friendly result alias :3
pub type Result<T, E = EditError> = std::result::Result<T, E>;
