// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Line oriented document model.
//!
//! Every editing operation in dotedit works on a [`Document`], i.e., the
//! content of a text file split on `\n` into an ordered sequence of lines. The
//! line terminator acts as a separator and is never part of a line. Thus, a
//! file that ends with a newline carries an empty __trailing segment__ as its
//! final line, and an empty file is the document made of one empty line.
//!
//! # Idempotent Line Edits
//!
//! Documents are never edited in place. Each operation produces a brand new
//! document, and leaves it up to the caller to compare it against the
//! original content to decide whether anything needs to be written back. This
//! keeps every edit idempotent: applying the same edit twice yields the same
//! document as applying it once.
//!
//! # Pitfalls
//!
//! An empty prefix matches _every_ line. Thus, [`Document::replace_lines`]
//! with an empty prefix replaces the whole file with copies of the
//! replacement, and [`Document::remove_lines`] with an empty target in
//! [`LineMatch::Prefix`] mode empties the file. Callers are expected to guard
//! against this themselves.
//!
//! # See Also
//!
//! - [`ini`] for section/key/value access on top of this line model.

pub mod ini;

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Text content as an ordered sequence of lines.
///
/// # Invariant
///
/// - Splitting on the line terminator always yields at least one line, so a
///   document is never without lines. Edits that drop every line leave the
///   empty document behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Construct new empty document, i.e., one empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines of the document in order.
    pub fn lines(&self) -> &[String] {
        self.lines.as_slice()
    }

    /// Check if document holds nothing but a single empty line.
    pub fn is_empty(&self) -> bool {
        match self.lines.as_slice() {
            [] => true,
            [line] => line.is_empty(),
            _ => false,
        }
    }

    /// Replace every line starting with `prefix` by `replacement`.
    ///
    /// If no line matched and `append_if_no_match` is set, then the
    /// replacement is appended as a new final line instead.
    pub fn replace_lines(
        &self,
        prefix: &str,
        replacement: &str,
        append_if_no_match: bool,
    ) -> Self {
        let mut matched = false;
        let mut lines = Vec::with_capacity(self.lines.len() + 1);
        for line in &self.lines {
            if line.starts_with(prefix) {
                matched = true;
                lines.push(replacement.to_owned());
            } else {
                lines.push(line.clone());
            }
        }

        let mut document = Self { lines };
        if !matched && append_if_no_match {
            document.push_lines([replacement]);
        }

        document
    }

    /// Drop every line matching `target` according to given [`LineMatch`].
    pub fn remove_lines(&self, target: &str, mode: LineMatch) -> Self {
        let lines = self
            .lines
            .iter()
            .filter(|line| !mode.matches(line, target))
            .cloned()
            .collect::<Vec<_>>();

        if lines.is_empty() {
            return Self::default();
        }

        Self { lines }
    }

    /// Check if `block` occurs verbatim as a contiguous run of lines.
    ///
    /// The block is split on `\n` just like a document, so a multi-line block
    /// only matches when all of its lines appear back to back in order.
    pub fn contains_block(&self, block: &str) -> bool {
        let block = block.split('\n').collect::<Vec<_>>();
        self.lines
            .windows(block.len())
            .any(|window| window.iter().zip(&block).all(|(line, want)| line == want))
    }

    /// Append `block` as new trailing lines unless it is already present.
    ///
    /// Returns the new document, and whether anything was appended.
    pub fn append_block_if_absent(&self, block: &str) -> (Self, bool) {
        if self.contains_block(block) {
            return (self.clone(), false);
        }

        let mut document = self.clone();
        document.push_lines(block.split('\n'));

        (document, true)
    }

    /// Append lines at the end of the document.
    ///
    /// # Invariant
    ///
    /// - The empty document is replaced outright.
    /// - A trailing segment stays last, so a file ending with a newline still
    ///   ends with one.
    pub(crate) fn push_lines(&mut self, new: impl IntoIterator<Item = impl Into<String>>) {
        let new = new.into_iter().map(Into::into);
        if self.is_empty() {
            self.lines = new.collect();
            return;
        }

        match self.lines.last() {
            Some(last) if last.is_empty() => {
                let at = self.lines.len() - 1;
                self.insert_lines(at, new);
            }
            _ => self.lines.extend(new),
        }
    }

    /// Insert lines before line index `at`.
    ///
    /// The empty document is replaced outright.
    pub(crate) fn insert_lines(
        &mut self,
        at: usize,
        new: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let new = new.into_iter().map(Into::into);
        if self.is_empty() {
            self.lines = new.collect();
            return;
        }

        let tail = self.lines.split_off(at);
        self.lines.extend(new);
        self.lines.extend(tail);
    }

    pub(crate) fn set_line(&mut self, at: usize, line: impl Into<String>) {
        self.lines[at] = line.into();
    }

    pub(crate) fn remove_line(&mut self, at: usize) {
        self.lines.remove(at);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }
}

impl Display for Document {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.lines.join("\n").as_str())
    }
}

impl From<&str> for Document {
    fn from(content: &str) -> Self {
        let lines = content.split('\n').map(str::to_owned).collect();

        Self { lines }
    }
}

impl From<String> for Document {
    fn from(content: String) -> Self {
        Self::from(content.as_str())
    }
}

/// How a target string selects lines for removal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch {
    /// Select lines starting with the target, including equal lines.
    #[default]
    Prefix,

    /// Select lines exactly equal to the target.
    ///
    /// Use this when the target is itself a prefix of other lines that must
    /// survive.
    Exact,
}

impl LineMatch {
    /// Check if `line` is selected by `target`.
    pub fn matches(self, line: &str, target: &str) -> bool {
        match self {
            Self::Prefix => line.starts_with(target),
            Self::Exact => line == target,
        }
    }
}
