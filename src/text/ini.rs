// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Section/key/value access for INI-style documents.
//!
//! Layers __sections__ on top of the line model of [`Document`]. A section
//! starts at a header line of the form `[name]`, and spans every line up to
//! the next header or the end of the document. Inside a span, any line of the
//! form `key=value` is an __entry__. Lines that are neither headers nor
//! entries are carried along untouched.
//!
//! # Unnamed Section
//!
//! The empty section name refers to the leading body of the document, i.e.,
//! every line that comes before the first header. This is where global keys
//! of files like `~/.npmrc` or `/etc/os-release` live.
//!
//! # Duplicates
//!
//! Ambiguity always resolves to the first occurrence scanning top to bottom.
//! Only the first header of a given name is authoritative, and only the first
//! entry of a given key inside that section is read or rewritten. Later
//! duplicates are left alone.
//!
//! # Limitations
//!
//! This is not a full INI grammar. There are no comments, escapes, quoting,
//! multi-line values, or typed values. A line without `=` is simply not an
//! entry.

use crate::text::Document;

use std::ops::Range;

/// A named region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'doc> {
    name: &'doc str,
    header: Option<usize>,
    span: Range<usize>,
}

impl<'doc> Section<'doc> {
    /// Name of the section, trimmed. Empty for the unnamed leading body.
    pub fn name(&self) -> &'doc str {
        self.name
    }

    /// Line index of the header, if the section has one.
    pub fn header(&self) -> Option<usize> {
        self.header
    }

    /// Line indices of the section body.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// Segmentation of a document into sections.
///
/// Built in one pass over the document. The first section is always the
/// unnamed leading body, possibly with an empty span.
#[derive(Debug, Clone)]
pub struct Sections<'doc> {
    document: &'doc Document,
    sections: Vec<Section<'doc>>,
}

impl<'doc> Sections<'doc> {
    /// Segment document into sections.
    pub fn new(document: &'doc Document) -> Self {
        let lines = document.lines();
        let mut sections = vec![Section {
            name: "",
            header: None,
            span: 0..lines.len(),
        }];

        for (idx, line) in lines.iter().enumerate() {
            if let Some(name) = parse_header(line) {
                if let Some(previous) = sections.last_mut() {
                    previous.span.end = idx;
                }

                sections.push(Section {
                    name,
                    header: Some(idx),
                    span: idx + 1..lines.len(),
                });
            }
        }

        Self { document, sections }
    }

    /// Iterate through sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Section<'doc>> {
        self.sections.iter()
    }

    /// Locate section by name.
    ///
    /// The name is trimmed first. An empty name selects the unnamed leading
    /// body, which always exists.
    pub fn find(&self, name: &str) -> Option<&Section<'doc>> {
        let name = name.trim();
        if name.is_empty() {
            return self.sections.first();
        }

        self.sections
            .iter()
            .skip(1)
            .find(|section| section.name == name)
    }

    /// Iterate through well-formed entries of a section as `(key, value)`.
    pub fn entries(&self, section: &Section<'doc>) -> impl Iterator<Item = (&'doc str, &'doc str)> {
        let lines = self.document.lines();
        section.span().filter_map(move |idx| parse_entry(&lines[idx]))
    }

    /// Locate first entry of `key` in section.
    ///
    /// Returns the line index of the entry along with its trimmed value.
    pub fn find_entry(&self, section: &Section<'doc>, key: &str) -> Option<(usize, &'doc str)> {
        let key = key.trim();
        let lines = self.document.lines();
        section.span().find_map(|idx| {
            parse_entry(&lines[idx])
                .filter(|(name, _)| *name == key)
                .map(|(_, value)| (idx, value))
        })
    }

    /// Line index where a new entry of a section belongs.
    ///
    /// Directly after the last non-blank line of the span, such that blank
    /// separator lines stay in front of the next header.
    fn insertion_point(&self, section: &Section<'doc>) -> usize {
        let lines = self.document.lines();
        section
            .span()
            .rev()
            .find(|idx| !lines[*idx].trim().is_empty())
            .map_or(section.span.start, |idx| idx + 1)
    }
}

/// Layout of a freshly written entry line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EntryFormat {
    /// `key=value`
    #[default]
    Compact,

    /// `key = value`
    Spaced,
}

impl EntryFormat {
    /// Render entry line.
    pub fn render(self, key: &str, value: &str) -> String {
        match self {
            Self::Compact => format!("{key}={value}"),
            Self::Spaced => format!("{key} = {value}"),
        }
    }
}

/// What [`Document::ini_set`] did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetEffect {
    /// Section was missing, so header and entry were appended.
    AddedSection,

    /// Entry was missing, so it was added at the end of its section.
    AddedEntry,

    /// Existing entry had another value, and was rewritten in place.
    Replaced,

    /// Entry already had the requested value.
    Unchanged,
}

impl SetEffect {
    /// Check if the document was modified.
    pub fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl Document {
    /// Segment document into sections.
    pub fn sections(&self) -> Sections<'_> {
        Sections::new(self)
    }

    /// Get trimmed value of first `key` entry in `section`.
    pub fn ini_get(&self, section: &str, key: &str) -> Option<&str> {
        let sections = self.sections();
        let section = sections.find(section)?;
        sections.find_entry(section, key).map(|(_, value)| value)
    }

    /// Set value of `key` in `section`.
    ///
    /// Rewrites only the targeted line when the entry exists. Missing
    /// entries go at the end of their section, and missing sections are
    /// appended at the end of the document. The key and value are written
    /// trimmed, as they would be read back.
    ///
    /// Input is not validated here. Use [`check_entry`] first, otherwise an
    /// entry that does not read back as written is added again on every call.
    pub fn ini_set(
        &self,
        section: &str,
        key: &str,
        value: &str,
        format: EntryFormat,
    ) -> (Self, SetEffect) {
        let value = value.trim();
        let line = format.render(key.trim(), value);
        let sections = self.sections();
        let mut document = self.clone();

        let Some(target) = sections.find(section) else {
            document.push_lines([format!("[{}]", section.trim()), line]);
            return (document, SetEffect::AddedSection);
        };

        match sections.find_entry(target, key) {
            Some((_, current)) if current == value => (document, SetEffect::Unchanged),
            Some((idx, _)) => {
                document.set_line(idx, line);
                (document, SetEffect::Replaced)
            }
            None => {
                document.insert_lines(sections.insertion_point(target), [line]);
                (document, SetEffect::AddedEntry)
            }
        }
    }

    /// Remove first `key` entry in `section`.
    ///
    /// Returns the new document, and whether an entry was removed.
    pub fn ini_remove(&self, section: &str, key: &str) -> (Self, bool) {
        let sections = self.sections();
        let found = sections
            .find(section)
            .and_then(|target| sections.find_entry(target, key));

        let mut document = self.clone();
        match found {
            Some((idx, _)) => {
                document.remove_line(idx);
                (document, true)
            }
            None => (document, false),
        }
    }
}

/// Check that an entry would read back exactly as it is written.
///
/// # Errors
///
/// - Return [`MalformedEntry::LineBreak`] if any part spans multiple lines.
/// - Return [`MalformedEntry::EmptyKey`] if key is blank.
/// - Return [`MalformedEntry::Ambiguous`] if the rendered entry would parse
///   as another key or as a section header.
pub fn check_entry(section: &str, key: &str, value: &str) -> Result<(), MalformedEntry> {
    for (field, text) in [("section", section), ("key", key), ("value", value)] {
        if text.contains(['\n', '\r']) {
            return Err(MalformedEntry::LineBreak {
                field,
                text: text.into(),
            });
        }
    }

    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() {
        return Err(MalformedEntry::EmptyKey);
    }

    let line = EntryFormat::Compact.render(key, value);
    let parsed = match parse_header(&line) {
        Some(_) => None,
        None => parse_entry(&line),
    };
    if parsed != Some((key, value)) {
        return Err(MalformedEntry::Ambiguous {
            line,
            key: key.into(),
        });
    }

    Ok(())
}

/// Entry that cannot be written without corrupting the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedEntry {
    /// Key is blank.
    #[error("entry key is empty")]
    EmptyKey,

    /// Part of the entry contains a line terminator.
    #[error("{field} {text:?} contains a line break")]
    LineBreak { field: &'static str, text: String },

    /// Rendered entry line does not parse back into the same key.
    #[error("entry {line:?} would not read back as key {key:?}")]
    Ambiguous { line: String, key: String },
}

fn parse_header(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix('[')?
        .strip_suffix(']')
        .map(str::trim)
}

fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, value.trim()))
}
