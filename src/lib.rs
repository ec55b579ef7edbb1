// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Idempotent editing of configuration files.
//!
//! Dotedit reads and mutates configuration state that lives in plain text
//! files: whole lines matched by prefix, blocks of lines, and keys inside
//! sections of INI-style files. It is meant to be driven by a dotfile manager
//! or any other configuration reconciliation loop that runs on every
//! deployment.
//!
//! # Contract
//!
//! Every operation reads the current state, decides whether a write is
//! needed, performs the minimal whole-file write, and reports an
//! [`Outcome`]: created, updated, unchanged, removed, or error. Running an
//! operation twice with the same arguments writes at most once.
//!
//! # Layers
//!
//! 1. [`text`] models file content as a [`Document`] of lines, and provides
//!    the line mutator: replace, remove, and append-if-absent.
//! 2. [`text::ini`] layers sections and key/value entries on top of it.
//! 3. [`store`] persists text with atomic whole-file replacement.
//! 4. [`editor`] ties them together into file level operations.
//! 5. [`config`] lists such operations in a plan file to apply in one go.

pub mod config;
pub mod editor;
pub mod outcome;
pub mod path;
pub mod store;
pub mod text;

pub use config::{Plan, Step};
pub use editor::{EditError, FileEditor};
pub use outcome::{Outcome, OutcomeSet, Status};
pub use store::{FileState, LocalStore, StoreError, TextStore};
pub use text::{
    ini::{check_entry, EntryFormat, MalformedEntry, SetEffect},
    Document, LineMatch,
};
