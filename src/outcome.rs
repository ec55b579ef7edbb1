// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Operation outcomes.
//!
//! Every file operation of dotedit reports an [`Outcome`]: a [`Status`] that
//! classifies what happened to the file, plus a human readable message. A run
//! of many independent operations collects its outcomes into an
//! [`OutcomeSet`], which keeps going past individual errors and summarizes
//! the whole batch at the end.

use std::{
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Classification of an operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// File, section, or entry did not exist before.
    Created,

    /// Existing content was rewritten.
    Updated,

    /// Content already matched, nothing was written.
    Unchanged,

    /// Content was deleted.
    Removed,

    /// Operation failed, nothing was written.
    Error,
}

impl Status {
    /// Check if status implies that persisted content changed.
    pub fn is_change(self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Removed)
    }
}

impl Display for Status {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Unchanged => "Unchanged",
            Self::Removed => "Removed",
            Self::Error => "Error",
        };

        fmt.write_str(name)
    }
}

/// Status of an operation with descriptive message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    status: Status,
    message: String,
}

impl Outcome {
    /// Construct new outcome.
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn created(message: impl Into<String>) -> Self {
        Self::new(Status::Created, message)
    }

    pub fn updated(message: impl Into<String>) -> Self {
        Self::new(Status::Updated, message)
    }

    pub fn unchanged(message: impl Into<String>) -> Self {
        Self::new(Status::Unchanged, message)
    }

    pub fn removed(message: impl Into<String>) -> Self {
        Self::new(Status::Removed, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Status::Error, message)
    }

    /// Construct error outcome from error and its chain of sources.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(cause.to_string().as_str());
            source = cause.source();
        }

        Self::error(message)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn is_success(&self) -> bool {
        self.status != Status::Error
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Check if persisted content changed.
    pub fn is_changed(&self) -> bool {
        self.status.is_change()
    }
}

impl Display for Outcome {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(
            fmt,
            "[{}] {}",
            self.status.to_string().to_uppercase(),
            self.message
        )
    }
}

/// Aggregation of independent outcomes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutcomeSet {
    outcomes: Vec<Outcome>,
    message: Option<String>,
}

impl OutcomeSet {
    /// Construct new empty outcome set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom summary message instead of the default one.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add outcome.
    pub fn push(&mut self, outcome: Outcome) -> &mut Self {
        self.outcomes.push(outcome);
        self
    }

    /// Add result of an operation, turning failures into error outcomes.
    pub fn record<E>(&mut self, result: Result<Outcome, E>) -> &mut Self
    where
        E: StdError + 'static,
    {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => Outcome::from_error(&error),
        };

        self.push(outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Check if no outcome is an error.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_success)
    }

    /// Count successful outcomes.
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    /// Count failed outcomes.
    pub fn failures(&self) -> usize {
        self.len() - self.successes()
    }

    /// Summary message, custom or default.
    pub fn message(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => self.default_message(),
        }
    }

    /// Summary message computed from counts.
    pub fn default_message(&self) -> String {
        let (total, successes, failures) = (self.len(), self.successes(), self.failures());
        if total == 0 {
            return "No result available".into();
        }

        if successes == total {
            return format!("All {total} elements executed with success");
        }

        if failures == total {
            return format!("All {total} elements executed with error");
        }

        format!("{successes} success, {failures} failures")
    }

    /// Single outcome for the whole set.
    ///
    /// Error if anything failed, otherwise Updated if anything changed,
    /// otherwise Unchanged.
    pub fn overall(&self) -> Outcome {
        let status = if !self.is_success() {
            Status::Error
        } else if self.outcomes.iter().any(Outcome::is_changed) {
            Status::Updated
        } else {
            Status::Unchanged
        };

        Outcome::new(status, self.message())
    }
}

impl Extend<Outcome> for OutcomeSet {
    fn extend<T: IntoIterator<Item = Outcome>>(&mut self, iter: T) {
        self.outcomes.extend(iter);
    }
}

impl FromIterator<Outcome> for OutcomeSet {
    fn from_iter<T: IntoIterator<Item = Outcome>>(iter: T) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
            message: None,
        }
    }
}

impl Display for OutcomeSet {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        for outcome in &self.outcomes {
            writeln!(fmt, "{outcome}")?;
        }

        if !self.is_empty() {
            writeln!(fmt)?;
        }

        write!(fmt, "{}", self.overall())
    }
}
