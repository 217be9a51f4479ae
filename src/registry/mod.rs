//! Error registry: classified records, per-kind factories, and recovery of
//! records from plain text.
//!
//! Records live in an append-only store for the lifetime of the hub; a
//! record's id is its position in that store. This is diagnostic history,
//! not a cache — nothing is ever evicted.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::RegistryError;

pub(crate) mod token;

/// Schema tag stamped on every record.
pub const SCHEMA_VERSION: &str = "1";

/// Classification tag for a record.
///
/// The built-in kinds cover the library's own taxonomy; `Custom` carries any
/// caller-defined tag. Lookups that miss fall back to [`ErrorKind::Generic`]
/// rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Invariant violation raised by the assertion facility.
    Assertion,
    /// Uncaught, unrecognized failure surfaced by the host environment.
    Runtime,
    /// The library's own fallback.
    Generic,
    /// A caller-defined kind.
    Custom(String),
}

impl ErrorKind {
    /// A caller-defined kind with the given tag.
    #[inline]
    pub fn custom<S: Into<String>>(tag: S) -> Self {
        Self::Custom(tag.into())
    }

    /// The textual tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Assertion => "assertion",
            Self::Runtime => "runtime",
            Self::Generic => "generic",
            Self::Custom(tag) => tag,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified error occurrence.
///
/// `display_message` always carries exactly one identifier token, inserted
/// when the record is created; amendments rebuild the display text from the
/// same token rather than inserting another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    /// Position in the append-only store; assigned once, never reused.
    pub id: usize,
    /// Classification tag.
    pub kind: ErrorKind,
    /// The message as supplied, plus any audit-trail text appended later.
    pub raw_message: String,
    /// `raw_message` with the identifier token prepended.
    pub display_message: String,
    /// Captured stack trace, when a stack provider was installed.
    pub stack_trace: Option<String>,
    /// Schema tag for exported records.
    pub schema_version: &'static str,
    /// Byte offset in `raw_message` where audit-trail text begins.
    #[serde(skip)]
    pub(crate) audit_offset: usize,
}

impl ErrorRecord {
    /// The message with the token stripped, suitable for showing to a human.
    #[inline]
    pub fn user_message(&self) -> &str {
        &self.raw_message
    }
}

impl std::fmt::Display for ErrorRecord {
    // The display form carries the token so the record survives boundaries
    // that only preserve a message string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_message)
    }
}

/// Default configuration carried by a factory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    /// Forward the record to the reporting pipeline as soon as it is raised.
    pub report_immediately: bool,
}

impl ReportOptions {
    /// Applies per-call overrides over these defaults.
    #[inline]
    pub fn merged(self, overrides: ReportOverrides) -> Self {
        Self {
            report_immediately: overrides
                .report_immediately
                .unwrap_or(self.report_immediately),
        }
    }
}

/// Per-call overrides; `None` fields inherit the factory default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOverrides {
    /// Overrides [`ReportOptions::report_immediately`].
    pub report_immediately: Option<bool>,
}

impl ReportOverrides {
    /// Overrides the immediate-report flag.
    #[inline]
    pub fn report_immediately(flag: bool) -> Self {
        Self { report_immediately: Some(flag) }
    }
}

/// Append-only record store plus the factory table.
#[derive(Default)]
pub(crate) struct RecordStore {
    records: Vec<ErrorRecord>,
    factories: HashMap<ErrorKind, ReportOptions>,
}

impl RecordStore {
    /// Registers a factory for `kind`.
    pub(crate) fn add_factory(
        &mut self,
        kind: ErrorKind,
        defaults: ReportOptions,
    ) -> Result<(), RegistryError> {
        if self.factories.contains_key(&kind) {
            return Err(RegistryError::DuplicateFactory(kind));
        }
        self.factories.insert(kind, defaults);
        Ok(())
    }

    pub(crate) fn factory_defaults(&self, kind: &ErrorKind) -> Option<ReportOptions> {
        self.factories.get(kind).copied()
    }

    /// Appends a record, assigning the next id.
    pub(crate) fn append(
        &mut self,
        kind: ErrorKind,
        message: &str,
        stack_trace: Option<String>,
    ) -> ErrorRecord {
        let id = self.records.len();
        let record = ErrorRecord {
            id,
            kind,
            raw_message: message.to_string(),
            display_message: token::embed(id, message),
            stack_trace,
            schema_version: SCHEMA_VERSION,
            audit_offset: message.len(),
        };
        self.records.push(record.clone());
        record
    }

    pub(crate) fn get(&self, id: usize) -> Option<&ErrorRecord> {
        self.records.get(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Inserts an audit-trail line into a record's message.
    ///
    /// Lines are inserted at the end of the original message text, so the
    /// layer amended last (the outermost wrap) reads first. The display text
    /// is rebuilt around the record's existing token.
    pub(crate) fn amend(&mut self, id: usize, line: &str) -> Option<ErrorRecord> {
        let record = self.records.get_mut(id)?;
        record.raw_message.insert_str(record.audit_offset, line);
        record.display_message = token::embed(record.id, &record.raw_message);
        Some(record.clone())
    }
}
