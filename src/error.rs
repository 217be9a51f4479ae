//! Failure types for registration and wrapping operations.
//!
//! Registration errors are programmer/configuration errors: they fail loudly
//! at registration time and are not recoverable at runtime. Translation
//! failures never propagate; they are rendered inline by the serializer.

use crate::registry::ErrorKind;

/// Raised when a registry's append-only discipline is violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A factory is already bound to this kind.
    #[error("a factory is already registered for kind `{0}`")]
    DuplicateFactory(ErrorKind),
    /// A translator with this name is already registered.
    #[error("a translator named `{0}` is already registered")]
    DuplicateTranslator(String),
}

/// Raised by [`wrap_all`](crate::Beacon::wrap_all) when the target value
/// cannot carry wrapped members.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    /// Only record values have members to wrap.
    #[error("wrap_all target is not a record value")]
    NotARecord,
}

/// A single translator transform failed.
///
/// Never propagated: the serializer renders the failing node as
/// `[translation error]: <message>` and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TranslateError {
    message: String,
}

impl TranslateError {
    /// Creates a translation failure with the given description.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }

    /// The failure description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}
