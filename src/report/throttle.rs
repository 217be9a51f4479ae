//! Pluggable reporting-rate policy.
//!
//! The pipeline consults the installed policy before handler lookup; a veto
//! short-circuits the whole report. No algorithm is built in — deduplication,
//! cooldown, and similarity hashing all belong to the policy implementor.

use crate::registry::ErrorRecord;

/// Decides whether a record reaches the reporting pipeline at all.
///
/// Implementations run synchronously on the reporting path and should be
/// cheap. They may keep state (counters, last-seen timestamps); the pipeline
/// passes `&mut self` for exactly that reason.
pub trait ThrottlePolicy {
    /// `true` to let the record through, `false` to suppress it.
    fn should_report(&mut self, record: &ErrorRecord) -> bool;
}

/// The default policy: every record is let through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

impl ThrottlePolicy for NoThrottle {
    #[inline]
    fn should_report(&mut self, _record: &ErrorRecord) -> bool {
        true
    }
}
