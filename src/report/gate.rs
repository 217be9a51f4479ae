//! Single-resolution, cancellable gate guarding a report.
//!
//! A `before` hook receives a [`Gate`] by value and decides the report's
//! fate exactly once: [`Gate::proceed`]/[`Gate::resolve`] lets the report
//! through (optionally carrying extra arguments for the reporter), while
//! [`Gate::cancel`] stops it. Move semantics make double resolution
//! unrepresentable.

use tokio::sync::oneshot;

use crate::value::Value;

/// The decision carried through a gate.
#[derive(Debug)]
pub enum GateDecision {
    /// Proceed with reporting; the values are handed to the reporter after
    /// the record.
    Proceed(Vec<Value>),
    /// Skip the reporter and the after-hook entirely.
    Cancel,
}

/// One report's pending decision, held by a `before` hook.
///
/// A gate dropped without being resolved counts as cancelled: a hook that
/// forgets its gate must not silently publish a report.
///
/// # Examples
///
/// ```
/// use error_beacon::{Gate, Value};
///
/// let (gate, _pending) = Gate::channel();
/// gate.resolve(vec![Value::from("extra")]);
/// ```
#[derive(Debug)]
pub struct Gate {
    tx: oneshot::Sender<GateDecision>,
}

impl Gate {
    /// Creates a gate and the receiving half the pipeline awaits.
    pub fn channel() -> (Self, oneshot::Receiver<GateDecision>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Lets the report proceed with no extra arguments.
    #[inline]
    pub fn proceed(self) {
        self.resolve(Vec::new());
    }

    /// Lets the report proceed, handing `extra` to the reporter.
    pub fn resolve(self, extra: Vec<Value>) {
        let _ = self.tx.send(GateDecision::Proceed(extra));
    }

    /// Cancels the report.
    pub fn cancel(self) {
        let _ = self.tx.send(GateDecision::Cancel);
    }
}
