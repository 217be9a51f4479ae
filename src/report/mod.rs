//! Reporting pipeline: routes a finalized record to its per-kind handler,
//! gated by an asynchronous, cancellable decision, then to the external
//! reporter and the handler's after-hook.
//!
//! Per-record lifecycle: `Pending → Gated → (Cancelled | Reported) → Done`,
//! surfaced to callers as a [`ReportOutcome`]. Overlapping reports may hold
//! outstanding gates simultaneously; their completions interleave in
//! whatever order the gates resolve — there is no FIFO delivery guarantee.

use std::collections::HashMap;
use std::rc::Rc;

use crate::beacon::Beacon;
use crate::registry::{ErrorKind, ErrorRecord};
use crate::value::Value;

mod gate;
mod throttle;

pub use gate::{Gate, GateDecision};
pub use throttle::{NoThrottle, ThrottlePolicy};

/// Gating hook invoked before a report is delivered.
pub type BeforeHook = Rc<dyn Fn(Gate)>;

/// Hook invoked after a report has been delivered.
pub type AfterHook = Rc<dyn Fn()>;

/// The externally supplied delivery function.
pub type Reporter = Rc<dyn Fn(&ErrorRecord, &[Value])>;

/// Per-kind pair of a gating hook and a post-report hook.
///
/// Unset fields fall back to the default behavior: an absent `before`
/// resolves the gate immediately with no extra arguments, an absent `after`
/// is a no-op.
#[derive(Clone, Default)]
pub struct Handler {
    before: Option<BeforeHook>,
    after: Option<AfterHook>,
}

impl Handler {
    /// A handler with default behavior for both hooks.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gating hook.
    pub fn before<F: Fn(Gate) + 'static>(mut self, hook: F) -> Self {
        self.before = Some(Rc::new(hook));
        self
    }

    /// Sets the post-report hook.
    pub fn after<F: Fn() + 'static>(mut self, hook: F) -> Self {
        self.after = Some(Rc::new(hook));
        self
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Terminal state of one reported record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The gate resolved and the reporter was invoked exactly once.
    Reported,
    /// The gate was cancelled (or dropped unresolved); the reporter and the
    /// after-hook were skipped.
    Cancelled,
    /// The throttle policy vetoed the record before handler lookup.
    Throttled,
    /// The gate resolved but no reporter is installed; the report was
    /// dropped at the final step.
    Dropped,
}

pub(crate) struct PipelineState {
    handlers: HashMap<ErrorKind, Handler>,
    reporter: Option<Reporter>,
    throttle: Box<dyn ThrottlePolicy>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            reporter: None,
            throttle: Box::new(NoThrottle),
        }
    }
}

impl PipelineState {
    pub(crate) fn add_handler(&mut self, kind: ErrorKind, handler: Handler) {
        self.handlers.insert(kind, handler);
    }

    pub(crate) fn set_reporter(&mut self, reporter: Reporter) {
        self.reporter = Some(reporter);
    }

    pub(crate) fn set_throttle(&mut self, policy: Box<dyn ThrottlePolicy>) {
        self.throttle = policy;
    }

    fn handler_hooks(&self, kind: &ErrorKind) -> (Option<BeforeHook>, Option<AfterHook>) {
        match self.handlers.get(kind) {
            Some(handler) => (handler.before.clone(), handler.after.clone()),
            None => (None, None),
        }
    }
}

impl Beacon {
    /// Registers (or overwrites) the handler for `kind`.
    pub fn add_handler(&self, kind: ErrorKind, handler: Handler) {
        self.pipeline_mut(|state| state.add_handler(kind, handler));
    }

    /// Installs the external reporter.
    ///
    /// Without one, reports are silently dropped at the final step.
    pub fn set_reporter<F: Fn(&ErrorRecord, &[Value]) + 'static>(&self, reporter: F) {
        self.pipeline_mut(|state| state.set_reporter(Rc::new(reporter)));
    }

    /// Installs the throttle policy consulted before handler lookup.
    pub fn set_throttle<P: ThrottlePolicy + 'static>(&self, policy: P) {
        self.pipeline_mut(|state| state.set_throttle(Box::new(policy)));
    }

    /// Routes one record through gate, reporter, and after-hook.
    ///
    /// The only suspension point is the gate; hooks and the reporter run
    /// synchronously on the caller's task.
    ///
    /// # Examples
    ///
    /// ```
    /// use error_beacon::{Beacon, ErrorKind, ReportOutcome, ReportOverrides};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let beacon = Beacon::new();
    /// beacon.set_reporter(|record, _extra| println!("{}", record.user_message()));
    ///
    /// let record = beacon.make_error(ErrorKind::Generic, "boom", ReportOverrides::default());
    /// assert_eq!(beacon.report(&record).await, ReportOutcome::Reported);
    /// # }
    /// ```
    pub async fn report(&self, record: &ErrorRecord) -> ReportOutcome {
        // Throttle decision comes before handler lookup.
        let allowed = self.pipeline_mut(|state| state.throttle.should_report(record));
        if !allowed {
            tracing::debug!(id = record.id, kind = %record.kind, "report throttled");
            return ReportOutcome::Throttled;
        }

        let (before, after) = self.pipeline(|state| state.handler_hooks(&record.kind));

        let (gate, decision) = Gate::channel();
        tracing::debug!(id = record.id, kind = %record.kind, "report gated");
        match before {
            Some(hook) => hook(gate),
            None => gate.proceed(),
        }

        let extra = match decision.await {
            Ok(GateDecision::Proceed(extra)) => extra,
            Ok(GateDecision::Cancel) | Err(_) => {
                tracing::debug!(id = record.id, kind = %record.kind, "report cancelled");
                return ReportOutcome::Cancelled;
            },
        };

        let reporter = self.pipeline(|state| state.reporter.clone());
        let outcome = match reporter {
            Some(reporter) => {
                reporter(record, &extra);
                tracing::debug!(id = record.id, kind = %record.kind, "report delivered");
                ReportOutcome::Reported
            },
            None => {
                tracing::warn!(id = record.id, kind = %record.kind, "no reporter installed; report dropped");
                ReportOutcome::Dropped
            },
        };
        if let Some(hook) = after {
            hook();
        }
        outcome
    }

    /// Uncaught-failure entry point.
    ///
    /// Attempts to recover a classified record from `message`; otherwise
    /// synthesizes a [`ErrorKind::Runtime`] record carrying the raw message,
    /// location, and line. Either way the result is routed through
    /// [`report`](Self::report).
    pub async fn handle_uncaught(
        &self,
        message: &str,
        location: &str,
        line: u32,
    ) -> ReportOutcome {
        let record = match self.recover(message) {
            Some(record) => record,
            None => self.make_error(
                ErrorKind::Runtime,
                &format!("{message} ({location}:{line})"),
                Default::default(),
            ),
        };
        self.report(&record).await
    }
}
