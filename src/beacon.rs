//! The hub tying the registries, serializer, and pipeline together.
//!
//! A [`Beacon`] owns every piece of process-wide state this library keeps:
//! the record store, the factory table, the translator registry, the handler
//! table, and the queue of records awaiting immediate reporting. Nothing is
//! global; components receive the hub handle explicitly, which keeps tests
//! isolated from one another.
//!
//! The hub assumes a single logical thread of control. The handle is a
//! cheap `Rc` clone with `RefCell` interior state; the only suspension point
//! anywhere in the library is the reporting gate.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::audit::Fault;
use crate::error::{RegistryError, TranslateError};
use crate::registry::token;
use crate::registry::{ErrorKind, ErrorRecord, RecordStore, ReportOptions, ReportOverrides};
use crate::report::PipelineState;
use crate::value::{Serializer, TranslatorRegistry, Value};

/// Side-effecting development hooks, disabled by default.
///
/// When installed, both hooks run on every assertion failure: `break_hook`
/// is the place to trigger a debugger, `alert_hook` the place to surface a
/// visible notification.
#[derive(Clone, Default)]
pub struct DevOptions {
    pub(crate) break_hook: Option<Rc<dyn Fn(&ErrorRecord)>>,
    pub(crate) alert_hook: Option<Rc<dyn Fn(&ErrorRecord)>>,
}

impl std::fmt::Debug for DevOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevOptions")
            .field("break_hook", &self.break_hook.is_some())
            .field("alert_hook", &self.alert_hook.is_some())
            .finish()
    }
}

/// External stack-capture collaborator; returns a textual trace, or nothing.
pub type StackProvider = Rc<dyn Fn() -> Option<String>>;

struct Inner {
    store: RefCell<RecordStore>,
    translators: RefCell<TranslatorRegistry>,
    pipeline: RefCell<PipelineState>,
    outbox: RefCell<VecDeque<ErrorRecord>>,
    stack_provider: RefCell<Option<StackProvider>>,
    dev: RefCell<DevOptions>,
}

/// Handle to one instrumentation hub.
///
/// Cloning is cheap and every clone refers to the same state.
///
/// # Examples
///
/// ```
/// use error_beacon::{Beacon, ErrorKind, ReportOptions};
///
/// let beacon = Beacon::new();
/// let network = beacon
///     .create_factory(ErrorKind::custom("networkError"), ReportOptions::default())
///     .expect("fresh kind");
///
/// let record = network.raise("timeout");
/// assert_eq!(beacon.recover(&record.display_message).as_ref(), Some(&record));
/// assert_eq!(beacon.strip_token(&record.display_message), "timeout");
/// ```
#[derive(Clone)]
pub struct Beacon {
    inner: Rc<Inner>,
}

impl Default for Beacon {
    fn default() -> Self {
        Self::new()
    }
}

impl Beacon {
    /// Creates a hub with the built-in factories (`assertion`, `runtime`,
    /// `generic`) and the default translators installed.
    pub fn new() -> Self {
        let mut store = RecordStore::default();
        for kind in [ErrorKind::Assertion, ErrorKind::Runtime, ErrorKind::Generic] {
            // A fresh store has no factories, so registration cannot collide.
            let _ = store.add_factory(kind, ReportOptions::default());
        }
        Self {
            inner: Rc::new(Inner {
                store: RefCell::new(store),
                translators: RefCell::new(TranslatorRegistry::with_defaults()),
                pipeline: RefCell::new(PipelineState::default()),
                outbox: RefCell::new(VecDeque::new()),
                stack_provider: RefCell::new(None),
                dev: RefCell::new(DevOptions::default()),
            }),
        }
    }

    // ---- registry ------------------------------------------------------

    /// Registers a factory bound to `kind`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateFactory`] when a factory already exists for
    /// `kind`; one factory per kind, registration is append-only.
    pub fn create_factory(
        &self,
        kind: ErrorKind,
        defaults: ReportOptions,
    ) -> Result<ErrorFactory, RegistryError> {
        self.inner.store.borrow_mut().add_factory(kind.clone(), defaults)?;
        Ok(ErrorFactory { beacon: self.clone(), kind, defaults })
    }

    /// Dynamic raise entry point; never fails.
    ///
    /// When `kind` has no registered factory, the record is classified as
    /// [`ErrorKind::Generic`] and its message is rewritten to name the
    /// unknown kind, so every call yields a usable record.
    pub fn make_error(
        &self,
        kind: ErrorKind,
        message: &str,
        overrides: ReportOverrides,
    ) -> ErrorRecord {
        let defaults = self.inner.store.borrow().factory_defaults(&kind);
        match defaults {
            Some(defaults) => self.raise_internal(kind, defaults, message, overrides),
            None => {
                let rewritten = format!("unknown error kind `{kind}`: {message}");
                let defaults = self
                    .inner
                    .store
                    .borrow()
                    .factory_defaults(&ErrorKind::Generic)
                    .unwrap_or_default();
                self.raise_internal(ErrorKind::Generic, defaults, &rewritten, overrides)
            },
        }
    }

    /// Recovers the record referenced by the first identifier token in
    /// `text`. An out-of-range id is "not found", not an error.
    pub fn recover(&self, text: &str) -> Option<ErrorRecord> {
        let id = token::first_id(text)?;
        self.inner.store.borrow().get(id).cloned()
    }

    /// Removes the identifier token from `text` for user-facing display.
    /// Idempotent: token-free text passes through unchanged.
    pub fn strip_token(&self, text: &str) -> String {
        token::strip(text)
    }

    /// The record with the given id, if one exists.
    pub fn record(&self, id: usize) -> Option<ErrorRecord> {
        self.inner.store.borrow().get(id).cloned()
    }

    /// Number of records registered so far.
    pub fn record_count(&self) -> usize {
        self.inner.store.borrow().len()
    }

    /// Installs the external stack-capture collaborator.
    pub fn set_stack_provider<F: Fn() -> Option<String> + 'static>(&self, provider: F) {
        *self.inner.stack_provider.borrow_mut() = Some(Rc::new(provider));
    }

    pub(crate) fn amend_record(&self, id: usize, line: &str) -> Option<ErrorRecord> {
        self.inner.store.borrow_mut().amend(id, line)
    }

    fn raise_internal(
        &self,
        kind: ErrorKind,
        defaults: ReportOptions,
        message: &str,
        overrides: ReportOverrides,
    ) -> ErrorRecord {
        let options = defaults.merged(overrides);
        let stack_trace = self.capture_stack();
        let record = self.inner.store.borrow_mut().append(kind, message, stack_trace);
        tracing::debug!(id = record.id, kind = %record.kind, "error recorded");
        if options.report_immediately {
            self.inner.outbox.borrow_mut().push_back(record.clone());
        }
        record
    }

    fn capture_stack(&self) -> Option<String> {
        let provider = self.inner.stack_provider.borrow().clone();
        provider.and_then(|provider| provider())
    }

    // ---- serializer ----------------------------------------------------

    /// Serializes a value graph to text; never fails.
    pub fn serialize(&self, value: &Value) -> String {
        let translators = self.inner.translators.borrow();
        Serializer::new(&translators).serialize(value)
    }

    /// Appends a translator under a unique name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateTranslator`] when `name` is already taken.
    pub fn register_translator<S, P, T>(
        &self,
        name: S,
        predicate: P,
        transform: T,
    ) -> Result<(), RegistryError>
    where
        S: Into<String>,
        P: Fn(&Value) -> bool + 'static,
        T: Fn(&Value) -> Result<Value, TranslateError> + 'static,
    {
        self.inner.translators.borrow_mut().register(name, predicate, transform)
    }

    // ---- assertions ----------------------------------------------------

    /// Raises an assertion record unconditionally and returns the fault.
    ///
    /// Development hooks (see [`DevOptions`]) run before the fault is
    /// returned; both default to disabled.
    pub fn fail(&self, message: &str) -> Fault {
        let defaults = self
            .inner
            .store
            .borrow()
            .factory_defaults(&ErrorKind::Assertion)
            .unwrap_or_default();
        let record =
            self.raise_internal(ErrorKind::Assertion, defaults, message, ReportOverrides::default());
        let dev = self.inner.dev.borrow().clone();
        if let Some(hook) = dev.break_hook {
            hook(&record);
        }
        if let Some(hook) = dev.alert_hook {
            hook(&record);
        }
        Fault::Raised(record)
    }

    /// Checks an invariant, raising an assertion record when it does not
    /// hold.
    pub fn ensure(&self, condition: bool, message: &str) -> Result<(), Fault> {
        if condition {
            Ok(())
        } else {
            Err(self.fail(message))
        }
    }

    /// Installs the breakpoint hook run on assertion failures.
    pub fn set_break_hook<F: Fn(&ErrorRecord) + 'static>(&self, hook: F) {
        self.inner.dev.borrow_mut().break_hook = Some(Rc::new(hook));
    }

    /// Installs the alert hook run on assertion failures.
    pub fn set_alert_hook<F: Fn(&ErrorRecord) + 'static>(&self, hook: F) {
        self.inner.dev.borrow_mut().alert_hook = Some(Rc::new(hook));
    }

    // ---- reporting -----------------------------------------------------

    /// Reports every record queued by the `report_immediately` flag, in
    /// raise order, and returns how many were processed.
    ///
    /// Raising is synchronous while gate resolution is not, so immediate
    /// reports are queued at raise time and drained here.
    pub async fn pump(&self) -> usize {
        let mut drained = 0;
        loop {
            let next = self.inner.outbox.borrow_mut().pop_front();
            let Some(record) = next else { break };
            self.report(&record).await;
            drained += 1;
        }
        drained
    }

    /// Number of records queued for immediate reporting but not yet pumped.
    pub fn pending_reports(&self) -> usize {
        self.inner.outbox.borrow().len()
    }

    pub(crate) fn pipeline<R>(&self, f: impl FnOnce(&PipelineState) -> R) -> R {
        f(&self.inner.pipeline.borrow())
    }

    pub(crate) fn pipeline_mut<R>(&self, f: impl FnOnce(&mut PipelineState) -> R) -> R {
        f(&mut self.inner.pipeline.borrow_mut())
    }
}

impl std::fmt::Debug for Beacon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Beacon")
            .field("records", &self.record_count())
            .field("pending_reports", &self.pending_reports())
            .finish()
    }
}

/// A registered, kind-bound record factory.
#[derive(Debug, Clone)]
pub struct ErrorFactory {
    beacon: Beacon,
    kind: ErrorKind,
    defaults: ReportOptions,
}

impl ErrorFactory {
    /// The kind this factory is bound to.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Raises a record with the factory defaults.
    pub fn raise(&self, message: &str) -> ErrorRecord {
        self.raise_with(message, ReportOverrides::default())
    }

    /// Raises a record, applying per-call overrides over the defaults.
    pub fn raise_with(&self, message: &str, overrides: ReportOverrides) -> ErrorRecord {
        self.beacon
            .raise_internal(self.kind.clone(), self.defaults, message, overrides)
    }
}
