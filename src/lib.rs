//! Runtime fault capture, enrichment, and conditional reporting.
//!
//! Four pieces cooperate behind one hub handle:
//!
//! - an **error registry** that classifies and stores every raised fault,
//!   embedding a recoverable identifier token in the message text;
//! - a **structured serializer** that turns arbitrary value graphs into
//!   text without ever failing, even on cycles;
//! - an **audit wrapper** that decorates function values with call-site
//!   context, re-raising enriched records without altering control flow;
//! - a **reporting pipeline** that routes records through per-kind
//!   handlers, an asynchronous cancellable gate, and an externally supplied
//!   reporter.
//!
//! # Examples
//!
//! ## Raise, recover, display
//!
//! ```
//! use error_beacon::{Beacon, ErrorKind, ReportOptions};
//!
//! let beacon = Beacon::new();
//! let network = beacon
//!     .create_factory(ErrorKind::custom("networkError"), ReportOptions::default())
//!     .expect("fresh kind");
//!
//! let record = network.raise("timeout");
//! assert_eq!(beacon.recover(&record.display_message).as_ref(), Some(&record));
//! assert_eq!(beacon.strip_token(&record.display_message), "timeout");
//! ```
//!
//! ## Serialize a cyclic value
//!
//! ```
//! use error_beacon::{Beacon, Value};
//!
//! let beacon = Beacon::new();
//! let node = Value::record([]);
//! node.insert("self", node.clone());
//!
//! assert!(beacon.serialize(&node).contains("circularRef_0"));
//! ```
//!
//! ## Gate a report
//!
//! ```
//! use error_beacon::{Beacon, ErrorKind, Handler, ReportOutcome, ReportOverrides};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let beacon = Beacon::new();
//! beacon.set_reporter(|record, _extra| eprintln!("{}", record.user_message()));
//! beacon.add_handler(ErrorKind::Generic, Handler::new().before(|gate| gate.cancel()));
//!
//! let record = beacon.make_error(ErrorKind::Generic, "boom", ReportOverrides::default());
//! assert_eq!(beacon.report(&record).await, ReportOutcome::Cancelled);
//! # }
//! ```

/// Audit wrapper and the fault type it raises.
pub mod audit;
/// The hub handle owning all per-process state.
pub mod beacon;
/// Registration and wrapping failure types.
pub mod error;
/// Assertion macros.
pub mod macros;
/// Convenience re-exports for quick starts.
pub mod prelude;
/// Error records, kinds, factories, and token recovery.
pub mod registry;
/// Reporting pipeline: handlers, gate, throttle policy.
pub mod report;
/// Dynamic value model, translators, and the structured serializer.
pub mod value;

pub use audit::{all_members, private_members, public_members, Fault};
pub use beacon::{Beacon, DevOptions, ErrorFactory, StackProvider};
pub use error::{AuditError, RegistryError, TranslateError};
pub use registry::{ErrorKind, ErrorRecord, ReportOptions, ReportOverrides, SCHEMA_VERSION};
pub use report::{
    Gate, GateDecision, Handler, NoThrottle, ReportOutcome, Reporter, ThrottlePolicy,
};
pub use value::{CallResult, FuncValue, NodeValue, Serializer, Translator, TranslatorRegistry, Value};
