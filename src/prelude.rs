//! Convenience re-exports for common usage patterns.
//!
//! Import everything with:
//!
//! ```
//! use error_beacon::prelude::*;
//! ```
//!
//! # Examples
//!
//! ```
//! use error_beacon::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let beacon = Beacon::new();
//! beacon.set_reporter(|record, _extra| eprintln!("{}", record.user_message()));
//!
//! let io = beacon
//!     .create_factory(ErrorKind::custom("ioError"), ReportOptions { report_immediately: true })
//!     .expect("fresh kind");
//! io.raise("disk full");
//! assert_eq!(beacon.pump().await, 1);
//! # }
//! ```

pub use crate::audit::{all_members, private_members, public_members, Fault};
pub use crate::beacon::{Beacon, ErrorFactory};
pub use crate::error::{AuditError, RegistryError, TranslateError};
pub use crate::registry::{ErrorKind, ErrorRecord, ReportOptions, ReportOverrides};
pub use crate::report::{Gate, GateDecision, Handler, NoThrottle, ReportOutcome, ThrottlePolicy};
pub use crate::value::{FuncValue, NodeValue, Value};
