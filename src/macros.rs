//! Ergonomic macros for the assertion facility.
//!
//! Both macros take a hub handle first and a `format!`-style message, and
//! early-return an `Err(Fault)` from the enclosing function.
//!
//! # Examples
//!
//! ```
//! use error_beacon::{ensure, Beacon, Fault};
//!
//! fn checked_div(beacon: &Beacon, a: i64, b: i64) -> Result<i64, Fault> {
//!     ensure!(beacon, b != 0, "division by zero: {} / {}", a, b);
//!     Ok(a / b)
//! }
//!
//! let beacon = Beacon::new();
//! assert_eq!(checked_div(&beacon, 10, 2).unwrap(), 5);
//! assert!(checked_div(&beacon, 1, 0).is_err());
//! ```

/// Checks an invariant; on failure, raises an assertion record and returns
/// `Err(Fault)` from the enclosing function.
#[macro_export]
macro_rules! ensure {
    ($beacon:expr, $cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($beacon.fail(&format!($($arg)*)));
        }
    };
}

/// Unconditionally raises an assertion record and returns `Err(Fault)` from
/// the enclosing function.
#[macro_export]
macro_rules! fail {
    ($beacon:expr, $($arg:tt)*) => {
        return Err($beacon.fail(&format!($($arg)*)))
    };
}
