//! Audit wrapper: decorates function values so raised faults pick up
//! call-site context before propagating.
//!
//! Wrapping never alters control flow. A successful call passes through
//! unchanged; a failed call re-raises a classified record whose message has
//! been enriched with the wrapper's label, the serialized invocation
//! arguments, and the serialized context object. Augmentation is best
//! effort: when it fails for any reason, the original fault propagates
//! untouched rather than being masked by a secondary failure.

use std::fmt;

use crate::beacon::Beacon;
use crate::error::AuditError;
use crate::registry::{ErrorKind, ErrorRecord, ReportOverrides};
use crate::value::{FuncValue, Value};

/// A raised fault: either an already-classified record or a plain value.
#[derive(Debug, Clone)]
pub enum Fault {
    /// A classified, registered record.
    Raised(ErrorRecord),
    /// A non-standard raised value, not yet classified.
    Value(Value),
}

impl Fault {
    /// The classified record, when this fault carries one.
    pub fn record(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Raised(record) => Some(record),
            Self::Value(_) => None,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Keeps the token, so the record survives message-only
            // boundaries and can be recovered later.
            Self::Raised(record) => f.write_str(&record.display_message),
            Self::Value(value) => f.write_str(&value.plain_text()),
        }
    }
}

impl std::error::Error for Fault {}

impl From<ErrorRecord> for Fault {
    #[inline]
    fn from(record: ErrorRecord) -> Self {
        Self::Raised(record)
    }
}

impl From<Value> for Fault {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Selects members whose name does not start with an underscore.
pub fn public_members(name: &str, _value: &Value) -> bool {
    !name.starts_with('_')
}

/// Selects members whose name starts with an underscore.
pub fn private_members(name: &str, _value: &Value) -> bool {
    name.starts_with('_')
}

/// Selects every member.
pub fn all_members(_name: &str, _value: &Value) -> bool {
    true
}

/// Joins a wrap-all prefix and a member name with exactly one `.`.
///
/// The prefix is accepted with or without trailing dots; an empty prefix
/// yields the bare member name.
fn join_label(prefix: &str, name: &str) -> String {
    let trimmed = prefix.trim_end_matches('.');
    if trimmed.is_empty() {
        name.to_string()
    } else {
        format!("{trimmed}.{name}")
    }
}

impl Beacon {
    /// Wraps a function value with call-site auditing.
    ///
    /// The wrapped function invokes `func` with whatever arguments it
    /// receives and returns its result unchanged on success. On failure, the
    /// fault is normalized to a classified record, its message is augmented
    /// with `label`, the serialized arguments, and the serialized `context`,
    /// and the same record is re-raised. Wrapping twice adds one audit line
    /// per layer, the outermost layer's line first in read order.
    ///
    /// # Examples
    ///
    /// ```
    /// use error_beacon::{Beacon, FuncValue, Value};
    ///
    /// let beacon = Beacon::new();
    /// let flaky = FuncValue::native("load", |_args| {
    ///     Err(Value::from("disk gone").into())
    /// });
    /// let wrapped = beacon.wrap(flaky, "storage.load", Value::Nil);
    ///
    /// let fault = wrapped.call(&[Value::from(7)]).unwrap_err();
    /// let record = fault.record().expect("classified");
    /// assert!(record.raw_message.contains("[storage.load]"));
    /// assert!(record.raw_message.contains("Arguments:"));
    /// ```
    pub fn wrap(&self, func: FuncValue, label: &str, context: Value) -> FuncValue {
        let beacon = self.clone();
        let label = label.to_string();
        let name = func.display_name().to_string();
        FuncValue::native(name, move |args| match func.call(args) {
            Ok(value) => Ok(value),
            Err(fault) => Err(beacon.augment(fault, &label, args, &context)),
        })
    }

    /// Wraps every function-valued member of `obj` selected by `selector`.
    ///
    /// Each wrapped member's label is the normalized `prefix` joined to the
    /// member name; the context is the object itself. Returns the number of
    /// members wrapped.
    ///
    /// # Errors
    ///
    /// [`AuditError::NotARecord`] when `obj` is not a record value.
    pub fn wrap_all<S>(&self, obj: &Value, prefix: &str, selector: S) -> Result<usize, AuditError>
    where
        S: Fn(&str, &Value) -> bool,
    {
        let Value::Record(cell) = obj else {
            return Err(AuditError::NotARecord);
        };

        let selected: Vec<(String, FuncValue)> = cell
            .borrow()
            .iter()
            .filter(|(name, value)| selector(name.as_str(), value))
            .filter_map(|(name, value)| match value {
                Value::Func(func) => Some((name.clone(), func.clone())),
                _ => None,
            })
            .collect();

        let wrapped = selected.len();
        for (name, func) in selected {
            let label = join_label(prefix, &name);
            let decorated = self.wrap(func, &label, obj.clone());
            cell.borrow_mut().insert(name, Value::Func(decorated));
        }
        Ok(wrapped)
    }

    /// Normalizes and augments a fault; falls back to the original on any
    /// augmentation failure.
    fn augment(&self, fault: Fault, label: &str, args: &[Value], context: &Value) -> Fault {
        match self.try_augment(&fault, label, args, context) {
            Some(record) => Fault::Raised(record),
            None => {
                tracing::warn!(label, "audit augmentation failed; re-raising original fault");
                fault
            },
        }
    }

    fn try_augment(
        &self,
        fault: &Fault,
        label: &str,
        args: &[Value],
        context: &Value,
    ) -> Option<ErrorRecord> {
        let record = match fault {
            Fault::Raised(record) => record.clone(),
            Fault::Value(value) => self.make_error(
                ErrorKind::Generic,
                &self.serialize(value),
                ReportOverrides::default(),
            ),
        };
        let arguments = Value::list(args.to_vec());
        let line = format!(
            " [{label}] Arguments: {} toString: {}",
            self.serialize(&arguments),
            self.serialize(context),
        );
        self.amend_record(record.id, &line)
    }
}
