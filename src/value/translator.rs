//! Translator registry: ordered `(predicate, transform)` pairs that convert
//! non-plain values into serializable replacements.
//!
//! Translators are evaluated in registration order on every node the
//! serializer visits; the first matching predicate wins. The registry is
//! append-only: re-registering an existing name is a programmer error.
//!
//! Predicates run on every node of every error-path serialization, so they
//! must be cheap and side-effect-free.

use crate::error::{RegistryError, TranslateError};
use crate::value::Value;

/// Predicate deciding whether a translator applies to a value.
pub type Predicate = Box<dyn Fn(&Value) -> bool>;

/// Transform producing the serializable replacement for a matched value.
///
/// The replacement is handed back to the standard encoding; it is not
/// re-walked by translators.
pub type Transform = Box<dyn Fn(&Value) -> Result<Value, TranslateError>>;

/// A named `(predicate, transform)` pair.
pub struct Translator {
    name: String,
    predicate: Predicate,
    transform: Transform,
}

impl Translator {
    /// The registration name (unique key).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this translator applies to `value`.
    #[inline]
    pub fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Computes the replacement for `value`.
    #[inline]
    pub fn apply(&self, value: &Value) -> Result<Value, TranslateError> {
        (self.transform)(value)
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator").field("name", &self.name).finish()
    }
}

/// Ordered, append-only collection of translators.
#[derive(Debug, Default)]
pub struct TranslatorRegistry {
    entries: Vec<Translator>,
}

impl TranslatorRegistry {
    /// An empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in translators, in order:
    /// function values, pattern values, NaN, the infinities, and UI nodes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults: [(&str, Predicate, Transform); 5] = [
            (
                "function",
                Box::new(|v| matches!(v, Value::Func(_))),
                Box::new(|v| match v {
                    Value::Func(f) => {
                        Ok(Value::Str(format!("[function: {}]", f.display_name())))
                    },
                    _ => Err(TranslateError::new("not a function value")),
                }),
            ),
            (
                "pattern",
                Box::new(|v| matches!(v, Value::Pattern(_))),
                Box::new(|v| match v {
                    Value::Pattern(p) => Ok(Value::Str(p.as_str().to_string())),
                    _ => Err(TranslateError::new("not a pattern value")),
                }),
            ),
            (
                "nan",
                Box::new(|v| matches!(v, Value::Float(f) if f.is_nan())),
                Box::new(|_| Ok(Value::Str("NaN".to_string()))),
            ),
            (
                "infinity",
                Box::new(|v| matches!(v, Value::Float(f) if f.is_infinite())),
                Box::new(|v| match v {
                    Value::Float(f) => Ok(Value::Str(f.to_string())),
                    _ => Err(TranslateError::new("not a float value")),
                }),
            ),
            (
                "node",
                Box::new(|v| matches!(v, Value::Node(_))),
                Box::new(|v| match v {
                    // External markup first; ad hoc composition if it fails.
                    Value::Node(node) => Ok(Value::Str(node.markup_or_composed())),
                    _ => Err(TranslateError::new("not a node value")),
                }),
            ),
        ];
        for (name, predicate, transform) in defaults {
            // Names are distinct literals, so registration cannot collide.
            let _ = registry.register(name, predicate, transform);
        }
        registry
    }

    /// Appends a translator under a unique name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateTranslator`] when `name` is already taken.
    pub fn register<S, P, T>(
        &mut self,
        name: S,
        predicate: P,
        transform: T,
    ) -> Result<(), RegistryError>
    where
        S: Into<String>,
        P: Fn(&Value) -> bool + 'static,
        T: Fn(&Value) -> Result<Value, TranslateError> + 'static,
    {
        let name = name.into();
        if self.entries.iter().any(|t| t.name == name) {
            return Err(RegistryError::DuplicateTranslator(name));
        }
        self.entries.push(Translator {
            name,
            predicate: Box::new(predicate),
            transform: Box::new(transform),
        });
        Ok(())
    }

    /// The first translator whose predicate matches `value`.
    pub fn find(&self, value: &Value) -> Option<&Translator> {
        self.entries.iter().find(|t| t.matches(value))
    }

    /// Number of registered translators.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
