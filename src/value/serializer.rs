//! Structured serializer: turns an arbitrary value graph into text.
//!
//! The serializer runs inside error-handling paths, so [`Serializer::serialize`]
//! never fails: internal problems degrade to descriptive inline text instead
//! of producing a secondary failure.

use std::fmt::Write;

use smallvec::SmallVec;

use crate::value::{TranslatorRegistry, Value};

/// Composite identities seen during one serialization call.
///
/// Inline storage covers typical nesting depths without heap allocation.
type SeenStack = SmallVec<[usize; 8]>;

/// Depth-first structured serializer with a cycle guard and translator
/// dispatch.
///
/// # Examples
///
/// ```
/// use error_beacon::{Serializer, TranslatorRegistry, Value};
///
/// let translators = TranslatorRegistry::with_defaults();
/// let serializer = Serializer::new(&translators);
///
/// let list = Value::list([Value::from(1), Value::from("two")]);
/// assert_eq!(serializer.serialize(&list), r#"[1,"two"]"#);
/// ```
pub struct Serializer<'a> {
    translators: &'a TranslatorRegistry,
}

impl<'a> Serializer<'a> {
    /// Creates a serializer over the given translator registry.
    #[inline]
    pub fn new(translators: &'a TranslatorRegistry) -> Self {
        Self { translators }
    }

    /// Serializes a value graph to text. Never fails.
    ///
    /// Cycles are broken by emitting a `circularRef_<index>` placeholder for
    /// any composite already encountered in this call; the seen list is not
    /// persisted across calls.
    pub fn serialize(&self, value: &Value) -> String {
        let mut out = String::new();
        let mut seen = SeenStack::new();
        self.write_value(&mut out, value, &mut seen, true);
        out
    }

    fn write_value(&self, out: &mut String, value: &Value, seen: &mut SeenStack, translate: bool) {
        if let Some(identity) = value.identity() {
            if let Some(position) = seen.iter().position(|&p| p == identity) {
                write_json_str(out, &format!("circularRef_{}", position));
                return;
            }
            seen.push(identity);
        }

        if translate {
            if let Some(translator) = self.translators.find(value) {
                match translator.apply(value) {
                    // Replacements get standard encoding, not another
                    // translator pass.
                    Ok(replacement) => self.write_value(out, &replacement, seen, false),
                    Err(err) => {
                        tracing::warn!(
                            translator = translator.name(),
                            error = %err,
                            "translator transform failed"
                        );
                        write_json_str(out, &format!("[translation error]: {}", err));
                    },
                }
                return;
            }
        }

        self.write_plain(out, value, seen, translate);
    }

    fn write_plain(&self, out: &mut String, value: &Value, seen: &mut SeenStack, translate: bool) {
        match value {
            Value::Nil => out.push_str("null"),
            Value::Bool(b) => {
                let _ = write!(out, "{}", b);
            },
            Value::Int(i) => {
                let _ = write!(out, "{}", i);
            },
            Value::Float(f) => {
                let _ = write!(out, "{}", f);
            },
            Value::Str(s) => write_json_str(out, s),
            Value::Pattern(p) => write_json_str(out, p.as_str()),
            Value::Func(f) => {
                write_json_str(out, &format!("[function: {}]", f.display_name()));
            },
            Value::List(cell) => {
                out.push('[');
                for (index, item) in cell.borrow().iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    self.write_value(out, item, seen, translate);
                }
                out.push(']');
            },
            Value::Record(cell) => {
                out.push('{');
                for (index, (key, item)) in cell.borrow().iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    write_json_str(out, key);
                    out.push(':');
                    self.write_value(out, item, seen, translate);
                }
                out.push('}');
            },
            Value::Node(node) => write_json_str(out, &node.markup_or_composed()),
        }
    }
}

/// JSON-escapes `s` into `out`; degrades instead of failing.
fn write_json_str(out: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => out.push_str("\"[unserializable string]\""),
    }
}
