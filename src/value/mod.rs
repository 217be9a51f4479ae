//! Dynamic diagnostic value model.
//!
//! [`Value`] is the value tree the serializer walks and the audit wrapper
//! decorates. Composites (`List`, `Record`, `Node`) share their storage
//! through `Rc`, so a value graph can contain genuine cycles; the serializer
//! breaks them by comparing composite identities.
//!
//! # Examples
//!
//! ```
//! use error_beacon::Value;
//!
//! let user = Value::record([
//!     ("name".to_string(), Value::from("ada")),
//!     ("retries".to_string(), Value::from(3)),
//! ]);
//! assert!(user.identity().is_some());
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::audit::Fault;
use crate::error::TranslateError;

mod serializer;
mod translator;

pub use serializer::Serializer;
pub use translator::{Predicate, Transform, Translator, TranslatorRegistry};

/// Result of invoking a [`FuncValue`].
pub type CallResult = Result<Value, Fault>;

/// Shared storage behind a list value.
pub type ListCell = Rc<RefCell<Vec<Value>>>;

/// Shared storage behind a record value.
pub type RecordCell = Rc<RefCell<BTreeMap<String, Value>>>;

/// A dynamic diagnostic value.
///
/// Scalars are plain; composites are `Rc`-shared so the same allocation can
/// appear at several points of a graph (including inside itself).
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number, including NaN and the infinities.
    Float(f64),
    /// A string.
    Str(String),
    /// A compiled pattern; serialized through its source form.
    Pattern(Regex),
    /// A function value, optionally carrying a native callable.
    Func(FuncValue),
    /// An ordered sequence with shared storage.
    List(ListCell),
    /// A keyed record with shared storage.
    Record(RecordCell),
    /// A UI-element wrapper.
    Node(NodeValue),
}

impl Value {
    /// Builds a list value from its elements.
    #[inline]
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Builds a record value from key/value pairs.
    #[inline]
    pub fn record<I: IntoIterator<Item = (String, Value)>>(entries: I) -> Self {
        Self::Record(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    /// Builds a pattern value from a compiled regex.
    #[inline]
    pub fn pattern(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }

    /// Returns the identity of a composite value, or `None` for scalars.
    ///
    /// Two values have the same identity exactly when they share storage,
    /// which is what the serializer's cycle guard compares.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::List(cell) => Some(Rc::as_ptr(cell) as usize),
            Self::Record(cell) => Some(Rc::as_ptr(cell) as usize),
            Self::Node(node) => Some(node.identity()),
            _ => None,
        }
    }

    /// Inserts an entry into a record value; no-op for other variants.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        if let Self::Record(cell) = self {
            cell.borrow_mut().insert(key.into(), value);
        }
    }

    /// Looks up a record member by name.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Self::Record(cell) => cell.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Appends an element to a list value; no-op for other variants.
    pub fn push(&self, value: Value) {
        if let Self::List(cell) = self {
            cell.borrow_mut().push(value);
        }
    }

    /// A short unquoted textual form.
    ///
    /// Used when composing node markup and for displaying unclassified
    /// faults; composites render as placeholders rather than descending.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Str(s) => s.clone(),
            Self::Pattern(p) => p.as_str().to_string(),
            Self::Func(f) => format!("[function: {}]", f.display_name()),
            Self::List(_) => "[list]".to_string(),
            Self::Record(_) => "[record]".to_string(),
            Self::Node(n) => format!("<{}>", n.tag()),
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A function value: a display name plus an optional native callable.
///
/// Declared functions without a body are inert; calling one returns
/// [`Value::Nil`]. The audit wrapper replaces a function's body with a
/// decorated one while keeping the same display name.
#[derive(Clone)]
pub struct FuncValue {
    name: Option<String>,
    body: Option<Rc<dyn Fn(&[Value]) -> CallResult>>,
}

impl FuncValue {
    /// A named function with no body.
    #[inline]
    pub fn declared<S: Into<String>>(name: S) -> Self {
        Self { name: Some(name.into()), body: None }
    }

    /// A named function backed by a native callable.
    pub fn native<S, F>(name: S, body: F) -> Self
    where
        S: Into<String>,
        F: Fn(&[Value]) -> CallResult + 'static,
    {
        Self { name: Some(name.into()), body: Some(Rc::new(body)) }
    }

    /// An unnamed function backed by a native callable.
    pub fn anonymous<F>(body: F) -> Self
    where
        F: Fn(&[Value]) -> CallResult + 'static,
    {
        Self { name: None, body: Some(Rc::new(body)) }
    }

    /// The display name, or `"anonymous"` when the function is unnamed.
    #[inline]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    /// Invokes the native callable with the given arguments.
    #[inline]
    pub fn call(&self, args: &[Value]) -> CallResult {
        match &self.body {
            Some(body) => body(args),
            None => Ok(Value::Nil),
        }
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncValue")
            .field("name", &self.name)
            .field("native", &self.body.is_some())
            .finish()
    }
}

/// A UI-element wrapper: tag, attributes, children, and an optional markup
/// provider standing in for an external DOM serializer.
///
/// The markup provider may fail; the default node translator then falls back
/// to [`NodeValue::composed_markup`].
#[derive(Clone)]
pub struct NodeValue {
    tag: String,
    attrs: BTreeMap<String, String>,
    children: ListCell,
    markup: Option<Rc<dyn Fn() -> Result<String, TranslateError>>>,
}

impl NodeValue {
    /// Creates a node with the given tag and no attributes or children.
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Rc::new(RefCell::new(Vec::new())),
            markup: None,
        }
    }

    /// Adds an attribute.
    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Installs an external markup provider.
    pub fn with_markup<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<String, TranslateError> + 'static,
    {
        self.markup = Some(Rc::new(provider));
        self
    }

    /// Appends a child value.
    pub fn push_child(&self, child: Value) {
        self.children.borrow_mut().push(child);
    }

    /// The element tag.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Runs the external markup provider, if one is installed.
    pub fn markup(&self) -> Option<Result<String, TranslateError>> {
        self.markup.as_ref().map(|provider| provider())
    }

    /// Ad hoc markup composed from the tag, attributes, and children.
    ///
    /// Child nodes compose recursively (preferring their own provider);
    /// other children contribute their plain textual form. A node reached
    /// twice on one composition path renders as a self-closing tag instead
    /// of recursing.
    pub fn composed_markup(&self) -> String {
        self.compose(&mut Vec::new())
    }

    fn compose(&self, seen: &mut Vec<usize>) -> String {
        if seen.contains(&self.identity()) {
            return format!("<{}/>", self.tag);
        }
        seen.push(self.identity());

        let mut out = String::new();
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attrs {
            out.push_str(&format!(" {}=\"{}\"", key, value));
        }
        out.push('>');
        for child in self.children.borrow().iter() {
            match child {
                Value::Node(node) => match node.markup() {
                    Some(Ok(markup)) => out.push_str(&markup),
                    Some(Err(_)) | None => out.push_str(&node.compose(seen)),
                },
                other => out.push_str(&other.plain_text()),
            }
        }
        out.push_str(&format!("</{}>", self.tag));

        seen.pop();
        out
    }

    /// The provider's markup when it succeeds, the composed form otherwise.
    pub fn markup_or_composed(&self) -> String {
        match self.markup() {
            Some(Ok(markup)) => markup,
            Some(Err(_)) | None => self.composed_markup(),
        }
    }

    /// Composite identity; nodes sharing child storage are the same node.
    #[inline]
    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.children) as usize
    }
}

impl fmt::Debug for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeValue")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("children", &self.children.borrow().len())
            .finish()
    }
}
