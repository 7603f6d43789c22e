use crate::config::Configuration;
use crate::cursor::{is_printable, Cursor};
use crate::error::{ErrorKind, InfoError};
use crate::scope::ScopeStack;
use crate::validator::Validator;
use crate::value::{Value, ValueKind};
use log::{debug, trace};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

static EMPTY: Value = Value::Empty;

/// The structural event produced by one [`Reader::read`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    None,
    /// An element opened; its tag and parameters are available.
    ElementStart,
    /// An element is about to close; its attributes are still visible.
    ElementClose,
    Attribute,
    Option,
}

/// A forward-only, pull-based reader over an info markup document.
///
/// Each [`read`](Reader::read) advances exactly one event. Attribute values
/// follow lexical scoping: a value set on an element is visible from every
/// element nested inside it until one of them assigns the same key, and the
/// override disappears again when that element closes.
pub struct Reader<R> {
    pub(crate) config: Configuration,
    pub(crate) cursor: Cursor<R>,
    pub(crate) scopes: ScopeStack,
    pub(crate) event: Event,
    pub(crate) key: Option<String>,
    pub(crate) value: Value,
    pub(crate) line_depth: i32,
    /// The scope reported by the last `ElementClose` is popped on the next read.
    pending_pop: bool,
    locks: Vec<i32>,
}

impl<R: Read> Reader<R> {
    pub fn new(source: R, config: Configuration) -> Self {
        let cursor = Cursor::new(source, &config);
        Self {
            config,
            cursor,
            scopes: ScopeStack::new(),
            event: Event::None,
            key: None,
            value: Value::Empty,
            line_depth: 0,
            pending_pop: false,
            locks: Vec::new(),
        }
    }

    /// Advances to the next event. Returns `false` at end of document, or
    /// when a scope lock taken with [`lock_scope`](Reader::lock_scope) is reached.
    pub fn read(&mut self) -> Result<bool, InfoError> {
        if self.pending_pop {
            self.pending_pop = false;
            if let Some(scope) = self.scopes.pop() {
                debug!("closed [{}] at depth {}", scope.tag, scope.depth);
            }
        } else {
            self.line_depth = self.cursor.next_content_line()?;
        }

        if let Some(depth) = self.scopes.current().map(|scope| scope.depth) {
            if self.line_depth <= depth {
                self.pending_pop = true;

                let line_depth = self.line_depth;
                if let Some(&lock) = self.locks.last().filter(|&&lock| line_depth <= lock) {
                    self.locks.pop();
                    trace!("scope lock at depth {lock} reached by line depth {line_depth}");
                    self.event = Event::None;
                    return Ok(false);
                }

                self.event = Event::ElementClose;
                trace!("{:?} [{}]", self.event, self.tag());
                return Ok(true);
            }
        }

        if self.cursor.is_eof() {
            self.event = Event::None;
            return Ok(false);
        }

        self.event = Event::None;
        self.key = None;

        match self.cursor.chr() {
            b'[' => self.parse_element()?,
            b if is_printable(b) => self.parse_attribute()?,
            _ => return Err(self.cursor.error(ErrorKind::InvalidLineStart)),
        }

        trace!(
            "{:?} on line {} at depth {}",
            self.event,
            self.cursor.line(),
            self.line_depth
        );
        Ok(true)
    }

    /// Reads one event and checks it against `validator`.
    pub fn read_validated(&mut self, validator: &Validator) -> Result<bool, InfoError> {
        if !self.read()? {
            return Ok(false);
        }

        validator
            .validate(self)
            .map_err(|err| self.cursor.error(ErrorKind::Validation(err)))?;
        Ok(true)
    }

    /// Reads until the next `ElementStart` or `ElementClose`, skipping
    /// attributes and options.
    pub fn read_element(&mut self) -> Result<bool, InfoError> {
        while self.read()? {
            if matches!(self.event, Event::ElementStart | Event::ElementClose) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Bounds subsequent reads to the subtree of the open element.
    ///
    /// `read` returns `false` as soon as indentation unwinds to or past the
    /// element's depth, without reporting the close that line triggers. The
    /// scopes still open at that point stay visible until the next `read`.
    /// Returns `false` when no element is open.
    pub fn lock_scope(&mut self) -> bool {
        match self.scopes.current() {
            Some(scope) => {
                self.locks.push(scope.depth);
                true
            }
            None => false,
        }
    }

    /// Like [`lock_scope`](Reader::lock_scope), but only when the open element is `tag`.
    pub fn lock_scope_tag(&mut self, tag: &str) -> bool {
        let matches = self
            .scopes
            .current()
            .is_some_and(|scope| scope.tag.eq_ignore_ascii_case(tag));
        matches && self.lock_scope()
    }
}

impl Reader<File> {
    pub fn open<P: AsRef<Path>>(path: P, config: Configuration) -> Result<Self, InfoError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| InfoError::io(&err))?;
        debug!("opened {}", path.display());
        Ok(Self::new(file, config))
    }
}

impl<'a> Reader<&'a [u8]> {
    pub fn from_text(text: &'a str, config: Configuration) -> Self {
        Self::new(text.as_bytes(), config)
    }
}

// === Accessors ===

impl<R> Reader<R> {
    pub fn event(&self) -> Event {
        self.event
    }

    /// Tag of the innermost open element, or `""` at the document root.
    pub fn tag(&self) -> &str {
        self.scopes.current().map_or("", |scope| scope.tag.as_str())
    }

    pub fn parent_tag(&self) -> Option<&str> {
        self.scopes.parent().map(|scope| scope.tag.as_str())
    }

    /// Key of the last attribute read.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Value of the last attribute or option read.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Indentation depth of the innermost open element, 0 at the root.
    pub fn depth(&self) -> i32 {
        self.scopes.current().map_or(0, |scope| scope.depth)
    }

    /// Number of open elements.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Child elements of the innermost open element closed so far.
    pub fn children(&self) -> usize {
        self.scopes.current().map_or(0, |scope| scope.children())
    }

    pub fn line(&self) -> usize {
        self.cursor.line()
    }

    pub fn column(&self) -> usize {
        self.cursor.column()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    // --- Attributes ---

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.scopes.attribute(key)
    }

    pub fn attribute_string(&self, key: &str, fallback: &str) -> String {
        self.attribute(key)
            .map_or_else(|| fallback.to_string(), |value| value.string(fallback))
    }

    pub fn attribute_integer(&self, key: &str, fallback: i64) -> i64 {
        self.attribute(key)
            .map_or(fallback, |value| value.integer(fallback))
    }

    pub fn attribute_float(&self, key: &str, fallback: f64) -> f64 {
        self.attribute(key).map_or(fallback, |value| value.float(fallback))
    }

    /// Attributes set by the innermost open element itself.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.scopes.scope_attributes()
    }

    // --- Parameters ---

    pub fn parameters(&self) -> &Value {
        self.scopes
            .current()
            .map_or(&EMPTY, |scope| &scope.parameters)
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters().count()
    }

    pub fn parameter(&self, index: usize) -> Option<&Value> {
        self.parameters().get(index)
    }

    pub fn parameter_kind(&self, index: usize) -> Option<ValueKind> {
        self.parameter(index).map(Value::kind)
    }

    pub fn parameter_string(&self, index: usize, fallback: &str) -> String {
        self.parameters().string_at(index, fallback)
    }

    pub fn parameter_integer(&self, index: usize, fallback: i64) -> i64 {
        self.parameters().integer_at(index, fallback)
    }

    pub fn parameter_float(&self, index: usize, fallback: f64) -> f64 {
        self.parameters().float_at(index, fallback)
    }

    // --- Options ---

    /// Options of the innermost open element.
    pub fn options(&self) -> &[Value] {
        self.scopes.options()
    }

    pub fn option_count(&self) -> usize {
        self.options().len()
    }

    pub fn option_string(&self, index: usize, fallback: &str) -> String {
        self.options()
            .get(index)
            .map_or_else(|| fallback.to_string(), |value| value.string(fallback))
    }

    pub fn option_integer(&self, index: usize, fallback: i64) -> i64 {
        self.options()
            .get(index)
            .map_or(fallback, |value| value.integer(fallback))
    }

    pub fn option_float(&self, index: usize, fallback: f64) -> f64 {
        self.options()
            .get(index)
            .map_or(fallback, |value| value.float(fallback))
    }

    /// Whether `option` is among the innermost element's options (compared as text).
    pub fn has_option(&self, option: &str) -> bool {
        self.options().iter().any(|value| value.string("") == option)
    }
}
