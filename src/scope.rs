use crate::value::Value;
use std::collections::HashMap;

/// The live state of one open element.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub depth: i32,
    pub tag: String,
    pub parameters: Value,
    /// Attribute keys this scope pushed, in first-assignment order.
    keys: Vec<String>,
    /// Child scopes closed so far.
    children: usize,
    options_start: usize,
}

impl Scope {
    pub fn children(&self) -> usize {
        self.children
    }
}

/// The chain of open scopes plus the attribute and option state they share.
///
/// Each attribute key has one value stack for the whole document; its top is
/// the visible value. A scope pushes a key at most once and pops it exactly
/// once when it closes, which is what makes ancestor attributes visible to
/// descendants until shadowed.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Scope>,
    root_keys: Vec<String>,
    attributes: HashMap<String, Vec<Value>>,
    options: Vec<Value>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current(&self) -> Option<&Scope> {
        self.frames.last()
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.frames.iter().rev().nth(1)
    }

    pub fn push(&mut self, depth: i32, tag: String, parameters: Value) {
        self.frames.push(Scope {
            depth,
            tag,
            parameters,
            keys: Vec::new(),
            children: 0,
            options_start: self.options.len(),
        });
    }

    /// Closes the innermost scope, undoing its attribute assignments and options.
    pub fn pop(&mut self) -> Option<Scope> {
        let scope = self.frames.pop()?;

        for key in &scope.keys {
            if let Some(stack) = self.attributes.get_mut(key) {
                stack.pop();
            }
        }
        self.options.truncate(scope.options_start);

        if let Some(parent) = self.frames.last_mut() {
            parent.children += 1;
        }

        Some(scope)
    }

    /// Assigns `key` in the innermost scope (or the document root).
    ///
    /// The first assignment in a scope shadows any ancestor value; later ones
    /// in the same scope overwrite it.
    pub fn set_attribute(&mut self, key: String, value: Value) {
        let keys = match self.frames.last_mut() {
            Some(scope) => &mut scope.keys,
            None => &mut self.root_keys,
        };
        let stack = self.attributes.entry(key.clone()).or_default();

        if keys.contains(&key) {
            if let Some(top) = stack.last_mut() {
                *top = value;
                return;
            }
        }
        stack.push(value);
        keys.push(key);
    }

    /// The value of `key` visible from the innermost scope.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).and_then(|stack| stack.last())
    }

    /// Attributes assigned by the innermost scope itself, in assignment order.
    pub fn scope_attributes(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        let keys = self.frames.last().map_or(&self.root_keys, |scope| &scope.keys);
        keys.iter()
            .filter_map(|key| self.attribute(key).map(|value| (key.as_str(), value)))
    }

    pub fn add_option(&mut self, value: Value) {
        self.options.push(value);
    }

    /// Options belonging to the innermost scope (or the document root).
    pub fn options(&self) -> &[Value] {
        let start = self.frames.last().map_or(0, |scope| scope.options_start);
        &self.options[start..]
    }
}
