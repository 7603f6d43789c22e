use std::fmt;

/// A parsed value: an attribute value, an option, or an element's parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value, e.g. the parameters of `[tag]`.
    #[default]
    Empty,
    /// Quoted text, a bare lower-cased word, or a number with an unknown postfix.
    Text(String),
    /// A number, after any unit scale, percentage or modifier was applied.
    Number(f64),
    /// An ordered list of values, from `(a b c)`, element parameters or
    /// an attribute line with several values.
    Group(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    Text,
    Number,
    Group,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::Text(_) => ValueKind::Text,
            Value::Number(_) => ValueKind::Number,
            Value::Group(_) => ValueKind::Group,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Number of values held: 0 for `Empty`, the length for a group, 1 otherwise.
    pub fn count(&self) -> usize {
        match self {
            Value::Empty => 0,
            Value::Text(_) | Value::Number(_) => 1,
            Value::Group(values) => values.len(),
        }
    }

    /// The group element at `index`. Scalars and `Empty` have no elements.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Group(values) => values.get(index),
            _ => None,
        }
    }

    /// String form of the value. Groups join their elements with `", "`.
    pub fn string(&self, fallback: &str) -> String {
        match self {
            Value::Empty => fallback.to_string(),
            Value::Text(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Group(values) if values.is_empty() => fallback.to_string(),
            Value::Group(values) => values
                .iter()
                .map(|v| v.string(""))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn string_at(&self, index: usize, fallback: &str) -> String {
        self.get(index)
            .map_or_else(|| fallback.to_string(), |v| v.string(fallback))
    }

    /// Integer form, truncated toward zero. Text never converts.
    pub fn integer(&self, fallback: i64) -> i64 {
        match self {
            Value::Number(number) => *number as i64,
            Value::Group(values) => values.first().map_or(fallback, |v| v.integer(fallback)),
            Value::Empty | Value::Text(_) => fallback,
        }
    }

    pub fn integer_at(&self, index: usize, fallback: i64) -> i64 {
        self.get(index).map_or(fallback, |v| v.integer(fallback))
    }

    /// Float form. Text never converts.
    pub fn float(&self, fallback: f64) -> f64 {
        match self {
            Value::Number(number) => *number,
            Value::Group(values) => values.first().map_or(fallback, |v| v.float(fallback)),
            Value::Empty | Value::Text(_) => fallback,
        }
    }

    pub fn float_at(&self, index: usize, fallback: f64) -> f64 {
        self.get(index).map_or(fallback, |v| v.float(fallback))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string(""))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}
