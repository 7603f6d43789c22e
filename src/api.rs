use crate::config::Configuration;
use crate::error::InfoError;
use crate::reader::{Event, Reader};
use crate::validator::Validator;
use crate::value::Value;
use serde::Serialize;
use std::fmt::{self, Display};
use std::io::Read;
use std::path::Path;

/// One reader event, detached from the reader that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub event: Event,
    /// Indentation depth of the innermost open element.
    pub depth: i32,
    /// The element the event belongs to, `""` at the document root.
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Parameters for an element start, otherwise the attribute or option value.
    pub value: Value,
    pub line: usize,
}

/// Every event of a document, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    pub events: Vec<TraceEvent>,
}

impl Trace {
    /// Serializes the trace into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the trace into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Tab-indented, one line per event.
impl Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            for _ in 0..event.depth.max(0) {
                f.write_str("\t")?;
            }
            match event.event {
                Event::ElementStart => write!(f, "Element: {} - Start", event.tag)?,
                Event::ElementClose => write!(f, "Element: {} - Close", event.tag)?,
                Event::Attribute => write!(
                    f,
                    "Attribute: {} - {}",
                    event.key.as_deref().unwrap_or_default(),
                    event.value
                )?,
                Event::Option => write!(f, "Option: {}", event.value)?,
                Event::None => {}
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Reads a whole document into a [`Trace`], checking each event against
/// `validator` when one is given.
///
/// # Errors
/// Returns the first `InfoError` raised while reading or validating.
pub fn trace<R: Read>(
    source: R,
    config: Configuration,
    validator: Option<&Validator>,
) -> Result<Trace, InfoError> {
    let mut reader = Reader::new(source, config);
    let mut events = Vec::new();

    loop {
        let more = match validator {
            Some(validator) => reader.read_validated(validator)?,
            None => reader.read()?,
        };
        if !more {
            break;
        }
        events.push(snapshot(&reader));
    }

    Ok(Trace { events })
}

/// [`trace`] over a file on disk.
///
/// # Errors
/// Returns an `Io` error when the file cannot be opened, otherwise as [`trace`].
pub fn trace_file<P: AsRef<Path>>(
    path: P,
    config: Configuration,
    validator: Option<&Validator>,
) -> Result<Trace, InfoError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|err| InfoError::io(&err))?;
    trace(file, config, validator)
}

fn snapshot<R>(reader: &Reader<R>) -> TraceEvent {
    let value = match reader.event() {
        Event::ElementStart => reader.parameters().clone(),
        Event::Attribute | Event::Option => reader.value().clone(),
        Event::ElementClose | Event::None => Value::Empty,
    };
    let key = match reader.event() {
        Event::Attribute => reader.key().map(str::to_string),
        _ => None,
    };

    TraceEvent {
        event: reader.event(),
        depth: reader.depth(),
        tag: reader.tag().to_string(),
        key,
        value,
        line: reader.line(),
    }
}
