pub mod api;
pub mod config;
pub mod cursor;
pub mod error;
mod parser;
pub mod reader;
pub mod resolver;
pub mod scope;
mod serialization;
pub mod validator;
pub mod value;

pub use api::{trace, Trace, TraceEvent};
pub use config::Configuration;
pub use error::{ErrorKind, InfoError, ValidationError};
pub use reader::{Event, Reader};
pub use resolver::Resolver;
pub use validator::Validator;
pub use value::{Value, ValueKind};
