use miette::Diagnostic;
use thiserror::Error;

/// The single fatal error raised while reading an info markup document.
///
/// `line` and `column` are 1-based and point at the byte the cursor was on
/// when the failure was detected. Failures that happen before any byte is
/// read (such as a file that cannot be opened) report `0:0`.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
#[error("Info Markup error on line {line} at {column}: {kind}")]
#[diagnostic(forward(kind))]
pub struct InfoError {
    pub line: usize,
    pub column: usize,
    pub kind: ErrorKind,
}

impl InfoError {
    pub fn new(kind: ErrorKind, line: usize, column: usize) -> Self {
        Self { line, column, kind }
    }

    /// An I/O failure that has no position in the document.
    pub fn io(err: &std::io::Error) -> Self {
        Self::new(
            ErrorKind::Io {
                message: err.to_string(),
            },
            0,
            0,
        )
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("Unexpected end of file")]
    #[diagnostic(
        code(info::unexpected_eof),
        help("The document ended while a token, group or element was still open.")
    )]
    UnexpectedEof,

    #[error("Document exceeds the read limit of {limit_mb} MB")]
    #[diagnostic(
        code(info::read_limit),
        help("Raise `read_limit_mb` in the configuration or split the document.")
    )]
    ReadLimitExceeded { limit_mb: usize },

    #[error("Group maximum count exceeded (limit is {limit})")]
    #[diagnostic(
        code(info::group_limit),
        help("Raise `group_limit` in the configuration or use fewer values.")
    )]
    GroupLimitExceeded { limit: usize },

    #[error("Multiline groups are not supported")]
    #[diagnostic(
        code(info::multiline_group),
        help("Close the group on the line it was opened.")
    )]
    MultilineGroup,

    #[error("Invalid line start")]
    #[diagnostic(code(info::invalid_line_start))]
    InvalidLineStart,

    #[error("Unexpected character '{found}'")]
    #[diagnostic(
        code(info::unexpected_character),
        help("A group was closed with the wrong delimiter.")
    )]
    UnexpectedCharacter { found: char },

    #[error("Token exceeds maximum length of {limit} bytes")]
    #[diagnostic(
        code(info::token_too_long),
        help("Raise `builder_size` in the configuration.")
    )]
    TokenTooLong { limit: usize },

    #[error("Invalid number '{text}'")]
    #[diagnostic(code(info::invalid_number))]
    InvalidNumber { text: String },

    #[error("I/O error: {message}")]
    #[diagnostic(code(info::io))]
    Io { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),
}

/// A schema rule violation, or a malformed rule.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Element '{tag}' does not exist in ruleset")]
    #[diagnostic(
        code(validation::unknown_element),
        help("Register the element with `Validator::set_element_rules`.")
    )]
    UnknownElement { tag: String },

    #[error("Element '{tag}' cannot be a top level element")]
    #[diagnostic(
        code(validation::top_level),
        help("Add '/' to the element's allowed containers to permit it at the root.")
    )]
    TopLevelNotAllowed { tag: String },

    #[error("Element '{tag}' cannot be within element '{parent}'")]
    #[diagnostic(code(validation::parent_not_allowed))]
    ParentNotAllowed { tag: String, parent: String },

    #[error("Element '{tag}' should have {min} to {max} parameters, but was given {found}")]
    #[diagnostic(code(validation::parameter_count))]
    ParameterCount {
        tag: String,
        min: usize,
        max: usize,
        found: usize,
    },

    #[error("Parameter type mismatch for element '{tag}' at position {index}")]
    #[diagnostic(code(validation::parameter_type))]
    ParameterType { tag: String, index: usize },

    #[error("Attribute '{key}' is not allowed in element '{tag}'")]
    #[diagnostic(code(validation::attribute_not_allowed))]
    AttributeNotAllowed { key: String, tag: String },

    #[error("Unknown parameter type '{token}' in rules for element '{tag}'")]
    #[diagnostic(
        code(validation::unknown_parameter_type),
        help("Use number, int, float, string, text, group or array, joined with '|'.")
    )]
    UnknownParameterType { tag: String, token: String },
}
