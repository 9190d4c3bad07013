//! Error types for the designstore system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Boxed cause carried by infrastructure failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for designstore operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes an element frame onto this error's context, creating one if needed.
    ///
    /// Frames are pushed innermost first while an error unwinds through nested
    /// parse calls.
    #[must_use]
    pub fn in_element(mut self, element: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(element));
        self
    }

    /// Creates a precondition violation.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition(message.into()))
    }

    /// Creates an unknown node type error.
    #[must_use]
    pub fn unknown_node_type(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownNodeType {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates an unknown node type error for a required attribute that is absent.
    #[must_use]
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::unknown_node_type(format!("attribute {attribute}"), format!("<{element}> without it"))
    }

    /// Creates an unknown node type error for an attribute value that does not parse.
    #[must_use]
    pub fn invalid_attribute(attribute: &str, value: &str) -> Self {
        Self::unknown_node_type(format!("valid {attribute}"), format!("{attribute}=\"{value}\""))
    }

    /// Creates a database component failure with no underlying cause.
    #[must_use]
    pub fn database_component(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DatabaseComponent {
            message: message.into(),
            source: None,
        })
    }

    /// Wraps an infrastructure failure into a database component failure.
    #[must_use]
    pub fn database_component_caused_by(message: impl Into<String>, source: BoxError) -> Self {
        Self::new(ErrorKind::DatabaseComponent {
            message: message.into(),
            source: Some(source),
        })
    }

    /// Creates an XML syntax error.
    #[must_use]
    pub fn xml(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Xml(message.into()))
    }

    /// Returns true if this is a precondition violation.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self.kind, ErrorKind::Precondition(_))
    }

    /// Returns true if this is a shape violation found while parsing.
    #[must_use]
    pub fn is_unknown_node_type(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownNodeType { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The caller broke an API contract (programmer error).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// The XML did not have the expected shape.
    #[error("unknown node type: expected {expected}, got {actual}")]
    UnknownNodeType {
        /// The node or attribute that was expected.
        expected: String,
        /// What was found instead.
        actual: String,
    },

    /// Persistence infrastructure failed underneath a database component.
    #[error("database component failure: {message}")]
    DatabaseComponent {
        /// What the component was doing.
        message: String,
        /// The original failure.
        #[source]
        source: Option<BoxError>,
    },

    /// The XML text could not be read or written.
    #[error("xml error: {0}")]
    Xml(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Element path, innermost frame first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }

    /// Renders the path root first, e.g. `Widgets/Widget`.
    #[must_use]
    pub fn path(&self) -> String {
        let frames: Vec<&str> = self.stack.iter().rev().map(String::as_str).collect();
        frames.join("/")
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.stack.is_empty() {
            write!(f, "in {}", self.path())?;
        }
        Ok(())
    }
}

/// Result type alias using designstore's Error.
pub type Result<T> = std::result::Result<T, Error>;
