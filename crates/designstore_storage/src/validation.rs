//! Content validation call contract.
//!
//! Structure is checked while parsing; content rules live in the entities.
//! A [`ValidationContext`] walks the component tree with a parent stack so
//! every issue records where it was found.

use std::fmt;

/// One content problem found during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Element path to the offending component, root first.
    pub path: Vec<String>,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.join("/"), self.message)
    }
}

/// Parent stack plus collected issues.
#[derive(Clone, Debug, Default)]
pub struct ValidationContext {
    stack: Vec<String>,
    issues: Vec<ValidationIssue>,
}

impl ValidationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame for the component about to be validated.
    pub fn enter(&mut self, frame: impl Into<String>) {
        self.stack.push(frame.into());
    }

    /// Pops the innermost frame.
    pub fn leave(&mut self) {
        self.stack.pop();
    }

    /// Runs `f` inside a frame.
    pub fn within<F>(&mut self, frame: impl Into<String>, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.enter(frame);
        f(self);
        self.leave();
    }

    /// Records an issue at the current frame.
    pub fn report(&mut self, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: self.stack.clone(),
            message: message.into(),
        });
    }

    /// Returns the issues collected so far.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Returns true if no issue was reported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A component that checks its own content.
pub trait Validate {
    /// Reports problems into `ctx`.
    fn validate(&self, ctx: &mut ValidationContext);
}
