//! User-input errors raised during parsing.
//!
//! Definition errors (malformed option-definition strings, conflicting
//! arities) are panics: they are bugs in the program assembling the parser,
//! not conditions a user can trigger or a caller should catch.

use std::sync::atomic::{AtomicI32, Ordering};

use thiserror::Error;

static DEFAULT_EXIT_STATUS: AtomicI32 = AtomicI32::new(1);

/// Change the exit status used by [`UsageError::exit_status`] when no
/// per-error status was set.
pub fn set_default_exit_status(status: i32) {
    DEFAULT_EXIT_STATUS.store(status, Ordering::Relaxed);
}

pub fn default_exit_status() -> i32 {
    DEFAULT_EXIT_STATUS.load(Ordering::Relaxed)
}

/// Malformed user input: unknown option, missing or unwanted argument,
/// failed type coercion, or positional arguments out of bounds.
///
/// Carries an optional short usage line derived from the parser description
/// so a top-level driver can print both, and an exit status (default 1).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct UsageError {
    message: String,
    usage: Option<String>,
    status: Option<i32>,
}

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        UsageError {
            message: message.into(),
            usage: None,
            status: None,
        }
    }

    pub(crate) fn with_usage(mut self, usage: String) -> Self {
        if !usage.is_empty() {
            self.usage = Some(usage);
        }
        self
    }

    pub fn with_status(mut self, status: i32) -> Self {
        self.status = Some(status);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The `Usage:` paragraph of the parser that raised this error, if its
    /// description contained one.
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn exit_status(&self) -> i32 {
        self.status.unwrap_or_else(default_exit_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_defaults_and_overrides() {
        let err = UsageError::new("bad input");
        assert_eq!(err.exit_status(), 1);
        assert_eq!(err.to_string(), "bad input");

        let err = UsageError::new("bad input").with_status(3);
        assert_eq!(err.exit_status(), 3);

        set_default_exit_status(4);
        assert_eq!(UsageError::new("x").exit_status(), 4);
        set_default_exit_status(1);
    }

    #[test]
    fn usage_is_attached_only_when_nonempty() {
        let err = UsageError::new("x").with_usage(String::new());
        assert!(err.usage().is_none());
        let err = UsageError::new("x").with_usage("Usage: prog [-a]\n".into());
        assert_eq!(err.usage(), Some("Usage: prog [-a]\n"));
    }
}
