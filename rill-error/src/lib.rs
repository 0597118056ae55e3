// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the rill reactive streaming workspace.
//!
//! This crate defines the root [`RillError`] type carried through stream
//! signals. Errors are terminal for the sequence that observes them, and they
//! are cheap to clone so a single terminal cause can be routed to more than
//! one subscriber (for instance an open window and the main downstream).
//!
//! # Examples
//!
//! ```
//! use rill_error::{RillError, Result};
//!
//! fn check_demand(n: u64) -> Result<()> {
//!     if n == 0 {
//!         return Err(RillError::invalid_request(n));
//!     }
//!     Ok(())
//! }
//! ```

/// Root error type for all rill operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RillError {
    /// The upstream source signalled a failure.
    #[error("source failure: {context}")]
    Source {
        /// Description of the upstream failure
        context: String,
    },

    /// A user-supplied boundary predicate failed while classifying an element.
    ///
    /// Predicate failures terminate both the open window and the main
    /// sequence with the same cause.
    #[error("predicate failure: {context}")]
    Predicate {
        /// Description of the predicate failure
        context: String,
    },

    /// An operation was attempted against a stream in an inappropriate state.
    ///
    /// The prime example is subscribing twice to a window, which only ever
    /// admits a single subscriber.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state
        message: String,
    },

    /// A subscriber violated the backpressure protocol with non-positive demand.
    #[error("invalid request: {n} (demand must be positive)")]
    InvalidRequest {
        /// The offending request amount
        n: u64,
    },

    /// A bounded queue rejected an element.
    #[error("queue overflow: {resource}")]
    Overflow {
        /// Name of the queue that rejected the element
        resource: String,
    },

    /// Stream processing encountered an error that fits no other category.
    #[error("stream processing error: {context}")]
    StreamProcessing {
        /// Description of what went wrong
        context: String,
    },
}

impl RillError {
    /// Create a source error with the given context.
    pub fn source_error(context: impl Into<String>) -> Self {
        Self::Source {
            context: context.into(),
        }
    }

    /// Create a predicate error with the given context.
    pub fn predicate_error(context: impl Into<String>) -> Self {
        Self::Predicate {
            context: context.into(),
        }
    }

    /// Create an invalid state error with the given message.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an invalid request error for the given demand.
    #[must_use]
    pub const fn invalid_request(n: u64) -> Self {
        Self::InvalidRequest { n }
    }

    /// Create an overflow error for the given queue.
    pub fn overflow(resource: impl Into<String>) -> Self {
        Self::Overflow {
            resource: resource.into(),
        }
    }

    /// Create a stream processing error with the given context.
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessing {
            context: context.into(),
        }
    }

    /// Check if this error indicates a backpressure protocol violation.
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::InvalidState { .. }
        )
    }
}

/// Specialized `Result` type for rill operations.
pub type Result<T> = std::result::Result<T, RillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_produce_matching_variants() {
        assert!(matches!(
            RillError::source_error("boom"),
            RillError::Source { .. }
        ));
        assert!(matches!(
            RillError::predicate_error("boom"),
            RillError::Predicate { .. }
        ));
        assert!(matches!(
            RillError::invalid_state("used"),
            RillError::InvalidState { .. }
        ));
        assert!(matches!(
            RillError::overflow("main queue"),
            RillError::Overflow { .. }
        ));
    }

    #[test]
    fn display_includes_context() {
        let error = RillError::source_error("forced failure");
        assert_eq!(error.to_string(), "source failure: forced failure");

        let error = RillError::invalid_request(0);
        assert_eq!(
            error.to_string(),
            "invalid request: 0 (demand must be positive)"
        );
    }

    #[test]
    fn protocol_violations_are_classified() {
        assert!(RillError::invalid_request(0).is_protocol_violation());
        assert!(RillError::invalid_state("twice").is_protocol_violation());
        assert!(!RillError::source_error("boom").is_protocol_violation());
    }
}
