// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Read-only introspection of operator state.

use rill_error::RillError;

/// Execution style of an operator's emission path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStyle {
    /// Signals are emitted on the caller's thread, serialized by a wip counter.
    Sync,
    /// Signals are handed off to another execution context.
    Async,
}

/// Observable state an operator chooses to expose.
///
/// Every attribute has a neutral default so implementors only surface what
/// they actually track. Reachable at runtime through
/// [`crate::Subscription::inspect`].
pub trait Inspect {
    /// Number of items currently buffered and not yet delivered downstream.
    fn buffered(&self) -> usize {
        0
    }

    /// Outstanding demand signalled by the downstream subscriber.
    fn requested_from_downstream(&self) -> u64 {
        0
    }

    /// Configured upstream batch size, when the operator prefetches.
    fn prefetch(&self) -> Option<usize> {
        None
    }

    /// Whether a terminal signal has been received from upstream.
    fn is_terminated(&self) -> bool {
        false
    }

    /// Whether the downstream subscriber cancelled.
    fn is_cancelled(&self) -> bool {
        false
    }

    /// Terminal error held by the operator, if any.
    fn error(&self) -> Option<RillError> {
        None
    }

    /// How this operator emits.
    fn run_style(&self) -> RunStyle {
        RunStyle::Sync
    }
}
