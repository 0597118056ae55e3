// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Last-resort hooks for signals that can no longer reach a subscriber.

use rill_error::RillError;

/// Report a terminal error that arrived after the sequence already
/// terminated. Concurrent errors coalesce to the first; the rest end here.
pub fn on_error_dropped(error: &RillError) {
    tracing::warn!(%error, "terminal error dropped after termination");
}

/// Report an element signalled after a terminal state.
pub fn on_next_dropped() {
    tracing::debug!("element dropped after termination");
}

/// Report a backpressure protocol violation (non-positive demand).
pub fn on_bad_request(n: u64) {
    tracing::warn!(n, "non-positive demand violates the backpressure protocol");
}
