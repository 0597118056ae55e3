// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Boundary policies for predicate-driven windowing.

/// How a matching element closes the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Close the window after the matching element; the element is the last
    /// one delivered into the window it closes.
    Until,
    /// Close the window before the matching element; the element becomes the
    /// first one of the next window.
    UntilCutBefore,
    /// Keep the window open while the predicate holds. A non-matching
    /// element closes the window and is dropped from the flow as a
    /// separator, reachable only through the discard hook.
    While,
}
