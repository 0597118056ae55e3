// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The reactive-streams seam consumed by every operator in the workspace.
//!
//! These traits are object-safe on purpose: operators hand each other
//! `Arc<dyn Subscriber<T>>` / `Arc<dyn Subscription>` handles and keep all
//! mutable state behind atomics, so a subscription can be requested or
//! cancelled from any thread.

use crate::context::StreamContext;
use crate::inspect::Inspect;
use rill_error::RillError;
use std::sync::Arc;

/// Demand and lifecycle handle given to a [`Subscriber`] at subscribe time.
///
/// Upstream signals (`on_next`/`on_error`/`on_complete`) are serialized by the
/// caller; `request` and `cancel` may arrive concurrently from any thread.
pub trait Subscription: Send + Sync {
    /// Signal demand for `n` more elements. `u64::MAX` means unbounded.
    ///
    /// A demand of zero violates the protocol and is reported as an
    /// invalid-request error to the requesting subscriber.
    fn request(&self, n: u64);

    /// Stop the flow of signals and release upstream resources.
    fn cancel(&self);

    /// Introspection view of the operator state backing this subscription,
    /// when the operator exposes one.
    fn inspect(&self) -> Option<&dyn Inspect> {
        None
    }
}

/// Receiver of an ordered sequence of elements followed by one terminal signal.
pub trait Subscriber<T>: Send + Sync {
    /// Invoked once, before any other signal, with the demand handle.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    /// Invoked for each element, never exceeding the signalled demand.
    fn on_next(&self, value: T);

    /// Terminal failure signal. No further signals follow.
    fn on_error(&self, error: RillError);

    /// Terminal completion signal. No further signals follow.
    fn on_complete(&self);

    /// In-band context this subscriber makes visible to upstream operators,
    /// carrying among other things the discard hook.
    fn context(&self) -> StreamContext {
        StreamContext::empty()
    }
}

/// Source of elements that delivers to one [`Subscriber`] per `subscribe` call.
pub trait Publisher<T>: Send + Sync {
    /// Start the flow towards `subscriber`. The publisher calls
    /// `on_subscribe` exactly once before any other signal.
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>);
}

/// Inert subscription handed out on immediate-failure paths, so that a
/// subscriber still observes the `on_subscribe` → terminal signal order.
pub struct EmptySubscription;

impl Subscription for EmptySubscription {
    fn request(&self, _n: u64) {}

    fn cancel(&self) {}
}
