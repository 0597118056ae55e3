// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recording subscriber with scripted demand behavior.

use parking_lot::Mutex;
use rill_core::{demand, StreamContext, Subscriber, Subscription};
use rill_error::RillError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Subscriber that records everything it observes.
///
/// Demand is scripted at construction: an initial request issued on
/// subscribe, optionally a self-cancel after a fixed number of elements
/// (`take`-like behavior, issued from within `on_next` the way a consuming
/// operator would). Further demand can be signalled from the test body via
/// [`AssertSubscriber::request`].
pub struct AssertSubscriber<T: Send + 'static> {
    ctx: StreamContext,
    initial_request: u64,
    cancel_after: Option<u64>,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
    values: Mutex<Vec<T>>,
    received: AtomicU64,
    error: Mutex<Option<RillError>>,
    completed: AtomicBool,
}

impl<T: Send + 'static> AssertSubscriber<T> {
    /// Subscriber requesting `initial_request` on subscribe.
    #[must_use]
    pub fn with_initial_request(initial_request: u64) -> Arc<Self> {
        Arc::new(Self {
            ctx: StreamContext::empty(),
            initial_request,
            cancel_after: None,
            subscription: Mutex::new(None),
            values: Mutex::new(Vec::new()),
            received: AtomicU64::new(0),
            error: Mutex::new(None),
            completed: AtomicBool::new(false),
        })
    }

    /// Subscriber with unbounded demand.
    #[must_use]
    pub fn unbounded() -> Arc<Self> {
        Self::with_initial_request(demand::UNBOUNDED)
    }

    /// Subscriber that requests `n`, then cancels from within `on_next` once
    /// `n` elements arrived.
    #[must_use]
    pub fn take(n: u64) -> Arc<Self> {
        Arc::new(Self {
            ctx: StreamContext::empty(),
            initial_request: n,
            cancel_after: Some(n),
            subscription: Mutex::new(None),
            values: Mutex::new(Vec::new()),
            received: AtomicU64::new(0),
            error: Mutex::new(None),
            completed: AtomicBool::new(false),
        })
    }

    /// Unbounded subscriber exposing `ctx` (discard hooks) to upstream.
    #[must_use]
    pub fn unbounded_with_context(ctx: StreamContext) -> Arc<Self> {
        Arc::new(Self {
            ctx,
            initial_request: demand::UNBOUNDED,
            cancel_after: None,
            subscription: Mutex::new(None),
            values: Mutex::new(Vec::new()),
            received: AtomicU64::new(0),
            error: Mutex::new(None),
            completed: AtomicBool::new(false),
        })
    }

    /// [`AssertSubscriber::take`] exposing `ctx` (discard hooks) to upstream.
    #[must_use]
    pub fn take_with_context(n: u64, ctx: StreamContext) -> Arc<Self> {
        Arc::new(Self {
            ctx,
            initial_request: n,
            cancel_after: Some(n),
            subscription: Mutex::new(None),
            values: Mutex::new(Vec::new()),
            received: AtomicU64::new(0),
            error: Mutex::new(None),
            completed: AtomicBool::new(false),
        })
    }

    /// Signal more demand through the held subscription.
    pub fn request(&self, n: u64) {
        let subscription = self.subscription.lock().clone();
        if let Some(subscription) = subscription {
            subscription.request(n);
        }
    }

    /// Cancel the held subscription.
    pub fn cancel(&self) {
        let subscription = self.subscription.lock().clone();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }

    /// The subscription received at subscribe time.
    pub fn subscription(&self) -> Option<Arc<dyn Subscription>> {
        self.subscription.lock().clone()
    }

    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values.lock().clone()
    }

    pub fn value_count(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    pub fn error(&self) -> Option<RillError> {
        self.error.lock().clone()
    }

    pub fn is_terminated(&self) -> bool {
        self.is_complete() || self.error().is_some()
    }

    /// Assert the exact values received so far.
    ///
    /// # Panics
    ///
    /// Panics when the received values differ from `expected`.
    pub fn assert_values(&self, expected: &[T])
    where
        T: Clone + PartialEq + std::fmt::Debug,
    {
        assert_eq!(self.values(), expected);
    }
}

impl<T: Send + 'static> Subscriber<T> for AssertSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.subscription.lock() = Some(Arc::clone(&subscription));
        if self.initial_request > 0 {
            subscription.request(self.initial_request);
        }
    }

    fn on_next(&self, value: T) {
        self.values.lock().push(value);
        let received = self.received.fetch_add(1, Ordering::AcqRel) + 1;
        if self.cancel_after == Some(received) {
            self.cancel();
        }
    }

    fn on_error(&self, error: RillError) {
        *self.error.lock() = Some(error);
    }

    fn on_complete(&self) {
        self.completed.store(true, Ordering::Release);
    }

    fn context(&self) -> StreamContext {
        self.ctx.clone()
    }
}
