// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Manually driven publisher for deterministic operator tests.

use parking_lot::Mutex;
use rill_core::{demand, Publisher, Subscriber, Subscription};
use rill_error::RillError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// A hot test source driven step by step from the test body.
///
/// Signals are pushed regardless of outstanding demand (best-effort), while
/// every `request` and `cancel` arriving from the subscriber side is
/// recorded, so tests can assert the operator's upstream protocol. The
/// subscriber reference is dropped on terminal signals and on cancel, which
/// lets tests assert release behavior too.
pub struct TestPublisher<T: Send + 'static> {
    state: Arc<TestPublisherState<T>>,
}

struct TestPublisherState<T: Send + 'static> {
    subscriber: Mutex<Option<Arc<dyn Subscriber<T>>>>,
    requested: AtomicU64,
    cancelled: AtomicBool,
}

impl<T: Send + 'static> TestPublisher<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(TestPublisherState {
                subscriber: Mutex::new(None),
                requested: AtomicU64::new(0),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Emit one element to the current subscriber, if any.
    pub fn next(&self, value: T) {
        let subscriber = self.state.subscriber.lock().clone();
        if let Some(subscriber) = subscriber {
            subscriber.on_next(value);
        }
    }

    /// Terminate the sequence normally, dropping the subscriber reference.
    pub fn complete(&self) {
        let subscriber = self.state.subscriber.lock().take();
        if let Some(subscriber) = subscriber {
            subscriber.on_complete();
        }
    }

    /// Terminate the sequence with `error`, dropping the subscriber reference.
    pub fn error(&self, error: RillError) {
        let subscriber = self.state.subscriber.lock().take();
        if let Some(subscriber) = subscriber {
            subscriber.on_error(error);
        }
    }

    /// Total demand signalled so far, `u64::MAX` once unbounded.
    pub fn total_requested(&self) -> u64 {
        self.state.requested.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    pub fn has_subscriber(&self) -> bool {
        self.state.subscriber.lock().is_some()
    }

    /// Assert at least `n` total demand was signalled.
    ///
    /// # Panics
    ///
    /// Panics when less than `n` was requested so far.
    pub fn assert_min_requested(&self, n: u64) {
        let requested = self.total_requested();
        assert!(
            requested >= n,
            "expected at least {n} requested, saw {requested}"
        );
    }
}

impl<T: Send + 'static> Default for TestPublisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Clone for TestPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Send + 'static> Publisher<T> for TestPublisher<T> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        *self.state.subscriber.lock() = Some(Arc::clone(&subscriber));
        subscriber.on_subscribe(Arc::new(TestSubscription {
            state: Arc::clone(&self.state),
        }));
    }
}

struct TestSubscription<T: Send + 'static> {
    state: Arc<TestPublisherState<T>>,
}

impl<T: Send + 'static> Subscription for TestSubscription<T> {
    fn request(&self, n: u64) {
        demand::add_cap(&self.state.requested, n);
    }

    fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
        self.state.subscriber.lock().take();
    }
}
