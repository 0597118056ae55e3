// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Request/cancel probe around an arbitrary publisher.

use parking_lot::Mutex;
use rill_core::{demand, Publisher, Subscriber, Subscription};
use rill_error::RillError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Decorates a publisher, recording all demand and cancellation flowing up
/// through it while passing every signal through unchanged.
pub struct ProbePublisher<T: Send + 'static> {
    inner: Arc<dyn Publisher<T>>,
    state: Arc<ProbeState>,
}

struct ProbeState {
    requested: AtomicU64,
    cancelled: AtomicBool,
}

impl<T: Send + 'static> ProbePublisher<T> {
    pub fn new(inner: Arc<dyn Publisher<T>>) -> Self {
        Self {
            inner,
            state: Arc::new(ProbeState {
                requested: AtomicU64::new(0),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Total demand observed, `u64::MAX` once unbounded.
    pub fn total_requested(&self) -> u64 {
        self.state.requested.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Assert at least `n` total demand flowed through the probe.
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

impl<T: Send + 'static> Publisher<T> for ProbePublisher<T> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        self.inner.subscribe(Arc::new(ProbeSubscriber {
            inner: subscriber,
            state: Arc::clone(&self.state),
        }));
    }
}

struct ProbeSubscriber<T: Send + 'static> {
    inner: Arc<dyn Subscriber<T>>,
    state: Arc<ProbeState>,
}

impl<T: Send + 'static> Subscriber<T> for ProbeSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        self.inner.on_subscribe(Arc::new(ProbeSubscription {
            inner: subscription,
            state: Arc::clone(&self.state),
        }));
    }

    fn on_next(&self, value: T) {
        self.inner.on_next(value);
    }

    fn on_error(&self, error: RillError) {
        self.inner.on_error(error);
    }

    fn on_complete(&self) {
        self.inner.on_complete();
    }

    fn context(&self) -> rill_core::StreamContext {
        self.inner.context()
    }
}

struct ProbeSubscription {
    inner: Arc<dyn Subscription>,
    state: Arc<ProbeState>,
}

impl Subscription for ProbeSubscription {
    fn request(&self, n: u64) {
        demand::add_cap(&self.state.requested, n);
        self.inner.request(n);
    }

    fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
        self.inner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssertSubscriber, TestPublisher};

    #[test]
    fn probe_records_while_passing_signals_through() {
        let source = TestPublisher::<i32>::new();
        let probe = ProbePublisher::new(Arc::new(source.clone()));
        let subscriber = AssertSubscriber::with_initial_request(5);
        probe.subscribe(subscriber.clone());

        assert_eq!(probe.total_requested(), 5);
        assert_eq!(source.total_requested(), 5);

        source.next(7);
        subscriber.assert_values(&[7]);

        subscriber.cancel();
        assert!(probe.is_cancelled());
        assert!(source.is_cancelled());
    }
}
