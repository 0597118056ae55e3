// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Demand-honoring publisher over an iterator.

use parking_lot::Mutex;
use rill_core::{demand, hooks, EmptySubscription, Publisher, Subscriber, Subscription};
use rill_error::RillError;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Publishes the items of an iterator, one per unit of signalled demand.
///
/// Emission happens on the caller's thread inside a wip-serialized drain, so
/// re-entrant `request` calls from within `on_next` (the usual shape of a
/// replenishing operator above) deepen the current drain instead of
/// recursing. The iterator is consumed by the first subscriber; later
/// subscribers observe an invalid-state error.
pub struct IterSource<I: Iterator> {
    iter: Mutex<Option<I>>,
}

impl<I> IterSource<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    pub fn new<It>(items: It) -> Self
    where
        It: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: Mutex::new(Some(items.into_iter())),
        }
    }
}

impl<I> Publisher<I::Item> for IterSource<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<I::Item>>) {
        let taken = self.iter.lock().take();
        match taken {
            Some(iter) => {
                let subscription = Arc::new(IterSubscription {
                    iter: Mutex::new(Some(iter)),
                    subscriber: Arc::clone(&subscriber),
                    requested: AtomicU64::new(0),
                    wip: AtomicUsize::new(0),
                    cancelled: AtomicBool::new(false),
                });
                subscriber.on_subscribe(subscription);
            }
            None => {
                subscriber.on_subscribe(Arc::new(EmptySubscription));
                subscriber.on_error(RillError::invalid_state(
                    "iterator source already consumed",
                ));
            }
        }
    }
}

struct IterSubscription<I: Iterator> {
    iter: Mutex<Option<I>>,
    subscriber: Arc<dyn Subscriber<I::Item>>,
    requested: AtomicU64,
    wip: AtomicUsize,
    cancelled: AtomicBool,
}

impl<I> IterSubscription<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    fn drain(&self) {
        if self.wip.fetch_add(1, Ordering::AcqRel) != 0 {
            return;
        }
        let mut missed = 1usize;
        loop {
            let requested = self.requested.load(Ordering::Acquire);
            let mut emitted = 0u64;
            while emitted != requested {
                if self.cancelled.load(Ordering::Acquire) {
                    self.iter.lock().take();
                    // wip stays non-zero; later signals bail out in drain()
                    return;
                }
                let next = {
                    let mut iter = self.iter.lock();
                    match iter.as_mut() {
                        Some(items) => {
                            let value = items.next();
                            if value.is_none() {
                                *iter = None;
                            }
                            value
                        }
                        None => None,
                    }
                };
                match next {
                    Some(value) => {
                        self.subscriber.on_next(value);
                        emitted += 1;
                    }
                    None => {
                        self.subscriber.on_complete();
                        return;
                    }
                }
            }
            if emitted != 0 {
                demand::produced(&self.requested, emitted);
            }
            missed = self.wip.fetch_sub(missed, Ordering::AcqRel) - missed;
            if missed == 0 {
                return;
            }
        }
    }
}

impl<I> Subscription for IterSubscription<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    fn request(&self, n: u64) {
        if n == 0 {
            hooks::on_bad_request(n);
            self.cancelled.store(true, Ordering::Release);
            self.subscriber.on_error(RillError::invalid_request(n));
            return;
        }
        demand::add_cap(&self.requested, n);
        self.drain();
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.drain();
    }
}
