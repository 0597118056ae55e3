// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A single window emitted by the windowing operator.

use crate::window_main::WindowPredicateMain;
use parking_lot::Mutex;
use rill_core::{
    demand, hooks, EmptySubscription, Inspect, OpQueue, Publisher, StreamContext, Subscriber,
    Subscription,
};
use rill_error::RillError;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// One downstream-facing sub-stream of the windowing operator.
///
/// A window owns its element queue, its own demand counter and its own drain
/// loop, and admits exactly one subscriber. It keeps a back-reference to the
/// main subscriber so consumed elements replenish upstream demand and so its
/// cancellation participates in the shared window count that gates the
/// upstream cancel.
pub struct WindowFlux<T: Send + 'static> {
    queue: Arc<dyn OpQueue<T>>,
    parent: Mutex<Option<Arc<WindowPredicateMain<T>>>>,
    main_ctx: StreamContext,
    me: Weak<Self>,
    actual: Mutex<Option<Arc<dyn Subscriber<T>>>>,
    inner_ctx: Mutex<Option<StreamContext>>,
    subscribed_once: AtomicBool,
    wip: AtomicUsize,
    requested: AtomicU64,
    done: AtomicBool,
    error: Mutex<Option<RillError>>,
    cancelled: AtomicBool,
}

impl<T: Send + 'static> WindowFlux<T> {
    pub(crate) fn new(
        queue: Arc<dyn OpQueue<T>>,
        parent: Option<Arc<WindowPredicateMain<T>>>,
        main_ctx: StreamContext,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            queue,
            parent: Mutex::new(parent),
            main_ctx,
            me: me.clone(),
            actual: Mutex::new(None),
            inner_ctx: Mutex::new(None),
            subscribed_once: AtomicBool::new(false),
            wip: AtomicUsize::new(0),
            requested: AtomicU64::new(0),
            done: AtomicBool::new(false),
            error: Mutex::new(None),
            cancelled: AtomicBool::new(false),
        })
    }

    /// Element routed into this window by the main subscriber.
    pub(crate) fn on_next(&self, value: T) {
        if self.cancelled.load(Ordering::Acquire) || self.done.load(Ordering::Acquire) {
            // the element can no longer reach the subscriber; compensate the
            // consumed upstream demand so the flow does not stall
            self.discard_context().discard(value);
            self.replenish(1);
            return;
        }
        if let Err(value) = self.queue.push(value) {
            self.discard_context().discard(value);
            self.on_error(RillError::overflow("window element queue"));
            return;
        }
        self.drain();
    }

    /// Terminal completion routed by the main subscriber when the window closes.
    pub(crate) fn on_complete(&self) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        self.drain();
    }

    /// Terminal failure routed by the main subscriber.
    pub(crate) fn on_error(&self, error: RillError) {
        {
            let mut slot = self.error.lock();
            if slot.is_some() || self.done.load(Ordering::Acquire) {
                drop(slot);
                hooks::on_error_dropped(&error);
                return;
            }
            *slot = Some(error);
        }
        self.done.store(true, Ordering::Release);
        self.drain();
    }

    fn drain(&self) {
        if self.wip.fetch_add(1, Ordering::AcqRel) != 0 {
            return;
        }
        let mut missed = 1usize;
        loop {
            // cancellation needs no subscriber: queued elements are discarded
            // and the consumed upstream demand compensated either way.
            // release() runs before replenish(): the replenish can deliver
            // the next elements synchronously, and those must discard through
            // the main context, not the departed subscriber's
            if self.cancelled.load(Ordering::Acquire) {
                let discarded = self.discard_pending();
                self.release();
                self.replenish(discarded);
                return;
            }
            let actual = self.actual.lock().clone();
            if let Some(actual) = actual {
                let requested = self.requested.load(Ordering::Acquire);
                let mut emitted = 0u64;
                while emitted != requested {
                    let done = self.done.load(Ordering::Acquire);
                    let empty = self.queue.is_empty();
                    if self.check_terminated(done, empty, emitted, actual.as_ref()) {
                        // wip stays non-zero; later signals bail out above
                        return;
                    }
                    if empty {
                        break;
                    }
                    let Some(value) = self.queue.pop() else { break };
                    actual.on_next(value);
                    emitted += 1;
                }
                if emitted == requested {
                    let done = self.done.load(Ordering::Acquire);
                    let empty = self.queue.is_empty();
                    if self.check_terminated(done, empty, emitted, actual.as_ref()) {
                        return;
                    }
                }
                if emitted != 0 {
                    self.replenish(emitted);
                    demand::produced(&self.requested, emitted);
                }
            }
            missed = self.wip.fetch_sub(missed, Ordering::AcqRel) - missed;
            if missed == 0 {
                return;
            }
        }
    }

    fn check_terminated(
        &self,
        done: bool,
        empty: bool,
        emitted: u64,
        actual: &dyn Subscriber<T>,
    ) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            // release() before replenish(): replenished demand can deliver
            // elements synchronously, and those must discard through the
            // main context once the subscriber is gone
            let discarded = self.discard_pending();
            self.release();
            self.replenish(emitted + discarded);
            return true;
        }
        if done {
            let error = self.error.lock().clone();
            if let Some(error) = error {
                let discarded = self.discard_pending();
                self.release();
                self.replenish(emitted + discarded);
                self.drop_parent();
                actual.on_error(error);
                return true;
            }
            if empty {
                self.release();
                self.replenish(emitted);
                self.drop_parent();
                actual.on_complete();
                return true;
            }
        }
        false
    }

    /// Empty the element queue through the discard hook, returning how many
    /// elements were dropped.
    fn discard_pending(&self) -> u64 {
        let ctx = self.discard_context();
        let mut discarded = 0u64;
        while let Some(value) = self.queue.pop() {
            ctx.discard(value);
            discarded += 1;
        }
        discarded
    }

    /// Context used for discarded elements: the window subscriber's own
    /// context while one is attached, the main downstream's otherwise.
    fn discard_context(&self) -> StreamContext {
        let inner = self.inner_ctx.lock().clone();
        inner.unwrap_or_else(|| self.main_ctx.clone())
    }

    /// Ask upstream for `n` replacement elements through the main subscriber.
    fn replenish(&self, n: u64) {
        if n == 0 {
            return;
        }
        let parent = self.parent.lock().clone();
        if let Some(main) = parent {
            main.request_upstream(n);
        }
    }

    fn release(&self) {
        *self.actual.lock() = None;
        *self.inner_ctx.lock() = None;
    }

    // The parent reference survives cancellation so late elements still
    // compensate upstream demand; it is dropped on terminal delivery.
    fn drop_parent(&self) {
        *self.parent.lock() = None;
    }
}

impl<T: Send + 'static> Publisher<T> for WindowFlux<T> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        if self.subscribed_once.swap(true, Ordering::AcqRel) {
            subscriber.on_subscribe(Arc::new(EmptySubscription));
            subscriber.on_error(RillError::invalid_state(
                "window admits only a single subscriber",
            ));
            return;
        }
        *self.inner_ctx.lock() = Some(subscriber.context());
        if let Some(me) = self.me.upgrade() {
            subscriber.on_subscribe(me);
        }
        *self.actual.lock() = Some(subscriber);
        self.drain();
    }
}

impl<T: Send + 'static> Subscription for WindowFlux<T> {
    fn request(&self, n: u64) {
        if n == 0 {
            hooks::on_bad_request(n);
            self.on_error(RillError::invalid_request(n));
            return;
        }
        demand::add_cap(&self.requested, n);
        self.drain();
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        let parent = self.parent.lock().clone();
        if let Some(main) = parent {
            main.window_released();
        }
        self.drain();
    }

    fn inspect(&self) -> Option<&dyn Inspect> {
        Some(self)
    }
}

impl<T: Send + 'static> Inspect for WindowFlux<T> {
    fn buffered(&self) -> usize {
        self.queue.len()
    }

    fn requested_from_downstream(&self) -> u64 {
        self.requested.load(Ordering::Acquire)
    }

    fn is_terminated(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn error(&self) -> Option<RillError> {
        self.error.lock().clone()
    }
}
