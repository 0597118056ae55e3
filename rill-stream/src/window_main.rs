// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Main subscriber of the windowing operator.
//!
//! Consumes the upstream element flow, evaluates the boundary predicate,
//! opens and closes windows, and drains the queue of windows towards the
//! downstream subscriber. Windows and the main subscriber share a window
//! count that starts at one for the main's own reference; upstream is
//! cancelled exactly when that count reaches zero.

use crate::mode::BoundaryMode;
use crate::predicate::BoundaryPredicate;
use crate::window_flux::WindowFlux;
use crate::window_predicate::WindowHandle;
use parking_lot::Mutex;
use rill_core::{
    demand, hooks, Inspect, OpQueue, QueueFactory, StreamContext, Subscriber, Subscription,
};
use rill_error::RillError;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

pub(crate) struct WindowPredicateMain<T: Send + 'static> {
    actual: Arc<dyn Subscriber<WindowHandle<T>>>,
    ctx: StreamContext,
    queue: Arc<dyn OpQueue<WindowHandle<T>>>,
    window_queue: QueueFactory<T>,
    predicate: Arc<dyn BoundaryPredicate<T>>,
    mode: BoundaryMode,
    prefetch: usize,
    me: Weak<Self>,
    upstream: Mutex<Option<Arc<dyn Subscription>>>,
    window: Mutex<Option<WindowHandle<T>>>,
    wip: AtomicUsize,
    requested: AtomicU64,
    done: AtomicBool,
    error: Mutex<Option<RillError>>,
    cancelled: AtomicBool,
    window_count: AtomicUsize,
}

impl<T: Send + 'static> WindowPredicateMain<T> {
    pub(crate) fn new(
        actual: Arc<dyn Subscriber<WindowHandle<T>>>,
        queue: Arc<dyn OpQueue<WindowHandle<T>>>,
        window_queue: QueueFactory<T>,
        prefetch: usize,
        predicate: Arc<dyn BoundaryPredicate<T>>,
        mode: BoundaryMode,
    ) -> Arc<Self> {
        let ctx = actual.context();
        Arc::new_cyclic(|me| Self {
            actual,
            ctx,
            queue,
            window_queue,
            predicate,
            mode,
            prefetch,
            me: me.clone(),
            upstream: Mutex::new(None),
            window: Mutex::new(None),
            wip: AtomicUsize::new(0),
            requested: AtomicU64::new(0),
            done: AtomicBool::new(false),
            error: Mutex::new(None),
            cancelled: AtomicBool::new(false),
            window_count: AtomicUsize::new(1),
        })
    }

    /// Forward demand to the upstream subscription, if still held.
    pub(crate) fn request_upstream(&self, n: u64) {
        let upstream = self.upstream.lock().clone();
        if let Some(subscription) = upstream {
            subscription.request(n);
        }
    }

    /// A window dropped out of the shared count (its subscriber cancelled, or
    /// the cancelled main chain drained it). The last reference out cancels
    /// upstream.
    pub(crate) fn window_released(&self) {
        if self.window_count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.cancel_upstream();
            self.predicate.dispose();
        }
    }

    fn cancel_upstream(&self) {
        let upstream = self.upstream.lock().take();
        if let Some(subscription) = upstream {
            subscription.cancel();
        }
    }

    fn release_upstream(&self) {
        self.upstream.lock().take();
    }

    /// Allocate a fresh window, publish it to the downstream queue and make
    /// it the current open window.
    fn open_window(&self) -> Option<WindowHandle<T>> {
        self.window_count.fetch_add(1, Ordering::AcqRel);
        let window = WindowFlux::new((self.window_queue)(), self.me.upgrade(), self.ctx.clone());
        *self.window.lock() = Some(Arc::clone(&window));
        if self.queue.push(Arc::clone(&window)).is_err() {
            *self.window.lock() = None;
            self.cancel_upstream();
            self.signal_error(RillError::overflow("window publisher queue"));
            return None;
        }
        self.drain();
        Some(window)
    }

    /// Complete the current open window, clearing the slot so the next
    /// element opens a fresh one.
    fn close_window(&self) {
        let closed = self.window.lock().take();
        if let Some(window) = closed {
            window.on_complete();
        }
    }

    /// Store the terminal error if this is the first one; later errors go to
    /// the dropped-error hook.
    fn set_error(&self, error: &RillError) -> bool {
        let mut slot = self.error.lock();
        if slot.is_some() || self.done.load(Ordering::Acquire) {
            drop(slot);
            hooks::on_error_dropped(error);
            return false;
        }
        *slot = Some(error.clone());
        true
    }

    /// Terminate the downstream with `error` without touching the open
    /// window. Used for protocol violations originating downstream.
    fn signal_error(&self, error: RillError) {
        if !self.set_error(&error) {
            return;
        }
        self.predicate.dispose();
        self.done.store(true, Ordering::Release);
        self.drain();
    }

    fn drain(&self) {
        if self.wip.fetch_add(1, Ordering::AcqRel) != 0 {
            return;
        }
        let mut missed = 1usize;
        loop {
            let requested = self.requested.load(Ordering::Acquire);
            let mut emitted = 0u64;
            while emitted != requested {
                let done = self.done.load(Ordering::Acquire);
                let empty = self.queue.is_empty();
                if self.check_terminated(done, empty) {
                    // wip stays non-zero; later signals bail out in drain()
                    return;
                }
                if empty {
                    break;
                }
                let Some(window) = self.queue.pop() else { break };
                self.actual.on_next(window);
                emitted += 1;
            }
            if emitted == requested {
                let done = self.done.load(Ordering::Acquire);
                let empty = self.queue.is_empty();
                if self.check_terminated(done, empty) {
                    return;
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

    fn check_terminated(&self, done: bool, empty: bool) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            // windows queued but never delivered are released here, which
            // also discards their elements through the hook
            while let Some(window) = self.queue.pop() {
                window.cancel();
            }
            return true;
        }
        if done {
            let error = self.error.lock().clone();
            if let Some(error) = error {
                // undelivered windows are dropped; the terminal error already
                // reached the open window before it reached this queue drain
                while self.queue.pop().is_some() {}
                self.actual.on_error(error);
                return true;
            }
            if empty {
                self.actual.on_complete();
                return true;
            }
        }
        false
    }
}

impl<T: Send + 'static> Subscriber<T> for WindowPredicateMain<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        {
            let mut slot = self.upstream.lock();
            if slot.is_some() {
                drop(slot);
                subscription.cancel();
                return;
            }
            *slot = Some(Arc::clone(&subscription));
        }
        if let Some(me) = self.me.upgrade() {
            self.actual.on_subscribe(me);
        }
        if self.prefetch == usize::MAX {
            subscription.request(demand::UNBOUNDED);
        } else {
            subscription.request(self.prefetch as u64);
        }
    }

    fn on_next(&self, value: T) {
        if self.done.load(Ordering::Acquire) {
            hooks::on_next_dropped();
            return;
        }

        let current = self.window.lock().clone();
        let window = match current {
            Some(window) => window,
            None => {
                if self.cancelled.load(Ordering::Acquire) {
                    self.ctx.discard(value);
                    return;
                }
                match self.open_window() {
                    Some(window) => window,
                    None => return,
                }
            }
        };

        let matched = match self.predicate.test(&value) {
            Ok(matched) => matched,
            Err(error) => {
                self.ctx.discard(value);
                self.cancel_upstream();
                self.on_error(error);
                return;
            }
        };

        match (self.mode, matched) {
            (BoundaryMode::Until, true) => {
                window.on_next(value);
                self.close_window();
            }
            (BoundaryMode::Until, false) | (BoundaryMode::UntilCutBefore, false) => {
                window.on_next(value);
            }
            (BoundaryMode::UntilCutBefore, true) => {
                self.close_window();
                if let Some(next) = self.open_window() {
                    next.on_next(value);
                } else {
                    self.ctx.discard(value);
                }
            }
            (BoundaryMode::While, true) => {
                window.on_next(value);
            }
            (BoundaryMode::While, false) => {
                // the separator belongs to no window; compensate the demand
                // it consumed
                self.close_window();
                self.ctx.discard(value);
                self.request_upstream(1);
            }
        }
    }

    fn on_error(&self, error: RillError) {
        if !self.set_error(&error) {
            return;
        }
        // the open window observes the cause before the main downstream does
        let window = self.window.lock().take();
        if let Some(window) = window {
            window.on_error(error);
        }
        self.predicate.dispose();
        self.release_upstream();
        self.done.store(true, Ordering::Release);
        self.drain();
    }

    fn on_complete(&self) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        let window = self.window.lock().take();
        if let Some(window) = window {
            window.on_complete();
        }
        self.predicate.dispose();
        self.release_upstream();
        self.drain();
    }

    fn context(&self) -> StreamContext {
        self.ctx.clone()
    }
}

impl<T: Send + 'static> Subscription for WindowPredicateMain<T> {
    fn request(&self, n: u64) {
        if n == 0 {
            hooks::on_bad_request(n);
            self.cancel_upstream();
            self.signal_error(RillError::invalid_request(n));
            return;
        }
        demand::add_cap(&self.requested, n);
        self.drain();
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        self.predicate.dispose();
        if self.window_count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.cancel_upstream();
        } else {
            self.drain();
        }
    }

    fn inspect(&self) -> Option<&dyn Inspect> {
        Some(self)
    }
}

impl<T: Send + 'static> Inspect for WindowPredicateMain<T> {
    fn buffered(&self) -> usize {
        self.queue.len()
    }

    fn requested_from_downstream(&self) -> u64 {
        self.requested.load(Ordering::Acquire)
    }

    fn prefetch(&self) -> Option<usize> {
        Some(self.prefetch)
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
