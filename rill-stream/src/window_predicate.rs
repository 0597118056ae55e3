// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Predicate-driven windowing operator.
//!
//! Partitions an upstream sequence into consecutive sub-streams ("windows")
//! whose boundaries are decided by a predicate on each element, under one of
//! the three [`BoundaryMode`] policies. Windows preserve backpressure on both
//! sides: the operator prefetches a bounded batch from upstream and windows
//! replenish that demand as their subscribers consume elements.

use crate::mode::BoundaryMode;
use crate::predicate::{BoundaryPredicate, FnPredicate, UntilChangedPredicate};
use crate::window_flux::WindowFlux;
use crate::window_main::WindowPredicateMain;
use rill_core::{queue, Publisher, QueueFactory, Subscriber};
use std::sync::Arc;

/// Shared handle to one emitted window; subscribe to it to consume the
/// window's elements.
pub type WindowHandle<T> = Arc<WindowFlux<T>>;

/// Upstream batch size used by the convenience constructors.
pub const DEFAULT_PREFETCH: usize = 256;

/// The windowing operator as a publisher of [`WindowHandle`]s.
pub struct WindowPredicate<T: Send + 'static> {
    source: Arc<dyn Publisher<T>>,
    main_queue: QueueFactory<WindowHandle<T>>,
    window_queue: QueueFactory<T>,
    prefetch: usize,
    predicate: Arc<dyn BoundaryPredicate<T>>,
    mode: BoundaryMode,
}

impl<T: Send + 'static> WindowPredicate<T> {
    /// Full-control constructor.
    ///
    /// `main_queue` holds windows awaiting downstream delivery; `window_queue`
    /// is instantiated once per window for its elements. A `prefetch` of
    /// `usize::MAX` requests unbounded upstream demand exactly once.
    ///
    /// # Panics
    ///
    /// Panics if `prefetch` is 0.
    pub fn new(
        source: Arc<dyn Publisher<T>>,
        main_queue: QueueFactory<WindowHandle<T>>,
        window_queue: QueueFactory<T>,
        prefetch: usize,
        predicate: Arc<dyn BoundaryPredicate<T>>,
        mode: BoundaryMode,
    ) -> Self {
        assert!(prefetch >= 1, "window_predicate: prefetch must be at least 1");
        Self {
            source,
            main_queue,
            window_queue,
            prefetch,
            predicate,
            mode,
        }
    }
}

impl<T: Send + 'static> Publisher<WindowHandle<T>> for WindowPredicate<T> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<WindowHandle<T>>>) {
        let main = WindowPredicateMain::new(
            subscriber,
            (self.main_queue)(),
            Arc::clone(&self.window_queue),
            self.prefetch,
            Arc::clone(&self.predicate),
            self.mode,
        );
        self.source.subscribe(main);
    }
}

/// Windows close after each element matching `predicate`; the boundary
/// element is the last of its window.
///
/// # Examples
///
/// ```
/// use rill_core::Publisher;
/// use rill_stream::{window_until, IterSource};
/// use rill_test_utils::{collect_each_window, AssertSubscriber};
/// use std::sync::Arc;
///
/// let source: Arc<dyn Publisher<i32>> = Arc::new(IterSource::new(1..=6));
/// let windows = AssertSubscriber::unbounded();
/// window_until(source, |v| v % 3 == 0).subscribe(windows.clone());
///
/// assert_eq!(
///     collect_each_window(&windows.values()),
///     vec![vec![1, 2, 3], vec![4, 5, 6]],
/// );
/// ```
pub fn window_until<T, P>(source: Arc<dyn Publisher<T>>, predicate: P) -> WindowPredicate<T>
where
    T: Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    WindowPredicate::new(
        source,
        queue::unbounded(),
        queue::unbounded(),
        DEFAULT_PREFETCH,
        Arc::new(FnPredicate::new(predicate)),
        BoundaryMode::Until,
    )
}

/// Windows close before each element matching `predicate`; the boundary
/// element starts the next window.
pub fn window_until_cut_before<T, P>(
    source: Arc<dyn Publisher<T>>,
    predicate: P,
) -> WindowPredicate<T>
where
    T: Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    WindowPredicate::new(
        source,
        queue::unbounded(),
        queue::unbounded(),
        DEFAULT_PREFETCH,
        Arc::new(FnPredicate::new(predicate)),
        BoundaryMode::UntilCutBefore,
    )
}

/// Windows stay open while `predicate` holds; a non-matching element closes
/// the current window and is dropped as a separator.
pub fn window_while<T, P>(source: Arc<dyn Publisher<T>>, predicate: P) -> WindowPredicate<T>
where
    T: Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    WindowPredicate::new(
        source,
        queue::unbounded(),
        queue::unbounded(),
        DEFAULT_PREFETCH,
        Arc::new(FnPredicate::new(predicate)),
        BoundaryMode::While,
    )
}

/// Windows close whenever the key extracted from an element differs from the
/// previous element's key; the element with the new key starts the next
/// window.
pub fn window_until_changed<T, K, KF>(
    source: Arc<dyn Publisher<T>>,
    key_fn: KF,
) -> WindowPredicate<T>
where
    T: Send + 'static,
    K: PartialEq + Send + 'static,
    KF: Fn(&T) -> K + Send + Sync + 'static,
{
    window_until_changed_by(source, key_fn, |a: &K, b: &K| a == b)
}

/// [`window_until_changed`] with a caller-supplied key equivalence.
pub fn window_until_changed_by<T, K, KF, EQ>(
    source: Arc<dyn Publisher<T>>,
    key_fn: KF,
    eq: EQ,
) -> WindowPredicate<T>
where
    T: Send + 'static,
    K: Send + 'static,
    KF: Fn(&T) -> K + Send + Sync + 'static,
    EQ: Fn(&K, &K) -> bool + Send + Sync + 'static,
{
    WindowPredicate::new(
        source,
        queue::unbounded(),
        queue::unbounded(),
        DEFAULT_PREFETCH,
        Arc::new(UntilChangedPredicate::new(key_fn, eq)),
        BoundaryMode::UntilCutBefore,
    )
}
