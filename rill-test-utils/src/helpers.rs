// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collection helpers for window-of-values assertions.

use crate::AssertSubscriber;
use rill_core::Publisher;
use std::sync::Arc;

/// Subscribe to `publisher` with unbounded demand and return every value it
/// has delivered by the time control returns to the caller.
///
/// With the synchronous test sources in this crate, a terminated publisher
/// has delivered everything once `subscribe` returns.
pub fn collect_values<T, P>(publisher: &P) -> Vec<T>
where
    T: Clone + Send + 'static,
    P: Publisher<T> + ?Sized,
{
    let subscriber = AssertSubscriber::unbounded();
    publisher.subscribe(subscriber.clone());
    subscriber.values()
}

/// [`collect_values`] over a slice of window handles, preserving window order.
pub fn collect_each_window<T, W>(windows: &[Arc<W>]) -> Vec<Vec<T>>
where
    T: Clone + Send + 'static,
    W: Publisher<T> + ?Sized,
{
    windows
        .iter()
        .map(|window| collect_values(window.as_ref()))
        .collect()
}
