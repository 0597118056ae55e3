// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bridge from a [`Publisher`] to a [`futures::Stream`].

use futures::Stream;
use parking_lot::Mutex;
use rill_core::{demand, Publisher, Subscriber, Subscription};
use rill_error::RillError;
use std::sync::Arc;

/// Consume `publisher` as an async stream of `Result` items.
///
/// The bridge subscribes with unbounded demand and buffers in an unbounded
/// channel, so backpressure towards upstream is given up at this seam; apply
/// it upstream of the bridge. A terminal error arrives as the final `Err`
/// item. Dropping the stream cancels the subscription.
pub fn into_stream<T: Send + 'static>(
    publisher: &dyn Publisher<T>,
) -> impl Stream<Item = Result<T, RillError>> {
    let (tx, rx) = async_channel::unbounded();
    publisher.subscribe(Arc::new(ChannelSubscriber {
        tx,
        subscription: Mutex::new(None),
    }));
    rx
}

struct ChannelSubscriber<T: Send + 'static> {
    tx: async_channel::Sender<Result<T, RillError>>,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
}

impl<T: Send + 'static> Subscriber<T> for ChannelSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.subscription.lock() = Some(Arc::clone(&subscription));
        subscription.request(demand::UNBOUNDED);
    }

    fn on_next(&self, value: T) {
        if self.tx.try_send(Ok(value)).is_err() {
            // receiver gone; stop the upstream flow
            let subscription = self.subscription.lock().take();
            if let Some(subscription) = subscription {
                subscription.cancel();
            }
        }
    }

    fn on_error(&self, error: RillError) {
        let _ = self.tx.try_send(Err(error));
        self.tx.close();
        self.subscription.lock().take();
    }

    fn on_complete(&self) {
        self.tx.close();
        self.subscription.lock().take();
    }
}
