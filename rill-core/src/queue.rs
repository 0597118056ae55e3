// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Non-blocking queues behind operator drain loops.
//!
//! Operators never pick a concrete queue themselves; callers supply a
//! [`QueueFactory`] so they can trade boundedness for allocation behavior.
//! Both provided factories are lock-free (crossbeam).

use crossbeam_queue::{ArrayQueue, SegQueue};
use std::sync::Arc;

/// Non-blocking queue as seen by a drain loop: any number of producers,
/// one serialized consumer.
pub trait OpQueue<T>: Send + Sync {
    /// Enqueue a value, handing it back if the queue is at capacity.
    fn push(&self, value: T) -> Result<(), T>;

    /// Dequeue the oldest value, if any.
    fn pop(&self) -> Option<T>;

    /// Number of values currently queued.
    fn len(&self) -> usize;

    /// Whether the queue is currently empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Send> OpQueue<T> for SegQueue<T> {
    fn push(&self, value: T) -> Result<(), T> {
        SegQueue::push(self, value);
        Ok(())
    }

    fn pop(&self) -> Option<T> {
        SegQueue::pop(self)
    }

    fn len(&self) -> usize {
        SegQueue::len(self)
    }
}

impl<T: Send> OpQueue<T> for ArrayQueue<T> {
    fn push(&self, value: T) -> Result<(), T> {
        ArrayQueue::push(self, value)
    }

    fn pop(&self) -> Option<T> {
        ArrayQueue::pop(self)
    }

    fn len(&self) -> usize {
        ArrayQueue::len(self)
    }
}

/// Factory producing one queue per operator instance.
pub type QueueFactory<T> = Arc<dyn Fn() -> Arc<dyn OpQueue<T>> + Send + Sync>;

/// Factory for unbounded lock-free queues.
#[must_use]
pub fn unbounded<T: Send + 'static>() -> QueueFactory<T> {
    Arc::new(|| Arc::new(SegQueue::new()) as Arc<dyn OpQueue<T>>)
}

/// Factory for bounded lock-free queues of the given capacity.
///
/// # Panics
///
/// Panics if `capacity` is 0.
#[must_use]
pub fn bounded<T: Send + 'static>(capacity: usize) -> QueueFactory<T> {
    assert!(capacity >= 1, "queue: capacity must be at least 1");
    Arc::new(move || Arc::new(ArrayQueue::new(capacity)) as Arc<dyn OpQueue<T>>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_queue_is_fifo() {
        let queue = unbounded::<i32>()();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn bounded_queue_rejects_when_full() {
        let queue = bounded::<i32>(2)();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        assert_eq!(queue.push(3), Err(3));
        assert_eq!(queue.pop(), Some(1));
        queue.push(3).unwrap();
    }

    #[test]
    fn factories_produce_independent_queues() {
        let factory = unbounded::<i32>();
        let first = factory();
        let second = factory();
        first.push(1).unwrap();
        assert!(second.is_empty());
    }
}
