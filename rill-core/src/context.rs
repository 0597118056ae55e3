// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-band subscriber context.
//!
//! A [`StreamContext`] travels upstream from a subscriber to the operators
//! above it. Its one well-known slot is the discard hook: a consumer invoked
//! for every element an operator drops during cancellation instead of
//! delivering it. The hook is type-erased so that operators whose downstream
//! element type differs from the discarded element type (a windowing operator
//! discards elements while emitting windows) can still route discards through
//! the context of the main downstream.

use std::any::Any;
use std::sync::Arc;

type DiscardFn = Arc<dyn Fn(Box<dyn Any + Send>) + Send + Sync>;

/// Cheap cloneable context exposed by [`crate::Subscriber::context`].
#[derive(Clone, Default)]
pub struct StreamContext {
    on_discard: Option<DiscardFn>,
}

impl StreamContext {
    /// Context with no hooks installed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context whose discard hook receives every dropped element of type `T`.
    ///
    /// Elements of any other type are released without invoking `hook`.
    pub fn with_discard<T, F>(hook: F) -> Self
    where
        T: Send + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        let erased: DiscardFn = Arc::new(move |boxed| {
            if let Ok(value) = boxed.downcast::<T>() {
                hook(*value);
            }
        });
        Self {
            on_discard: Some(erased),
        }
    }

    /// Whether a discard hook is installed.
    #[must_use]
    pub fn has_discard_hook(&self) -> bool {
        self.on_discard.is_some()
    }

    /// Route a dropped element through the discard hook, if any.
    ///
    /// Without a hook the element is simply released.
    pub fn discard<T: Send + 'static>(&self, value: T) {
        if let Some(hook) = &self.on_discard {
            hook(Box::new(value));
        }
    }
}

impl std::fmt::Debug for StreamContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamContext")
            .field("has_discard_hook", &self.has_discard_hook())
            .finish()
    }
}
