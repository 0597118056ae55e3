// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Reactive-streams contracts and shared building blocks for rill operators.
//!
//! Operators in this workspace are pull-based: a [`Publisher`] emits nothing
//! until its [`Subscriber`] signals demand through the [`Subscription`] it
//! received, and every signal handler returns quickly, with progress made by
//! cooperating wip-serialized drain loops rather than by a scheduler.

pub mod context;
pub mod demand;
pub mod hooks;
pub mod inspect;
pub mod publisher;
pub mod queue;

pub use context::StreamContext;
pub use inspect::{Inspect, RunStyle};
pub use publisher::{EmptySubscription, Publisher, Subscriber, Subscription};
pub use queue::{OpQueue, QueueFactory};
