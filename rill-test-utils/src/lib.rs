// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Test publishers, subscribers and helpers for rill stream tests.

pub mod assert_subscriber;
pub mod helpers;
pub mod probe_publisher;
pub mod test_publisher;

pub use assert_subscriber::AssertSubscriber;
pub use helpers::{collect_each_window, collect_values};
pub use probe_publisher::ProbePublisher;
pub use test_publisher::TestPublisher;
