// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Predicate-driven windowing over the rill reactive-streams seam.
//!
//! The central operator is [`WindowPredicate`]: it partitions an upstream
//! sequence into consecutive single-subscriber windows, with boundaries
//! decided element-by-element by a [`BoundaryPredicate`] under one of three
//! [`BoundaryMode`] policies. The convenience constructors cover the common
//! shapes:
//!
//! - [`window_until`]: the boundary element ends its window,
//! - [`window_until_cut_before`]: the boundary element starts the next window,
//! - [`window_while`]: the boundary element is dropped as a separator,
//! - [`window_until_changed`] / [`window_until_changed_by`]: boundaries on
//!   key transitions.

pub mod into_stream;
pub mod mode;
pub mod predicate;
pub mod source;
pub mod window_flux;
mod window_main;
pub mod window_predicate;

pub use into_stream::into_stream;
pub use mode::BoundaryMode;
pub use predicate::{BoundaryPredicate, FnPredicate, TryFnPredicate, UntilChangedPredicate};
pub use source::IterSource;
pub use window_flux::WindowFlux;
pub use window_predicate::{
    window_until, window_until_changed, window_until_changed_by, window_until_cut_before,
    window_while, WindowHandle, WindowPredicate, DEFAULT_PREFETCH,
};
