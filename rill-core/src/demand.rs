// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Demand arithmetic for request counters.
//!
//! Counters follow reactive-streams semantics: demand accumulates additively,
//! saturates at [`UNBOUNDED`], and once unbounded stays unbounded.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sentinel demand meaning "no backpressure": request everything.
pub const UNBOUNDED: u64 = u64::MAX;

/// Add `n` to `requested`, capping at [`UNBOUNDED`]. Returns the demand that
/// was outstanding before the addition.
pub fn add_cap(requested: &AtomicU64, n: u64) -> u64 {
    let mut current = requested.load(Ordering::Relaxed);
    loop {
        if current == UNBOUNDED {
            return UNBOUNDED;
        }
        let next = current.saturating_add(n);
        match requested.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(previous) => return previous,
            Err(actual) => current = actual,
        }
    }
}

/// Account for `n` emitted elements, leaving unbounded demand untouched.
pub fn produced(requested: &AtomicU64, n: u64) {
    let mut current = requested.load(Ordering::Relaxed);
    loop {
        if current == UNBOUNDED {
            return;
        }
        let next = current.saturating_sub(n);
        match requested.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}
