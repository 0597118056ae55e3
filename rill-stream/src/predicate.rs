// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Boundary predicates and their adapters.

use parking_lot::Mutex;
use rill_error::RillError;

/// Classifies each upstream element so the operator can decide boundary
/// actions for it.
///
/// The predicate is invoked exactly once per element. A failure is converted
/// into a terminal error for both the open window and the main sequence.
pub trait BoundaryPredicate<T>: Send + Sync {
    /// Classify `value`. `Ok(true)` marks a boundary according to the
    /// configured [`crate::BoundaryMode`].
    fn test(&self, value: &T) -> Result<bool, RillError>;

    /// Drop any state retained between elements.
    ///
    /// Called once the sequence terminates or the main chain is cancelled, so
    /// values captured by stateful predicates become freeable. The default
    /// does nothing.
    fn dispose(&self) {}
}

/// Adapter for plain infallible closures.
pub struct FnPredicate<F>(F);

impl<F> FnPredicate<F> {
    pub fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<T, F> BoundaryPredicate<T> for FnPredicate<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn test(&self, value: &T) -> Result<bool, RillError> {
        Ok((self.0)(value))
    }
}

/// Adapter for fallible closures.
pub struct TryFnPredicate<F>(F);

impl<F> TryFnPredicate<F> {
    pub fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<T, F> BoundaryPredicate<T> for TryFnPredicate<F>
where
    F: Fn(&T) -> Result<bool, RillError> + Send + Sync,
{
    fn test(&self, value: &T) -> Result<bool, RillError> {
        (self.0)(value)
    }
}

/// Stateful predicate backing `window_until_changed`: marks a boundary
/// whenever the key of the current element differs from the previously seen
/// key.
///
/// The first element never marks a boundary. The retained key is replaced
/// when it changes and cleared by [`BoundaryPredicate::dispose`].
pub struct UntilChangedPredicate<K, KF, EQ> {
    key_fn: KF,
    eq: EQ,
    last_key: Mutex<Option<K>>,
}

impl<K, KF, EQ> UntilChangedPredicate<K, KF, EQ> {
    pub fn new(key_fn: KF, eq: EQ) -> Self {
        Self {
            key_fn,
            eq,
            last_key: Mutex::new(None),
        }
    }
}

impl<T, K, KF, EQ> BoundaryPredicate<T> for UntilChangedPredicate<K, KF, EQ>
where
    K: Send,
    KF: Fn(&T) -> K + Send + Sync,
    EQ: Fn(&K, &K) -> bool + Send + Sync,
{
    fn test(&self, value: &T) -> Result<bool, RillError> {
        let key = (self.key_fn)(value);
        let mut last_key = self.last_key.lock();
        match last_key.as_ref() {
            None => {
                *last_key = Some(key);
                Ok(false)
            }
            Some(previous) if (self.eq)(previous, &key) => Ok(false),
            Some(_) => {
                *last_key = Some(key);
                Ok(true)
            }
        }
    }

    fn dispose(&self) {
        self.last_key.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_changed_marks_key_transitions() {
        let predicate = UntilChangedPredicate::new(|v: &i32| *v, |a: &i32, b: &i32| a == b);

        assert_eq!(predicate.test(&1), Ok(false));
        assert_eq!(predicate.test(&1), Ok(false));
        assert_eq!(predicate.test(&2), Ok(true));
        assert_eq!(predicate.test(&2), Ok(false));
        assert_eq!(predicate.test(&1), Ok(true));
    }

    #[test]
    fn until_changed_dispose_clears_the_key_slot() {
        let predicate = UntilChangedPredicate::new(|v: &i32| *v, |a: &i32, b: &i32| a == b);

        assert_eq!(predicate.test(&7), Ok(false));
        predicate.dispose();

        // the next element is treated as the first of a fresh sequence
        assert_eq!(predicate.test(&7), Ok(false));
    }

    #[test]
    fn fallible_predicate_propagates_failures() {
        let predicate = TryFnPredicate::new(|v: &i32| {
            if *v == 3 {
                Err(RillError::predicate_error("unsupported value"))
            } else {
                Ok(*v % 2 == 0)
            }
        });

        assert_eq!(BoundaryPredicate::<i32>::test(&predicate, &2), Ok(true));
        assert!(BoundaryPredicate::<i32>::test(&predicate, &3).is_err());
    }
}
