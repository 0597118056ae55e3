// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rill_core::Publisher;
use rill_stream::{window_until_changed, window_until_changed_by, IterSource};
use rill_test_utils::{collect_each_window, AssertSubscriber};
use std::sync::{Arc, Weak};

#[test]
fn test_until_changed_without_repetition() {
    // Arrange
    let source: Arc<dyn Publisher<i32>> = Arc::new(IterSource::new(vec![1, 2, 3, 4, 1]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_until_changed(source, |v: &i32| *v).subscribe(windows.clone());

    // Assert: every value change opens a new window
    assert!(windows.is_complete());
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec![1], vec![2], vec![3], vec![4], vec![1]],
    );
}

#[test]
fn test_until_changed_groups_repetitions() {
    // Arrange
    let source: Arc<dyn Publisher<i32>> = Arc::new(IterSource::new(vec![1, 1, 2, 2, 3, 3, 1]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_until_changed(source, |v: &i32| *v).subscribe(windows.clone());

    // Assert
    assert!(windows.is_complete());
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec![1, 1], vec![2, 2], vec![3, 3], vec![1]],
    );
}

#[test]
fn test_until_changed_by_custom_equivalence() {
    // Arrange
    let source: Arc<dyn Publisher<&str>> =
        Arc::new(IterSource::new(vec!["Ada", "ada", "ADA", "Grace", "grace"]));
    let windows = AssertSubscriber::unbounded();

    // Act: case-insensitive key comparison
    window_until_changed_by(
        source,
        |v: &&str| v.to_lowercase(),
        |a: &String, b: &String| a == b,
    )
    .subscribe(windows.clone());

    // Assert
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec!["Ada", "ada", "ADA"], vec!["Grace", "grace"]],
    );
}

#[test]
fn test_until_changed_releases_keys_on_complete() {
    // Arrange: track every source value through a weak reference
    let values: Vec<Arc<i32>> = (1..=100).map(Arc::new).collect();
    let tracked: Vec<Weak<i32>> = values.iter().map(Arc::downgrade).collect();
    let source: Arc<dyn Publisher<Arc<i32>>> = Arc::new(IterSource::new(values));
    let windows = AssertSubscriber::unbounded();

    // Act: the key is the value itself, so the internal slot retains it
    window_until_changed(source, Arc::clone).subscribe(windows.clone());
    assert!(windows.is_complete());
    assert_eq!(windows.value_count(), 100);

    let delivered = collect_each_window::<Arc<i32>, _>(&windows.values());
    assert_eq!(delivered.len(), 100);
    drop(delivered);

    // Assert: once everything is consumed, no value is retained anywhere in
    // the operator, including the until-changed key slot
    for weak in &tracked {
        assert!(weak.upgrade().is_none(), "value retained after completion");
    }
}

#[test]
fn test_until_changed_releases_keys_on_cancel() {
    // Arrange
    let values: Vec<Arc<i32>> = (1..=100).map(Arc::new).collect();
    let tracked: Vec<Weak<i32>> = values.iter().map(Arc::downgrade).collect();
    let source: Arc<dyn Publisher<Arc<i32>>> = Arc::new(IterSource::new(values));

    // only the first 10 windows are ever delivered downstream
    let windows = AssertSubscriber::with_initial_request(10);

    // Act
    window_until_changed(source, Arc::clone).subscribe(windows.clone());
    assert_eq!(windows.value_count(), 10);

    let delivered = collect_each_window::<Arc<i32>, _>(&windows.values());
    assert_eq!(delivered.len(), 10);
    drop(delivered);

    windows.cancel();

    // Assert: cancellation discards the queued windows and clears the key
    // slot, so every tracked value is freed
    for weak in &tracked {
        assert!(weak.upgrade().is_none(), "value retained after cancel");
    }
}
