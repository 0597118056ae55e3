// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rill_core::Publisher;
use rill_stream::{window_until_cut_before, IterSource};
use rill_test_utils::{collect_each_window, AssertSubscriber, TestPublisher};
use std::sync::Arc;

#[test]
fn test_cut_before_boundary_starts_next_window() {
    // Arrange
    let source: Arc<dyn Publisher<&str>> =
        Arc::new(IterSource::new(vec!["ALPHA", "#", "BETA", "#"]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_until_cut_before(source, |v: &&str| *v == "#").subscribe(windows.clone());

    // Assert
    assert!(windows.is_complete());
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec!["ALPHA"], vec!["#", "BETA"], vec!["#"]],
    );
}

#[test]
fn test_cut_before_leading_boundary_yields_empty_first_window() {
    // Arrange
    let source: Arc<dyn Publisher<&str>> = Arc::new(IterSource::new(vec!["#", "red", "green"]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_until_cut_before(source, |v: &&str| *v == "#").subscribe(windows.clone());

    // Assert: the window open before the leading boundary is emitted empty
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec![], vec!["#", "red", "green"]],
    );
}

#[test]
fn test_cut_before_trailing_boundaries() {
    // Arrange
    let source: Arc<dyn Publisher<&str>> =
        Arc::new(IterSource::new(vec!["ALPHA", "#", "BETA", "#", "#"]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_until_cut_before(source, |v: &&str| *v == "#").subscribe(windows.clone());

    // Assert
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec!["ALPHA"], vec!["#", "BETA"], vec!["#"], vec!["#"]],
    );
}

#[test]
fn test_cut_before_stepwise_signal_order() {
    // Arrange
    let publisher = TestPublisher::<i32>::new();
    let source: Arc<dyn Publisher<i32>> = Arc::new(publisher.clone());
    let windows = AssertSubscriber::unbounded();
    window_until_cut_before(source, |v| v % 3 == 0).subscribe(windows.clone());

    // Act & Assert
    publisher.next(1);
    publisher.next(2);
    let first = windows.values()[0].clone();
    let first_subscriber = AssertSubscriber::unbounded();
    first.subscribe(first_subscriber.clone());
    first_subscriber.assert_values(&[1, 2]);

    // the boundary closes the first window and opens the second with the
    // boundary element as its head
    publisher.next(3);
    assert!(first_subscriber.is_complete());
    first_subscriber.assert_values(&[1, 2]);

    assert_eq!(windows.value_count(), 2);
    let second = windows.values()[1].clone();
    let second_subscriber = AssertSubscriber::unbounded();
    second.subscribe(second_subscriber.clone());
    second_subscriber.assert_values(&[3]);

    publisher.next(4);
    second_subscriber.assert_values(&[3, 4]);

    publisher.complete();
    assert!(second_subscriber.is_complete());
    assert!(windows.is_complete());
}

#[test]
fn test_cut_before_completion_before_any_boundary() {
    // Arrange
    let source: Arc<dyn Publisher<i32>> = Arc::new(IterSource::new(vec![1, 2]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_until_cut_before(source, |v| *v >= 3).subscribe(windows.clone());

    // Assert
    assert!(windows.is_complete());
    assert_eq!(collect_each_window(&windows.values()), vec![vec![1, 2]]);
}

#[test]
fn test_cut_before_partition_is_complete_and_ordered() {
    // Arrange
    let source: Arc<dyn Publisher<i32>> = Arc::new(IterSource::new(1..=200));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_until_cut_before(source, |v| v % 7 == 0).subscribe(windows.clone());

    // Assert
    let collected = collect_each_window(&windows.values());
    let concatenated: Vec<i32> = collected.iter().flatten().copied().collect();
    assert_eq!(concatenated, (1..=200).collect::<Vec<_>>());

    // every window after the first starts with a boundary element
    for window in collected.iter().skip(1) {
        assert_eq!(window[0] % 7, 0);
    }
}
