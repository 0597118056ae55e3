// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rill_core::Publisher;
use rill_stream::{window_while, IterSource};
use rill_test_utils::{collect_each_window, AssertSubscriber, TestPublisher};
use std::sync::Arc;

#[test]
fn test_window_while_separators_are_dropped() {
    // Arrange
    let source: Arc<dyn Publisher<&str>> =
        Arc::new(IterSource::new(vec!["ALPHA", "#", "BETA", "#", "#"]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_while(source, |v: &&str| *v != "#").subscribe(windows.clone());

    // Assert: consecutive separators yield an intentionally empty window
    assert!(windows.is_complete());
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec!["ALPHA"], vec!["BETA"], vec![]],
    );
}

#[test]
fn test_window_while_only_separators_give_empty_windows() {
    // Arrange
    let source: Arc<dyn Publisher<&str>> = Arc::new(IterSource::new(vec!["#"; 10]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_while(source, |v: &&str| *v != "#").subscribe(windows.clone());

    // Assert: ten empty windows and no trailing remainder
    assert!(windows.is_complete());
    assert_eq!(windows.value_count(), 10);
    for window in collect_each_window::<&str, _>(&windows.values()) {
        assert!(window.is_empty());
    }
}

#[test]
fn test_window_while_leading_separators_each_create_empty_window() {
    // Arrange
    let mut items = vec!["#"; 10];
    items.push("other");
    items.push("value");
    let source: Arc<dyn Publisher<&str>> = Arc::new(IterSource::new(items));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_while(source, |v: &&str| *v != "#").subscribe(windows.clone());

    // Assert
    let collected = collect_each_window(&windows.values());
    assert_eq!(collected.len(), 11);
    for window in collected.iter().take(10) {
        assert!(window.is_empty());
    }
    assert_eq!(collected[10], vec!["other", "value"]);
}

#[test]
fn test_window_while_no_remainder_after_trailing_separator() {
    // Arrange
    let publisher = TestPublisher::<i32>::new();
    let source: Arc<dyn Publisher<i32>> = Arc::new(publisher.clone());
    let windows = AssertSubscriber::unbounded();
    window_while(source, |v| *v > 4).subscribe(windows.clone());

    // Act: every element is a separator
    for value in [1, 2, 3, 4] {
        publisher.next(value);
    }
    publisher.complete();

    // Assert: four empty windows, no remainder window opened at completion
    assert!(windows.is_complete());
    assert_eq!(windows.value_count(), 4);
    for window in collect_each_window::<i32, _>(&windows.values()) {
        assert!(window.is_empty());
    }
}

#[test]
fn test_window_while_leading_separator_then_values() {
    // Arrange
    let source: Arc<dyn Publisher<&str>> = Arc::new(IterSource::new(vec!["#", "red", "green"]));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_while(source, |v: &&str| *v != "#").subscribe(windows.clone());

    // Assert
    assert_eq!(
        collect_each_window(&windows.values()),
        vec![vec![], vec!["red", "green"]],
    );
}

#[test]
fn test_window_while_partition_drops_exactly_the_separators() {
    // Arrange
    let source: Arc<dyn Publisher<i32>> = Arc::new(IterSource::new(1..=100));
    let windows = AssertSubscriber::unbounded();

    // Act
    window_while(source, |v| v % 5 != 0).subscribe(windows.clone());

    // Assert: concatenation equals the source with multiples of 5 removed
    let concatenated: Vec<i32> = collect_each_window(&windows.values())
        .into_iter()
        .flatten()
        .collect();
    let expected: Vec<i32> = (1..=100).filter(|v| v % 5 != 0).collect();
    assert_eq!(concatenated, expected);
}

#[test]
fn test_window_while_stepwise_window_lifecycle() {
    // Arrange
    let publisher = TestPublisher::<i32>::new();
    let source: Arc<dyn Publisher<i32>> = Arc::new(publisher.clone());
    let windows = AssertSubscriber::unbounded();
    window_while(source, |v| v % 3 != 0).subscribe(windows.clone());

    // Act & Assert
    publisher.next(1);
    publisher.next(2);
    let first = windows.values()[0].clone();
    let first_subscriber = AssertSubscriber::unbounded();
    first.subscribe(first_subscriber.clone());
    first_subscriber.assert_values(&[1, 2]);

    // the separator closes the window and lands in no window at all
    publisher.next(3);
    assert!(first_subscriber.is_complete());
    first_subscriber.assert_values(&[1, 2]);
    assert_eq!(windows.value_count(), 1);

    // the next passing element opens the second window lazily
    publisher.next(4);
    assert_eq!(windows.value_count(), 2);
    let second = windows.values()[1].clone();
    let second_subscriber = AssertSubscriber::unbounded();
    second.subscribe(second_subscriber.clone());
    second_subscriber.assert_values(&[4]);

    publisher.complete();
    assert!(second_subscriber.is_complete());
    assert!(windows.is_complete());
}
