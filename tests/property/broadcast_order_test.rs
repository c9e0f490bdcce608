// tests/property/broadcast_order_test.rs

//! Property-based tests for broadcaster delivery order

use parking_lot::Mutex;
use proptest::prelude::*;
use socket_hooks::core::Broadcaster;
use std::sync::Arc;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_every_listener_sees_every_value_in_order(
        values in prop::collection::vec(any::<u32>(), 0..=50),
        listeners in 1usize..=8
    ) {
        let broadcaster: Broadcaster<u32> = Broadcaster::new();
        let seen: Vec<Arc<Mutex<Vec<u32>>>> =
            (0..listeners).map(|_| Arc::default()).collect();
        let _subscriptions: Vec<_> = seen
            .iter()
            .map(|sink| {
                let sink = Arc::clone(sink);
                broadcaster.subscribe(move |v| sink.lock().push(*v))
            })
            .collect();

        for value in &values {
            broadcaster.announce(*value);
        }

        for sink in &seen {
            prop_assert_eq!(sink.lock().clone(), values.clone());
        }
    }

    #[test]
    fn test_late_subscriber_sees_only_later_values(
        before in prop::collection::vec(any::<u8>(), 0..=20),
        after in prop::collection::vec(any::<u8>(), 0..=20)
    ) {
        let broadcaster: Broadcaster<u8> = Broadcaster::new();
        for value in &before {
            broadcaster.announce(*value);
        }

        let seen: Arc<Mutex<Vec<u8>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let _subscription = broadcaster.subscribe(move |v| sink.lock().push(*v));
        for value in &after {
            broadcaster.announce(*value);
        }

        prop_assert_eq!(seen.lock().clone(), after);
    }

    #[test]
    fn test_unsubscribed_listeners_receive_nothing_further(
        values in prop::collection::vec(any::<u16>(), 1..=30),
        cut in 0usize..=30
    ) {
        let cut = cut.min(values.len());
        let broadcaster: Broadcaster<u16> = Broadcaster::new();
        let seen: Arc<Mutex<Vec<u16>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let subscription = broadcaster.subscribe(move |v| sink.lock().push(*v));

        for value in &values[..cut] {
            broadcaster.announce(*value);
        }
        subscription.unsubscribe();
        for value in &values[cut..] {
            broadcaster.announce(*value);
        }

        prop_assert_eq!(seen.lock().clone(), values[..cut].to_vec());
        prop_assert_eq!(broadcaster.listener_count(), 0);
    }
}
