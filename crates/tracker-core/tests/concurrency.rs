//! Concurrent access to a shared SessionStore

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Utc;
use tracker_core::{SessionStore, TelemetryEvent, TrackerInfo, UNKNOWN};

const WRITES: u32 = 2_000;
const READERS: usize = 4;

fn vin(i: u32) -> String {
    format!("VIN{:014}", i)
}

#[test]
fn test_readers_only_see_written_values() {
    let store = Arc::new(SessionStore::new());
    store.set_vehicle_identifier(vin(0));
    store.set_upgrade_selection(0);
    store.set_last_event(TelemetryEvent::new("PERIODIC", 0, Utc::now()));

    let done = Arc::new(AtomicBool::new(false));

    let writers = vec![
        {
            let store = store.clone();
            thread::spawn(move || {
                for i in 1..=WRITES {
                    store.set_vehicle_identifier(vin(i));
                }
            })
        },
        {
            let store = store.clone();
            thread::spawn(move || {
                for i in 1..=WRITES {
                    store.set_upgrade_selection(i as i32);
                }
            })
        },
        {
            let store = store.clone();
            thread::spawn(move || {
                for i in 1..=WRITES {
                    store.set_last_event(TelemetryEvent::new("PERIODIC", i, Utc::now()));
                }
            })
        },
        {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..WRITES {
                    store.increment_special_event_count();
                }
            })
        },
    ];

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                let valid_vins: HashSet<String> = (0..=WRITES).map(vin).collect();
                let mut last_count = 0;
                while !done.load(Ordering::Acquire) {
                    let snapshot = store.current_snapshot();
                    assert!(valid_vins.contains(&snapshot.vehicle_identifier));
                    assert!((0..=WRITES as i32).contains(&snapshot.pending_upgrade_selection));
                    let event = snapshot.last_event.expect("event was set before readers");
                    assert!(event.seq <= WRITES);
                    assert_eq!(event.kind, "PERIODIC");
                    assert!(snapshot.special_event_count >= last_count);
                    last_count = snapshot.special_event_count;
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }

    let snapshot = store.current_snapshot();
    assert_eq!(snapshot.vehicle_identifier, vin(WRITES));
    assert_eq!(snapshot.pending_upgrade_selection, WRITES as i32);
    assert_eq!(snapshot.special_event_count, WRITES);
}

#[test]
fn test_tracker_info_and_vin_never_torn() {
    let store = Arc::new(SessionStore::new());
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 1..=WRITES {
                let info = TrackerInfo {
                    product: "PT30".to_string(),
                    serial_number: i.to_string(),
                    firmware_version: "1.4.2".to_string(),
                    radio_version: "0.9".to_string(),
                };
                store.apply_tracker_info(info, Some(vin(i)));
            }
        })
    };

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let snapshot = store.current_snapshot();
                    let Some(info) = snapshot.tracker_info else {
                        assert_eq!(snapshot.vehicle_identifier, UNKNOWN);
                        continue;
                    };
                    let i: u32 = info.serial_number.parse().unwrap();
                    assert_eq!(snapshot.vehicle_identifier, vin(i));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_parallel_increments_all_counted() {
    let store = Arc::new(SessionStore::new());

    let incrementers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..WRITES {
                    store.increment_special_event_count();
                }
            })
        })
        .collect();

    for handle in incrementers {
        handle.join().unwrap();
    }

    assert_eq!(store.current_snapshot().special_event_count, 4 * WRITES);
}

#[test]
fn test_increments_after_last_reset_all_counted() {
    const INCREMENTERS: usize = 4;
    let store = Arc::new(SessionStore::new());
    // Incrementers, resetter and this thread
    let resets_done = Arc::new(Barrier::new(INCREMENTERS + 2));
    let residual_read = Arc::new(Barrier::new(INCREMENTERS + 2));

    let incrementers: Vec<_> = (0..INCREMENTERS)
        .map(|_| {
            let store = store.clone();
            let resets_done = resets_done.clone();
            let residual_read = residual_read.clone();
            thread::spawn(move || {
                for _ in 0..WRITES {
                    store.increment_special_event_count();
                }
                resets_done.wait();
                residual_read.wait();
                for _ in 0..WRITES {
                    store.increment_special_event_count();
                }
            })
        })
        .collect();

    let resetter = {
        let store = store.clone();
        let resets_done = resets_done.clone();
        let residual_read = residual_read.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                store.reset();
                thread::yield_now();
            }
            resets_done.wait();
            residual_read.wait();
        })
    };

    resets_done.wait();
    // Increments that landed after the last racing reset
    let residual = store.current_snapshot().special_event_count;
    assert!(residual <= INCREMENTERS as u32 * WRITES);
    residual_read.wait();

    for handle in incrementers {
        handle.join().unwrap();
    }
    resetter.join().unwrap();

    assert_eq!(
        store.current_snapshot().special_event_count,
        residual + INCREMENTERS as u32 * WRITES
    );

    store.reset();
    assert_eq!(store.current_snapshot().special_event_count, 0);
}
