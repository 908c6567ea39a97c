//! Tests for concurrent access through the shared automaton handle

use daho::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_parallel_reads() {
    let patterns: Vec<String> = (0..200).map(|i| format!("p{}x", i)).collect();
    let shared = SharedAutomaton::new(16).unwrap();
    shared.extend(&patterns).unwrap();

    let text: String = patterns.join(" ");
    let expected = shared.request(&text);
    assert_eq!(expected, 200);

    const NUM_READERS: usize = 8;
    let barrier = Arc::new(Barrier::new(NUM_READERS));

    let handles: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let shared = shared.clone();
            let barrier = Arc::clone(&barrier);
            let text = text.clone();
            thread::spawn(move || {
                barrier.wait();
                (0..50).map(|_| shared.request(&text)).collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for count in handle.join().unwrap() {
            assert_eq!(count, expected);
        }
    }

    // Fresh before the readers started, so none of them rebuilt
    assert_eq!(shared.build_count(), 1);
}

#[test]
fn test_stale_readers_rebuild_once() {
    let shared = SharedAutomaton::new(4).unwrap();
    shared.extend(["ab", "b"]).unwrap();

    const NUM_READERS: usize = 6;
    let barrier = Arc::new(Barrier::new(NUM_READERS));

    let handles: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let shared = shared.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                shared.request("abab")
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 4);
    }
    assert_eq!(shared.build_count(), 1);
}

#[test]
fn test_concurrent_writers_and_readers() {
    const NUM_WRITERS: usize = 4;
    const PER_WRITER: usize = 25;

    let shared = SharedAutomaton::new(8).unwrap();
    let barrier = Arc::new(Barrier::new(NUM_WRITERS * 2));

    let mut handles = Vec::new();
    for w in 0..NUM_WRITERS {
        let shared = shared.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..PER_WRITER {
                shared.insert(format!("w{}_{}.", w, i), 1).unwrap();
            }
        }));
    }
    for _ in 0..NUM_WRITERS {
        let shared = shared.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..PER_WRITER {
                let count = shared.request("w0_0. w1_1. w2_2.");
                assert!((0..=3).contains(&count));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.pattern_count(), NUM_WRITERS * PER_WRITER);
    assert_eq!(shared.request("w0_0. w1_1. w2_2. w3_24."), 4);
}
