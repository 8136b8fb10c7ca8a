//! Time queue integration tests
//!
//! The audio thread fills, another thread reads back what is audible.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use segue::prelude::*;
use segue::{PlaybackExtension, ProducedSpan};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Track time published by the audio thread never moves backwards during a
/// forward pass, as seen from another thread.
#[test]
fn test_reader_sees_monotonic_track_time() {
    let mut transport = fine_grained_transport();
    let handle = transport
        .start(0.0, 5.0, &StreamOptions::new(TEST_SAMPLE_RATE))
        .unwrap();
    let finished = AtomicBool::new(false);

    std::thread::scope(|s| {
        let reader = handle.clone();
        let finished = &finished;
        s.spawn(move || {
            let mut last = reader.track_time();
            loop {
                let done = finished.load(Ordering::Acquire);
                let time = reader.track_time();
                assert!(time >= last, "track time went back: {last} -> {time}");
                last = time;
                if done {
                    break;
                }
                std::hint::spin_loop();
            }
            assert_relative_eq!(last, 5.0, epsilon = TIME_EPSILON);
        });

        for _ in 0..60 {
            fill_block(&mut transport, &mut [], TEST_BLOCK);
        }
        finished.store(true, Ordering::Release);
    });
}

/// Producer on one thread, consumer on another, callback by callback.
#[test]
fn test_now_playing_across_threads() {
    let mut transport = fine_grained_transport();
    let handle = transport
        .start(0.0, 10.0, &StreamOptions::new(TEST_SAMPLE_RATE))
        .unwrap();

    let mut reader = handle.reader().unwrap();
    // The readout has one owner at a time.
    assert!(handle.reader().is_none());

    let (tx, rx) = std::sync::mpsc::sync_channel::<usize>(1);
    std::thread::scope(|s| {
        s.spawn(move || {
            let mut callbacks = 0;
            while let Ok(frames) = rx.recv() {
                callbacks += 1;
                let audible = reader.now_playing(frames);
                // Grain and block are equal, so the readout is exact.
                assert_relative_eq!(audible, callbacks as f64 * 0.1, epsilon = TIME_EPSILON);
            }
            assert_eq!(callbacks, 50);
        });

        for _ in 0..50 {
            let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
            tx.send(report.frames).unwrap();
        }
        drop(tx);
    });
}

#[test]
fn test_record_only_readout_is_linear() {
    let mut transport = test_transport();
    let handle = transport
        .start(1.0, 5.0, &StreamOptions::new(TEST_SAMPLE_RATE).record_only())
        .unwrap();
    assert!(!transport.schedule().time_queue().is_populated());
    let mut reader = handle.reader().unwrap();

    fill_block(&mut transport, &mut [], 250);
    assert_eq!(handle.track_time(), 1.25);
    assert_eq!(reader.now_playing(250), 1.25);
    assert_eq!(reader.now_playing(250), 1.5);
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
    consumed_grains: AtomicUsize,
}

impl PlaybackExtension for Recorder {
    fn on_produce(&self, span: ProducedSpan) {
        self.events
            .lock()
            .unwrap()
            .push(format!("produce {} {:.3}", span.frames, span.end));
    }

    fn on_consume(&self, frames: usize, _rate: f64, _pause_frames: usize, _has_solo: bool) {
        assert_eq!(frames, TEST_GRAIN);
        self.consumed_grains.fetch_add(1, Ordering::Relaxed);
    }

    fn on_prime(&self, start: f64) {
        self.events.lock().unwrap().push(format!("prime {start}"));
    }
}

#[test]
fn test_extensions_observe_queue() {
    let recorder = Arc::new(Recorder::default());
    let options = StreamOptions::new(TEST_SAMPLE_RATE).extension(recorder.clone());

    let mut transport = fine_grained_transport();
    let handle = transport.start(0.0, 10.0, &options).unwrap();

    fill_block(&mut transport, &mut [], 250);
    fill_block(&mut transport, &mut [], 250);
    handle.reader().unwrap().now_playing(450);

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(events, vec!["prime 0", "produce 250 0.250", "produce 250 0.500"]);
    assert_eq!(recorder.consumed_grains.load(Ordering::Relaxed), 4);
}
