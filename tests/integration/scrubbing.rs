//! Scrubbing integration tests
//!
//! The control thread posts pointer positions; each 50ms segment picks the
//! speed that reaches the latest one.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use segue::core::Error as CoreError;
use segue::prelude::*;
use segue::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

fn scrubbing(options: ScrubbingOptions) -> StreamOptions {
    StreamOptions::new(TEST_SAMPLE_RATE).scrubbing(options)
}

#[test]
fn test_follows_pointer_then_falls_silent() {
    let mut transport = test_transport();
    let handle = transport
        .start(0.0, 10.0, &scrubbing(ScrubbingOptions::default()))
        .unwrap();

    // 0.02s ahead in a 0.05s segment: 0.4x, then nothing left to chase.
    handle.post_region(0.0, 0.02);
    let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
    assert_eq!(report.slices, 2);
    assert_eq!(report.produced, 50);
    assert_eq!(report.silent_frames(), 50);
    assert_relative_eq!(handle.track_time(), 0.02, epsilon = TIME_EPSILON);

    // Pointer dragged back to the start.
    handle.post_region(0.0, 0.0);
    let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
    assert_eq!(report.produced, 50);
    assert_relative_eq!(handle.track_time(), 0.0, epsilon = TIME_EPSILON);

    // Scrubbing waits for the user; it never finishes on its own.
    assert!(!transport.is_done(0));
}

#[test]
fn test_fast_pointer_is_clamped_to_max_speed() {
    let mut transport = test_transport();
    let handle = transport
        .start(0.0, 10.0, &scrubbing(ScrubbingOptions::default()))
        .unwrap();

    handle.post_region(0.0, 5.0);
    let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
    assert_eq!(report.produced, TEST_BLOCK);
    // Unit speed: track time moves with the wall clock.
    assert_relative_eq!(handle.track_time(), 0.1, epsilon = TIME_EPSILON);

    let warp = transport.schedule().mixer_warp_options();
    assert!(warp.envelope.is_none());
    assert_eq!((warp.min_speed, warp.max_speed), (0.0, 1.0));
}

#[test]
fn test_seek_ignored_while_scrubbing() {
    let mut transport = test_transport();
    let handle = transport
        .start(0.0, 10.0, &scrubbing(ScrubbingOptions::default()))
        .unwrap();
    let mut mixers = [MockMixer::default()];

    handle.request_seek(2.0);
    handle.post_region(0.0, 0.0);
    let report = fill_block(&mut transport, &mut mixers, TEST_BLOCK);
    assert_eq!(report.seeked_to, None);
    assert_eq!(report.produced, 0);
    assert!(mixers[0].repositions.is_empty());
    assert_eq!(handle.track_time(), 0.0);

    // The request was consumed, not deferred.
    let report = fill_block(&mut transport, &mut mixers, TEST_BLOCK);
    assert_eq!(report.seeked_to, None);
}

#[test]
fn test_play_at_speed_runs_to_end() {
    let mut transport = test_transport();
    let handle = transport
        .start(0.0, 1.0, &scrubbing(ScrubbingOptions::at_speed(2.0)))
        .unwrap();

    // Double speed: the second of track time lasts 500 samples.
    let report = fill_block(&mut transport, &mut [], 300);
    assert_eq!(report.produced, 300);
    assert_relative_eq!(handle.track_time(), 0.6, epsilon = TIME_EPSILON);
    assert!(!transport.is_done(0));

    let report = fill_block(&mut transport, &mut [], 300);
    assert_eq!(report.produced, 200);
    assert_eq!(report.silent_frames(), 100);
    assert_relative_eq!(handle.track_time(), 1.0, epsilon = TIME_EPSILON);
    assert!(transport.is_done(0));
}

/// Arrow-key scrubbing moves at its own speed wherever the pointer is, and
/// goes quiet at the end of the region.
#[test]
fn test_keyboard_scrub_runs_to_bound() {
    let mut transport = test_transport();
    let handle = transport
        .start(0.0, 1.0, &scrubbing(ScrubbingOptions::keyboard(1.0)))
        .unwrap();
    handle.post_region(0.0, 0.0);

    let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
    assert_eq!(report.slices, 2);
    assert_eq!(report.produced, TEST_BLOCK);
    assert_relative_eq!(handle.track_time(), 0.1, epsilon = TIME_EPSILON);

    for _ in 0..11 {
        fill_block(&mut transport, &mut [], TEST_BLOCK);
    }
    assert_relative_eq!(handle.track_time(), 1.0, epsilon = TIME_EPSILON);
    let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
    assert_eq!(report.produced, 0);
    assert!(!transport.is_done(0));
}

#[test]
fn test_scrub_session_suggestions() {
    let mut transport = test_transport();
    transport
        .start(0.0, 10.0, &scrubbing(ScrubbingOptions::default()))
        .unwrap();

    assert_eq!(transport.sleep_interval(), Duration::from_millis(5));
    let times = transport.suggested_buffer_times();
    assert_eq!(times.minimum, 0.05);
    assert_eq!(times.acceptable, 0.1);
    assert_eq!(times.initial, 10.0);
}

#[test]
fn test_scrubbing_conflicts() {
    let mut transport = test_transport();

    let recording = RecordingSchedule::new(0.5, 0.1, 5.0);
    let result = transport.start_recording(
        0.0,
        5.0,
        &scrubbing(ScrubbingOptions::default()),
        &recording,
    );
    assert_eq!(
        result.unwrap_err(),
        Error::Core(CoreError::ScrubbingConflict("recording"))
    );

    let options = scrubbing(ScrubbingOptions::default()).envelope(Arc::new(ConstantWarp(1.5)));
    assert_eq!(
        transport.start(0.0, 5.0, &options).unwrap_err(),
        Error::Core(CoreError::ScrubbingConflict("a time warp"))
    );

    let options = scrubbing(ScrubbingOptions {
        min_speed: 2.0,
        max_speed: 1.0,
        ..Default::default()
    });
    assert!(matches!(
        transport.start(0.0, 5.0, &options),
        Err(Error::Core(CoreError::InvalidScrubSpeed { .. }))
    ));
    assert!(!transport.is_running());
}

/// The audio thread reads the mailbox on every segment. It keeps filling
/// while the control thread hammers the mailbox and a reader polls the
/// queue.
#[test]
fn test_fill_progresses_under_contention() {
    let mut transport = test_transport();
    let handle = transport
        .start(0.0, 100.0, &scrubbing(ScrubbingOptions::default()))
        .unwrap();
    let mut reader = handle.reader().unwrap();
    let done = AtomicBool::new(false);

    let slowest = std::thread::scope(|s| {
        let control = handle.clone();
        let done = &done;
        s.spawn(move || {
            let mut pointer = 0.0;
            while !done.load(Ordering::Acquire) {
                pointer += 0.001;
                control.post_region(0.0, pointer);
                assert!(control.latest_region().t1 <= pointer);
            }
        });
        s.spawn(move || {
            while !done.load(Ordering::Acquire) {
                assert!(reader.now_playing(0).is_finite());
            }
        });

        let mut slowest = Duration::ZERO;
        for _ in 0..500 {
            let started = Instant::now();
            let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
            slowest = slowest.max(started.elapsed());
            assert_eq!(report.frames, TEST_BLOCK);
        }
        done.store(true, Ordering::Release);
        slowest
    });

    assert!(slowest < Duration::from_secs(1), "slowest fill took {slowest:?}");
    assert!(handle.track_time() > 0.0);
}

