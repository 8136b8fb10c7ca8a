//! Recording integration tests
//!
//! Pre-roll widens the pass at the front, latency correction shortens it at
//! the back, and the time warp is ignored while capturing.

use crate::helpers::*;
use approx::assert_relative_eq;
use segue::prelude::*;
use std::sync::Arc;

#[test]
fn test_recording_shifts_session_bounds() {
    let mut transport = test_transport();
    let recording = RecordingSchedule::new(1.0, 0.5, 4.0);
    let options = StreamOptions::new(TEST_SAMPLE_RATE).envelope(Arc::new(ConstantWarp(2.0)));

    let handle = transport
        .start_recording(2.0, 6.0, &options, &recording)
        .unwrap();

    let schedule = transport.schedule();
    assert_eq!(schedule.t0(), 1.0);
    assert_eq!(schedule.t1(), 5.5);
    assert_eq!(handle.track_time(), 1.0);
    assert!(schedule.timeline().envelope().is_none());
    assert!(schedule.mixer_warp_options().envelope.is_none());

    // Unwarped: 4.5 track seconds take 4.5 real seconds.
    let produced = play_through(&mut transport, 500, 20);
    assert_eq!(produced, 4500);
    assert_eq!(handle.track_time(), 5.5);
    assert!(transport.is_done(0));
}

/// Capture bookkeeping alongside the fill loop: pre-roll and latency are
/// discarded before anything lands in the take.
#[test]
fn test_capture_discards_then_keeps() {
    let mut transport = test_transport();
    let mut recording = RecordingSchedule::new(1.0, 0.25, 3.0);
    transport
        .start_recording(
            1.0,
            4.0,
            &StreamOptions::new(TEST_SAMPLE_RATE).record_only(),
            &recording,
        )
        .unwrap();

    let mut discarded_blocks = 0;
    loop {
        let report = fill_block(&mut transport, &mut [], 250);
        if report.produced == 0 {
            break;
        }
        if recording.to_discard() > 0.0 {
            discarded_blocks += 1;
        }
        recording.advance(report.produced as f64 / TEST_SAMPLE_RATE);
    }

    // 0.75s of correction at 0.25s per block.
    assert_eq!(discarded_blocks, 3);
    // 3.75s captured: 0.75 thrown away, 3.0 kept.
    assert_relative_eq!(recording.position, 3.75);
    assert_relative_eq!(recording.consumed(), 3.0);
    assert_eq!(recording.to_consume(), 0.0);
}

#[test]
fn test_record_only_session_has_no_queue() {
    let mut transport = test_transport();
    let handle = transport
        .start_recording(
            0.0,
            2.0,
            &StreamOptions::new(TEST_SAMPLE_RATE).record_only(),
            &RecordingSchedule::default(),
        )
        .unwrap();

    assert_eq!(transport.schedule().time_queue().capacity(), 0);
    fill_block(&mut transport, &mut [], 400);
    assert_eq!(handle.track_time(), 0.4);
    assert_eq!(handle.reader().unwrap().now_playing(400), 0.4);
}
