//! Looping integration tests
//!
//! Laps split callbacks, mixers restart at the loop start, and the reader
//! sees the wrap at the exact sample where it happens.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use segue::prelude::*;
use segue::{PlaybackSchedule, TimeStep};

fn looped() -> StreamOptions {
    StreamOptions::new(TEST_SAMPLE_RATE).looped()
}

/// A one-second loop at 1kHz in 250-frame callbacks. The fourth callback
/// ends exactly on the lap boundary.
#[test]
fn test_now_playing_wraps_at_lap_end() {
    let mut transport = fine_grained_transport();
    let handle = transport.start(0.0, 1.0, &looped()).unwrap();
    let mut reader = handle.reader().unwrap();
    let mut mixers = [MockMixer::default()];

    for _ in 0..4 {
        let report = fill_block(&mut transport, &mut mixers, 250);
        assert_eq!(report.produced, 250);
        assert_eq!(report.slices, 1);
    }
    // Restarted once the lap's real time ran out.
    assert_eq!(mixers[0].repositions, vec![(0.0, true)]);
    assert_eq!(handle.track_time(), 0.0);

    // Sample 1000 is the last of the lap and reads back as t1.
    assert_relative_eq!(reader.now_playing(900), 0.9, epsilon = TIME_EPSILON);
    assert_eq!(reader.now_playing(100), 1.0);

    fill_block(&mut transport, &mut mixers, 250);
    assert_relative_eq!(reader.now_playing(100), 0.1, epsilon = TIME_EPSILON);
    assert_relative_eq!(reader.now_playing(100), 0.2, epsilon = TIME_EPSILON);
}

/// 400-frame callbacks over a one-second loop at 1kHz: the wrap is reported
/// on cumulative sample 1000, not at the end of the callback before it.
#[test]
fn test_wrap_lands_on_lap_sample() {
    let mut schedule = PlaybackSchedule::default();
    schedule
        .init(0.0, 1.0, &StreamOptions::new(TEST_SAMPLE_RATE).looped(), None)
        .unwrap();
    let mut mixers = [MockMixer::default()];

    let mut produced = 0;
    let mut time = 0.0;
    let mut wraps = Vec::new();
    for _ in 0..5 {
        let mut available = 400;
        loop {
            let slice = schedule.get_playback_slice(available);
            let step = schedule.advanced_track_time(time, slice.to_produce);
            produced += slice.to_produce;
            if step == TimeStep::wrap(1.0, 0.0) {
                wraps.push(produced);
            }
            time = step.resume();

            available -= slice.frames;
            if schedule.reposition_playback(&mut mixers, slice.frames, available) {
                break;
            }
        }
    }

    assert_eq!(produced, 2000);
    assert_eq!(wraps, vec![1000, 2000]);
    assert_eq!(mixers[0].repositions, vec![(0.0, true), (0.0, true)]);
}

#[test]
fn test_callback_straddling_lap_is_split() {
    let mut transport = test_transport();
    transport.start(0.0, 1.0, &looped()).unwrap();
    let mut mixers = [MockMixer::default(), MockMixer::default()];

    fill_block(&mut transport, &mut mixers, 800);
    let report = fill_block(&mut transport, &mut mixers, 800);

    assert_eq!(report.frames, 800);
    assert_eq!(report.produced, 800);
    assert_eq!(report.slices, 2);
    for mixer in &mixers {
        assert_eq!(mixer.repositions, vec![(0.0, true)]);
        assert_eq!(mixer.rendered, 1600);
    }
    assert_relative_eq!(transport.schedule().track_time(), 0.6, epsilon = TIME_EPSILON);
}

#[test]
fn test_loop_never_finishes() {
    let mut transport = test_transport();
    let handle = transport.start(2.0, 2.5, &looped()).unwrap();

    // Twenty laps.
    for _ in 0..100 {
        let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
        assert_eq!(report.produced, TEST_BLOCK);
    }
    assert!(!transport.is_done(0));
    let time = handle.track_time();
    assert!((2.0..2.5).contains(&time), "track time {time} left the loop");
}

#[test]
fn test_reverse_loop() {
    let mut transport = test_transport();
    let handle = transport.start(1.0, 0.0, &looped()).unwrap();
    let mut mixers = [MockMixer::default()];

    fill_block(&mut transport, &mut mixers, 600);
    assert_relative_eq!(handle.track_time(), 0.4, epsilon = TIME_EPSILON);

    let report = fill_block(&mut transport, &mut mixers, 600);
    assert_eq!(report.slices, 2);
    assert_eq!(mixers[0].repositions, vec![(1.0, true)]);
    assert_relative_eq!(handle.track_time(), 0.8, epsilon = TIME_EPSILON);
}

#[test]
fn test_loop_allows_seek() {
    let mut transport = test_transport();
    let handle = transport.start(0.0, 1.0, &looped()).unwrap();

    handle.request_seek(0.5);
    let report = fill_block(&mut transport, &mut [], TEST_BLOCK);
    assert_eq!(report.seeked_to, Some(0.5));
    assert_relative_eq!(handle.track_time(), 0.6, epsilon = TIME_EPSILON);
    assert_eq!(transport.sleep_interval(), Duration::from_millis(10));
}
