//! Time-warped playback integration tests
//!
//! Speed envelopes stretch or squeeze the real time a region takes.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use segue::prelude::*;
use std::sync::Arc;

fn warped(envelope: SpeedEnvelope) -> StreamOptions {
    StreamOptions::new(TEST_SAMPLE_RATE).envelope(Arc::new(envelope))
}

#[test]
fn test_double_speed_halves_real_time() {
    let mut transport = test_transport();
    let envelope = SpeedEnvelope::new(2.0).unwrap();
    let handle = transport.start(0.0, 4.0, &warped(envelope)).unwrap();

    let schedule = transport.schedule();
    assert_eq!(schedule.real_time_remaining(), 2.0);
    assert!(schedule.mixer_warp_options().envelope.is_some());

    fill_block(&mut transport, &mut [], 500);
    assert_eq!(handle.track_time(), 1.0);

    let produced = play_through(&mut transport, 500, 20);
    assert_eq!(produced, 1500);
    assert_eq!(handle.track_time(), 4.0);
    assert!(transport.is_done(0));
}

#[test]
fn test_reverse_through_envelope() {
    let mut transport = test_transport();
    let envelope = SpeedEnvelope::new(2.0).unwrap();
    let handle = transport.start(4.0, 0.0, &warped(envelope)).unwrap();

    fill_block(&mut transport, &mut [], 500);
    assert_eq!(handle.track_time(), 3.0);
}

/// Speed ramping 1x to 2x over ten seconds takes `10 ln 2` real seconds.
#[test]
fn test_linear_ramp_duration() {
    let mut transport = test_transport();
    let envelope = SpeedEnvelope::from_points([(0.0, 1.0), (10.0, 2.0)]).unwrap();
    let handle = transport.start(0.0, 10.0, &warped(envelope)).unwrap();

    let real = 10.0 * std::f64::consts::LN_2;
    assert_relative_eq!(
        transport.schedule().real_time_remaining(),
        real,
        epsilon = WARP_EPSILON
    );

    let produced = play_through(&mut transport, TEST_BLOCK, 200);
    let expected = (real * TEST_SAMPLE_RATE).round() as i64;
    assert!(
        (produced as i64 - expected).abs() <= 1,
        "produced {produced}, expected {expected}"
    );
    // Within a sample of real time, at up to double speed.
    assert_relative_eq!(handle.track_time(), 10.0, epsilon = 4.0 * HALF_SAMPLE_AT_1K);
}

#[test]
fn test_looping_through_envelope() {
    let mut transport = test_transport();
    let envelope = SpeedEnvelope::new(0.5).unwrap();
    let handle = transport
        .start(0.0, 1.0, &warped(envelope).looped())
        .unwrap();
    let mut mixers = [MockMixer::default()];

    // Half speed: one lap is 2000 samples.
    for _ in 0..4 {
        fill_block(&mut transport, &mut mixers, 500);
    }
    assert_eq!(mixers[0].repositions, vec![(0.0, true)]);
    assert_eq!(handle.track_time(), 0.0);

    fill_block(&mut transport, &mut mixers, 500);
    assert_eq!(handle.track_time(), 0.25);
}

#[test]
fn test_envelope_errors_convert() {
    fn build() -> segue::Result<SpeedEnvelope> {
        let mut envelope = SpeedEnvelope::new(1.0)?;
        envelope.add_point(0.0, -1.0)?;
        Ok(envelope)
    }

    assert_eq!(
        build().unwrap_err(),
        segue::Error::Warp(segue::warp::Error::InvalidSpeed(-1.0))
    );
}
