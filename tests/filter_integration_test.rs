//! Integration tests for the filtering core
//!
//! These tests exercise the public API end to end:
//! - Kalman recursion invariants over long random sequences
//! - Per-dimension high-pass behaviour on recorder-shaped buffers
//! - Full log round trip through the pipeline

use imu_filter_core::config::AppConfig;
use imu_filter_core::error::{ErrorCode, FilterError, FilterErrorCodes};
use imu_filter_core::filters::{
    ButterworthHighPass, HighPassPrimitive, SampleBuffer, ScalarKalmanFilter,
    VectorHighPassFilter,
};
use imu_filter_core::imu::{ImuLog, SyntheticImu};
use imu_filter_core::pipeline::FilterPipeline;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn test_kalman_invariants_hold_for_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for _ in 0..50 {
        let mut kf = ScalarKalmanFilter::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(0.0..10.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(1e-6..10.0),
        )
        .unwrap();

        for _ in 0..200 {
            kf.predict();
            kf.update(rng.gen_range(-1e3..1e3));
            let gain = kf.last_gain().unwrap();
            assert!((0.0..=1.0).contains(&gain));
            assert!(kf.error_covariance() >= 0.0);
        }
    }
}

#[test]
fn test_kalman_zero_measurement_noise_is_rejected() {
    let err = ScalarKalmanFilter::new(0.0, 1.0, 0.01, 0.0).unwrap_err();
    assert_eq!(err.code(), FilterErrorCodes::INVALID_PARAMETER);
}

#[test]
fn test_high_pass_removes_bias_per_axis() {
    // 60 s at 100 Hz, cutoff 0.5 Hz via a custom factor (0.5 Hz = factor * 0.01 s)
    let filter = VectorHighPassFilter::with_primitive(ButterworthHighPass::new(2).unwrap())
        .with_cutoff_factor(50.0)
        .unwrap();
    let mut buffer = SampleBuffer::new(
        (0..6000)
            .map(|i| {
                let t = i as f64 * 0.01;
                vec![
                    0.3 + (2.0 * std::f64::consts::PI * 5.0 * t).sin(),
                    -9.81,
                    1.5 + 0.2 * (2.0 * std::f64::consts::PI * 8.0 * t).cos(),
                ]
            })
            .collect(),
        0.01,
    );

    filter.filter_buffer(&mut buffer).unwrap();

    let tail = &buffer.samples[3000..];
    let mean = |axis: usize| tail.iter().map(|v| v[axis]).sum::<f64>() / tail.len() as f64;
    assert!(mean(0).abs() < 0.01, "axis 0 mean {}", mean(0));
    assert!(mean(1).abs() < 1e-6, "axis 1 mean {}", mean(1));
    assert!(mean(2).abs() < 0.01, "axis 2 mean {}", mean(2));
}

#[test]
fn test_failing_primitive_propagates() {
    struct Failing;

    impl HighPassPrimitive for Failing {
        fn high_pass(&self, _: f64, _: f64, _: &[f64]) -> Result<Vec<f64>, FilterError> {
            Err(FilterError::InvalidParameter {
                name: "cutoff_hz".to_string(),
                reason: "unsupported".to_string(),
            })
        }
    }

    let filter = VectorHighPassFilter::with_primitive(Failing);
    let mut samples = vec![vec![1.0, 2.0]; 8];
    let err = filter.filter_dimensions(&mut samples, 0.1).unwrap_err();
    assert_eq!(err.code(), FilterErrorCodes::INVALID_PARAMETER);
    assert_eq!(samples, vec![vec![1.0, 2.0]; 8]);
}

#[test]
fn test_cutoff_above_nyquist_is_reported() {
    // dt = 2 s -> fs = 0.5 Hz, cutoff = 0.4 Hz > Nyquist (0.25 Hz)
    let filter = VectorHighPassFilter::butterworth();
    let mut samples = vec![vec![1.0]; 4];
    let err = filter.filter_dimensions(&mut samples, 2.0).unwrap_err();
    assert!(matches!(err, FilterError::InvalidParameter { ref name, .. } if name == "cutoff_hz"));
}

#[test]
fn test_pipeline_round_trip_through_text() {
    let log = SyntheticImu::phone(3.0).generate();
    let mut text = Vec::new();
    log.write_to(&mut text).unwrap();
    let parsed = ImuLog::parse(text.as_slice()).unwrap();
    assert_eq!(parsed, log);

    let mut config = AppConfig::default();
    config.high_pass.order = 2;
    config.pipeline.smooth = true;
    let report = FilterPipeline::from_config(&config).unwrap().run(&parsed).unwrap();

    assert_eq!(report.filtered.records.len(), log.records.len());
    for (before, after) in log.records.iter().zip(&report.filtered.records) {
        assert_eq!(before.timestamp_ns(), after.timestamp_ns());
    }

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["streams"].as_array().unwrap().len(), 2);
    assert!(json.get("filtered").is_none());
}
