// VectorHighPassFilter - per-dimension batch high-pass over buffered vectors
//
// Each of the D components of a buffered vector stream is filtered on its own
// through a one-dimensional high-pass primitive, then written back in place.
// The primitive sees sample rate 1 / dt and cutoff `cutoff_factor * dt`.

use serde::{Deserialize, Serialize};

use crate::config::HighPassConfig;
use crate::error::FilterError;
use crate::filters::butterworth::ButterworthHighPass;

/// One-dimensional high-pass capability
///
/// Implementations must be deterministic and should return exactly
/// `signal.len()` values; `VectorHighPassFilter` rejects anything else.
pub trait HighPassPrimitive {
    fn high_pass(
        &self,
        sample_rate: f64,
        cutoff_hz: f64,
        signal: &[f64],
    ) -> Result<Vec<f64>, FilterError>;
}

/// Buffered vector samples plus their average sampling interval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer {
    pub samples: Vec<Vec<f64>>,
    /// Seconds between samples; 0.0 when the rate is unknown
    pub avg_sample_interval: f64,
}

impl SampleBuffer {
    pub fn new(samples: Vec<Vec<f64>>, avg_sample_interval: f64) -> Self {
        Self {
            samples,
            avg_sample_interval,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Shared vector length, `None` for an empty buffer
    pub fn dimension(&self) -> Option<usize> {
        self.samples.first().map(Vec::len)
    }

    /// Copy of component `dim` across all samples
    ///
    /// `None` when any sample has no component `dim` (out of range or a
    /// ragged buffer).
    pub fn column(&self, dim: usize) -> Option<Vec<f64>> {
        self.samples.iter().map(|v| v.get(dim).copied()).collect()
    }
}

/// Check that every vector shares one length D > 0, returning D
pub fn validate_dimensions(samples: &[Vec<f64>]) -> Result<Option<usize>, FilterError> {
    let Some(first) = samples.first() else {
        return Ok(None);
    };
    let dim = first.len();
    if dim == 0 {
        return Err(FilterError::invalid("samples", "vectors must have dimension > 0"));
    }
    if let Some((index, v)) = samples.iter().enumerate().find(|(_, v)| v.len() != dim) {
        return Err(FilterError::invalid(
            "samples",
            format!(
                "sample {} has dimension {}, expected {}",
                index,
                v.len(),
                dim
            ),
        ));
    }
    Ok(Some(dim))
}

/// Per-dimension high-pass filter over a [`SampleBuffer`]
#[derive(Debug, Clone)]
pub struct VectorHighPassFilter<P = ButterworthHighPass> {
    primitive: P,
    cutoff_factor: f64,
}

/// Relative cutoff applied to the average sample interval
pub const DEFAULT_CUTOFF_FACTOR: f64 = 0.2;

impl VectorHighPassFilter<ButterworthHighPass> {
    /// First-order Butterworth with the default cutoff factor
    pub fn butterworth() -> Self {
        Self::with_primitive(ButterworthHighPass::default())
    }

    /// Build from the `high_pass` configuration section
    pub fn from_config(config: &HighPassConfig) -> Result<Self, FilterError> {
        let primitive = ButterworthHighPass::new(config.order)?;
        Self::with_primitive(primitive).with_cutoff_factor(config.cutoff_factor)
    }
}

impl<P: HighPassPrimitive> VectorHighPassFilter<P> {
    pub fn with_primitive(primitive: P) -> Self {
        Self {
            primitive,
            cutoff_factor: DEFAULT_CUTOFF_FACTOR,
        }
    }

    /// Override the relative cutoff (must be finite and > 0)
    pub fn with_cutoff_factor(mut self, cutoff_factor: f64) -> Result<Self, FilterError> {
        if !(cutoff_factor.is_finite() && cutoff_factor > 0.0) {
            return Err(FilterError::invalid(
                "cutoff_factor",
                format!("must be finite and > 0 (got {})", cutoff_factor),
            ));
        }
        self.cutoff_factor = cutoff_factor;
        Ok(self)
    }

    pub fn cutoff_factor(&self) -> f64 {
        self.cutoff_factor
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Cutoff handed to the primitive for a given sample interval
    pub fn cutoff_hz(&self, avg_sample_interval: f64) -> f64 {
        self.cutoff_factor * avg_sample_interval
    }

    /// High-pass every dimension of `samples` in place
    ///
    /// * Empty buffer: no-op.
    /// * Ragged or zero-length vectors: `InvalidParameter`.
    /// * `avg_sample_interval == 0.0`: no-op, buffer left untouched.
    /// * Negative / non-finite interval: `InvalidParameter`.
    ///
    /// Every column is filtered before anything is written back, so an error
    /// leaves the buffer exactly as it was.
    pub fn filter_dimensions(
        &self,
        samples: &mut [Vec<f64>],
        avg_sample_interval: f64,
    ) -> Result<(), FilterError> {
        let Some(dim) = validate_dimensions(samples)? else {
            return Ok(());
        };

        if avg_sample_interval == 0.0 {
            tracing::debug!("[HighPass] Sample rate unknown, skipping {} samples", samples.len());
            return Ok(());
        }
        if !(avg_sample_interval.is_finite() && avg_sample_interval > 0.0) {
            return Err(FilterError::invalid(
                "avg_sample_interval",
                format!("must be finite and >= 0 (got {})", avg_sample_interval),
            ));
        }

        let sample_rate = 1.0 / avg_sample_interval;
        let cutoff_hz = self.cutoff_hz(avg_sample_interval);
        let expected = samples.len();

        let mut columns = Vec::with_capacity(dim);
        for d in 0..dim {
            let column: Vec<f64> = samples.iter().map(|v| v[d]).collect();
            let filtered = self.primitive.high_pass(sample_rate, cutoff_hz, &column)?;
            if filtered.len() != expected {
                return Err(FilterError::FilterLengthMismatch {
                    dimension: d,
                    expected,
                    actual: filtered.len(),
                });
            }
            columns.push(filtered);
        }

        for (d, column) in columns.into_iter().enumerate() {
            for (sample, value) in samples.iter_mut().zip(column) {
                sample[d] = value;
            }
        }

        tracing::debug!(
            "[HighPass] Filtered {} samples x {} dims (fs={:.3} Hz, fc={:.6} Hz)",
            expected,
            dim,
            sample_rate,
            cutoff_hz
        );
        Ok(())
    }

    /// Filter a [`SampleBuffer`] using its own interval
    pub fn filter_buffer(&self, buffer: &mut SampleBuffer) -> Result<(), FilterError> {
        let interval = buffer.avg_sample_interval;
        self.filter_dimensions(&mut buffer.samples, interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Subtracts the column mean; easy to reason about
    struct MeanRemoval;

    impl HighPassPrimitive for MeanRemoval {
        fn high_pass(&self, _: f64, _: f64, signal: &[f64]) -> Result<Vec<f64>, FilterError> {
            let mean = signal.iter().sum::<f64>() / signal.len() as f64;
            Ok(signal.iter().map(|x| x - mean).collect())
        }
    }

    /// Drops the last value of every column
    struct Truncating;

    impl HighPassPrimitive for Truncating {
        fn high_pass(&self, _: f64, _: f64, signal: &[f64]) -> Result<Vec<f64>, FilterError> {
            Ok(signal[..signal.len() - 1].to_vec())
        }
    }

    /// Records the parameters it was called with
    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<(f64, f64, usize)>>,
    }

    impl HighPassPrimitive for Recording {
        fn high_pass(
            &self,
            sample_rate: f64,
            cutoff_hz: f64,
            signal: &[f64],
        ) -> Result<Vec<f64>, FilterError> {
            self.calls
                .borrow_mut()
                .push((sample_rate, cutoff_hz, signal.len()));
            Ok(signal.to_vec())
        }
    }

    fn buffer() -> Vec<Vec<f64>> {
        (0..50)
            .map(|i| {
                let t = i as f64 * 0.01;
                vec![1.0 + t, (10.0 * t).sin(), -9.81 + 0.1 * (3.0 * t).cos()]
            })
            .collect()
    }

    #[test]
    fn test_zero_interval_is_noop() {
        let filter = VectorHighPassFilter::butterworth();
        let original = buffer();
        let mut samples = original.clone();

        filter.filter_dimensions(&mut samples, 0.0).unwrap();

        for (a, b) in original.iter().flatten().zip(samples.iter().flatten()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let filter = VectorHighPassFilter::butterworth();
        let mut samples: Vec<Vec<f64>> = Vec::new();
        assert!(filter.filter_dimensions(&mut samples, 0.01).is_ok());
        assert!(samples.is_empty());
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let filter = VectorHighPassFilter::butterworth();
        let mut samples = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0], vec![1.0, 2.0, 3.0]];
        let original = samples.clone();

        let err = filter.filter_dimensions(&mut samples, 0.01).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { .. }));
        assert_eq!(samples, original);

        // Rejected even when the rate is unknown
        assert!(filter.filter_dimensions(&mut samples, 0.0).is_err());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let filter = VectorHighPassFilter::butterworth();
        let mut samples = vec![vec![], vec![]];
        assert!(filter.filter_dimensions(&mut samples, 0.01).is_err());
    }

    #[test]
    fn test_negative_interval_rejected() {
        let filter = VectorHighPassFilter::butterworth();
        let mut samples = buffer();
        assert!(filter.filter_dimensions(&mut samples, -0.01).is_err());
        assert!(filter.filter_dimensions(&mut samples, f64::NAN).is_err());
    }

    #[test]
    fn test_shape_preserved() {
        let filter = VectorHighPassFilter::butterworth();
        let mut samples = buffer();
        filter.filter_dimensions(&mut samples, 0.01).unwrap();
        assert_eq!(samples.len(), 50);
        assert!(samples.iter().all(|v| v.len() == 3));
    }

    #[test]
    fn test_dimensions_are_independent() {
        let filter = VectorHighPassFilter::butterworth();
        let mut reference = buffer();
        let mut perturbed = buffer();
        for (i, v) in perturbed.iter_mut().enumerate() {
            v[1] += (i as f64 * 0.7).cos() * 5.0;
        }

        filter.filter_dimensions(&mut reference, 0.01).unwrap();
        filter.filter_dimensions(&mut perturbed, 0.01).unwrap();

        for (a, b) in reference.iter().zip(&perturbed) {
            assert_eq!(a[0], b[0]);
            assert_eq!(a[2], b[2]);
        }
        assert!(reference.iter().zip(&perturbed).any(|(a, b)| a[1] != b[1]));
    }

    #[test]
    fn test_primitive_parameters() {
        let filter = VectorHighPassFilter::with_primitive(Recording::default());
        let mut samples = buffer();
        filter.filter_dimensions(&mut samples, 0.02).unwrap();

        let calls = filter.primitive().calls.borrow();
        assert_eq!(calls.len(), 3);
        for &(rate, cutoff, len) in calls.iter() {
            assert!((rate - 50.0).abs() < 1e-9);
            assert!((cutoff - 0.004).abs() < 1e-12);
            assert_eq!(len, 50);
        }
    }

    #[test]
    fn test_custom_primitive_written_back() {
        let filter = VectorHighPassFilter::with_primitive(MeanRemoval);
        let mut samples = vec![vec![1.0, 10.0], vec![3.0, 20.0]];
        filter.filter_dimensions(&mut samples, 0.5).unwrap();
        assert_eq!(samples, vec![vec![-1.0, -5.0], vec![1.0, 5.0]]);
    }

    #[test]
    fn test_length_mismatch_leaves_buffer_untouched() {
        let filter = VectorHighPassFilter::with_primitive(Truncating);
        let original = buffer();
        let mut samples = original.clone();

        let err = filter.filter_dimensions(&mut samples, 0.01).unwrap_err();
        assert_eq!(
            err,
            FilterError::FilterLengthMismatch {
                dimension: 0,
                expected: 50,
                actual: 49
            }
        );
        assert_eq!(samples, original);
    }

    #[test]
    fn test_invalid_cutoff_factor() {
        assert!(VectorHighPassFilter::butterworth()
            .with_cutoff_factor(0.0)
            .is_err());
        assert!(VectorHighPassFilter::butterworth()
            .with_cutoff_factor(f64::INFINITY)
            .is_err());
    }

    #[test]
    fn test_filter_buffer_uses_interval() {
        let filter = VectorHighPassFilter::butterworth();
        let mut unknown = SampleBuffer::new(buffer(), 0.0);
        filter.filter_buffer(&mut unknown).unwrap();
        assert_eq!(unknown.samples, buffer());

        let mut known = SampleBuffer::new(buffer(), 0.01);
        filter.filter_buffer(&mut known).unwrap();
        assert_ne!(known.samples, buffer());
        assert_eq!(known.dimension(), Some(3));
        assert_eq!(known.column(0).map(|c| c.len()), Some(known.len()));
    }

    #[test]
    fn test_column_out_of_range_or_ragged() {
        let ragged = SampleBuffer::new(vec![vec![1.0, 2.0], vec![3.0]], 0.1);
        assert_eq!(ragged.column(0), Some(vec![1.0, 3.0]));
        assert_eq!(ragged.column(1), None);

        let regular = SampleBuffer::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 0.1);
        assert_eq!(regular.column(1), Some(vec![2.0, 4.0]));
        assert_eq!(regular.column(2), None);
    }
}
