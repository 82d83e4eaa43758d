// ButterworthHighPass - digital Butterworth high-pass design
//
// Design steps:
// 1. Analog Butterworth low-pass prototype (poles on the unit circle)
// 2. Low-pass to high-pass transform s -> wc / s
// 3. Bilinear transform with frequency prewarping: t = tan(pi * fc / fs)
// 4. Cascade of second-order sections (plus one first-order section for odd orders)
//
// Sections run in transposed direct form II from zero state, one forward pass.

use std::f64::consts::PI;

use crate::error::FilterError;
use crate::filters::highpass::HighPassPrimitive;

/// Normalized coefficients of one section (a0 == 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b: [f64; 3],
    pub a: [f64; 2],
}

impl Biquad {
    /// First-order high-pass section for prewarped `t`
    fn first_order(t: f64) -> Self {
        let norm = 1.0 + t;
        Self {
            b: [1.0 / norm, -1.0 / norm, 0.0],
            a: [(t - 1.0) / norm, 0.0],
        }
    }

    /// Second-order high-pass section with analog damping term `damping`
    fn second_order(t: f64, damping: f64) -> Self {
        let t2 = t * t;
        let norm = 1.0 + damping * t + t2;
        Self {
            b: [1.0 / norm, -2.0 / norm, 1.0 / norm],
            a: [2.0 * (t2 - 1.0) / norm, (1.0 - damping * t + t2) / norm],
        }
    }

    fn process(&self, signal: &mut [f64]) {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        for x in signal.iter_mut() {
            let input = *x;
            let output = self.b[0] * input + z1;
            z1 = self.b[1] * input - self.a[0] * output + z2;
            z2 = self.b[2] * input - self.a[1] * output;
            *x = output;
        }
    }
}

/// Butterworth high-pass filter of configurable order
#[derive(Debug, Clone)]
pub struct ButterworthHighPass {
    order: usize,
}

impl ButterworthHighPass {
    /// Create a designer for the given order
    ///
    /// # Errors
    /// `InvalidParameter` when `order == 0`.
    pub fn new(order: usize) -> Result<Self, FilterError> {
        if order == 0 {
            return Err(FilterError::invalid("order", "must be >= 1"));
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Compute the section cascade for a sample rate and cutoff (both Hz)
    pub fn design(&self, sample_rate: f64, cutoff_hz: f64) -> Result<Vec<Biquad>, FilterError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(FilterError::invalid(
                "sample_rate",
                format!("must be finite and > 0 (got {})", sample_rate),
            ));
        }
        let nyquist = sample_rate / 2.0;
        if !(cutoff_hz.is_finite() && cutoff_hz > 0.0 && cutoff_hz < nyquist) {
            return Err(FilterError::invalid(
                "cutoff_hz",
                format!(
                    "must lie in (0, {}) for sample rate {} (got {})",
                    nyquist, sample_rate, cutoff_hz
                ),
            ));
        }

        let t = (PI * cutoff_hz / sample_rate).tan();
        let n = self.order;
        let mut sections = Vec::with_capacity(n / 2 + n % 2);

        for k in 0..n / 2 {
            let theta = PI * (2 * k + 1) as f64 / (2 * n) as f64;
            sections.push(Biquad::second_order(t, 2.0 * theta.sin()));
        }
        if n % 2 == 1 {
            sections.push(Biquad::first_order(t));
        }

        Ok(sections)
    }
}

impl Default for ButterworthHighPass {
    fn default() -> Self {
        Self { order: 1 }
    }
}

impl HighPassPrimitive for ButterworthHighPass {
    fn high_pass(
        &self,
        sample_rate: f64,
        cutoff_hz: f64,
        signal: &[f64],
    ) -> Result<Vec<f64>, FilterError> {
        let sections = self.design(sample_rate, cutoff_hz)?;
        let mut output = signal.to_vec();
        for section in &sections {
            section.process(&mut output);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    fn rms(signal: &[f64]) -> f64 {
        (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
    }

    #[test]
    fn test_rejects_invalid_design() {
        assert!(ButterworthHighPass::new(0).is_err());

        let filter = ButterworthHighPass::new(2).unwrap();
        assert!(filter.design(0.0, 1.0).is_err());
        assert!(filter.design(100.0, 0.0).is_err());
        assert!(filter.design(100.0, 50.0).is_err());
        assert!(filter.design(100.0, f64::NAN).is_err());
        assert!(filter.design(100.0, 10.0).is_ok());
    }

    #[test]
    fn test_section_count_by_order() {
        for (order, expected) in [(1, 1), (2, 1), (3, 2), (4, 2), (5, 3)] {
            let filter = ButterworthHighPass::new(order).unwrap();
            assert_eq!(filter.design(100.0, 5.0).unwrap().len(), expected);
        }
    }

    #[test]
    fn test_unity_gain_at_nyquist() {
        // H(z = -1) == 1 for every high-pass section
        let filter = ButterworthHighPass::new(4).unwrap();
        for section in filter.design(200.0, 12.0).unwrap() {
            let num = section.b[0] - section.b[1] + section.b[2];
            let den = 1.0 - section.a[0] + section.a[1];
            assert!((num / den - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_removes_constant_offset() {
        let filter = ButterworthHighPass::new(2).unwrap();
        let signal = vec![9.81; 2000];
        let filtered = filter.high_pass(100.0, 1.0, &signal).unwrap();

        assert_eq!(filtered.len(), signal.len());
        assert!(filtered[1999].abs() < 1e-6, "residual {}", filtered[1999]);
    }

    #[test]
    fn test_passes_high_frequency_attenuates_low() {
        let sample_rate = 100.0;
        let filter = ButterworthHighPass::new(2).unwrap();

        let low = filter
            .high_pass(sample_rate, 5.0, &sine(0.2, sample_rate, 4000))
            .unwrap();
        let high = filter
            .high_pass(sample_rate, 5.0, &sine(20.0, sample_rate, 4000))
            .unwrap();

        // Skip the start-up transient
        assert!(rms(&low[2000..]) < 0.01);
        assert!(rms(&high[2000..]) > 0.65);
    }

    #[test]
    fn test_deterministic_and_empty() {
        let filter = ButterworthHighPass::default();
        let signal = sine(3.0, 50.0, 64);
        assert_eq!(
            filter.high_pass(50.0, 1.0, &signal).unwrap(),
            filter.high_pass(50.0, 1.0, &signal).unwrap()
        );
        assert!(filter.high_pass(50.0, 1.0, &[]).unwrap().is_empty());
    }
}
