// Spectrum module - FFT magnitude spectra for filter diagnostics
//
// Used to report how much of an axis' energy sits in the low band (bias and
// drift) before and after high-pass filtering. A Hann window is applied to
// reduce spectral leakage; the window keeps the DC term, which is the part
// of the signal we most want to see.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::{Arc, Mutex};

/// Largest FFT computed for a single axis; longer signals use their tail
pub const MAX_FFT_SIZE: usize = 1 << 16;

/// FFT processor that computes magnitude spectra of sensor axes
pub struct SpectrumAnalyzer {
    fft_planner: Arc<Mutex<FftPlanner<f64>>>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            fft_planner: Arc::new(Mutex::new(FftPlanner::new())),
        }
    }

    /// Magnitude spectrum of `signal`, zero-padded to a power of two
    ///
    /// # Returns
    /// Magnitudes for the positive frequencies (size = fft_size / 2 + 1)
    /// and the FFT size used. Empty input yields an empty spectrum.
    pub fn magnitude_spectrum(&self, signal: &[f64]) -> (Vec<f64>, usize) {
        if signal.is_empty() {
            return (Vec::new(), 0);
        }

        let signal = &signal[signal.len().saturating_sub(MAX_FFT_SIZE)..];
        let fft_size = signal.len().next_power_of_two().max(2);
        let len = signal.len();

        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let w = if len > 1 {
                    0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (len as f64 - 1.0)).cos())
                } else {
                    1.0
                };
                Complex::new(x * w, 0.0)
            })
            .collect();
        buffer.resize(fft_size, Complex::new(0.0, 0.0));

        let fft = match self.fft_planner.lock() {
            Ok(mut planner) => planner.plan_fft_forward(fft_size),
            Err(poisoned) => poisoned.into_inner().plan_fft_forward(fft_size),
        };
        fft.process(&mut buffer);

        let spectrum = buffer[..fft_size / 2 + 1].iter().map(|c| c.norm()).collect();
        (spectrum, fft_size)
    }

    /// Fraction of spectral energy at or below `band_hz`
    ///
    /// Returns `None` for an empty or all-zero signal or a non-positive rate.
    pub fn low_band_energy_ratio(
        &self,
        signal: &[f64],
        sample_rate: f64,
        band_hz: f64,
    ) -> Option<f64> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return None;
        }
        let (spectrum, fft_size) = self.magnitude_spectrum(signal);
        if spectrum.is_empty() {
            return None;
        }

        let bin_hz = sample_rate / fft_size as f64;
        let mut low = 0.0;
        let mut total = 0.0;
        for (k, magnitude) in spectrum.iter().enumerate() {
            let energy = magnitude * magnitude;
            total += energy;
            if k as f64 * bin_hz <= band_hz {
                low += energy;
            }
        }

        if total > 0.0 {
            Some(low / total)
        } else {
            None
        }
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
