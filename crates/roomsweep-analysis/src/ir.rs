//! Impulse response extraction by deconvolution
//!
//! Convolving a sweep recording with the sweep's inverse filter collapses
//! the sweep into an impulse. The impulse lands at a data-dependent offset
//! (sweep length plus system delay), so the result is aligned on its peak
//! before it is returned.

use crate::convolution::convolve;

/// Peak-aligned, peak-normalized impulse response.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    /// IR samples starting at the detected peak. `max(|ir|) == 1` unless
    /// the deconvolution output was silent, in which case all zeros.
    pub ir: Vec<f64>,
    /// Index of the peak in the raw (pre-alignment) deconvolution output.
    pub peak_index: usize,
    /// Peak magnitude before normalization.
    pub raw_peak: f64,
}

impl ImpulseResponse {
    /// Whether the deconvolution produced no energy.
    pub fn is_silent(&self) -> bool {
        !(self.raw_peak > 0.0)
    }

    /// IR length in seconds at `sample_rate`.
    pub fn duration_secs(&self, sample_rate: f64) -> f64 {
        self.ir.len() as f64 / sample_rate
    }
}

/// Extract the impulse response from a sweep recording.
///
/// # Arguments
/// * `recording` - Captured sweep through the system under test
/// * `inverse_filter` - Inverse filter of the sweep that was played
/// * `max_length_samples` - Optional cap on the returned IR length
pub fn extract_impulse_response(
    recording: &[f64],
    inverse_filter: &[f64],
    max_length_samples: Option<usize>,
) -> ImpulseResponse {
    let raw = convolve(recording, inverse_filter);

    let peak_index = raw
        .iter()
        .enumerate()
        .fold((0usize, 0.0f64), |(best_i, best), (i, &x)| {
            if x.abs() > best { (i, x.abs()) } else { (best_i, best) }
        })
        .0;
    let raw_peak = raw.get(peak_index).map_or(0.0, |x| x.abs());

    let remaining = raw.len().saturating_sub(peak_index);
    let length = max_length_samples.map_or(remaining, |cap| cap.min(remaining));

    let ir: Vec<f64> = if raw_peak > 0.0 && raw_peak.is_finite() {
        raw[peak_index..peak_index + length]
            .iter()
            .map(|&x| x / raw_peak)
            .collect()
    } else {
        vec![0.0; length]
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        peak_index,
        raw_peak,
        ir_len = ir.len(),
        "extracted impulse response"
    );

    ImpulseResponse {
        ir,
        peak_index,
        raw_peak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_aligns_on_peak() {
        // Inverse is a delta; recording has its peak at index 3
        let recording = [0.0, 0.1, -0.2, -2.0, 0.5, 0.25];
        let result = extract_impulse_response(&recording, &[1.0], None);

        assert_eq!(result.peak_index, 3);
        assert!((result.raw_peak - 2.0).abs() < 1e-9);
        assert_eq!(result.ir.len(), 3);
        assert!((result.ir[0] + 1.0).abs() < 1e-9);
        assert!((result.ir[1] - 0.25).abs() < 1e-9);
        assert!((result.ir[2] - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_extract_respects_cap() {
        let recording = [0.0, 1.0, 0.5, 0.25, 0.125];
        let result = extract_impulse_response(&recording, &[1.0], Some(2));
        assert_eq!(result.ir.len(), 2);

        let result = extract_impulse_response(&recording, &[1.0], Some(100));
        assert_eq!(result.ir.len(), 4);
    }

    #[test]
    fn test_extract_silence() {
        let recording = vec![0.0; 64];
        let result = extract_impulse_response(&recording, &[1.0, 0.5], None);

        assert!(result.is_silent());
        assert_eq!(result.peak_index, 0);
        assert_eq!(result.raw_peak, 0.0);
        assert_eq!(result.ir.len(), 65);
        assert!(result.ir.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_extract_empty() {
        let result = extract_impulse_response(&[], &[1.0], None);
        assert_eq!(result.peak_index, 0);
        assert_eq!(result.raw_peak, 0.0);
        assert!(result.ir.is_empty());
    }

    #[test]
    fn test_normalized_peak_is_one() {
        let recording: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin() * 3.0).collect();
        let inverse: Vec<f64> = (0..50).map(|i| (i as f64 * 0.11).cos()).collect();
        let result = extract_impulse_response(&recording, &inverse, None);

        let peak = result.ir.iter().fold(0.0f64, |m, x| m.max(x.abs()));
        assert!((peak - 1.0).abs() < 1e-12);
        assert!((result.ir[0].abs() - 1.0).abs() < 1e-12);
        assert!(result.ir.iter().all(|x| !x.is_nan()));
    }
}
