//! Frequency response of an impulse response on a log-frequency axis

use crate::fft::{next_power_of_two, real_to_complex};
use crate::window::apply_fade_out;

/// Level reported where a dB value is undefined (zero magnitude or energy).
pub const DB_FLOOR: f64 = -120.0;

/// One point of a frequency response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyPoint {
    /// Frequency in Hz.
    pub freq: f64,
    /// Level in dB. Always finite.
    pub db: f64,
}

impl FrequencyPoint {
    /// Create a point.
    pub fn new(freq: f64, db: f64) -> Self {
        Self { freq, db }
    }
}

/// Convert a linear magnitude to dB.
///
/// Zero, negative and NaN magnitudes, or any conversion that is not finite,
/// map to [`DB_FLOOR`]. Finite levels below the floor are returned as is.
pub fn amplitude_to_db(magnitude: f64) -> f64 {
    if !(magnitude > 0.0) {
        return DB_FLOOR;
    }
    let db = 20.0 * magnitude.log10();
    if db.is_finite() { db } else { DB_FLOOR }
}

/// `n` logarithmically spaced frequencies from `f_min` to `f_max` inclusive.
///
/// `n == 1` yields `[f_min]`.
pub fn log_spaced_frequencies(f_min: f64, f_max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![f_min],
        _ => {
            let ratio = f_max / f_min;
            (0..n)
                .map(|i| f_min * ratio.powf(i as f64 / (n - 1) as f64))
                .collect()
        }
    }
}

/// Options for [`compute_frequency_response`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseOptions {
    /// Lowest frequency in Hz.
    pub f_min: f64,
    /// Highest frequency in Hz (clamped to Nyquist).
    pub f_max: f64,
    /// Number of log-spaced output points.
    pub num_points: usize,
    /// IR analysis window in seconds; `None` uses the whole IR.
    pub window_sec: Option<f64>,
    /// Fraction of the window covered by the fade-out.
    pub fade_out_ratio: f64,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            f_min: 20.0,
            f_max: 20000.0,
            num_points: 500,
            window_sec: Some(0.5),
            fade_out_ratio: 0.1,
        }
    }
}

/// Truncate an IR to `max_duration_sec` and fade out its final
/// `fade_out_ratio` fraction.
///
/// The fade runs from 1 down to 0 at the last sample, so the window edge
/// does not leak into the spectrum.
pub fn window_ir(
    ir: &[f64],
    sample_rate: f64,
    max_duration_sec: Option<f64>,
    fade_out_ratio: f64,
) -> Vec<f64> {
    let len = match max_duration_sec {
        Some(secs) if secs >= 0.0 => ((secs * sample_rate) as usize).min(ir.len()),
        _ => ir.len(),
    };

    let mut windowed = ir[..len].to_vec();
    let fade_len = (len as f64 * fade_out_ratio.clamp(0.0, 1.0)) as usize;
    apply_fade_out(&mut windowed, fade_len);
    windowed
}

/// Magnitude response resampled onto a log-frequency axis.
///
/// The signal is zero-padded to the next power of two and transformed.
/// Each output frequency in `[f_min, min(f_max, Nyquist)]` is linearly
/// interpolated between its two neighbouring bins and converted to dB.
/// Returns an empty response for an empty signal, zero points, or an
/// unusable frequency range.
pub fn compute_magnitude_response(
    signal: &[f64],
    sample_rate: f64,
    f_min: f64,
    f_max: f64,
    num_points: usize,
) -> Vec<FrequencyPoint> {
    let f_hi = f_max.min(sample_rate / 2.0);
    if signal.is_empty() || num_points == 0 || !(f_min > 0.0) || !(f_hi >= f_min) {
        return Vec::new();
    }

    let fft_size = next_power_of_two(signal.len());
    let Ok(mut spectrum) = real_to_complex(signal, Some(fft_size)) else {
        return Vec::new();
    };
    spectrum.forward();
    let magnitudes = spectrum.half_spectrum_magnitudes();

    #[cfg(feature = "tracing")]
    tracing::debug!(fft_size, num_points, "computing magnitude response");

    let bin_hz = sample_rate / fft_size as f64;
    log_spaced_frequencies(f_min, f_hi, num_points)
        .into_iter()
        .map(|freq| {
            let mag = interpolate_bins(&magnitudes, freq / bin_hz);
            FrequencyPoint::new(freq, amplitude_to_db(mag))
        })
        .collect()
}

/// Linear interpolation of `magnitudes` at a fractional bin position.
pub(crate) fn interpolate_bins(magnitudes: &[f64], position: f64) -> f64 {
    let last = magnitudes.len().saturating_sub(1);
    if magnitudes.is_empty() {
        return 0.0;
    }
    let position = position.max(0.0);
    let lo = (position.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = (position - lo as f64).clamp(0.0, 1.0);
    magnitudes[lo] * (1.0 - frac) + magnitudes[hi] * frac
}

/// Window the IR and compute its log-frequency magnitude response.
pub fn compute_frequency_response(
    ir: &[f64],
    sample_rate: f64,
    options: &ResponseOptions,
) -> Vec<FrequencyPoint> {
    let windowed = window_ir(ir, sample_rate, options.window_sec, options.fade_out_ratio);
    compute_magnitude_response(
        &windowed,
        sample_rate,
        options.f_min,
        options.f_max,
        options.num_points,
    )
}
