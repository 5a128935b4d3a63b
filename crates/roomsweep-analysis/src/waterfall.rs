//! Cumulative spectral decay (waterfall)
//!
//! Successive spectra of the impulse response, each starting later in time
//! and covering the remainder of the analysis window. The segment shrinks
//! with each slice while the FFT size stays fixed, so all slices share one
//! frequency grid.

use crate::fft::{ComplexBuffer, next_power_of_two};
use crate::response::{DB_FLOOR, amplitude_to_db, interpolate_bins, log_spaced_frequencies};
use crate::window::apply_half_hann_tail;

/// Options for [`compute_waterfall`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallOptions {
    /// Number of time slices.
    pub num_slices: usize,
    /// Analysis window length in seconds.
    pub window_sec: f64,
    /// Number of log-spaced frequencies per slice.
    pub num_freq_points: usize,
    /// Lowest frequency in Hz.
    pub f_min: f64,
    /// Highest frequency in Hz (clamped to Nyquist).
    pub f_max: f64,
}

impl Default for WaterfallOptions {
    fn default() -> Self {
        Self {
            num_slices: 30,
            window_sec: 0.3,
            num_freq_points: 200,
            f_min: 20.0,
            f_max: 15000.0,
        }
    }
}

/// One spectrum of the waterfall.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallSlice {
    /// Slice start time in seconds from the IR start.
    pub time_sec: f64,
    /// Level in dB at each of [`WaterfallData::frequencies`].
    pub magnitude_db: Vec<f64>,
}

/// Cumulative spectral decay result.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallData {
    /// Slices in order of increasing start time.
    pub slices: Vec<WaterfallSlice>,
    /// Frequency grid shared by all slices, ascending.
    pub frequencies: Vec<f64>,
    /// Highest level across all slices, for display normalization.
    /// [`DB_FLOOR`] when there are no slices.
    pub max_db: f64,
}

impl WaterfallData {
    fn empty(frequencies: Vec<f64>) -> Self {
        Self {
            slices: Vec::new(),
            frequencies,
            max_db: DB_FLOOR,
        }
    }
}

/// Compute the cumulative spectral decay of an impulse response.
///
/// Slice start offsets are spaced evenly by `window_samples / num_slices`,
/// where `window_samples = round(window_sec * sample_rate)`. Each slice
/// analyzes the IR from its offset to the end of the window, with the
/// second half of that segment tapered by a half-Hann. When the IR is
/// shorter than the window, slices whose offset falls past the IR are not
/// produced.
pub fn compute_waterfall(
    ir: &[f64],
    sample_rate: f64,
    options: &WaterfallOptions,
) -> WaterfallData {
    let f_hi = options.f_max.min(sample_rate / 2.0);
    let frequencies = if options.f_min > 0.0 && f_hi >= options.f_min {
        log_spaced_frequencies(options.f_min, f_hi, options.num_freq_points)
    } else {
        Vec::new()
    };

    let window_samples = (options.window_sec * sample_rate).round().max(0.0) as usize;
    let total_samples = window_samples.min(ir.len());
    if total_samples < 2 || options.num_slices == 0 || frequencies.is_empty() {
        return WaterfallData::empty(frequencies);
    }

    let fft_size = next_power_of_two(total_samples);
    let bin_positions: Vec<f64> = frequencies
        .iter()
        .map(|&f| f * fft_size as f64 / sample_rate)
        .collect();
    let step = (window_samples / options.num_slices).max(1);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        fft_size,
        total_samples,
        step,
        num_slices = options.num_slices,
        "computing waterfall"
    );

    let mut slices = Vec::with_capacity(options.num_slices);
    let mut max_db = f64::NEG_INFINITY;
    let mut buffer = ComplexBuffer {
        re: vec![0.0; fft_size],
        im: vec![0.0; fft_size],
    };

    for k in 0..options.num_slices {
        let offset = k * step;
        if offset + 2 > total_samples {
            break;
        }

        let segment_len = total_samples - offset;
        buffer.re.fill(0.0);
        buffer.im.fill(0.0);
        buffer.re[..segment_len].copy_from_slice(&ir[offset..total_samples]);
        apply_half_hann_tail(&mut buffer.re[..segment_len]);
        buffer.forward();

        let magnitudes = buffer.half_spectrum_magnitudes();
        let magnitude_db: Vec<f64> = bin_positions
            .iter()
            .map(|&pos| amplitude_to_db(interpolate_bins(&magnitudes, pos)))
            .collect();

        if let Some(slice_max) = magnitude_db.iter().copied().reduce(f64::max) {
            max_db = max_db.max(slice_max);
        }

        slices.push(WaterfallSlice {
            time_sec: offset as f64 / sample_rate,
            magnitude_db,
        });
    }

    if slices.is_empty() {
        return WaterfallData::empty(frequencies);
    }

    WaterfallData {
        slices,
        frequencies,
        max_db,
    }
}
