//! Exponential sine sweep synthesis and its matched inverse filter
//!
//! Uses the Farina method: the sweep's instantaneous frequency rises
//! exponentially, and the inverse filter is the time-reversed sweep with an
//! amplitude envelope that flattens the sweep's pink energy spectrum.

use crate::error::{Result, SweepParamError};
use crate::window::{apply_fade_in, apply_fade_out};
use std::f64::consts::PI;

/// Default fade-in length in seconds.
pub const DEFAULT_FADE_IN_SEC: f64 = 0.05;

/// Default fade-out length in seconds.
pub const DEFAULT_FADE_OUT_SEC: f64 = 0.01;

/// Parameters of a logarithmic sweep measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    /// Start frequency in Hz.
    pub f_start: f64,
    /// End frequency in Hz.
    pub f_end: f64,
    /// Sweep duration in seconds.
    pub duration_sec: f64,
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Raised-cosine fade-in length in seconds.
    pub fade_in_sec: f64,
    /// Raised-cosine fade-out length in seconds.
    pub fade_out_sec: f64,
}

impl SweepParams {
    /// Create sweep parameters with the default fades.
    ///
    /// # Arguments
    /// * `f_start` - Start frequency in Hz
    /// * `f_end` - End frequency in Hz
    /// * `duration_sec` - Sweep duration in seconds
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(f_start: f64, f_end: f64, duration_sec: f64, sample_rate: f64) -> Self {
        Self {
            f_start,
            f_end,
            duration_sec,
            sample_rate,
            fade_in_sec: DEFAULT_FADE_IN_SEC,
            fade_out_sec: DEFAULT_FADE_OUT_SEC,
        }
    }

    /// Replace the fade lengths.
    pub fn with_fades(mut self, fade_in_sec: f64, fade_out_sec: f64) -> Self {
        self.fade_in_sec = fade_in_sec;
        self.fade_out_sec = fade_out_sec;
        self
    }

    /// Check every parameter constraint, reporting the first violation.
    pub fn validate(&self) -> std::result::Result<(), SweepParamError> {
        if !(self.f_start > 0.0) {
            return Err(SweepParamError::StartFrequency(self.f_start));
        }
        if !(self.f_end > self.f_start) {
            return Err(SweepParamError::FrequencyOrder {
                start: self.f_start,
                end: self.f_end,
            });
        }
        if !(self.duration_sec > 0.0) || !self.duration_sec.is_finite() {
            return Err(SweepParamError::Duration(self.duration_sec));
        }
        if !(self.sample_rate > 0.0) || !self.sample_rate.is_finite() {
            return Err(SweepParamError::SampleRate(self.sample_rate));
        }
        if self.f_end > self.nyquist() {
            return Err(SweepParamError::AboveNyquist {
                end: self.f_end,
                nyquist: self.nyquist(),
            });
        }
        for fade in [self.fade_in_sec, self.fade_out_sec] {
            if !(fade >= 0.0) || !fade.is_finite() {
                return Err(SweepParamError::Fade(fade));
            }
        }
        Ok(())
    }

    /// Half the sample rate.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Number of samples in the sweep: `round(duration * sample_rate)`.
    pub fn num_samples(&self) -> usize {
        (self.duration_sec * self.sample_rate).round() as usize
    }

    fn fade_samples(&self, fade_sec: f64) -> usize {
        ((fade_sec * self.sample_rate).round() as usize).min(self.num_samples())
    }

    /// Instantaneous frequency of the sweep at time `t` seconds.
    pub fn frequency_at(&self, t: f64) -> f64 {
        self.f_start * (self.f_end / self.f_start).powf(t / self.duration_sec)
    }
}

/// Unfaded sweep. Parameters must already be validated.
fn raw_sweep(params: &SweepParams) -> Vec<f64> {
    let n = params.num_samples();
    let duration = params.duration_sec;
    let ln_ratio = (params.f_end / params.f_start).ln();
    let k = 2.0 * PI * params.f_start * duration / ln_ratio;

    (0..n)
        .map(|i| {
            let t = i as f64 / params.sample_rate;
            let phase = k * ((t / duration * ln_ratio).exp() - 1.0);
            phase.sin()
        })
        .collect()
}

/// Generate the exponential sine sweep with raised-cosine fades.
///
/// # Example
///
/// ```
/// use roomsweep_analysis::sweep::{SweepParams, generate_log_sweep};
///
/// let sweep = generate_log_sweep(&SweepParams::new(20.0, 15000.0, 1.0, 48000.0)).unwrap();
/// assert_eq!(sweep.len(), 48000);
/// ```
pub fn generate_log_sweep(params: &SweepParams) -> Result<Vec<f64>> {
    params.validate()?;

    let mut sweep = raw_sweep(params);
    apply_fade_in(&mut sweep, params.fade_samples(params.fade_in_sec));
    apply_fade_out(&mut sweep, params.fade_samples(params.fade_out_sec));

    #[cfg(feature = "tracing")]
    tracing::debug!(
        samples = sweep.len(),
        f_start = params.f_start,
        f_end = params.f_end,
        "generated log sweep"
    );

    Ok(sweep)
}

/// Generate the inverse filter for deconvolution.
///
/// The unfaded sweep is time-reversed and weighted by
/// `exp(-t * ln(f_end / f_start) / T)`, `t` being time from the start of
/// the reversed filter, so the high-frequency end keeps full amplitude and
/// the low-frequency end is attenuated by `f_start / f_end`. The result is
/// normalized to a peak magnitude of 1.
pub fn generate_inverse_filter(params: &SweepParams) -> Result<Vec<f64>> {
    params.validate()?;

    let ln_ratio = (params.f_end / params.f_start).ln();
    let mut inverse: Vec<f64> = raw_sweep(params)
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, sample)| {
            let t = i as f64 / params.sample_rate;
            sample * (-t * ln_ratio / params.duration_sec).exp()
        })
        .collect();

    let peak = inverse.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if peak > 0.0 {
        for x in inverse.iter_mut() {
            *x /= peak;
        }
    }

    Ok(inverse)
}

/// Estimate instantaneous frequency from the zero-crossing rate in a
/// symmetric window around `center_sample`.
///
/// Returns `crossings / (2 * window_duration)`, or 0.0 when the window
/// holds fewer than two samples. Intended for diagnostics.
pub fn estimate_instantaneous_frequency(
    buffer: &[f64],
    center_sample: usize,
    sample_rate: f64,
    window_samples: usize,
) -> f64 {
    let half = window_samples / 2;
    let start = center_sample.saturating_sub(half);
    let end = center_sample.saturating_add(half).min(buffer.len());
    if end <= start + 1 || sample_rate <= 0.0 {
        return 0.0;
    }

    let crossings = buffer[start..end]
        .windows(2)
        .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
        .count();

    let duration = (end - start) as f64 / sample_rate;
    crossings as f64 / (2.0 * duration)
}
