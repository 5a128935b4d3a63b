//! End-to-end analysis of a captured sweep recording
//!
//! ```text
//! recording ──► deconvolution ──► impulse response ─┬─► frequency response ─► smoothing ─► calibration ─► peaks
//!                                                   ├─► EDC / RT60
//!                                                   └─► waterfall
//! ```
//!
//! Each stage is a pure function of its inputs; the pipeline only wires
//! them together and decides which non-results to skip over.

use crate::calibration::{CalibrationData, apply_calibration};
use crate::error::Result;
use crate::ir::{ImpulseResponse, extract_impulse_response};
use crate::peaks::{DetectedPeak, PeakOptions, detect_peaks};
use crate::response::{FrequencyPoint, ResponseOptions, compute_frequency_response};
use crate::rt60::{Rt60Options, Rt60Result, compute_edc, estimate_rt60};
use crate::smoothing::smooth_frequency_response;
use crate::sweep::{SweepParams, generate_inverse_filter};
use crate::waterfall::{WaterfallData, WaterfallOptions, compute_waterfall};

/// Options for every stage of [`analyze_recording`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOptions {
    /// Frequency response options.
    pub response: ResponseOptions,
    /// Fractional-octave smoothing width; `None` disables smoothing.
    pub smoothing_fraction: Option<f64>,
    /// Peak detection options.
    pub peaks: PeakOptions,
    /// RT60 options.
    pub rt60: Rt60Options,
    /// Waterfall options; `None` skips the waterfall.
    pub waterfall: Option<WaterfallOptions>,
    /// Cap on the extracted IR length in seconds. Defaults to 3 s;
    /// `None` keeps the whole deconvolution tail after the peak.
    pub max_ir_sec: Option<f64>,
}

impl Default for MeasurementOptions {
    fn default() -> Self {
        Self {
            response: ResponseOptions::default(),
            smoothing_fraction: None,
            peaks: PeakOptions::default(),
            rt60: Rt60Options::default(),
            waterfall: Some(WaterfallOptions::default()),
            max_ir_sec: Some(3.0),
        }
    }
}

/// Everything derived from one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementResult {
    /// Sample rate of the recording in Hz.
    pub sample_rate: f64,
    /// Extracted impulse response; `None` when the recording held no signal.
    pub impulse: Option<ImpulseResponse>,
    /// Unsmoothed, uncalibrated frequency response.
    pub raw_response: Vec<FrequencyPoint>,
    /// Response after smoothing and calibration.
    pub response: Vec<FrequencyPoint>,
    /// Energy decay curve in dB.
    pub edc_db: Vec<f64>,
    /// RT60 estimate, when the decay allows one.
    pub rt60: Option<Rt60Result>,
    /// Peaks of [`MeasurementResult::response`].
    pub peaks: Vec<DetectedPeak>,
    /// Cumulative spectral decay.
    pub waterfall: Option<WaterfallData>,
}

impl MeasurementResult {
    fn unavailable(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            impulse: None,
            raw_response: Vec::new(),
            response: Vec::new(),
            edc_db: Vec::new(),
            rt60: None,
            peaks: Vec::new(),
            waterfall: None,
        }
    }
}

/// Analyze a recording of the sweep described by `sweep`.
///
/// # Errors
///
/// Fails only when `sweep` is invalid. A silent recording produces a
/// result with no impulse response and empty downstream outputs.
pub fn analyze_recording(
    recording: &[f64],
    sweep: &SweepParams,
    calibration: Option<&CalibrationData>,
    options: &MeasurementOptions,
) -> Result<MeasurementResult> {
    let inverse = generate_inverse_filter(sweep)?;
    let sample_rate = sweep.sample_rate;

    let max_len = options
        .max_ir_sec
        .map(|secs| (secs.max(0.0) * sample_rate).round() as usize);
    let impulse = extract_impulse_response(recording, &inverse, max_len);
    if impulse.is_silent() || impulse.ir.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::warn!("recording contains no signal; impulse response unavailable");
        return Ok(MeasurementResult::unavailable(sample_rate));
    }

    let raw_response = compute_frequency_response(&impulse.ir, sample_rate, &options.response);
    let smoothed = smooth_frequency_response(&raw_response, options.smoothing_fraction);
    let response = match calibration {
        Some(cal) => apply_calibration(&smoothed, cal).into_owned(),
        None => smoothed.into_owned(),
    };
    let peaks = detect_peaks(&response, &options.peaks);

    let rt60 = estimate_rt60(&impulse.ir, sample_rate, &options.rt60);
    let edc_db = match &rt60 {
        Some(result) => result.edc_db.clone(),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!("insufficient decay range for an RT60 estimate");
            compute_edc(&impulse.ir)
        }
    };

    let waterfall = options
        .waterfall
        .as_ref()
        .map(|w| compute_waterfall(&impulse.ir, sample_rate, w));

    #[cfg(feature = "tracing")]
    tracing::info!(
        peak_index = impulse.peak_index,
        ir_len = impulse.ir.len(),
        rt60 = rt60.as_ref().map(|r| r.rt60),
        peaks = peaks.len(),
        "measurement analyzed"
    );

    Ok(MeasurementResult {
        sample_rate,
        impulse: Some(impulse),
        raw_response,
        response,
        edc_db,
        rt60,
        peaks,
        waterfall,
    })
}
