//! Roomsweep Analysis - Room acoustic measurement DSP
//!
//! This crate turns a recording of a logarithmic sine sweep into the usual
//! room measurement products:
//!
//! - [`fft`] - Radix-2 FFT on split real/imaginary buffers
//! - [`sweep`] - Log sweep synthesis and its matched inverse filter
//! - [`convolution`] - FFT-based linear convolution
//! - [`ir`] - Impulse response extraction by deconvolution
//! - [`response`] - Windowed, log-frequency magnitude response
//! - [`smoothing`] - Fractional-octave smoothing
//! - [`calibration`] - Microphone calibration files and correction
//! - [`rt60`] - Schroeder energy decay and reverberation time
//! - [`peaks`] - Prominence-based resonance detection
//! - [`waterfall`] - Cumulative spectral decay
//! - [`pipeline`] - All of the above, wired together
//!
//! Every operation is a pure function over borrowed input buffers returning
//! newly allocated results, so stages can be scheduled concurrently by the
//! caller without synchronization.
//!
//! ## Errors
//!
//! Malformed input (invalid sweep parameters, non-power-of-two transform
//! lengths, broken calibration files) is reported as [`AnalysisError`].
//! Analyses that simply find nothing, such as an RT60 on an anechoic
//! recording or peaks on a flat response, return `None` or an empty `Vec`.
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use roomsweep_analysis::{SweepParams, MeasurementOptions, analyze_recording, generate_log_sweep};
//!
//! // 1. Generate the excitation
//! let params = SweepParams::new(20.0, 20000.0, 5.0, 48000.0);
//! let sweep = generate_log_sweep(&params)?;
//!
//! // 2. Play it and record the room (external)
//!
//! // 3. Analyze
//! let result = analyze_recording(&recording, &params, None, &MeasurementOptions::default())?;
//! if let Some(rt60) = &result.rt60 {
//!     println!("RT60: {:.2} s", rt60.rt60);
//! }
//! ```

pub mod calibration;
pub mod convolution;
pub mod error;
pub mod fft;
pub mod ir;
pub mod peaks;
pub mod pipeline;
pub mod response;
pub mod rt60;
pub mod simulate;
pub mod smoothing;
pub mod sweep;
pub mod waterfall;
pub mod window;

// Re-export main types
pub use calibration::{
    CalibrationData, CalibrationPoint, apply_calibration, interpolate_calibration,
    parse_calibration_file,
};
pub use convolution::convolve;
pub use error::{AnalysisError, Result, SweepParamError};
pub use fft::{ComplexBuffer, fft, ifft, next_power_of_two, real_to_complex};
pub use ir::{ImpulseResponse, extract_impulse_response};
pub use peaks::{DetectedPeak, PeakBand, PeakOptions, default_bands, detect_peaks};
pub use pipeline::{MeasurementOptions, MeasurementResult, analyze_recording};
pub use response::{
    DB_FLOOR, FrequencyPoint, ResponseOptions, compute_frequency_response,
    compute_magnitude_response, log_spaced_frequencies, window_ir,
};
pub use rt60::{DecayFit, Rt60Options, Rt60Result, compute_edc, estimate_rt60, fit_decay_range};
pub use simulate::{simulate_recording, simulate_room_ir};
pub use smoothing::smooth_frequency_response;
pub use sweep::{
    SweepParams, estimate_instantaneous_frequency, generate_inverse_filter, generate_log_sweep,
};
pub use waterfall::{WaterfallData, WaterfallOptions, WaterfallSlice, compute_waterfall};
