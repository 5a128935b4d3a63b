//! File I/O for roomsweep measurements.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for recordings, sweeps and impulse responses
//! - **Calibration files**: [`read_calibration`] loads a microphone correction file from disk
//! - **Result export**: CSV, FRD and JSON writers in [`export`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roomsweep_io::{read_wav, export};
//! use roomsweep_analysis::{SweepParams, MeasurementOptions, analyze_recording};
//!
//! let (recording, spec) = read_wav("recording.wav")?;
//! let params = SweepParams::new(20.0, 20000.0, 5.0, f64::from(spec.sample_rate));
//! let result = analyze_recording(&recording, &params, None, &MeasurementOptions::default())?;
//!
//! export::export_response_csv("response.csv", &result.response)?;
//! ```

mod calibration;
pub mod export;
mod wav;

pub use calibration::read_calibration;
pub use export::{
    MeasurementSummary, export_edc_csv, export_response_csv, export_response_frd,
    export_summary_json, export_waterfall_csv,
};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for measurement file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// A calibration file was read but could not be parsed.
    #[error("Calibration file error: {0}")]
    Analysis(#[from] roomsweep_analysis::AnalysisError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for measurement file I/O.
pub type Result<T> = std::result::Result<T, Error>;
