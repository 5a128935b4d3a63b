//! Error types for input-contract violations.
//!
//! Only malformed input is reported through [`AnalysisError`]. Analytical
//! non-results (no RT60, no peaks, silent input) are expressed as `None` or
//! empty collections by the individual operations.

use thiserror::Error;

/// A violated sweep parameter constraint.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SweepParamError {
    /// Start frequency must be positive.
    #[error("start frequency must be > 0 Hz (got {0})")]
    StartFrequency(f64),

    /// End frequency must be above the start frequency.
    #[error("end frequency {end} Hz must be greater than start frequency {start} Hz")]
    FrequencyOrder {
        /// Start frequency in Hz.
        start: f64,
        /// End frequency in Hz.
        end: f64,
    },

    /// Duration must be finite and positive.
    #[error("duration must be finite and > 0 s (got {0})")]
    Duration(f64),

    /// Sample rate must be finite and positive.
    #[error("sample rate must be finite and > 0 Hz (got {0})")]
    SampleRate(f64),

    /// End frequency exceeds the Nyquist frequency.
    #[error("end frequency {end} Hz exceeds Nyquist frequency {nyquist} Hz")]
    AboveNyquist {
        /// End frequency in Hz.
        end: f64,
        /// Half the sample rate.
        nyquist: f64,
    },

    /// Fade lengths must be finite and non-negative.
    #[error("fade length must be >= 0 s (got {0})")]
    Fade(f64),
}

/// Errors raised when an input violates an operation's contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Transform length is not a power of two.
    #[error("FFT length must be a power of two (got {len})")]
    NotPowerOfTwo {
        /// The offending length.
        len: usize,
    },

    /// Real and imaginary buffers differ in length.
    #[error("real and imaginary buffers differ in length ({re} vs {im})")]
    LengthMismatch {
        /// Length of the real buffer.
        re: usize,
        /// Length of the imaginary buffer.
        im: usize,
    },

    /// Invalid sweep parameters.
    #[error("invalid sweep parameters: {0}")]
    InvalidSweep(#[from] SweepParamError),

    /// A calibration line had fewer than two fields.
    #[error("calibration line {line}: expected 'frequency level', got '{content}'")]
    CalibrationSyntax {
        /// 1-based line number.
        line: usize,
        /// Raw line content.
        content: String,
    },

    /// A calibration frequency was not a finite positive number.
    #[error("calibration line {line}: invalid frequency '{value}'")]
    CalibrationFrequency {
        /// 1-based line number.
        line: usize,
        /// Raw token.
        value: String,
    },

    /// A calibration level was not a finite number.
    #[error("calibration line {line}: invalid dB value '{value}'")]
    CalibrationLevel {
        /// 1-based line number.
        line: usize,
        /// Raw token.
        value: String,
    },

    /// Fewer than two calibration points were found.
    #[error("calibration file needs at least 2 data points (found {found})")]
    CalibrationTooShort {
        /// Number of valid points parsed.
        found: usize,
    },
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
