//! Measurement profile validation.
//!
//! TOML accepts any number, so a profile can parse cleanly and still ask
//! for a negative sweep or an empty frequency range. [`validate_profile`]
//! checks every section and reports all problems at once.
//!
//! # Example
//!
//! ```rust
//! use roomsweep_config::{MeasurementProfile, validate_profile};
//!
//! let mut profile = MeasurementProfile::new("broken");
//! profile.response.num_points = 0;
//! assert!(validate_profile(&profile).is_err());
//! ```

use roomsweep_analysis::SweepParamError;
use thiserror::Error;

use crate::profile::MeasurementProfile;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Sweep parameters rejected by the sweep generator.
    #[error("sweep: {0}")]
    Sweep(#[from] SweepParamError),

    /// A numeric field outside its valid range.
    #[error("{field} = {value}: {reason}")]
    OutOfRange {
        /// Dotted path of the field, e.g. `response.f_min`.
        field: String,
        /// The offending value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// A peak band with an empty or negative range.
    #[error("peak band '{label}': {reason}")]
    InvalidBand {
        /// Band label.
        label: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Default)]
struct Collector(Vec<ValidationError>);

impl Collector {
    fn check(&mut self, ok: bool, field: &str, value: f64, reason: &'static str) {
        if !ok {
            self.0.push(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                reason,
            });
        }
    }

    fn positive(&mut self, field: &str, value: f64) {
        self.check(value > 0.0 && value.is_finite(), field, value, "must be > 0");
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.0.len() {
            0 => Ok(()),
            1 => Err(self.0.remove(0)),
            _ => Err(ValidationError::Multiple(self.0)),
        }
    }
}

/// Check every section of a profile.
///
/// Returns the single error when exactly one check fails, or
/// [`ValidationError::Multiple`] listing all of them.
pub fn validate_profile(profile: &MeasurementProfile) -> ValidationResult<()> {
    let mut c = Collector::default();

    if let Err(e) = profile.sweep_params().validate() {
        c.0.push(ValidationError::Sweep(e));
    }

    let r = &profile.response;
    c.positive("response.f_min", r.f_min);
    c.check(r.f_max > r.f_min, "response.f_max", r.f_max, "must be greater than response.f_min");
    c.check(r.num_points >= 2, "response.num_points", r.num_points as f64, "must be at least 2");
    if let Some(w) = r.window_sec {
        c.positive("response.window_sec", w);
    }
    c.check(
        (0.0..=1.0).contains(&r.fade_out_ratio),
        "response.fade_out_ratio",
        r.fade_out_ratio,
        "must be within [0, 1]",
    );

    if let Some(fraction) = profile.smoothing.fraction_of_octave {
        c.positive("smoothing.fraction_of_octave", fraction);
    }

    let p = &profile.peaks;
    c.check(
        p.min_prominence >= 0.0,
        "peaks.min_prominence",
        p.min_prominence,
        "must be >= 0",
    );
    for band in &p.bands {
        if !(band.min_hz >= 0.0) {
            c.0.push(ValidationError::InvalidBand {
                label: band.label.clone(),
                reason: "min_hz must be >= 0",
            });
        } else if !(band.max_hz > band.min_hz) {
            c.0.push(ValidationError::InvalidBand {
                label: band.label.clone(),
                reason: "max_hz must be greater than min_hz",
            });
        }
    }

    c.positive("rt60.max_rt60_sec", profile.rt60.max_rt60_sec);

    let w = &profile.waterfall;
    if w.enabled {
        c.check(w.num_slices >= 1, "waterfall.num_slices", w.num_slices as f64, "must be at least 1");
        c.positive("waterfall.window_sec", w.window_sec);
        c.check(
            w.num_freq_points >= 2,
            "waterfall.num_freq_points",
            w.num_freq_points as f64,
            "must be at least 2",
        );
        c.positive("waterfall.f_min", w.f_min);
        c.check(w.f_max > w.f_min, "waterfall.f_max", w.f_max, "must be greater than waterfall.f_min");
    }

    if let Some(max_ir) = profile.capture.max_ir_sec {
        c.positive("capture.max_ir_sec", max_ir);
    }

    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::BandSection;

    #[test]
    fn test_default_profile_is_valid() {
        assert_eq!(validate_profile(&MeasurementProfile::default()), Ok(()));
    }

    #[test]
    fn test_single_error_is_unwrapped() {
        let mut profile = MeasurementProfile::default();
        profile.rt60.max_rt60_sec = 0.0;

        let err = validate_profile(&profile).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "rt60.max_rt60_sec"));
    }

    #[test]
    fn test_sweep_error_passes_through() {
        let mut profile = MeasurementProfile::default();
        profile.sweep.f_end = 30000.0;

        let err = validate_profile(&profile).unwrap_err();
        assert!(matches!(err, ValidationError::Sweep(SweepParamError::AboveNyquist { .. })));
        assert!(err.to_string().contains("Nyquist"));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut profile = MeasurementProfile::default();
        profile.response.num_points = 1;
        profile.smoothing.fraction_of_octave = Some(-1.0);
        profile.peaks.bands.push(BandSection {
            label: "Backwards".into(),
            min_hz: 500.0,
            max_hz: 100.0,
        });

        match validate_profile(&profile).unwrap_err() {
            ValidationError::Multiple(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidBand { .. })));
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let mut profile = MeasurementProfile::default();
        profile.waterfall.window_sec = f64::NAN;
        assert!(validate_profile(&profile).is_err());
    }

    #[test]
    fn test_disabled_waterfall_not_checked() {
        let mut profile = MeasurementProfile::default();
        profile.waterfall.enabled = false;
        profile.waterfall.num_slices = 0;
        assert!(validate_profile(&profile).is_ok());
    }
}
