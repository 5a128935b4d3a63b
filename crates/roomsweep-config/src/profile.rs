//! Measurement profile file format and operations.

use roomsweep_analysis::{
    MeasurementOptions, PeakBand, PeakOptions, ResponseOptions, Rt60Options, SweepParams,
    WaterfallOptions, default_bands,
    sweep::{DEFAULT_FADE_IN_SEC, DEFAULT_FADE_OUT_SEC},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::factory_profiles::get_factory_profile;
use crate::paths::find_profile;
use crate::validation::validate_profile;

/// A complete measurement setup: the sweep to play and how to analyze
/// the recording.
///
/// Every section and field is optional in the file and falls back to the
/// analysis defaults.
///
/// # TOML Format
///
/// ```toml
/// name = "Living room"
/// description = "Listening position, mic at ear height"
///
/// [sweep]
/// f_start = 20.0
/// f_end = 20000.0
/// duration_sec = 5.0
/// sample_rate = 48000
///
/// [smoothing]
/// fraction_of_octave = 0.1666667
///
/// [[peaks.bands]]
/// label = "Room modes"
/// min_hz = 20.0
/// max_hz = 300.0
///
/// [capture]
/// max_ir_sec = 2.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementProfile {
    /// Name of the profile.
    pub name: String,

    /// Optional description of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Excitation sweep.
    #[serde(default)]
    pub sweep: SweepSection,

    /// Frequency response computation.
    #[serde(default)]
    pub response: ResponseSection,

    /// Fractional-octave smoothing.
    #[serde(default)]
    pub smoothing: SmoothingSection,

    /// Peak detection.
    #[serde(default)]
    pub peaks: PeaksSection,

    /// Reverberation time.
    #[serde(default)]
    pub rt60: Rt60Section,

    /// Cumulative spectral decay.
    #[serde(default)]
    pub waterfall: WaterfallSection,

    /// Impulse response capture.
    #[serde(default)]
    pub capture: CaptureSection,
}

/// `[sweep]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepSection {
    /// Start frequency in Hz.
    pub f_start: f64,
    /// End frequency in Hz.
    pub f_end: f64,
    /// Sweep length in seconds.
    pub duration_sec: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Fade-in length in seconds.
    pub fade_in_sec: f64,
    /// Fade-out length in seconds.
    pub fade_out_sec: f64,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            f_start: 20.0,
            f_end: 20000.0,
            duration_sec: 5.0,
            sample_rate: 48000,
            fade_in_sec: DEFAULT_FADE_IN_SEC,
            fade_out_sec: DEFAULT_FADE_OUT_SEC,
        }
    }
}

/// `[response]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResponseSection {
    /// Lowest frequency in Hz.
    pub f_min: f64,
    /// Highest frequency in Hz.
    pub f_max: f64,
    /// Number of log-spaced points.
    pub num_points: usize,
    /// IR window in seconds; omit to analyze the whole IR.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_sec: Option<f64>,
    /// Fraction of the window faded out.
    pub fade_out_ratio: f64,
}

impl Default for ResponseSection {
    fn default() -> Self {
        let d = ResponseOptions::default();
        Self {
            f_min: d.f_min,
            f_max: d.f_max,
            num_points: d.num_points,
            window_sec: d.window_sec,
            fade_out_ratio: d.fade_out_ratio,
        }
    }
}

/// `[smoothing]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingSection {
    /// Smoothing width in octaves (1/3 = 0.333...); omit for none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction_of_octave: Option<f64>,
}

/// One `[[peaks.bands]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandSection {
    /// Label shown next to peaks in the band.
    pub label: String,
    /// Inclusive lower edge in Hz.
    pub min_hz: f64,
    /// Exclusive upper edge in Hz.
    pub max_hz: f64,
}

impl From<&BandSection> for PeakBand {
    fn from(b: &BandSection) -> Self {
        PeakBand::new(b.label.clone(), b.min_hz, b.max_hz)
    }
}

/// `[peaks]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PeaksSection {
    /// Minimum prominence in dB.
    pub min_prominence: f64,
    /// Maximum number of peaks reported.
    pub max_peaks: usize,
    /// Labelled frequency bands.
    pub bands: Vec<BandSection>,
}

impl Default for PeaksSection {
    fn default() -> Self {
        let d = PeakOptions::default();
        Self {
            min_prominence: d.min_prominence,
            max_peaks: d.max_peaks,
            bands: default_bands()
                .into_iter()
                .map(|b| BandSection {
                    label: b.label,
                    min_hz: b.min_hz,
                    max_hz: b.max_hz,
                })
                .collect(),
        }
    }
}

/// `[rt60]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Rt60Section {
    /// Estimates above this many seconds are discarded.
    pub max_rt60_sec: f64,
}

impl Default for Rt60Section {
    fn default() -> Self {
        Self {
            max_rt60_sec: Rt60Options::default().max_rt60_sec,
        }
    }
}

/// `[waterfall]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WaterfallSection {
    /// Compute the waterfall at all.
    pub enabled: bool,
    /// Number of time slices.
    pub num_slices: usize,
    /// Time span covered, in seconds.
    pub window_sec: f64,
    /// Frequencies per slice.
    pub num_freq_points: usize,
    /// Lowest frequency in Hz.
    pub f_min: f64,
    /// Highest frequency in Hz.
    pub f_max: f64,
}

impl Default for WaterfallSection {
    fn default() -> Self {
        let d = WaterfallOptions::default();
        Self {
            enabled: true,
            num_slices: d.num_slices,
            window_sec: d.window_sec,
            num_freq_points: d.num_freq_points,
            f_min: d.f_min,
            f_max: d.f_max,
        }
    }
}

/// `[capture]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureSection {
    /// Cap on the extracted impulse response length in seconds.
    ///
    /// Missing keys fall back to the 3 s analysis default. TOML has no null,
    /// so a profile always caps; `None` is only reachable from code and is
    /// not written out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ir_sec: Option<f64>,
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            max_ir_sec: MeasurementOptions::default().max_ir_sec,
        }
    }
}

impl MeasurementProfile {
    /// Create a profile with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sweep: SweepSection::default(),
            response: ResponseSection::default(),
            smoothing: SmoothingSection::default(),
            peaks: PeaksSection::default(),
            rt60: Rt60Section::default(),
            waterfall: WaterfallSection::default(),
            capture: CaptureSection::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let profile = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %profile.name, "loaded profile");
        Ok(profile)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Resolve a profile by file path, user profile name, or factory name,
    /// in that order.
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        if let Some(path) = find_profile(name) {
            return Self::load(path);
        }
        get_factory_profile(name).ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Save the profile to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved profile");
        Ok(())
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field; see [`validate_profile`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_profile(self)?;
        Ok(())
    }

    /// Sweep parameters described by the `[sweep]` section.
    pub fn sweep_params(&self) -> SweepParams {
        let s = &self.sweep;
        SweepParams::new(s.f_start, s.f_end, s.duration_sec, f64::from(s.sample_rate))
            .with_fades(s.fade_in_sec, s.fade_out_sec)
    }

    /// Analysis options described by the remaining sections.
    pub fn measurement_options(&self) -> MeasurementOptions {
        let r = &self.response;
        let w = &self.waterfall;
        MeasurementOptions {
            response: ResponseOptions {
                f_min: r.f_min,
                f_max: r.f_max,
                num_points: r.num_points,
                window_sec: r.window_sec,
                fade_out_ratio: r.fade_out_ratio,
            },
            smoothing_fraction: self.smoothing.fraction_of_octave,
            peaks: PeakOptions {
                min_prominence: self.peaks.min_prominence,
                max_peaks: self.peaks.max_peaks,
                bands: self.peaks.bands.iter().map(PeakBand::from).collect(),
            },
            rt60: Rt60Options {
                max_rt60_sec: self.rt60.max_rt60_sec,
                ..Rt60Options::default()
            },
            waterfall: w.enabled.then(|| WaterfallOptions {
                num_slices: w.num_slices,
                window_sec: w.window_sec,
                num_freq_points: w.num_freq_points,
                f_min: w.f_min,
                f_max: w.f_max,
            }),
            max_ir_sec: self.capture.max_ir_sec,
        }
    }

    /// Validate, then split into sweep parameters and analysis options.
    pub fn into_options(self) -> Result<(SweepParams, MeasurementOptions), ConfigError> {
        self.validate()?;
        Ok((self.sweep_params(), self.measurement_options()))
    }
}

impl Default for MeasurementProfile {
    fn default() -> Self {
        Self::new("Default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_analysis_defaults() {
        let profile = MeasurementProfile::default();
        assert_eq!(profile.measurement_options(), MeasurementOptions::default());

        let sweep = profile.sweep_params();
        assert_eq!(sweep, SweepParams::new(20.0, 20000.0, 5.0, 48000.0));
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let profile = MeasurementProfile::from_toml("name = \"Bare\"").unwrap();
        assert_eq!(profile.name, "Bare");
        assert_eq!(profile.sweep, SweepSection::default());
        assert_eq!(profile.peaks.bands.len(), 2);
        assert_eq!(profile.capture.max_ir_sec, Some(3.0));
    }

    #[test]
    fn test_partial_section() {
        let toml = r#"
name = "Partial"

[sweep]
duration_sec = 2.0
sample_rate = 44100

[smoothing]
fraction_of_octave = 0.3333333333333333

[waterfall]
enabled = false
"#;
        let profile = MeasurementProfile::from_toml(toml).unwrap();
        assert_eq!(profile.sweep.duration_sec, 2.0);
        assert_eq!(profile.sweep.f_start, 20.0);

        let (sweep, options) = profile.into_options().unwrap();
        assert_eq!(sweep.sample_rate, 44100.0);
        assert_eq!(sweep.num_samples(), 88200);
        assert!((options.smoothing_fraction.unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!(options.waterfall.is_none());
    }

    #[test]
    fn test_custom_bands() {
        let toml = r#"
name = "Bands"

[peaks]
max_peaks = 3

[[peaks.bands]]
label = "Bass"
min_hz = 20.0
max_hz = 120.0
"#;
        let options = MeasurementProfile::from_toml(toml).unwrap().measurement_options();
        assert_eq!(options.peaks.max_peaks, 3);
        assert_eq!(options.peaks.bands, vec![PeakBand::new("Bass", 20.0, 120.0)]);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut profile = MeasurementProfile::new("Roundtrip").with_description("test");
        profile.smoothing.fraction_of_octave = Some(1.0 / 12.0);
        profile.response.window_sec = None;
        profile.capture.max_ir_sec = None;

        let toml = profile.to_toml().unwrap();
        let back = MeasurementProfile::from_toml(&toml).unwrap();
        assert_eq!(back.smoothing.fraction_of_octave, Some(1.0 / 12.0));
        assert_eq!(back.response.window_sec, Some(0.5));
        assert_eq!(back.capture.max_ir_sec, Some(3.0));
        assert_eq!(back.name, "Roundtrip");
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("room.toml");

        let mut profile = MeasurementProfile::new("Room");
        profile.sweep.duration_sec = 3.0;
        profile.save(&path).unwrap();

        let loaded = MeasurementProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MeasurementProfile::load("/nonexistent/profile.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = MeasurementProfile::from_toml("name = ").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_into_options_validates() {
        let mut profile = MeasurementProfile::default();
        profile.sweep.duration_sec = -1.0;
        let err = profile.into_options().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_resolve_factory_and_path() {
        let quick = MeasurementProfile::resolve("quick").unwrap();
        assert_eq!(quick.sweep.duration_sec, 1.0);

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mine.toml");
        MeasurementProfile::new("Mine").save(&path).unwrap();
        let mine = MeasurementProfile::resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(mine.name, "Mine");

        assert!(matches!(
            MeasurementProfile::resolve("no-such-profile-12345"),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }
}
