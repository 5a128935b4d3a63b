//! Measurement profiles for roomsweep.
//!
//! A profile is a TOML document holding everything needed to repeat a
//! measurement: the sweep to play and the options for analyzing the
//! recording.
//!
//! # Features
//!
//! - **Profiles**: Load and save [`MeasurementProfile`] TOML files
//! - **Validation**: Range checks over every section, reported together
//! - **Paths**: Platform-specific profile directory
//! - **Factory Profiles**: Built-in `default`, `quick` and `room-modes`
//!
//! # Example
//!
//! ```rust,no_run
//! use roomsweep_config::{MeasurementProfile, user_profiles_dir};
//!
//! // Start from a factory profile and tweak it
//! let mut profile = MeasurementProfile::resolve("quick").unwrap();
//! profile.name = "Studio".to_string();
//! profile.smoothing.fraction_of_octave = Some(1.0 / 12.0);
//!
//! // Save to the user profiles directory
//! profile.save(user_profiles_dir().join("studio.toml")).unwrap();
//!
//! // Convert to analysis inputs
//! let (sweep, options) = profile.into_options().unwrap();
//! ```

mod error;
mod profile;

/// Platform-specific paths for profiles.
pub mod paths;

/// Profile validation.
pub mod validation;

/// Factory profiles bundled with the library.
pub mod factory_profiles;

pub use error::ConfigError;
pub use factory_profiles::{
    FACTORY_PROFILE_NAMES, factory_profile_names, factory_profiles, get_factory_profile,
    is_factory_profile,
};
pub use paths::{
    ensure_user_profiles_dir, find_profile, list_user_profiles, profile_name_from_path,
    user_config_dir, user_profiles_dir,
};
pub use profile::{
    BandSection, CaptureSection, MeasurementProfile, PeaksSection, ResponseSection,
    Rt60Section, SmoothingSection, SweepSection, WaterfallSection,
};
pub use validation::{ValidationError, ValidationResult, validate_profile};
