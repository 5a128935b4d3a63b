//! Factory measurement profiles bundled with roomsweep.
//!
//! These are always available without external files and serve as
//! starting points for `roomsweep profile init`.

use crate::MeasurementProfile;

/// Array of factory profile names for external access.
pub static FACTORY_PROFILE_NAMES: &[&str] = &["default", "quick", "room-modes"];

/// TOML content for factory profiles, embedded at compile time.
static FACTORY_PROFILES_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PROFILE),
    ("quick", QUICK_PROFILE),
    ("room-modes", ROOM_MODES_PROFILE),
];

/// Full-range measurement with a long sweep for good signal-to-noise.
const DEFAULT_PROFILE: &str = r#"
name = "Default"
description = "Full-range 20 Hz - 20 kHz, 5 s sweep at 48 kHz"

[sweep]
f_start = 20.0
f_end = 20000.0
duration_sec = 5.0
sample_rate = 48000
"#;

/// Short sweep for quick checks; noisier but fast.
const QUICK_PROFILE: &str = r#"
name = "Quick"
description = "1 s sweep for fast checks, 1/3-octave smoothing"

[sweep]
f_start = 20.0
f_end = 20000.0
duration_sec = 1.0
sample_rate = 48000

[smoothing]
fraction_of_octave = 0.3333333333333333

[waterfall]
num_slices = 20
"#;

/// Low-frequency focus for locating and sizing room modes.
const ROOM_MODES_PROFILE: &str = r#"
name = "Room Modes"
description = "20-500 Hz, 1/6-octave smoothing, long decay window"

[sweep]
f_start = 10.0
f_end = 1000.0
duration_sec = 8.0
sample_rate = 48000

[response]
f_min = 20.0
f_max = 500.0
num_points = 400
window_sec = 1.0

[smoothing]
fraction_of_octave = 0.16666666666666666

[peaks]
min_prominence = 2.0
max_peaks = 12

[[peaks.bands]]
label = "Axial modes"
min_hz = 20.0
max_hz = 120.0

[[peaks.bands]]
label = "Upper bass"
min_hz = 120.0
max_hz = 500.0

[waterfall]
window_sec = 0.6
f_min = 20.0
f_max = 500.0

[capture]
max_ir_sec = 4.0
"#;

/// Get all factory profiles.
pub fn factory_profiles() -> Vec<MeasurementProfile> {
    FACTORY_PROFILES_TOML
        .iter()
        .filter_map(|(_, toml)| MeasurementProfile::from_toml(toml).ok())
        .collect()
}

/// Get a factory profile by name.
///
/// Matches the internal identifier or the display name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use roomsweep_config::get_factory_profile;
///
/// let profile = get_factory_profile("room-modes").unwrap();
/// assert_eq!(profile.response.f_max, 500.0);
/// ```
pub fn get_factory_profile(name: &str) -> Option<MeasurementProfile> {
    let name_lower = name.to_lowercase();
    FACTORY_PROFILES_TOML
        .iter()
        .filter_map(|(id, toml)| Some((*id, MeasurementProfile::from_toml(toml).ok()?)))
        .find(|(id, profile)| *id == name_lower || profile.name.to_lowercase() == name_lower)
        .map(|(_, profile)| profile)
}

/// Get the names of all factory profiles.
pub fn factory_profile_names() -> Vec<&'static str> {
    FACTORY_PROFILES_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory profile (case-insensitive).
pub fn is_factory_profile(name: &str) -> bool {
    get_factory_profile(name).is_some()
}
