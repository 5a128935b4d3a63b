//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use roomsweep_config::{ConfigError, MeasurementProfile, get_factory_profile};
use roomsweep_io::WavSpec;

/// Load a profile by path, user profile name, or factory name.
///
/// Without a name, the `default` factory profile is used.
pub fn load_profile(name: Option<&str>) -> anyhow::Result<MeasurementProfile> {
    let Some(name) = name else {
        return get_factory_profile("default").context("factory profile 'default' is missing");
    };

    match MeasurementProfile::resolve(name) {
        Ok(profile) => Ok(profile),
        Err(ConfigError::ProfileNotFound(_)) => anyhow::bail!(
            "Profile '{}' not found. Use 'roomsweep profile list' to see available profiles.",
            name
        ),
        Err(e) => Err(e).with_context(|| format!("loading profile '{name}'")),
    }
}

/// Mono float WAV spec at the profile's sample rate.
pub fn wav_spec(profile: &MeasurementProfile) -> WavSpec {
    WavSpec::mono(profile.sweep.sample_rate)
}

/// Parse a smoothing width: `none`, `1/N`, or a decimal fraction of an octave.
///
/// `none` (or `off`) maps to 0, which disables smoothing.
pub fn parse_fraction(s: &str) -> Result<f64, String> {
    let value = match s.trim().to_ascii_lowercase().as_str() {
        "none" | "off" => return Ok(0.0),
        t => match t.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.trim().parse().map_err(|_| format!("invalid numerator in '{s}'"))?;
                let den: f64 = den.trim().parse().map_err(|_| format!("invalid denominator in '{s}'"))?;
                num / den
            }
            None => t.parse().map_err(|_| format!("invalid fraction '{s}'"))?,
        },
    };

    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("smoothing fraction must be a finite value >= 0 (got '{s}')"))
    }
}

/// Scale a buffer so its absolute peak equals `target`; silent buffers are left alone.
pub fn normalize_peak(samples: &mut [f64], target: f64) {
    let peak = samples.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if peak > 0.0 {
        let gain = target / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("none"), Ok(0.0));
        assert_eq!(parse_fraction("OFF"), Ok(0.0));
        assert!((parse_fraction("1/3").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(parse_fraction("0.5"), Ok(0.5));
        assert!(parse_fraction("1/0").is_err());
        assert!(parse_fraction("-1").is_err());
        assert!(parse_fraction("third").is_err());
    }

    #[test]
    fn test_load_default_profile() {
        let profile = load_profile(None).unwrap();
        assert_eq!(profile.name, "Default");
        assert!(load_profile(Some("no-such-profile-xyz")).is_err());
    }

    #[test]
    fn test_normalize_peak() {
        let mut buf = vec![0.5, -2.0, 1.0];
        normalize_peak(&mut buf, 0.9);
        assert!((buf[1] + 0.9).abs() < 1e-12);

        let mut silent = vec![0.0; 4];
        normalize_peak(&mut silent, 0.9);
        assert!(silent.iter().all(|&x| x == 0.0));
    }
}
