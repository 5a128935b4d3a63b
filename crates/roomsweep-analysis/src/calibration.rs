//! Microphone calibration files and dB correction
//!
//! Calibration files are plain text with one `frequency level` pair per
//! line, separated by whitespace or commas. Lines starting with `#` or `*`
//! are comments. This is the same layout as FRD response files.

use crate::error::{AnalysisError, Result};
use crate::response::FrequencyPoint;
use std::borrow::Cow;

/// One calibration correction point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    /// Frequency in Hz (> 0).
    pub freq: f64,
    /// Correction in dB.
    pub db: f64,
}

/// A parsed calibration curve, sorted by ascending frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationData {
    /// Source name, for display only.
    pub filename: String,
    /// Correction points, ascending by frequency.
    pub points: Vec<CalibrationPoint>,
}

impl CalibrationData {
    /// Frequency range covered by the curve, if any.
    pub fn frequency_range(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.freq, last.freq)),
            _ => None,
        }
    }
}

/// Parse calibration file text.
///
/// # Errors
///
/// Fails on a data line with fewer than two fields, a frequency that is not
/// a finite positive number, a level that is not finite, or fewer than two
/// valid points overall. Line numbers in errors are 1-based.
///
/// # Example
///
/// ```
/// use roomsweep_analysis::calibration::parse_calibration_file;
///
/// let cal = parse_calibration_file("# mic\n100 -2.5\n1000 0.0\n10000 3.1\n", "mic.txt").unwrap();
/// assert_eq!(cal.points.len(), 3);
/// ```
pub fn parse_calibration_file(text: &str, filename: &str) -> Result<CalibrationData> {
    let mut points = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('*') {
            continue;
        }

        let tokens: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() < 2 {
            return Err(AnalysisError::CalibrationSyntax {
                line: line_no,
                content: line.to_string(),
            });
        }

        let freq = tokens[0]
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f > 0.0)
            .ok_or_else(|| AnalysisError::CalibrationFrequency {
                line: line_no,
                value: tokens[0].to_string(),
            })?;

        let db = tokens[1]
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .ok_or_else(|| AnalysisError::CalibrationLevel {
                line: line_no,
                value: tokens[1].to_string(),
            })?;

        points.push(CalibrationPoint { freq, db });
    }

    if points.len() < 2 {
        return Err(AnalysisError::CalibrationTooShort {
            found: points.len(),
        });
    }

    points.sort_by(|a, b| a.freq.total_cmp(&b.freq));

    #[cfg(feature = "tracing")]
    tracing::debug!(filename, points = points.len(), "parsed calibration file");

    Ok(CalibrationData {
        filename: filename.to_string(),
        points,
    })
}

/// Correction in dB at each target frequency.
///
/// Interpolates linearly in log10-frequency between the bracketing points
/// and holds the boundary values outside the calibrated range. An empty
/// curve yields all-zero corrections.
pub fn interpolate_calibration(calibration: &CalibrationData, target_freqs: &[f64]) -> Vec<f64> {
    let points = &calibration.points;
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return vec![0.0; target_freqs.len()];
    };

    let log_freqs: Vec<f64> = points.iter().map(|p| p.freq.log10()).collect();

    target_freqs
        .iter()
        .map(|&f| {
            if !(f > first.freq) {
                return first.db;
            }
            if f >= last.freq {
                return last.db;
            }

            let lf = f.log10();
            // first index with log_freq > lf; lies in 1..len because of the checks above
            let hi = log_freqs.partition_point(|&x| x <= lf).clamp(1, points.len() - 1);
            let lo = hi - 1;
            let span = log_freqs[hi] - log_freqs[lo];
            if span <= 0.0 {
                return points[lo].db;
            }
            let t = (lf - log_freqs[lo]) / span;
            points[lo].db + t * (points[hi].db - points[lo].db)
        })
        .collect()
}

/// Add the interpolated calibration correction to each point.
///
/// Returns the input borrowed and unchanged when either side is empty.
pub fn apply_calibration<'a>(
    points: &'a [FrequencyPoint],
    calibration: &CalibrationData,
) -> Cow<'a, [FrequencyPoint]> {
    if points.is_empty() || calibration.points.is_empty() {
        return Cow::Borrowed(points);
    }

    let freqs: Vec<f64> = points.iter().map(|p| p.freq).collect();
    let corrections = interpolate_calibration(calibration, &freqs);

    Cow::Owned(
        points
            .iter()
            .zip(corrections)
            .map(|(p, c)| FrequencyPoint::new(p.freq, p.db + c))
            .collect(),
    )
}
