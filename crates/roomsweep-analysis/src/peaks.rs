//! Resonance detection on a frequency response
//!
//! Peaks are strict local maxima scored by topographic prominence: the
//! height of the peak above the higher of the two valleys that separate it
//! from taller terrain on either side.

use crate::response::FrequencyPoint;

/// A labelled frequency band, `[min_hz, max_hz)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakBand {
    /// Display label.
    pub label: String,
    /// Lower edge in Hz (inclusive).
    pub min_hz: f64,
    /// Upper edge in Hz (exclusive).
    pub max_hz: f64,
}

impl PeakBand {
    /// Create a band.
    pub fn new(label: impl Into<String>, min_hz: f64, max_hz: f64) -> Self {
        Self {
            label: label.into(),
            min_hz,
            max_hz,
        }
    }

    /// Whether `freq` falls inside the band.
    pub fn contains(&self, freq: f64) -> bool {
        freq >= self.min_hz && freq < self.max_hz
    }
}

/// Default classification bands: room modes and mid/high.
pub fn default_bands() -> Vec<PeakBand> {
    vec![
        PeakBand::new("Room modes", 20.0, 300.0),
        PeakBand::new("Mid/High", 300.0, 15000.0),
    ]
}

/// Options for [`detect_peaks`].
#[derive(Debug, Clone, PartialEq)]
pub struct PeakOptions {
    /// Minimum prominence in dB.
    pub min_prominence: f64,
    /// Maximum number of peaks returned.
    pub max_peaks: usize,
    /// Bands checked in order; the first match labels the peak.
    pub bands: Vec<PeakBand>,
}

impl Default for PeakOptions {
    fn default() -> Self {
        Self {
            min_prominence: 3.0,
            max_peaks: 10,
            bands: default_bands(),
        }
    }
}

/// A detected resonance.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPeak {
    /// Peak frequency in Hz.
    pub freq: f64,
    /// Peak level in dB.
    pub db: f64,
    /// Prominence in dB.
    pub prominence: f64,
    /// Index into the source response.
    pub index: usize,
    /// Label of the first matching band, if any.
    pub band: Option<String>,
}

/// Find prominent peaks in a frequency response.
///
/// Returns peaks sorted by descending prominence, at most
/// `options.max_peaks` of them. Fewer than three points yields no peaks.
pub fn detect_peaks(points: &[FrequencyPoint], options: &PeakOptions) -> Vec<DetectedPeak> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut peaks: Vec<DetectedPeak> = (1..points.len() - 1)
        .filter(|&i| points[i].db > points[i - 1].db && points[i].db > points[i + 1].db)
        .filter_map(|i| {
            let prominence = prominence(points, i);
            if prominence < options.min_prominence {
                return None;
            }
            let freq = points[i].freq;
            Some(DetectedPeak {
                freq,
                db: points[i].db,
                prominence,
                index: i,
                band: options
                    .bands
                    .iter()
                    .find(|b| b.contains(freq))
                    .map(|b| b.label.clone()),
            })
        })
        .collect();

    peaks.sort_by(|a, b| b.prominence.total_cmp(&a.prominence));
    peaks.truncate(options.max_peaks);

    #[cfg(feature = "tracing")]
    tracing::debug!(count = peaks.len(), "detected peaks");

    peaks
}

fn prominence(points: &[FrequencyPoint], i: usize) -> f64 {
    let peak = points[i].db;

    let mut left_valley = peak;
    for p in points[..i].iter().rev() {
        if p.db > peak {
            break;
        }
        left_valley = left_valley.min(p.db);
    }

    let mut right_valley = peak;
    for p in &points[i + 1..] {
        if p.db > peak {
            break;
        }
        right_valley = right_valley.min(p.db);
    }

    peak - left_valley.max(right_valley)
}
