//! Fractional-octave smoothing of a frequency response.

use crate::response::FrequencyPoint;
use std::borrow::Cow;

/// Average each point's dB over all points within `±fraction/2` octaves.
///
/// Relies on `points` being sorted by ascending frequency: the averaging
/// window grows outward from each center index with a linear scan and stops
/// at the first point outside the band. Frequencies are preserved exactly.
///
/// A missing or non-positive `fraction_of_octave`, or an empty input,
/// returns the input borrowed and unchanged.
///
/// # Example
///
/// ```
/// use roomsweep_analysis::response::FrequencyPoint;
/// use roomsweep_analysis::smoothing::smooth_frequency_response;
/// use std::borrow::Cow;
///
/// let points = vec![FrequencyPoint::new(100.0, 0.0), FrequencyPoint::new(200.0, 6.0)];
/// assert!(matches!(smooth_frequency_response(&points, None), Cow::Borrowed(_)));
/// ```
pub fn smooth_frequency_response(
    points: &[FrequencyPoint],
    fraction_of_octave: Option<f64>,
) -> Cow<'_, [FrequencyPoint]> {
    let fraction = match fraction_of_octave {
        Some(f) if f > 0.0 && !points.is_empty() => f,
        _ => return Cow::Borrowed(points),
    };

    let half_width = fraction / 2.0;
    let log_freqs: Vec<f64> = points.iter().map(|p| p.freq.log2()).collect();
    let n = points.len();

    let smoothed = (0..n)
        .map(|i| {
            let center = log_freqs[i];

            let mut lo = i;
            while lo > 0 && center - log_freqs[lo - 1] <= half_width {
                lo -= 1;
            }
            let mut hi = i;
            while hi + 1 < n && log_freqs[hi + 1] - center <= half_width {
                hi += 1;
            }

            let sum: f64 = points[lo..=hi].iter().map(|p| p.db).sum();
            FrequencyPoint::new(points[i].freq, sum / (hi - lo + 1) as f64)
        })
        .collect();

    Cow::Owned(smoothed)
}
