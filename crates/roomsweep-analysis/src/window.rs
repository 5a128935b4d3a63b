//! Raised-cosine fades and tapers shared by sweep synthesis, IR windowing
//! and the waterfall.

use std::f64::consts::PI;

/// Apply a half-Hann fade-in over the first `len` samples.
///
/// The first sample is weighted 0; weights rise toward 1.
pub fn apply_fade_in(buffer: &mut [f64], len: usize) {
    let len = len.min(buffer.len());
    for (i, sample) in buffer[..len].iter_mut().enumerate() {
        *sample *= 0.5 * (1.0 - (PI * i as f64 / len as f64).cos());
    }
}

/// Apply a half-Hann fade-out over the last `len` samples.
///
/// The last sample is weighted 0. Mirror image of [`apply_fade_in`].
pub fn apply_fade_out(buffer: &mut [f64], len: usize) {
    let n = buffer.len();
    let len = len.min(n);
    for i in 0..len {
        buffer[n - 1 - i] *= 0.5 * (1.0 - (PI * i as f64 / len as f64).cos());
    }
}

/// Leave the first half of `buffer` untouched and taper the second half
/// with a half-Hann window running from 1 toward 0 at the end.
pub fn apply_half_hann_tail(buffer: &mut [f64]) {
    let n = buffer.len();
    let half = n / 2;
    let span = (n - half) as f64;
    for (i, sample) in buffer[half..].iter_mut().enumerate() {
        *sample *= 0.5 * (1.0 + (PI * i as f64 / span).cos());
    }
}
