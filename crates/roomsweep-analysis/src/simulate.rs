//! Synthetic rooms for exercising the measurement chain without hardware.

use crate::convolution::convolve;

/// Exponentially decaying noise tail behind a unit direct-path impulse.
///
/// The envelope falls by 60 dB over `rt60_sec`. Noise comes from a
/// xorshift generator, so equal seeds give equal rooms.
///
/// # Arguments
/// * `sample_rate` - Sample rate in Hz
/// * `rt60_sec` - Reverberation time in seconds
/// * `length_sec` - IR length in seconds
/// * `seed` - Noise seed (0 is remapped to a fixed non-zero value)
pub fn simulate_room_ir(sample_rate: f64, rt60_sec: f64, length_sec: f64, seed: u32) -> Vec<f64> {
    let n = (length_sec * sample_rate).max(0.0) as usize;
    if n == 0 {
        return Vec::new();
    }

    let mut state = if seed == 0 { 0x1234_5678 } else { seed };
    let decay = if rt60_sec > 0.0 { 1000f64.ln() / rt60_sec } else { f64::INFINITY };

    let mut ir: Vec<f64> = (0..n)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = f64::from(state as i32) / f64::from(i32::MAX);
            0.3 * noise * (-decay * i as f64 / sample_rate).exp()
        })
        .collect();
    ir[0] = 1.0;
    ir
}

/// Simulate recording `excitation` through a system with impulse response
/// `ir`, preceded by `delay_samples` of silence.
pub fn simulate_recording(excitation: &[f64], ir: &[f64], delay_samples: usize) -> Vec<f64> {
    let mut delayed = vec![0.0; delay_samples];
    delayed.extend_from_slice(excitation);
    convolve(&delayed, ir)
}
