//! Radix-2 FFT on split real/imaginary buffers.
//!
//! The transform runs in place on caller-owned scratch buffers. Every other
//! module goes through [`ComplexBuffer`], which owns its storage, so no
//! transform buffer is ever shared across pipeline stages.

use crate::error::{AnalysisError, Result};
use std::f64::consts::PI;

/// Smallest power of two `>= n`. Returns 1 for `n <= 1`.
pub fn next_power_of_two(n: usize) -> usize {
    if n <= 1 { 1 } else { n.next_power_of_two() }
}

fn check_buffers(re: &[f64], im: &[f64]) -> Result<()> {
    if re.len() != im.len() {
        return Err(AnalysisError::LengthMismatch {
            re: re.len(),
            im: im.len(),
        });
    }
    let n = re.len();
    if n > 1 && !n.is_power_of_two() {
        return Err(AnalysisError::NotPowerOfTwo { len: n });
    }
    Ok(())
}

/// In-place forward FFT (radix-2 decimation in time).
///
/// `re` and `im` must have the same power-of-two length. Lengths 0 and 1
/// are a no-op.
///
/// # Example
///
/// ```
/// use roomsweep_analysis::fft::fft;
///
/// let mut re = vec![1.0, 0.0, 0.0, 0.0];
/// let mut im = vec![0.0; 4];
/// fft(&mut re, &mut im).unwrap();
/// assert!(re.iter().all(|&x| (x - 1.0).abs() < 1e-12));
/// ```
pub fn fft(re: &mut [f64], im: &mut [f64]) -> Result<()> {
    check_buffers(re, im)?;
    radix2(re, im);
    Ok(())
}

/// In-place inverse FFT, scaled by `1/N`.
///
/// Implemented as conjugate, forward transform, conjugate and scale.
pub fn ifft(re: &mut [f64], im: &mut [f64]) -> Result<()> {
    check_buffers(re, im)?;
    inverse_radix2(re, im);
    Ok(())
}

/// Transform kernel. Callers guarantee equal power-of-two lengths.
fn radix2(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two() && im.len() == n);

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    // Butterflies; one sin/cos per pass, twiddles advanced by complex multiply
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let (w_im, w_re) = (-2.0 * PI / len as f64).sin_cos();

        for start in (0..n).step_by(len) {
            let mut cur_re = 1.0;
            let mut cur_im = 0.0;
            for k in 0..half {
                let a = start + k;
                let b = a + half;

                let t_re = re[b] * cur_re - im[b] * cur_im;
                let t_im = re[b] * cur_im + im[b] * cur_re;

                re[b] = re[a] - t_re;
                im[b] = im[a] - t_im;
                re[a] += t_re;
                im[a] += t_im;

                let next_re = cur_re * w_re - cur_im * w_im;
                cur_im = cur_re * w_im + cur_im * w_re;
                cur_re = next_re;
            }
        }
        len <<= 1;
    }
}

fn inverse_radix2(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    if n == 0 {
        return;
    }
    for x in im.iter_mut() {
        *x = -*x;
    }
    radix2(re, im);
    let scale = 1.0 / n as f64;
    for (r, i) in re.iter_mut().zip(im.iter_mut()) {
        *r *= scale;
        *i = -*i * scale;
    }
}

/// Owned split-complex buffer with power-of-two length.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexBuffer {
    /// Real parts.
    pub re: Vec<f64>,
    /// Imaginary parts.
    pub im: Vec<f64>,
}

impl ComplexBuffer {
    /// Zero-filled buffer of `len` samples.
    ///
    /// Fails if `len` is not a power of two.
    pub fn zeros(len: usize) -> Result<Self> {
        if len > 1 && !len.is_power_of_two() {
            return Err(AnalysisError::NotPowerOfTwo { len });
        }
        Ok(Self {
            re: vec![0.0; len],
            im: vec![0.0; len],
        })
    }

    /// Buffer length.
    pub fn len(&self) -> usize {
        self.re.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Forward transform in place.
    pub fn forward(&mut self) {
        radix2(&mut self.re, &mut self.im);
    }

    /// Inverse transform in place (scaled by `1/N`).
    pub fn inverse(&mut self) {
        inverse_radix2(&mut self.re, &mut self.im);
    }

    /// Magnitude of bin `k`.
    pub fn magnitude(&self, k: usize) -> f64 {
        self.re[k].hypot(self.im[k])
    }

    /// Magnitudes of bins `0..=N/2` (DC through Nyquist).
    pub fn half_spectrum_magnitudes(&self) -> Vec<f64> {
        if self.is_empty() {
            return Vec::new();
        }
        (0..=self.len() / 2).map(|k| self.magnitude(k)).collect()
    }

    /// Pointwise complex multiply by `other`.
    pub fn multiply(&mut self, other: &ComplexBuffer) {
        for k in 0..self.len().min(other.len()) {
            let (a, b) = (self.re[k], self.im[k]);
            let (c, d) = (other.re[k], other.im[k]);
            self.re[k] = a * c - b * d;
            self.im[k] = a * d + b * c;
        }
    }
}

/// Zero-pad a real signal into a [`ComplexBuffer`].
///
/// The buffer length is `length` if given (must be a power of two), else
/// the next power of two `>= signal.len()`. Samples beyond the requested
/// length are dropped.
pub fn real_to_complex(signal: &[f64], length: Option<usize>) -> Result<ComplexBuffer> {
    let len = match length {
        Some(len) if len > 1 && !len.is_power_of_two() => {
            return Err(AnalysisError::NotPowerOfTwo { len });
        }
        Some(len) => len,
        None => next_power_of_two(signal.len()),
    };
    let mut buffer = ComplexBuffer::zeros(len)?;
    let n = signal.len().min(len);
    buffer.re[..n].copy_from_slice(&signal[..n]);
    Ok(buffer)
}
