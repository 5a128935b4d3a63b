//! FFT-based linear convolution.

use crate::fft::{ComplexBuffer, next_power_of_two};

/// Linear convolution of `a` and `b`.
///
/// Output length is `a.len() + b.len() - 1`, or 0 if either input is empty.
/// Both inputs are zero-padded to the next power of two that holds the
/// full result, so there is no circular wrap-around.
///
/// # Example
///
/// ```
/// use roomsweep_analysis::convolution::convolve;
///
/// let y = convolve(&[1.0, 2.0, 3.0], &[4.0, 5.0]);
/// let expected = [4.0, 13.0, 22.0, 15.0];
/// assert!(y.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-9));
/// ```
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let out_len = a.len() + b.len() - 1;
    let fft_size = next_power_of_two(out_len);

    let mut a_spec = padded(a, fft_size);
    let mut b_spec = padded(b, fft_size);
    a_spec.forward();
    b_spec.forward();

    a_spec.multiply(&b_spec);
    a_spec.inverse();

    let mut out = a_spec.re;
    out.truncate(out_len);
    out
}

fn padded(signal: &[f64], fft_size: usize) -> ComplexBuffer {
    let mut re = vec![0.0; fft_size];
    re[..signal.len()].copy_from_slice(signal);
    ComplexBuffer {
        re,
        im: vec![0.0; fft_size],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!((x - y).abs() < tol, "index {}: {} vs {}", i, x, y);
        }
    }

    #[test]
    fn test_known_convolution() {
        let y = convolve(&[1.0, 2.0, 3.0], &[4.0, 5.0]);
        assert_close(&y, &[4.0, 13.0, 22.0, 15.0], 1e-9);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(convolve(&[], &[1.0, 2.0]).is_empty());
        assert!(convolve(&[1.0], &[]).is_empty());
    }

    #[test]
    fn test_delta_identity() {
        let signal: Vec<f64> = (0..300).map(|i| ((i * 7) % 13) as f64 / 13.0 - 0.5).collect();
        let mut delta = vec![0.0; 20];
        delta[0] = 1.0;

        let y = convolve(&signal, &delta);
        assert_eq!(y.len(), 319);
        assert_close(&y[..300], &signal, 1e-9);
        assert!(y[300..].iter().all(|x| x.abs() < 1e-9));
    }

    #[test]
    fn test_commutative() {
        let a: Vec<f64> = (0..37).map(|i| (i as f64 * 0.3).sin()).collect();
        let b: Vec<f64> = (0..11).map(|i| (i as f64 * 0.7).cos()).collect();
        assert_close(&convolve(&a, &b), &convolve(&b, &a), 1e-9);
    }

    #[test]
    fn test_delayed_delta_shifts() {
        let signal = [1.0, -1.0, 0.5];
        let y = convolve(&signal, &[0.0, 0.0, 2.0]);
        assert_close(&y, &[0.0, 0.0, 2.0, -2.0, 1.0], 1e-9);
    }
}
