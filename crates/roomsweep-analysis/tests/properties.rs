//! Property-based tests for roomsweep-analysis.
//!
//! Checks transform invertibility, energy conservation, convolution
//! algebra, and the frequency-preservation guarantees of smoothing and
//! calibration using proptest for randomized input generation.

use proptest::prelude::*;
use roomsweep_analysis::{
    CalibrationData, CalibrationPoint, FrequencyPoint, apply_calibration, compute_edc, convolve,
    fft, ifft, log_spaced_frequencies, smooth_frequency_response,
};

/// A signal in [-1, 1] whose length is a power of two between 1 and 1024.
fn power_of_two_signal() -> impl Strategy<Value = Vec<f64>> {
    (0u32..=10).prop_flat_map(|exp| prop::collection::vec(-1.0f64..=1.0, 1usize << exp))
}

fn response(len: usize) -> impl Strategy<Value = Vec<FrequencyPoint>> {
    prop::collection::vec(-40.0f64..40.0, len).prop_map(move |dbs| {
        log_spaced_frequencies(20.0, 20000.0, len)
            .into_iter()
            .zip(dbs)
            .map(|(f, db)| FrequencyPoint::new(f, db))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// ifft(fft(x)) reproduces x for any power-of-two length.
    #[test]
    fn fft_roundtrip(signal in power_of_two_signal()) {
        let mut re = signal.clone();
        let mut im = vec![0.0; signal.len()];
        fft(&mut re, &mut im).unwrap();
        ifft(&mut re, &mut im).unwrap();

        for (a, b) in signal.iter().zip(re.iter()) {
            prop_assert!((a - b).abs() < 1e-8, "{} vs {}", a, b);
        }
    }

    /// Time-domain energy equals frequency-domain energy / N.
    #[test]
    fn fft_parseval(signal in power_of_two_signal()) {
        let n = signal.len();
        let time_energy: f64 = signal.iter().map(|x| x * x).sum();

        let mut re = signal.clone();
        let mut im = vec![0.0; n];
        fft(&mut re, &mut im).unwrap();
        let freq_energy: f64 = re.iter().zip(im.iter()).map(|(r, i)| r * r + i * i).sum::<f64>() / n as f64;

        prop_assert!((time_energy - freq_energy).abs() <= 1e-8 * time_energy.max(1.0));
    }

    /// Convolution has the linear length and is commutative.
    #[test]
    fn convolution_length_and_commutativity(
        a in prop::collection::vec(-1.0f64..=1.0, 1..200),
        b in prop::collection::vec(-1.0f64..=1.0, 1..200),
    ) {
        let ab = convolve(&a, &b);
        let ba = convolve(&b, &a);
        prop_assert_eq!(ab.len(), a.len() + b.len() - 1);
        for (x, y) in ab.iter().zip(ba.iter()) {
            prop_assert!((x - y).abs() < 1e-9);
        }
    }

    /// A leading unit delta reproduces the signal.
    #[test]
    fn convolution_delta_identity(
        a in prop::collection::vec(-1.0f64..=1.0, 1..300),
        pad in 0usize..32,
    ) {
        let mut delta = vec![0.0; pad + 1];
        delta[0] = 1.0;
        let y = convolve(&a, &delta);
        for (x, y) in a.iter().zip(y.iter()) {
            prop_assert!((x - y).abs() < 1e-9);
        }
    }

    /// Smoothing changes levels only, never frequencies, and stays within
    /// the input's level range.
    #[test]
    fn smoothing_preserves_frequencies(points in response(120), fraction in 0.01f64..2.0) {
        let out = smooth_frequency_response(&points, Some(fraction));
        prop_assert_eq!(out.len(), points.len());

        let lo = points.iter().map(|p| p.db).fold(f64::INFINITY, f64::min);
        let hi = points.iter().map(|p| p.db).fold(f64::NEG_INFINITY, f64::max);
        for (a, b) in out.iter().zip(points.iter()) {
            prop_assert_eq!(a.freq, b.freq);
            prop_assert!(a.db >= lo - 1e-9 && a.db <= hi + 1e-9);
        }
    }

    /// Calibration shifts each level by a bounded correction and leaves
    /// frequencies alone.
    #[test]
    fn calibration_preserves_frequencies(
        points in response(80),
        corrections in prop::collection::vec(-10.0f64..10.0, 2..20),
    ) {
        let cal = CalibrationData {
            filename: "prop".into(),
            points: log_spaced_frequencies(10.0, 30000.0, corrections.len())
                .into_iter()
                .zip(corrections.iter().copied())
                .map(|(freq, db)| CalibrationPoint { freq, db })
                .collect(),
        };
        let out = apply_calibration(&points, &cal);

        for (a, b) in out.iter().zip(points.iter()) {
            prop_assert_eq!(a.freq, b.freq);
            prop_assert!((a.db - b.db).abs() <= 10.0 + 1e-9);
        }
    }

    /// The EDC of any non-silent IR starts at 0 dB and never rises.
    #[test]
    fn edc_monotonic(ir in prop::collection::vec(-1.0f64..=1.0, 2..500)) {
        prop_assume!(ir.iter().any(|&x| x != 0.0));
        let edc = compute_edc(&ir);
        prop_assert!(edc[0].abs() < 1e-9);
        for w in edc.windows(2) {
            prop_assert!(w[1] <= w[0] + 1e-9);
        }
    }
}
