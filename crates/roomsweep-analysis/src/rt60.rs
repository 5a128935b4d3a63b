//! Reverberation time from the Schroeder energy decay curve
//!
//! The EDC is the backward-integrated squared impulse response, normalized
//! to 0 dB at the start. T20 and T30 are least-squares fits over the
//! -5..-25 dB and -5..-35 dB spans of the EDC, extrapolated to 60 dB of
//! decay.

use crate::response::DB_FLOOR;

/// Options for [`estimate_rt60`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rt60Options {
    /// EDC span (start dB, end dB) for the T20 fit.
    pub t20_range: (f64, f64),
    /// EDC span (start dB, end dB) for the T30 fit.
    pub t30_range: (f64, f64),
    /// Estimates above this are rejected as implausible.
    pub max_rt60_sec: f64,
    /// Fraction of the EDC tail averaged for the noise floor.
    pub noise_tail_fraction: f64,
}

impl Default for Rt60Options {
    fn default() -> Self {
        Self {
            t20_range: (-5.0, -25.0),
            t30_range: (-5.0, -35.0),
            max_rt60_sec: 30.0,
            noise_tail_fraction: 0.1,
        }
    }
}

/// Reverberation time estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Rt60Result {
    /// Reported reverberation time in seconds (T30 when available, else T20).
    pub rt60: f64,
    /// T20 extrapolated to 60 dB, in seconds.
    pub t20: f64,
    /// T30 extrapolated to 60 dB, in seconds. `None` without enough dynamic range.
    pub t30: Option<f64>,
    /// Energy decay curve in dB, same length as the IR.
    pub edc_db: Vec<f64>,
    /// Mean EDC level over the tail, in dB.
    pub noise_floor_db: f64,
}

/// Linear fit over a span of the EDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayFit {
    /// First EDC index of the fitted span.
    pub start_index: usize,
    /// Last EDC index of the fitted span.
    pub end_index: usize,
    /// Decay rate in dB per second (positive for a decaying curve).
    pub decay_rate_db_per_sec: f64,
    /// Correlation coefficient of the fit (1.0 = perfectly linear).
    pub correlation: f64,
}

impl DecayFit {
    /// Time to decay by 60 dB at the fitted rate.
    pub fn extrapolated_rt60(&self) -> f64 {
        60.0 / self.decay_rate_db_per_sec
    }
}

/// Compute the Energy Decay Curve (Schroeder integration) in dB.
///
/// Normalized to 0 dB at the first sample. Samples after the last non-zero
/// energy sit at -120 dB, as does the whole curve of an IR with no energy.
/// An empty IR yields an empty curve.
pub fn compute_edc(ir: &[f64]) -> Vec<f64> {
    edc_with_total(ir).0
}

fn edc_with_total(ir: &[f64]) -> (Vec<f64>, f64) {
    let mut edc = vec![0.0; ir.len()];
    let mut sum = 0.0f64;
    for (out, &x) in edc.iter_mut().zip(ir.iter()).rev() {
        sum += x * x;
        *out = sum;
    }

    let total = edc.first().copied().unwrap_or(0.0);
    for e in edc.iter_mut() {
        let ratio = if total > 0.0 { *e / total } else { 0.0 };
        *e = if ratio > 0.0 {
            10.0 * ratio.log10()
        } else {
            DB_FLOOR
        };
    }
    (edc, total)
}

/// Least-squares fit of the EDC between its first crossing of `start_db`
/// and the first later crossing of `end_db`.
///
/// Returns `None` when either crossing is missing, the span holds fewer
/// than three samples, or the slope is not a decay.
pub fn fit_decay_range(
    edc_db: &[f64],
    sample_rate: f64,
    start_db: f64,
    end_db: f64,
) -> Option<DecayFit> {
    let start = edc_db.iter().position(|&e| e <= start_db)?;
    let end = start + edc_db[start..].iter().position(|&e| e <= end_db)?;
    if end - start + 1 < 3 {
        return None;
    }

    let n = (end - start + 1) as f64;
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut sum_xy = 0.0f64;
    let mut sum_xx = 0.0f64;
    let mut sum_yy = 0.0f64;

    for (i, &y) in edc_db[start..=end].iter().enumerate() {
        let x = i as f64 / sample_rate;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
        sum_yy += y * y;
    }

    let denom_x = n * sum_xx - sum_x * sum_x;
    if denom_x <= 0.0 {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denom_x;
    let decay_rate = -slope;
    if !(decay_rate > 0.0) || !decay_rate.is_finite() {
        return None;
    }

    let denom = (denom_x * (n * sum_yy - sum_y * sum_y)).sqrt();
    let correlation = if denom > 0.0 {
        ((n * sum_xy - sum_x * sum_y) / denom).abs()
    } else {
        0.0
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(start, end, decay_rate, start_db, end_db, "fitted EDC decay");

    Some(DecayFit {
        start_index: start,
        end_index: end,
        decay_rate_db_per_sec: decay_rate,
        correlation,
    })
}

/// Estimate RT60 (reverberation time) from an impulse response.
///
/// Returns `None` for an IR shorter than two samples, an IR with no
/// energy, a missing T20 fit, or an estimate outside `(0, max_rt60_sec]`.
/// These are expected outcomes for recordings with too little reverberant
/// energy, not errors.
pub fn estimate_rt60(ir: &[f64], sample_rate: f64, options: &Rt60Options) -> Option<Rt60Result> {
    if ir.len() < 2 || !(sample_rate > 0.0) {
        return None;
    }

    let (edc_db, total) = edc_with_total(ir);
    if !(total > 0.0) {
        return None;
    }

    let tail = ((edc_db.len() as f64 * options.noise_tail_fraction) as usize).clamp(1, edc_db.len());
    let noise_floor_db = edc_db[edc_db.len() - tail..].iter().sum::<f64>() / tail as f64;

    let (s20, e20) = options.t20_range;
    let (s30, e30) = options.t30_range;
    let t20 = fit_decay_range(&edc_db, sample_rate, s20, e20)?.extrapolated_rt60();
    let t30 = fit_decay_range(&edc_db, sample_rate, s30, e30).map(|fit| fit.extrapolated_rt60());

    let rt60 = t30.unwrap_or(t20);
    if !(rt60 > 0.0) || rt60 > options.max_rt60_sec {
        #[cfg(feature = "tracing")]
        tracing::debug!(rt60, "rejected implausible RT60");
        return None;
    }

    Some(Rt60Result {
        rt60,
        t20,
        t30,
        edc_db,
        noise_floor_db,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exponentially decaying IR with a known RT60 (60 dB amplitude decay).
    fn exponential_ir(rt60: f64, sample_rate: f64, length_secs: f64) -> Vec<f64> {
        let n = (length_secs * sample_rate) as usize;
        let decay = 6.907755 / rt60; // ln(1000)
        (0..n)
            .map(|i| (-decay * i as f64 / sample_rate).exp())
            .collect()
    }

    #[test]
    fn test_energy_decay_curve() {
        let ir = exponential_ir(0.5, 8000.0, 1.0);
        let edc = compute_edc(&ir);

        assert_eq!(edc.len(), ir.len());
        assert!(edc[0].abs() < 1e-12, "EDC should start at 0 dB");
        for i in 1..edc.len() {
            assert!(edc[i] <= edc[i - 1] + 1e-9, "EDC should be non-increasing");
        }
        assert!(edc.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn test_edc_empty_and_silent() {
        assert!(compute_edc(&[]).is_empty());
        assert_eq!(compute_edc(&[0.0, 0.0, 0.0]), vec![DB_FLOOR; 3]);
    }

    #[test]
    fn test_edc_floor_after_energy_ends() {
        let edc = compute_edc(&[1.0, 0.5, 0.0, 0.0]);
        assert_eq!(edc[2], DB_FLOOR);
        assert_eq!(edc[3], DB_FLOOR);
        assert!((edc[1] - 10.0 * (0.25f64 / 1.25).log10()).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_rt60_known_values() {
        let sample_rate = 16000.0;
        for target in [0.5, 1.0, 2.0] {
            let ir = exponential_ir(target, sample_rate, target * 1.5);
            let result = estimate_rt60(&ir, sample_rate, &Rt60Options::default())
                .expect("should estimate RT60");

            assert!(
                (result.rt60 - target).abs() / target < 0.3,
                "RT60 should be close to {} s, got {} s",
                target,
                result.rt60
            );
            assert!((result.t20 - target).abs() / target < 0.3);
            assert!(result.t30.is_some());
            assert_eq!(result.edc_db.len(), ir.len());
            assert!(result.rt60 > 0.0 && result.rt60 <= 30.0);
        }
    }

    #[test]
    fn test_estimate_rt60_silent_or_short() {
        let opts = Rt60Options::default();
        assert!(estimate_rt60(&[], 48000.0, &opts).is_none());
        assert!(estimate_rt60(&[1.0], 48000.0, &opts).is_none());
        assert!(estimate_rt60(&vec![0.0; 4800], 48000.0, &opts).is_none());
    }

    #[test]
    fn test_t30_missing_with_limited_range() {
        // Constant 1000-sample IR: the EDC bottoms out at -30 dB, so the
        // -5..-25 dB span exists but -35 dB is never reached
        let ir = vec![0.5; 1000];
        let result = estimate_rt60(&ir, 1000.0, &Rt60Options::default()).unwrap();

        assert!(result.t30.is_none());
        assert_eq!(result.rt60, result.t20);
        assert!(result.edc_db.last().unwrap() > &-35.0);
    }

    #[test]
    fn test_implausible_rt60_rejected() {
        let sample_rate = 1000.0;
        let ir = exponential_ir(2.0, sample_rate, 3.0);
        let strict = Rt60Options {
            max_rt60_sec: 1.0,
            ..Rt60Options::default()
        };
        assert!(estimate_rt60(&ir, sample_rate, &strict).is_none());
        assert!(estimate_rt60(&ir, sample_rate, &Rt60Options::default()).is_some());
    }

    #[test]
    fn test_fit_decay_range() {
        // Straight line at -60 dB/s
        let edc: Vec<f64> = (0..1000).map(|i| -60.0 * i as f64 / 1000.0).collect();
        let fit = fit_decay_range(&edc, 1000.0, -5.0, -25.0).unwrap();

        assert!((fit.decay_rate_db_per_sec - 60.0).abs() < 1e-6);
        assert!((fit.extrapolated_rt60() - 1.0).abs() < 1e-6);
        assert!(fit.correlation > 0.999);
        assert!(fit.start_index < fit.end_index);

        assert!(fit_decay_range(&edc, 1000.0, -5.0, -80.0).is_none());
        assert!(fit_decay_range(&[0.0, -10.0, -40.0], 1000.0, -5.0, -25.0).is_none());
    }

    #[test]
    fn test_noise_floor_reported() {
        let sample_rate = 8000.0;
        let ir = exponential_ir(0.5, sample_rate, 1.5);
        let result = estimate_rt60(&ir, sample_rate, &Rt60Options::default()).unwrap();

        let tail = &result.edc_db[result.edc_db.len() - 1200..];
        let expected = tail.iter().sum::<f64>() / tail.len() as f64;
        assert!((result.noise_floor_db - expected).abs() < 1e-9);
        assert!(result.noise_floor_db < DB_FLOOR, "got {}", result.noise_floor_db);
    }

    #[test]
    fn test_deep_decay_not_clamped() {
        // 0.5 s RT60 over 1.5 s decays ~180 dB in amplitude
        let ir = exponential_ir(0.5, 8000.0, 1.5);
        let edc = compute_edc(&ir);

        let total: f64 = ir.iter().map(|x| x * x).sum();
        let last = ir[ir.len() - 1];
        let exact = 10.0 * (last * last / total).log10();
        let reported = *edc.last().unwrap();
        assert!(exact < -200.0, "exact {exact}");
        assert!((reported - exact).abs() < 1e-6, "reported {reported}, exact {exact}");

        // A faint but non-zero impulse keeps its true level too
        let edc = compute_edc(&[1.0, 1e-8]);
        assert!((edc[1] + 160.0).abs() < 1e-6, "got {}", edc[1]);
    }
}
