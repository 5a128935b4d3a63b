//! Criterion benchmarks for roomsweep-analysis components
//!
//! Run with: cargo bench -p roomsweep-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use roomsweep_analysis::{
    MeasurementOptions, ResponseOptions, Rt60Options, SweepParams, WaterfallOptions,
    analyze_recording, compute_frequency_response, compute_waterfall, convolve, estimate_rt60,
    extract_impulse_response, fft, generate_inverse_filter, generate_log_sweep, ifft,
    simulate_recording, simulate_room_ir, smooth_frequency_response,
};

const SAMPLE_RATE: f64 = 48000.0;

/// Generate white noise
fn generate_noise(size: usize) -> Vec<f64> {
    let mut state = 0x12345678u32;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            f64::from(state as i32) / f64::from(i32::MAX)
        })
        .collect()
}

// ============================================================================
// FFT benchmarks
// ============================================================================

fn bench_fft_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT_Forward");

    let sizes = [1024, 4096, 16384, 65536, 262144];

    for &size in &sizes {
        let input = generate_noise(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let mut re = input.clone();
                let mut im = vec![0.0; n];
                fft(black_box(&mut re), black_box(&mut im)).ok();
                black_box(re)
            })
        });
    }

    group.finish();
}

fn bench_fft_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT_Roundtrip");

    let sizes = [1024, 16384, 131072];

    for &size in &sizes {
        let input = generate_noise(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let mut re = input.clone();
                let mut im = vec![0.0; n];
                fft(&mut re, &mut im).ok();
                ifft(&mut re, &mut im).ok();
                black_box(re)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Sweep and deconvolution
// ============================================================================

fn bench_sweep_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sweep");

    for &duration in &[1.0, 5.0] {
        let params = SweepParams::new(20.0, 20000.0, duration, SAMPLE_RATE);

        group.bench_with_input(
            BenchmarkId::new("log_sweep", duration),
            &params,
            |b, params| b.iter(|| black_box(generate_log_sweep(black_box(params)))),
        );
        group.bench_with_input(
            BenchmarkId::new("inverse_filter", duration),
            &params,
            |b, params| b.iter(|| black_box(generate_inverse_filter(black_box(params)))),
        );
    }

    group.finish();
}

fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Convolve");
    group.sample_size(20);

    for &len in &[4800, 48000, 240000] {
        let a = generate_noise(len);
        let b_sig = generate_noise(len / 2);

        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(convolve(black_box(&a), black_box(&b_sig))))
        });
    }

    group.finish();
}

fn bench_ir_extraction(c: &mut Criterion) {
    let params = SweepParams::new(20.0, 20000.0, 1.0, SAMPLE_RATE);
    let sweep = generate_log_sweep(&params).unwrap();
    let inverse = generate_inverse_filter(&params).unwrap();
    let room = simulate_room_ir(SAMPLE_RATE, 0.5, 0.8, 1);
    let recording = simulate_recording(&sweep, &room, 480);

    c.bench_function("IR_Extraction_1s", |b| {
        b.iter(|| {
            black_box(extract_impulse_response(
                black_box(&recording),
                black_box(&inverse),
                Some(48000),
            ))
        })
    });
}

// ============================================================================
// Analysis products
// ============================================================================

fn bench_analysis_products(c: &mut Criterion) {
    let mut group = c.benchmark_group("Products");
    let ir = simulate_room_ir(SAMPLE_RATE, 0.8, 1.5, 7);

    group.bench_function("frequency_response", |b| {
        b.iter(|| {
            black_box(compute_frequency_response(
                black_box(&ir),
                SAMPLE_RATE,
                &ResponseOptions::default(),
            ))
        })
    });

    let response = compute_frequency_response(&ir, SAMPLE_RATE, &ResponseOptions::default());
    for &fraction in &[1.0 / 3.0, 1.0 / 24.0] {
        group.bench_with_input(
            BenchmarkId::new("smoothing", format!("1/{}", (1.0 / fraction).round())),
            &fraction,
            |b, &fraction| {
                b.iter(|| black_box(smooth_frequency_response(&response, Some(fraction)).len()))
            },
        );
    }

    group.bench_function("rt60", |b| {
        b.iter(|| black_box(estimate_rt60(black_box(&ir), SAMPLE_RATE, &Rt60Options::default())))
    });

    group.bench_function("waterfall", |b| {
        b.iter(|| {
            black_box(compute_waterfall(
                black_box(&ir),
                SAMPLE_RATE,
                &WaterfallOptions::default(),
            ))
        })
    });

    group.finish();
}

fn bench_full_measurement(c: &mut Criterion) {
    let mut group = c.benchmark_group("Measurement");
    group.sample_size(10);

    let params = SweepParams::new(20.0, 20000.0, 2.0, SAMPLE_RATE);
    let sweep = generate_log_sweep(&params).unwrap();
    let room = simulate_room_ir(SAMPLE_RATE, 0.6, 1.0, 3);
    let recording = simulate_recording(&sweep, &room, 960);
    let options = MeasurementOptions {
        smoothing_fraction: Some(1.0 / 6.0),
        ..MeasurementOptions::default()
    };

    group.bench_function("analyze_recording_2s", |b| {
        b.iter(|| black_box(analyze_recording(black_box(&recording), &params, None, &options)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fft_forward,
    bench_fft_roundtrip,
    bench_sweep_generation,
    bench_convolve,
    bench_ir_extraction,
    bench_analysis_products,
    bench_full_measurement,
);

criterion_main!(benches);
