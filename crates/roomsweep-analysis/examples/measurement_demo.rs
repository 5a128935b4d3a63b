//! Measurement demo: sweep a simulated room and print what comes out.
//!
//! Run with: cargo run -p roomsweep-analysis --example measurement_demo

use roomsweep_analysis::{
    MeasurementOptions, SweepParams, analyze_recording, generate_log_sweep, simulate_recording,
    simulate_room_ir,
};

fn main() -> roomsweep_analysis::Result<()> {
    let params = SweepParams::new(20.0, 20000.0, 2.0, 48000.0);

    println!("=== Log Sweep ===\n");
    let sweep = generate_log_sweep(&params)?;
    println!(
        "{:.0} Hz -> {:.0} Hz over {:.1} s ({} samples)",
        params.f_start,
        params.f_end,
        params.duration_sec,
        sweep.len()
    );

    // --- Simulated room: 0.7 s reverb, 5 ms of latency ---
    let room = simulate_room_ir(params.sample_rate, 0.7, 1.5, 42);
    let recording = simulate_recording(&sweep, &room, 240);

    let options = MeasurementOptions {
        smoothing_fraction: Some(1.0 / 6.0),
        ..MeasurementOptions::default()
    };
    let result = analyze_recording(&recording, &params, None, &options)?;

    let Some(impulse) = &result.impulse else {
        println!("No signal in recording");
        return Ok(());
    };

    println!("\n=== Impulse Response ===\n");
    println!("Peak index: {}", impulse.peak_index);
    println!(
        "Length: {} samples ({:.2} s)",
        impulse.ir.len(),
        impulse.duration_secs(params.sample_rate)
    );

    println!("\n=== Reverberation ===\n");
    match &result.rt60 {
        Some(rt) => {
            println!("RT60: {:.2} s (simulated 0.70 s)", rt.rt60);
            println!("  T20: {:.2} s", rt.t20);
            if let Some(t30) = rt.t30 {
                println!("  T30: {:.2} s", t30);
            }
            println!("  Noise floor: {:.1} dB", rt.noise_floor_db);
        }
        None => println!("Insufficient decay range"),
    }

    println!("\n=== Strongest Peaks (1/6 octave) ===\n");
    println!("{:>10} {:>9} {:>11}  Band", "Freq (Hz)", "dB", "Prominence");
    println!("{:->10} {:->9} {:->11}  {:->10}", "", "", "", "");
    for peak in result.peaks.iter().take(5) {
        println!(
            "{:>10.1} {:>9.2} {:>11.2}  {}",
            peak.freq,
            peak.db,
            peak.prominence,
            peak.band.as_deref().unwrap_or("-")
        );
    }

    if let Some(waterfall) = &result.waterfall {
        println!("\n=== Waterfall ===\n");
        println!(
            "{} slices x {} frequencies, max {:.1} dB",
            waterfall.slices.len(),
            waterfall.frequencies.len(),
            waterfall.max_db
        );
    }

    Ok(())
}
