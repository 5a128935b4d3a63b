//! Recording analysis command.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use roomsweep_analysis::{MeasurementResult, analyze_recording};
use roomsweep_io::{
    MeasurementSummary, WavSpec, export_edc_csv, export_response_csv, export_response_frd,
    export_summary_json, export_waterfall_csv, read_calibration, read_wav, write_wav,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::common::{load_profile, parse_fraction};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Recording of the sweep played through the room (WAV)
    #[arg(value_name = "RECORDING")]
    recording: PathBuf,

    /// Measurement profile the sweep was generated with (name or path)
    #[arg(short, long)]
    profile: Option<String>,

    /// Microphone calibration file
    #[arg(short, long)]
    calibration: Option<PathBuf>,

    /// Directory for ir.wav, response.csv/.frd, edc.csv, waterfall.csv and summary.json
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Smoothing width overriding the profile: "1/3", "0.1667" or "none"
    #[arg(long, value_parser = parse_fraction)]
    smoothing: Option<f64>,

    /// Number of peaks to print
    #[arg(long, default_value = "5")]
    show_peaks: usize,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut profile = load_profile(args.profile.as_deref())?;
    if let Some(fraction) = args.smoothing {
        profile.smoothing.fraction_of_octave = (fraction > 0.0).then_some(fraction);
    }
    let profile_name = profile.name.clone();
    let profile_rate = profile.sweep.sample_rate;
    let (sweep, options) = profile.into_options()?;

    println!("Reading {}...", args.recording.display());
    let (recording, spec) = read_wav(&args.recording)
        .with_context(|| format!("reading {}", args.recording.display()))?;
    if spec.sample_rate != profile_rate {
        anyhow::bail!(
            "Sample rate mismatch: recording is {} Hz but profile '{}' expects {} Hz",
            spec.sample_rate,
            profile_name,
            profile_rate
        );
    }
    if spec.channels > 1 {
        println!("  Mixed {} channels down to mono", spec.channels);
    }
    println!(
        "  {} samples ({:.2}s) at {} Hz",
        recording.len(),
        recording.len() as f64 / sweep.sample_rate,
        spec.sample_rate
    );

    let calibration = args
        .calibration
        .as_deref()
        .map(read_calibration)
        .transpose()
        .context("loading calibration file")?;
    if let Some(cal) = &calibration {
        println!("  Calibration: {} ({} points)", cal.filename, cal.points.len());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Analyzing with profile '{}'", profile_name));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = analyze_recording(&recording, &sweep, calibration.as_ref(), &options)?;
    spinner.finish_and_clear();

    print_report(&result, args.show_peaks);

    if let Some(dir) = &args.output_dir {
        let calibration_name = calibration.as_ref().map(|c| c.filename.as_str());
        write_outputs(dir, &result, calibration_name, spec.sample_rate)?;
    }

    Ok(())
}

fn print_report(result: &MeasurementResult, show_peaks: usize) {
    let Some(impulse) = &result.impulse else {
        println!("\nNo signal detected in recording; impulse response unavailable.");
        return;
    };

    println!("\nImpulse response:");
    println!("  Arrival:  sample {}", impulse.peak_index);
    println!(
        "  Length:   {} samples ({:.3}s)",
        impulse.ir.len(),
        impulse.duration_secs(result.sample_rate)
    );

    println!("\nReverberation:");
    match &result.rt60 {
        Some(rt) => {
            println!("  RT60: {:.3}s", rt.rt60);
            println!("  T20:  {:.3}s", rt.t20);
            match rt.t30 {
                Some(t30) => println!("  T30:  {:.3}s", t30),
                None => println!("  T30:  n/a (insufficient decay range)"),
            }
            println!("  Noise floor: {:.1} dB", rt.noise_floor_db);
        }
        None => println!("  RT60: n/a (insufficient decay range)"),
    }

    if result.peaks.is_empty() {
        println!("\nNo peaks above the prominence threshold.");
        return;
    }

    println!("\nPeaks:");
    println!("  {:>10}  {:>8}  {:>10}  Band", "Freq (Hz)", "dB", "Prom (dB)");
    for peak in result.peaks.iter().take(show_peaks) {
        println!(
            "  {:>10.1}  {:>8.2}  {:>10.2}  {}",
            peak.freq,
            peak.db,
            peak.prominence,
            peak.band.as_deref().unwrap_or("-")
        );
    }
}

fn write_outputs(
    dir: &Path,
    result: &MeasurementResult,
    calibration: Option<&str>,
    sample_rate: u32,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();

    if let Some(impulse) = &result.impulse {
        let path = dir.join("ir.wav");
        write_wav(&path, &impulse.ir, WavSpec::mono(sample_rate))?;
        written.push(path);

        let path = dir.join("response.csv");
        export_response_csv(&path, &result.response)?;
        written.push(path);

        let path = dir.join("response.frd");
        export_response_frd(&path, &result.response)?;
        written.push(path);

        let path = dir.join("edc.csv");
        export_edc_csv(&path, &result.edc_db, result.sample_rate)?;
        written.push(path);

        if let Some(waterfall) = &result.waterfall {
            let path = dir.join("waterfall.csv");
            export_waterfall_csv(&path, waterfall)?;
            written.push(path);
        }
    }

    let path = dir.join("summary.json");
    export_summary_json(&path, &MeasurementSummary::from_result(result, calibration))?;
    written.push(path);

    println!();
    for path in &written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
