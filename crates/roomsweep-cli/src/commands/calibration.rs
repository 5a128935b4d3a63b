//! Calibration file inspection command.

use clap::Args;
use roomsweep_analysis::interpolate_calibration;
use roomsweep_io::read_calibration;
use std::path::PathBuf;

#[derive(Args)]
pub struct CalibrationArgs {
    /// Calibration file (`freq dB` pairs per line)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the interpolated correction at these frequencies (comma-separated Hz)
    #[arg(long, value_delimiter = ',')]
    at: Vec<f64>,
}

pub fn run(args: CalibrationArgs) -> anyhow::Result<()> {
    let cal = read_calibration(&args.file)?;

    println!("Calibration: {}", cal.filename);
    println!("  Points: {}", cal.points.len());
    if let Some((lo, hi)) = cal.frequency_range() {
        println!("  Range:  {:.1} Hz - {:.1} Hz", lo, hi);
    }

    println!("\n  {:>10}  {:>8}", "Freq (Hz)", "dB");
    println!("  {:->10}  {:->8}", "", "");
    for p in &cal.points {
        println!("  {:>10.2}  {:>8.2}", p.freq, p.db);
    }

    if !args.at.is_empty() {
        println!("\nInterpolated corrections:");
        let corrections = interpolate_calibration(&cal, &args.at);
        for (f, c) in args.at.iter().zip(corrections) {
            println!("  {:>10.2} Hz  {:>+8.2} dB", f, c);
        }
    }

    Ok(())
}
