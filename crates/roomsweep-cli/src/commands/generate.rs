//! Measurement signal generation command.

use clap::{Args, Subcommand};
use roomsweep_analysis::{
    generate_inverse_filter, generate_log_sweep, simulate_recording, simulate_room_ir,
};
use roomsweep_io::write_wav;
use std::path::PathBuf;

use super::common::{load_profile, normalize_peak, wav_spec};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate the excitation sweep to play through the speaker
    Sweep {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Measurement profile (name or path)
        #[arg(short, long)]
        profile: Option<String>,

        /// Peak amplitude (0-1]
        #[arg(long, default_value = "0.8")]
        amplitude: f64,
    },

    /// Generate the matched inverse filter
    Inverse {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Measurement profile (name or path)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Simulate a recording of the sweep in a reverberant room
    Room {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Reverberation time of the simulated room in seconds
        #[arg(long)]
        rt60: f64,

        /// Playback latency before the sweep starts, in milliseconds
        #[arg(long, default_value = "10.0")]
        delay_ms: f64,

        /// Seed for the room's noise tail
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Measurement profile (name or path)
        #[arg(short, long)]
        profile: Option<String>,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Sweep {
            output,
            profile,
            amplitude,
        } => {
            if !(amplitude > 0.0 && amplitude <= 1.0) {
                anyhow::bail!("Amplitude must be in (0, 1], got {}", amplitude);
            }

            let profile = load_profile(profile.as_deref())?;
            let params = profile.sweep_params();
            println!(
                "Generating sweep: {} Hz -> {} Hz, {:.2}s at {} Hz",
                params.f_start, params.f_end, params.duration_sec, profile.sweep.sample_rate
            );

            let mut sweep = generate_log_sweep(&params)?;
            for s in &mut sweep {
                *s *= amplitude;
            }

            write_wav(&output, &sweep, wav_spec(&profile))?;
            println!("Wrote {} samples to {}", sweep.len(), output.display());
        }

        GenerateCommand::Inverse { output, profile } => {
            let profile = load_profile(profile.as_deref())?;
            let params = profile.sweep_params();
            println!(
                "Generating inverse filter for {} Hz -> {} Hz, {:.2}s",
                params.f_start, params.f_end, params.duration_sec
            );

            let inverse = generate_inverse_filter(&params)?;
            write_wav(&output, &inverse, wav_spec(&profile))?;
            println!("Wrote {} samples to {}", inverse.len(), output.display());
        }

        GenerateCommand::Room {
            output,
            rt60,
            delay_ms,
            seed,
            profile,
        } => {
            if !(rt60 > 0.0 && rt60.is_finite()) {
                anyhow::bail!("RT60 must be > 0 s, got {}", rt60);
            }
            if !(delay_ms >= 0.0 && delay_ms.is_finite()) {
                anyhow::bail!("Delay must be >= 0 ms, got {}", delay_ms);
            }

            let profile = load_profile(profile.as_deref())?;
            let params = profile.sweep_params();
            let sample_rate = params.sample_rate;
            let delay_samples = (delay_ms / 1000.0 * sample_rate).round() as usize;

            println!(
                "Simulating room: RT60 {:.2}s, {:.1} ms latency, {} Hz",
                rt60, delay_ms, profile.sweep.sample_rate
            );

            let sweep = generate_log_sweep(&params)?;
            let room = simulate_room_ir(sample_rate, rt60, rt60 * 1.5, seed);
            let mut recording = simulate_recording(&sweep, &room, delay_samples);
            normalize_peak(&mut recording, 0.9);
            tracing::debug!(
                ir_len = room.len(),
                delay_samples,
                recording_len = recording.len(),
                "simulated recording"
            );

            write_wav(&output, &recording, wav_spec(&profile))?;
            println!(
                "Wrote {} samples ({:.2}s) to {}",
                recording.len(),
                recording.len() as f64 / sample_rate,
                output.display()
            );
        }
    }

    Ok(())
}
