//! Export formats for measurement results.
//!
//! Provides interoperability with standard audio measurement tools:
//! - FRD format (frequency response data, compatible with REW and with
//!   the calibration file parser)
//! - CSV format for generic data exchange
//! - JSON summary of the scalar results

use crate::Result;
use roomsweep_analysis::{FrequencyPoint, MeasurementResult, WaterfallData};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn create(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn finish(mut out: BufWriter<File>, path: &Path, what: &str) -> Result<()> {
    out.flush()?;
    tracing::debug!(path = %path.display(), "exported {what}");
    Ok(())
}

fn write_response_csv<W: Write>(out: &mut W, points: &[FrequencyPoint]) -> std::io::Result<()> {
    writeln!(out, "frequency_hz,magnitude_db")?;
    for p in points {
        writeln!(out, "{:.4},{:.4}", p.freq, p.db)?;
    }
    Ok(())
}

fn write_response_frd<W: Write>(out: &mut W, points: &[FrequencyPoint]) -> std::io::Result<()> {
    writeln!(out, "* Frequency Response Data exported by roomsweep")?;
    writeln!(out, "* Frequency(Hz) Magnitude(dB) Phase(deg)")?;
    for p in points {
        writeln!(out, "{:.6} {:.6} 0.0", p.freq, p.db)?;
    }
    Ok(())
}

fn write_edc_csv<W: Write>(out: &mut W, edc_db: &[f64], sample_rate: f64) -> std::io::Result<()> {
    writeln!(out, "time_s,edc_db")?;
    for (i, db) in edc_db.iter().enumerate() {
        writeln!(out, "{:.6},{:.4}", i as f64 / sample_rate, db)?;
    }
    Ok(())
}

fn write_waterfall_csv<W: Write>(out: &mut W, data: &WaterfallData) -> std::io::Result<()> {
    // Header row with frequencies
    write!(out, "time_s")?;
    for f in &data.frequencies {
        write!(out, ",{:.2}", f)?;
    }
    writeln!(out)?;

    for slice in &data.slices {
        write!(out, "{:.6}", slice.time_sec)?;
        for db in &slice.magnitude_db {
            write!(out, ",{:.4}", db)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Export a frequency response as CSV (`frequency_hz,magnitude_db`).
pub fn export_response_csv(path: impl AsRef<Path>, points: &[FrequencyPoint]) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    write_response_csv(&mut out, points)?;
    finish(out, path, "response CSV")
}

/// Export a frequency response in FRD format (REW compatible).
///
/// FRD is a simple text format: `*` comment lines, then one
/// `frequency_hz magnitude_db phase_deg` triple per line. Phase is not
/// measured and written as 0. Calibration files use the same layout, so
/// an exported response can be loaded back as a correction curve.
pub fn export_response_frd(path: impl AsRef<Path>, points: &[FrequencyPoint]) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    write_response_frd(&mut out, points)?;
    finish(out, path, "response FRD")
}

/// Export an energy decay curve as CSV (`time_s,edc_db`).
pub fn export_edc_csv(path: impl AsRef<Path>, edc_db: &[f64], sample_rate: f64) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    write_edc_csv(&mut out, edc_db, sample_rate)?;
    finish(out, path, "EDC CSV")
}

/// Export a waterfall as CSV.
///
/// First row is `time_s` followed by the frequency grid; each further row
/// is one slice: its start time, then its levels in dB.
pub fn export_waterfall_csv(path: impl AsRef<Path>, data: &WaterfallData) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    write_waterfall_csv(&mut out, data)?;
    finish(out, path, "waterfall CSV")
}

/// Impulse response metadata in a [`MeasurementSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpulseSummary {
    /// Index of the deconvolution peak in the raw output.
    pub peak_index: usize,
    /// Extracted IR length in samples.
    pub length_samples: usize,
    /// Extracted IR length in seconds.
    pub duration_sec: f64,
}

/// Reverberation time in a [`MeasurementSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverbSummary {
    /// Reported RT60 in seconds.
    pub rt60_sec: f64,
    /// T20-based estimate in seconds.
    pub t20_sec: f64,
    /// T30-based estimate in seconds, when the decay range allowed one.
    pub t30_sec: Option<f64>,
    /// EDC tail level in dB.
    pub noise_floor_db: f64,
}

/// A detected peak in a [`MeasurementSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSummary {
    /// Frequency in Hz.
    pub freq_hz: f64,
    /// Level in dB.
    pub db: f64,
    /// Prominence in dB.
    pub prominence_db: f64,
    /// Band label, if the peak fell in one.
    pub band: Option<String>,
}

/// Scalar results of one measurement, serialized as `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSummary {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Calibration file applied, if any.
    pub calibration: Option<String>,
    /// IR metadata; `None` when the recording held no signal.
    pub impulse: Option<ImpulseSummary>,
    /// RT60; `None` when the decay range was insufficient.
    pub reverb: Option<ReverbSummary>,
    /// Detected peaks, most prominent first.
    pub peaks: Vec<PeakSummary>,
}

impl MeasurementSummary {
    /// Summarize an analysis result.
    pub fn from_result(result: &MeasurementResult, calibration: Option<&str>) -> Self {
        Self {
            sample_rate: result.sample_rate,
            calibration: calibration.map(str::to_owned),
            impulse: result.impulse.as_ref().map(|imp| ImpulseSummary {
                peak_index: imp.peak_index,
                length_samples: imp.ir.len(),
                duration_sec: imp.duration_secs(result.sample_rate),
            }),
            reverb: result.rt60.as_ref().map(|rt| ReverbSummary {
                rt60_sec: rt.rt60,
                t20_sec: rt.t20,
                t30_sec: rt.t30,
                noise_floor_db: rt.noise_floor_db,
            }),
            peaks: result
                .peaks
                .iter()
                .map(|p| PeakSummary {
                    freq_hz: p.freq,
                    db: p.db,
                    prominence_db: p.prominence,
                    band: p.band.clone(),
                })
                .collect(),
        }
    }
}

/// Export a measurement summary as pretty-printed JSON.
pub fn export_summary_json(path: impl AsRef<Path>, summary: &MeasurementSummary) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, summary)?;
    writeln!(out)?;
    finish(out, path, "summary JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsweep_analysis::{WaterfallSlice, parse_calibration_file};

    fn points() -> Vec<FrequencyPoint> {
        vec![
            FrequencyPoint::new(20.0, -3.0),
            FrequencyPoint::new(1000.0, 0.0),
            FrequencyPoint::new(20000.0, -1.5),
        ]
    }

    #[test]
    fn test_response_csv_layout() {
        let mut out = Vec::new();
        write_response_csv(&mut out, &points()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "frequency_hz,magnitude_db");
        assert_eq!(lines[1], "20.0000,-3.0000");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_frd_reads_back_as_calibration() {
        let mut out = Vec::new();
        write_response_frd(&mut out, &points()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let cal = parse_calibration_file(&text, "response.frd").unwrap();
        assert_eq!(cal.points.len(), 3);
        assert_eq!(cal.points[2].freq, 20000.0);
        assert_eq!(cal.points[2].db, -1.5);
    }

    #[test]
    fn test_edc_csv_times() {
        let mut out = Vec::new();
        write_edc_csv(&mut out, &[0.0, -1.0, -2.0], 1000.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time_s,edc_db");
        assert_eq!(lines[3], "0.002000,-2.0000");
    }

    #[test]
    fn test_waterfall_csv_shape() {
        let data = WaterfallData {
            slices: vec![
                WaterfallSlice {
                    time_sec: 0.0,
                    magnitude_db: vec![-1.0, -2.0],
                },
                WaterfallSlice {
                    time_sec: 0.01,
                    magnitude_db: vec![-3.0, -4.0],
                },
            ],
            frequencies: vec![100.0, 1000.0],
            max_db: -1.0,
        };
        let mut out = Vec::new();
        write_waterfall_csv(&mut out, &data).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "time_s,100.00,1000.00");
        assert_eq!(lines[2], "0.010000,-3.0000,-4.0000");
    }

    #[test]
    fn test_summary_of_unavailable_result() {
        let result = MeasurementResult {
            sample_rate: 48000.0,
            impulse: None,
            raw_response: Vec::new(),
            response: Vec::new(),
            edc_db: Vec::new(),
            rt60: None,
            peaks: Vec::new(),
            waterfall: None,
        };
        let summary = MeasurementSummary::from_result(&result, Some("mic.txt"));
        assert!(summary.impulse.is_none());
        assert!(summary.reverb.is_none());
        assert_eq!(summary.calibration.as_deref(), Some("mic.txt"));

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"impulse\":null"));
    }
}
