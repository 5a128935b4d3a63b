//! Loading microphone calibration files from disk.

use crate::Result;
use roomsweep_analysis::{CalibrationData, parse_calibration_file};
use std::path::Path;

/// Read and parse a calibration file.
///
/// The file name (without directories) becomes the display name of the
/// returned [`CalibrationData`].
pub fn read_calibration<P: AsRef<Path>>(path: P) -> Result<CalibrationData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let data = parse_calibration_file(&text, &filename)?;
    tracing::debug!(path = %path.display(), points = data.points.len(), "read calibration");
    Ok(data)
}
