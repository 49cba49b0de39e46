//! Excel export of an asteroid list.

use crate::error::ExportError;
use crate::models::AsteroidObservation;
use crate::range::DateRange;
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::info;

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Asteroids";

pub const HEADERS: [&str; 6] = [
    "Name",
    "Estimated Diameter (km)",
    "Potentially Hazardous",
    "Close Approach Date",
    "Miss Distance (km)",
    "Orbiting Body",
];

/// A finished spreadsheet, ready to hand to the user.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
    pub range: DateRange,
}

impl ExportArtifact {
    /// Writes the artifact into `dir` under its filename.
    ///
    /// The bytes go to a temporary file first and are renamed into place, so
    /// a failed write never leaves a truncated workbook behind. The temporary
    /// file is removed when either step fails. Blocking; async callers should
    /// run it on the blocking pool.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(&self.filename);
        let temp_path = path.with_extension("xlsx.tmp");
        if let Err(e) = std::fs::write(&temp_path, &self.bytes).and_then(|_| std::fs::rename(&temp_path, &path)) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        info!("Wrote export {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

pub fn export_filename(range: &DateRange) -> String {
    format!("Asteroids_{}.xlsx", range.compact())
}

/// Serializes `observations` into a single-sheet workbook, one row each in
/// input order below a bold header row.
pub fn export_asteroids_to_spreadsheet(
    observations: &[AsteroidObservation],
    range: &DateRange,
) -> Result<ExportArtifact, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }

    for (i, obs) in observations.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, obs.name.as_str())?;
        worksheet.write_number(row, 1, obs.estimated_diameter_km)?;
        worksheet.write_string(row, 2, if obs.is_potentially_hazardous { "Yes" } else { "No" })?;
        if let Some(day) = obs.close_approach_date {
            let cell = ExcelDateTime::from_ymd(day.year() as u16, day.month() as u8, day.day() as u8)?;
            worksheet.write_datetime_with_format(row, 3, &cell, &date_format)?;
        }
        worksheet.write_number(row, 4, obs.miss_distance_km)?;
        if let Some(body) = obs.orbiting_body.as_deref() {
            worksheet.write_string(row, 5, body)?;
        }
    }

    worksheet.autofit();

    let bytes = workbook.save_to_buffer()?;
    Ok(ExportArtifact {
        bytes,
        filename: export_filename(range),
        content_type: XLSX_CONTENT_TYPE,
        range: *range,
    })
}
