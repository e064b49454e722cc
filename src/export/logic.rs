use crate::db::attendance::arrivals_between;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::AttendanceExport;
use crate::export::range::parse_range;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export attendance records.
    ///
    /// - `file`: absolute output path
    /// - `range`: `None`, `"all"` or one of `YYYY`, `YYYY-MM`, `YYYY-MM-DD`,
    ///   `YYYY:YYYY`, `YYYY-MM:YYYY-MM`, `YYYY-MM-DD:YYYY-MM-DD`
    ///
    /// Returns the number of rows written.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !ext.eq_ignore_ascii_case(format.as_str()) {
            warning(format!(
                "Writing {} data to a file named '{}'.",
                format.as_str().to_uppercase(),
                path.display()
            ));
        }

        ensure_writable(path, force)?;

        let bounds = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let rows = load_rows(pool, bounds)?;

        if rows.is_empty() {
            warning("No attendance found for the selected range.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, path)?,
        }

        tracing::info!(format = format.as_str(), rows = rows.len(), file, "attendance exported");
        Ok(rows.len())
    }
}

fn load_rows(
    pool: &mut DbPool,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<AttendanceExport>> {
    let everything = NaiveDate::from_ymd_opt(1, 1, 1).zip(NaiveDate::from_ymd_opt(9999, 12, 31));
    let Some((from, to)) = bounds.or(everything) else {
        return Ok(Vec::new());
    };
    let entries = arrivals_between(&pool.conn, &from, &to)?;
    Ok(entries.iter().map(AttendanceExport::from).collect())
}
