use crate::errors::{AppError, AppResult};
use crate::export::excel_date::{date_serial, time_fraction};
use crate::export::model::get_headers;
use crate::export::{AttendanceExport, notify_export_success};
use crate::ui::messages::info;
use crate::utils::date::parse_date;
use crate::utils::time::parse_time;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::collections::BTreeMap;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const HEADER_BG: u32 = 0x2F75B5;
const BAND: [u32; 2] = [0xEAF3FB, 0xFFFFFF];

fn cell(bg: u32) -> Format {
    Format::new()
        .set_background_color(Color::RGB(bg))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

fn header_row(sheet: &mut Worksheet, headers: &[&str]) -> AppResult<Vec<usize>> {
    let fmt = cell(HEADER_BG).set_bold().set_font_color(Color::RGB(0xFFFFFF));
    for (col, h) in headers.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *h, &fmt)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect())
}

fn fit_columns(sheet: &mut Worksheet, widths: &[usize]) -> AppResult<()> {
    for (c, w) in widths.iter().enumerate() {
        sheet.set_column_width(c as u16, *w as f64 + 2.0)?;
    }
    Ok(())
}

/// Two sheets: the arrivals, one row each, and a per-person summary with the
/// number of days present and the earliest/latest arrival.
pub(crate) fn export_xlsx(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    write_arrivals(workbook.add_worksheet().set_name("Arrivals")?, rows)?;
    write_summary(workbook.add_worksheet().set_name("Summary")?, rows)?;

    let target = path
        .to_str()
        .ok_or_else(|| AppError::Export(format!("invalid path: {}", path.display())))?;
    workbook.save(target)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_arrivals(sheet: &mut Worksheet, rows: &[AttendanceExport]) -> AppResult<()> {
    let mut widths = header_row(sheet, &get_headers())?;

    for (i, r) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        let bg = BAND[i % 2];

        match parse_date(&r.date).and_then(date_serial) {
            Some(serial) => {
                sheet.write_with_format(row, 0, serial, &cell(bg).set_num_format("yyyy-mm-dd"))?
            }
            None => sheet.write_with_format(row, 0, r.date.as_str(), &cell(bg))?,
        };
        sheet.write_with_format(row, 1, r.name.as_str(), &cell(bg))?;
        match parse_time(&r.arrival_time) {
            Some(t) => sheet.write_with_format(row, 2, time_fraction(t), &cell(bg).set_num_format("hh:mm"))?,
            None => sheet.write_with_format(row, 2, r.arrival_time.as_str(), &cell(bg))?,
        };

        widths[0] = widths[0].max(10);
        widths[1] = widths[1].max(UnicodeWidthStr::width(r.name.as_str()));
        widths[2] = widths[2].max(5);
    }

    fit_columns(sheet, &widths)
}

fn write_summary(sheet: &mut Worksheet, rows: &[AttendanceExport]) -> AppResult<()> {
    // name → (days, earliest, latest); HH:MM strings sort chronologically
    let mut per_person: BTreeMap<&str, (u32, &str, &str)> = BTreeMap::new();
    for r in rows {
        let t = r.arrival_time.as_str();
        per_person
            .entry(r.name.as_str())
            .and_modify(|(days, first, last)| {
                *days += 1;
                *first = (*first).min(t);
                *last = (*last).max(t);
            })
            .or_insert((1, t, t));
    }

    let mut widths = header_row(sheet, &["name", "days_present", "earliest", "latest"])?;
    for (i, (name, (days, first, last))) in per_person.iter().enumerate() {
        let row = (i + 1) as u32;
        let fmt = cell(BAND[i % 2]);
        sheet.write_with_format(row, 0, *name, &fmt)?;
        sheet.write_with_format(row, 1, *days, &fmt)?;
        sheet.write_with_format(row, 2, *first, &fmt)?;
        sheet.write_with_format(row, 3, *last, &fmt)?;
        widths[0] = widths[0].max(UnicodeWidthStr::width(*name));
    }

    fit_columns(sheet, &widths)
}
