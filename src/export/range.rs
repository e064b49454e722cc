use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

fn invalid(what: &str, raw: &str) -> AppError {
    AppError::InvalidDate(format!("{what}: {raw}"))
}

/// First and last day of one range endpoint (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
fn bounds_of(raw: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match raw.len() {
        4 => {
            let y: i32 = raw.parse().map_err(|_| invalid("invalid year", raw))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid("invalid year", raw))?;
            let last = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid("invalid year", raw))?;
            Ok((first, last))
        }
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
                .map_err(|_| invalid("invalid month", raw))?;
            let next = first
                .checked_add_months(chrono::Months::new(1))
                .ok_or_else(|| invalid("invalid month", raw))?;
            let last = next.pred_opt().ok_or_else(|| invalid("invalid month", raw))?;
            Ok((first, last))
        }
        10 => {
            let d = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid("invalid date", raw))?;
            Ok((d, d))
        }
        _ => Err(invalid("unsupported --range format", raw)),
    }
}

/// Parse `--range`.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();
    let Some((start, end)) = r.split_once(':') else {
        return bounds_of(r);
    };

    let (start, end) = (start.trim(), end.trim());
    if start.len() != end.len() {
        return Err(invalid("start and end must have the same format", r));
    }

    let (from, _) = bounds_of(start)?;
    let (_, to) = bounds_of(end)?;
    if from > to {
        return Err(invalid("range start is after its end", r));
    }
    Ok((from, to))
}
