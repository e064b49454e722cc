use chrono::{NaiveDate, NaiveTime, Timelike};

/// Days since the Excel epoch (1899-12-30).
pub(crate) fn date_serial(d: NaiveDate) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    Some((d - epoch).num_days() as f64)
}

/// Fraction of the day, as Excel stores times.
pub(crate) fn time_fraction(t: NaiveTime) -> f64 {
    t.num_seconds_from_midnight() as f64 / 86400.0
}
