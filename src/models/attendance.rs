use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceEntry {
    pub date: NaiveDate,
    pub name: String,
    pub arrival_time: NaiveTime,
}

impl AttendanceEntry {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.arrival_time.format("%H:%M").to_string()
    }
}
