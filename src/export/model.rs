use crate::models::attendance::AttendanceEntry;
use serde::Serialize;

/// Flat attendance row for CSV / JSON / XLSX.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AttendanceExport {
    pub date: String,
    pub name: String,
    pub arrival_time: String,
}

impl From<&AttendanceEntry> for AttendanceExport {
    fn from(e: &AttendanceEntry) -> Self {
        Self {
            date: e.date_str(),
            name: e.name.clone(),
            arrival_time: e.time_str(),
        }
    }
}

pub(crate) fn get_headers() -> Vec<&'static str> {
    vec!["date", "name", "arrival_time"]
}
