use crate::utils::time::add_minutes;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
}

impl AppointmentStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appointment {
    pub id: i64,
    pub organizer: String,   // ⇔ appointments.organizer
    pub participant: String, // ⇔ appointments.participant (the employee being met)
    pub date: NaiveDate,     // ⇔ appointments.date (TEXT "YYYY-MM-DD")
    pub start: NaiveTime,    // ⇔ appointments.start_time (TEXT "HH:MM")
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub created_at: String, // ISO 8601
}

impl Appointment {
    /// New scheduled appointment, not yet persisted (`id = 0`).
    pub fn new(
        organizer: &str,
        participant: &str,
        date: NaiveDate,
        start: NaiveTime,
        duration_minutes: i64,
    ) -> Self {
        Self {
            id: 0,
            organizer: organizer.to_string(),
            participant: participant.to_string(),
            date,
            start,
            duration_minutes,
            status: AppointmentStatus::Scheduled,
            created_at: Local::now().to_rfc3339(),
        }
    }

    /// End time; appointments running past midnight end at 23:59.
    pub fn end(&self) -> NaiveTime {
        add_minutes(self.start, self.duration_minutes)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(self.start))
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.start.format("%H:%M").to_string()
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}
