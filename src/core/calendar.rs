//! Appointment calendar for employees: availability, free slots, booking.

use crate::config::CalendarConfig;
use crate::db::appointments as store;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::utils::time::{add_minutes, format_clock, overlaps};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    Available,
    InPast,
    OutsideHours,
    Conflict(Appointment),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn describe(&self) -> String {
        match self {
            Availability::Available => "available".to_string(),
            Availability::InPast => "that time has already passed".to_string(),
            Availability::OutsideHours => "that time is outside office hours".to_string(),
            Availability::Conflict(a) => format!(
                "there is already a meeting with {} at {}",
                a.organizer,
                format_clock(a.start)
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Calendar {
    pub office_start: NaiveTime,
    pub office_end: NaiveTime,
    pub slot_minutes: i64,
    pub default_duration: i64,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            office_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            office_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_minutes: 30,
            default_duration: 30,
        }
    }
}

impl Calendar {
    pub fn from_config(cfg: &CalendarConfig) -> AppResult<Self> {
        let (office_start, office_end) = cfg.office_hours()?;
        Ok(Self {
            office_start,
            office_end,
            slot_minutes: cfg.slot_minutes,
            default_duration: cfg.default_duration,
        })
    }

    pub fn check_availability(
        &self,
        conn: &Connection,
        participant: &str,
        date: NaiveDate,
        start: NaiveTime,
        duration: i64,
        now: NaiveDateTime,
    ) -> AppResult<Availability> {
        if date.and_time(start) < now {
            return Ok(Availability::InPast);
        }

        let Some(end) = add_minutes(start, duration) else {
            return Ok(Availability::OutsideHours);
        };
        if start < self.office_start || end > self.office_end || end <= start {
            return Ok(Availability::OutsideHours);
        }

        let conflict = store::scheduled_for_participant(conn, participant, &date)?
            .into_iter()
            .find(|a| overlaps(start, end, a.start, a.end()));

        Ok(match conflict {
            Some(a) => Availability::Conflict(a),
            None => Availability::Available,
        })
    }

    /// Free start times for `participant` on `date`, in slot steps.
    pub fn available_slots(
        &self,
        conn: &Connection,
        participant: &str,
        date: NaiveDate,
        duration: i64,
        now: NaiveDateTime,
    ) -> AppResult<Vec<NaiveTime>> {
        let booked = store::scheduled_for_participant(conn, participant, &date)?;
        let mut slots = Vec::new();
        let mut t = self.office_start;

        while let Some(end) = add_minutes(t, duration) {
            if end > self.office_end {
                break;
            }
            let free = date.and_time(t) >= now
                && !booked.iter().any(|a| overlaps(t, end, a.start, a.end()));
            if free {
                slots.push(t);
            }

            match add_minutes(t, self.slot_minutes) {
                Some(next) if next > t => t = next,
                _ => break,
            }
        }

        Ok(slots)
    }

    /// Book an appointment after re-checking availability.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule(
        &self,
        conn: &Connection,
        organizer: &str,
        participant: &str,
        date: NaiveDate,
        start: NaiveTime,
        duration: i64,
        now: NaiveDateTime,
    ) -> AppResult<Appointment> {
        let availability =
            self.check_availability(conn, participant, date, start, duration, now)?;
        if !availability.is_available() {
            return Err(AppError::SlotUnavailable(format!(
                "{} on {} at {}: {}",
                participant,
                date,
                format_clock(start),
                availability.describe()
            )));
        }

        let mut appt = Appointment::new(organizer, participant, date, start, duration);
        appt.id = store::insert_appointment(conn, &appt)?;

        ttlog_quiet(
            conn,
            "appointment_add",
            &appt.id.to_string(),
            &format!(
                "{} with {} on {} at {}",
                appt.organizer,
                appt.participant,
                appt.date_str(),
                appt.time_str()
            ),
        );
        tracing::info!(id = appt.id, %organizer, %participant, "appointment scheduled");
        Ok(appt)
    }

    /// Cancel the earliest upcoming appointment of `person`, optionally
    /// restricted to a counterpart, a date and a start time. Nothing is
    /// cancelled when no appointment matches every given restriction.
    pub fn cancel_next(
        &self,
        conn: &Connection,
        person: &str,
        counterpart: Option<&str>,
        date: Option<NaiveDate>,
        start: Option<NaiveTime>,
        now: NaiveDateTime,
    ) -> AppResult<Option<Appointment>> {
        let candidate = self
            .upcoming_for(conn, person, now)?
            .into_iter()
            .filter(|a| date.is_none_or(|d| a.date == d))
            .filter(|a| start.is_none_or(|t| a.start == t))
            .find(|a| counterpart.is_none_or(|c| involves(a, c)));

        match candidate {
            Some(a) => Ok(Some(self.cancel(conn, a.id)?)),
            None => Ok(None),
        }
    }

    pub fn cancel(&self, conn: &Connection, id: i64) -> AppResult<Appointment> {
        let mut appt = store::get_appointment(conn, id)?.ok_or(AppError::AppointmentNotFound(id))?;
        if appt.status == AppointmentStatus::Cancelled {
            return Ok(appt);
        }

        store::set_status(conn, id, AppointmentStatus::Cancelled)?;
        appt.status = AppointmentStatus::Cancelled;

        ttlog_quiet(
            conn,
            "appointment_cancel",
            &id.to_string(),
            &format!("{} with {} on {}", appt.organizer, appt.participant, appt.date_str()),
        );
        Ok(appt)
    }

    /// Scheduled appointments involving `name` that have not started yet.
    pub fn upcoming_for(
        &self,
        conn: &Connection,
        name: &str,
        now: NaiveDateTime,
    ) -> AppResult<Vec<Appointment>> {
        Ok(store::scheduled_involving(conn, name, &now.date())?
            .into_iter()
            .filter(|a| a.starts_at() >= now)
            .collect())
    }

    pub fn list(
        &self,
        conn: &Connection,
        person: Option<&str>,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Appointment>> {
        Ok(store::list_appointments(conn, person, date.as_ref())?)
    }

    /// Closest free slots around a requested time, at most `n`.
    pub fn nearest_slots(slots: &[NaiveTime], wanted: NaiveTime, n: usize) -> Vec<NaiveTime> {
        let mut sorted: Vec<NaiveTime> = slots.to_vec();
        sorted.sort_by_key(|t| (*t - wanted).num_minutes().abs());
        sorted.truncate(n);
        sorted.sort();
        sorted
    }
}

/// True when `name` is either side of the appointment (full or first name).
fn involves(a: &Appointment, name: &str) -> bool {
    let n = name.trim().to_lowercase();
    [&a.organizer, &a.participant].iter().any(|p| {
        let p = p.to_lowercase();
        p == n || p.split_whitespace().next() == Some(n.as_str())
    })
}
