//! Employee calendar requests: book, cancel and list meetings.

use crate::core::calendar::Calendar;
use crate::dialogue::context::{PendingAction, Speaker};
use crate::dialogue::engine::{DialogueEngine, Reply, not_found, same_person};
use crate::dialogue::extract::{AppointmentRequest, extract_appointment_details, extract_name_from_request};
use crate::dialogue::intents::{self, AppointmentIntent, Utterance};
use crate::errors::{AppError, AppResult};
use crate::models::appointment::Appointment;
use crate::utils::date::spoken_date;
use crate::utils::formatting::join_spoken;
use crate::utils::time::format_clock;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Free times read out when offering slots.
const OFFERED_SLOTS: usize = 5;
const LISTED_MEETINGS: usize = 3;

/// "today", "tomorrow" or "on Monday, October 20".
fn day_phrase(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "today".to_string()
    } else if date == today + Duration::days(1) {
        "tomorrow".to_string()
    } else {
        format!("on {}", spoken_date(date))
    }
}

fn clocks(slots: &[NaiveTime]) -> String {
    let spoken: Vec<String> = slots.iter().map(|t| format_clock(*t)).collect();
    join_spoken(&spoken)
}

/// The other side of an appointment, seen from `me`.
fn counterpart<'a>(a: &'a Appointment, me: &str) -> &'a str {
    if same_person(&a.organizer, me) {
        &a.participant
    } else {
        &a.organizer
    }
}

impl DialogueEngine {
    pub(super) fn handle_appointments(
        &mut self,
        u: &Utterance,
        now: NaiveDateTime,
    ) -> AppResult<Option<Reply>> {
        let Some(intent) = intents::appointment_intent(u) else {
            return Ok(None);
        };

        let request = extract_appointment_details(u.raw(), now.date());

        let Speaker::Employee(organizer) = self.context.speaker.clone() else {
            // Visitors cannot book; naming someone means "tell them I'm here".
            let name = request
                .person
                .or_else(|| extract_name_from_request(u.raw()));
            return Ok(name.map(|n| self.notify_visitor_arrival(&n)));
        };

        let reply = match intent {
            AppointmentIntent::Schedule => self.schedule_meeting(&organizer, request, now)?,
            AppointmentIntent::Cancel => self.cancel_meeting(&organizer, &request, now)?,
            AppointmentIntent::Check => self.list_meetings(&organizer, &request, now)?,
        };
        Ok(Some(reply))
    }

    fn schedule_meeting(
        &mut self,
        organizer: &str,
        request: AppointmentRequest,
        now: NaiveDateTime,
    ) -> AppResult<Reply> {
        let Some(person) = request.person else {
            return Ok(Reply::say("Who would you like to meet with?"));
        };
        let Some(emp) = self.directory.search(&self.pool.conn, &person) else {
            return Ok(Reply::say(not_found(&person)));
        };
        if same_person(&emp.name, organizer) {
            return Ok(Reply::say("You can't schedule a meeting with yourself."));
        }

        let today = now.date();
        let date = request.date.unwrap_or(today);
        let day = day_phrase(date, today);
        let duration = self.calendar.default_duration;

        let mut reason = None;
        if let Some(time) = request.time {
            let availability = self.calendar.check_availability(
                &self.pool.conn,
                &emp.name,
                date,
                time,
                duration,
                now,
            )?;
            if availability.is_available() {
                return self.book(organizer, &emp.name, date, time, duration, now);
            }
            reason = Some((time, availability.describe()));
        }

        let slots = self
            .calendar
            .available_slots(&self.pool.conn, &emp.name, date, duration, now)?;
        if slots.is_empty() {
            return Ok(Reply::say(format!(
                "Sorry, {} has no free time left {day}.",
                emp.name
            )));
        }

        let text = match reason {
            Some((wanted, why)) => format!(
                "Sorry, {why}. The closest free times with {} {day} are {}. Which one works for you?",
                emp.name,
                clocks(&Calendar::nearest_slots(&slots, wanted, 3))
            ),
            None => format!(
                "{} is free {day} at {}. Which time works for you?",
                emp.name,
                clocks(&slots[..slots.len().min(OFFERED_SLOTS)])
            ),
        };

        self.context.set_pending(PendingAction::AwaitingTimeSelection {
            participant: emp.name,
            date,
            slots,
            duration,
        });
        Ok(Reply::say(text))
    }

    pub(super) fn book(
        &mut self,
        organizer: &str,
        participant: &str,
        date: NaiveDate,
        time: NaiveTime,
        duration: i64,
        now: NaiveDateTime,
    ) -> AppResult<Reply> {
        match self
            .calendar
            .schedule(&self.pool.conn, organizer, participant, date, time, duration, now)
        {
            Ok(appt) => Ok(Reply::say(format!(
                "Done! I've scheduled your meeting with {} {} at {}.",
                appt.participant,
                day_phrase(appt.date, now.date()),
                format_clock(appt.start)
            ))
            .handled()),
            Err(AppError::SlotUnavailable(detail)) => {
                tracing::info!(%detail, "slot taken before booking");
                Ok(Reply::say(
                    "Sorry, that time is no longer available. Please ask me again for free slots.",
                ))
            }
            Err(e) => Err(e),
        }
    }

    fn cancel_meeting(
        &mut self,
        organizer: &str,
        request: &AppointmentRequest,
        now: NaiveDateTime,
    ) -> AppResult<Reply> {
        let cancelled = self.calendar.cancel_next(
            &self.pool.conn,
            organizer,
            request.person.as_deref(),
            request.date,
            request.time,
            now,
        )?;

        Ok(match cancelled {
            Some(a) => Reply::say(format!(
                "I've cancelled your meeting with {} {} at {}.",
                counterpart(&a, organizer),
                day_phrase(a.date, now.date()),
                format_clock(a.start)
            ))
            .handled(),
            None => match request.time {
                Some(t) => Reply::say(format!(
                    "I couldn't find a meeting of yours at {}, so nothing was cancelled.",
                    format_clock(t)
                )),
                None => Reply::say("I couldn't find an upcoming meeting to cancel."),
            },
        })
    }

    fn list_meetings(
        &self,
        organizer: &str,
        request: &AppointmentRequest,
        now: NaiveDateTime,
    ) -> AppResult<Reply> {
        let today = now.date();
        let upcoming: Vec<Appointment> = self
            .calendar
            .upcoming_for(&self.pool.conn, organizer, now)?
            .into_iter()
            .filter(|a| request.date.is_none_or(|d| a.date == d))
            .collect();

        if upcoming.is_empty() {
            return Ok(Reply::say(match request.date {
                Some(d) => format!("You have no meetings {}.", day_phrase(d, today)),
                None => "You have no upcoming meetings.".to_string(),
            }));
        }

        let items: Vec<String> = upcoming
            .iter()
            .take(LISTED_MEETINGS)
            .map(|a| {
                format!(
                    "with {} {} at {}",
                    counterpart(a, organizer),
                    day_phrase(a.date, today),
                    format_clock(a.start)
                )
            })
            .collect();

        let count = upcoming.len();
        let noun = if count == 1 { "meeting" } else { "meetings" };
        let text = if count > LISTED_MEETINGS {
            format!(
                "You have {count} upcoming {noun}. The next {LISTED_MEETINGS} are {}.",
                join_spoken(&items)
            )
        } else {
            format!("You have {count} upcoming {noun}: {}.", join_spoken(&items))
        };
        Ok(Reply::say(text))
    }
}
