//! Questions about people: presence, directory details, visits.

use crate::agents::llm::{employee_extraction_prompt, extract_json_object, parse_field_name};
use crate::core::attendance;
use crate::dialogue::context::{PendingAction, Speaker};
use crate::dialogue::engine::{DialogueEngine, Reply, not_found, same_person};
use crate::dialogue::extract::{
    FieldRequest, RequestedField, extract_field_and_name, extract_name_from_request,
    extract_presence_name, extract_presence_subject,
};
use crate::dialogue::intents::{self, Utterance};
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::utils::formatting::join_spoken;
use crate::utils::time::format_clock;
use crate::utils::title_case;
use chrono::NaiveDateTime;

const SALARY_REFUSAL: &str = "I'm sorry, salary information cannot be shared.";

impl DialogueEngine {
    /// Attendance questions. Employees only; visitors get name verification later.
    pub(super) fn handle_presence(
        &mut self,
        u: &Utterance,
        now: NaiveDateTime,
    ) -> AppResult<Option<Reply>> {
        if !self.context.speaker.is_employee() || !intents::is_presence_query(u) {
            return Ok(None);
        }
        let list_query = intents::is_present_list_query(u);
        // "here to meet Priya", "ask Priya to come": a visit, not an attendance check
        if !list_query
            && intents::is_meeting_request(u)
            && extract_presence_subject(u.raw()).is_none()
        {
            return Ok(None);
        }
        let today = now.date();

        if list_query {
            let present = attendance::present_on(&self.pool.conn, today)?;
            if present.is_empty() {
                return Ok(Some(Reply::say(
                    "No employees are recorded as present today.",
                )));
            }
            let items: Vec<String> = present
                .iter()
                .map(|e| format!("{} (arrived at {})", e.name, format_clock(e.arrival_time)))
                .collect();
            return Ok(Some(Reply::say(format!(
                "Today, the following employees are present: {}.",
                join_spoken(&items)
            ))));
        }

        let Some(name) = extract_presence_name(u.raw()) else {
            return Ok(Some(Reply::say(
                "Whose attendance would you like me to check? You can also ask who is present today.",
            )));
        };

        let name = self
            .directory
            .search(&self.pool.conn, &name)
            .map(|e| e.name)
            .unwrap_or(name);

        let reply = match attendance::lookup(&self.pool.conn, &name, today)? {
            Some(arrived) => format!(
                "Yes, {name} is present today. They arrived at {}.",
                format_clock(arrived)
            ),
            None => format!("No, {name} is not present today according to our attendance records."),
        };
        Ok(Some(Reply::say(reply)))
    }

    pub(super) fn handle_employee_details(&mut self, u: &Utterance) -> Option<Reply> {
        if !self.context.speaker.is_employee() || !intents::is_employee_detail_query(u) {
            return None;
        }
        if intents::asks_salary(u) {
            return Some(Reply::say(SALARY_REFUSAL));
        }

        let request = self.field_request(u.raw());
        let Some(name) = request.name else {
            return Some(Reply::say("Which employee would you like to know about?"));
        };
        let Some(emp) = self.directory.search(&self.pool.conn, &name) else {
            return Some(Reply::say(not_found(&name)));
        };
        Some(Reply::say(describe(&emp, request.field)))
    }

    /// Field and name asked about: the model's structured answer when it
    /// gives one, the keyword heuristics otherwise.
    fn field_request(&mut self, text: &str) -> FieldRequest {
        let heuristic = extract_field_and_name(text);

        let answer = match self.model.ask(&employee_extraction_prompt(text)) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!(error = %e, "field extraction falls back to heuristics");
                return heuristic;
            }
        };

        let Some((field, name)) = extract_json_object(&answer).and_then(|o| parse_field_name(&o))
        else {
            tracing::debug!(%answer, "no field/name object in model answer");
            return heuristic;
        };

        FieldRequest {
            field: if field.is_empty() {
                heuristic.field
            } else {
                RequestedField::from_key(&field)
            },
            name: if name.is_empty() {
                heuristic.name
            } else {
                Some(title_case(&name))
            },
        }
    }

    /// Visitors asking for contact or HR data.
    pub(super) fn handle_visitor_sensitive(&mut self, u: &Utterance) -> Option<Reply> {
        if self.context.speaker.is_employee() || !intents::is_sensitive_request(u) {
            return None;
        }
        let Some(name) = extract_name_from_request(u.raw()) else {
            return Some(Reply::say(
                "I'm sorry, I didn't catch the name. Could you please repeat the name of the person you want to meet?",
            ));
        };
        self.context
            .set_pending(PendingAction::AwaitingNotifyConfirmation { name: name.clone() });
        Some(Reply::say(format!(
            "I'm sorry, I can't provide you that information. Do you want me to notify {name} that you are here?"
        )))
    }

    pub(super) fn handle_meeting_request(
        &mut self,
        u: &Utterance,
        now: NaiveDateTime,
    ) -> AppResult<Option<Reply>> {
        if !intents::is_meeting_request(u) {
            return Ok(None);
        }
        let name = extract_name_from_request(u.raw());

        let Speaker::Employee(me) = self.context.speaker.clone() else {
            return Ok(Some(match name {
                Some(name) => self.notify_visitor_arrival(&name),
                None => Reply::say(
                    "I'm sorry, I didn't catch the name. Could you please repeat the name of the person you want to meet?",
                ),
            }));
        };

        let Some(name) = name else {
            return Ok(None);
        };
        let Some(emp) = self.directory.search(&self.pool.conn, &name) else {
            return Ok(Some(Reply::say(not_found(&name))));
        };
        if same_person(&emp.name, &me) {
            return Ok(Some(Reply::say(format!(
                "That's you, {me}! Is there someone else you'd like to meet?"
            ))));
        }

        if attendance::lookup(&self.pool.conn, &emp.name, now.date())?.is_some() {
            let body = format!("{me} is at the reception and would like to meet you.");
            let reply = match self.notify_employee(&emp, &body) {
                Some(_) => Reply::say(format!(
                    "Yes, {} is available. I've notified them that you're here. Please wait a moment.",
                    emp.name
                ))
                .handled(),
                None => Reply::say(format!(
                    "Yes, {} is in the office today, but I couldn't notify them (no mobile number found).",
                    emp.name
                )),
            };
            return Ok(Some(reply));
        }

        self.notify_receptionist(&format!(
            "Reception: {me} would like to meet {}, who is not in the office today.",
            emp.name
        ));
        Ok(Some(
            Reply::say(format!(
                "{} is not in the office today. I will inform our receptionist, {}. Please take a seat.",
                emp.name, self.settings.receptionist
            ))
            .handled(),
        ))
    }
}

/// Natural-language answer for one field, or a short profile.
fn describe(emp: &Employee, field: RequestedField) -> String {
    match field {
        RequestedField::Salary => SALARY_REFUSAL.to_string(),
        RequestedField::Field(f) => {
            let value = emp.field(f).trim();
            if value.is_empty() {
                format!("I don't have {}'s {} on record.", emp.name, f.label())
            } else {
                format!("{}'s {} is {}.", emp.name, f.label(), value)
            }
        }
        RequestedField::General => {
            let mut parts = Vec::new();
            match (emp.position.trim(), emp.department.trim()) {
                ("", "") => {}
                ("", dept) => parts.push(format!("works in the {dept} department")),
                (pos, "") => parts.push(format!("works as {pos}")),
                (pos, dept) => parts.push(format!("works as {pos} in the {dept} department")),
            }
            if !emp.email.trim().is_empty() {
                parts.push(format!("can be reached at {}", emp.email.trim()));
            }
            if parts.is_empty() {
                format!("{} is one of our employees.", emp.name)
            } else {
                format!("{} {}.", emp.name, join_spoken(&parts))
            }
        }
    }
}
