mod common;
use chrono::{NaiveDate, NaiveTime};
use common::monday;
use rreception::dialogue::extract::{
    AppointmentRequest, RequestedField, extract_appointment_details, extract_denied_name,
    extract_field_and_name, extract_identity_claim, extract_name_from_request,
    extract_presence_name, extract_presence_subject, parse_date_string, parse_time_string,
};
use rreception::models::employee::EmployeeField;

fn t(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, day)
}

#[test]
fn test_time_with_meridiem() {
    assert_eq!(parse_time_string("3 PM"), t(15, 0));
    assert_eq!(parse_time_string("at 3:30 p.m."), t(15, 30));
    assert_eq!(parse_time_string("10am"), t(10, 0));
    assert_eq!(parse_time_string("12 am"), t(0, 0));
    assert_eq!(parse_time_string("12 pm"), t(12, 0));
}

#[test]
fn test_time_without_meridiem_uses_office_hours() {
    assert_eq!(parse_time_string("at 4"), t(16, 0));
    assert_eq!(parse_time_string("at 9"), t(9, 0));
    assert_eq!(parse_time_string("15:45"), t(15, 45));
    assert_eq!(parse_time_string("2:15"), t(14, 15));
    assert_eq!(parse_time_string("11 o'clock"), t(11, 0));
    assert_eq!(parse_time_string("5"), t(17, 0));
    assert_eq!(parse_time_string("around noon"), t(12, 0));
}

#[test]
fn test_time_absent() {
    assert_eq!(parse_time_string("whenever you like"), None);
    assert_eq!(parse_time_string("at 25"), None);
}

#[test]
fn test_relative_dates() {
    let today = monday();
    assert_eq!(parse_date_string("today please", today), Some(today));
    assert_eq!(parse_date_string("tomorrow", today), d(2025, 10, 21));
    assert_eq!(parse_date_string("the day after tomorrow", today), d(2025, 10, 22));
}

#[test]
fn test_weekday_is_next_occurrence() {
    let today = monday();
    assert_eq!(parse_date_string("on Friday", today), d(2025, 10, 24));
    // the same weekday means next week
    assert_eq!(parse_date_string("on monday", today), d(2025, 10, 27));
}

#[test]
fn test_calendar_dates() {
    let today = monday();
    assert_eq!(parse_date_string("2025-11-03", today), d(2025, 11, 3));
    assert_eq!(parse_date_string("on 21st October", today), d(2025, 10, 21));
    assert_eq!(parse_date_string("November 5th", today), d(2025, 11, 5));
    // already past this year
    assert_eq!(parse_date_string("on 3 March", today), d(2026, 3, 3));
    assert_eq!(parse_date_string("sometime soon", today), None);
}

#[test]
fn test_appointment_details() {
    let req = extract_appointment_details("Schedule a meeting with Priya tomorrow at 3 pm", monday());
    assert_eq!(
        req,
        AppointmentRequest {
            person: Some("Priya".to_string()),
            date: d(2025, 10, 21),
            time: t(15, 0),
        }
    );

    let req = extract_appointment_details("book an appointment for Ramu Kumar on Friday", monday());
    assert_eq!(req.person.as_deref(), Some("Ramu Kumar"));
    assert_eq!(req.date, d(2025, 10, 24));
    assert_eq!(req.time, None);
}

#[test]
fn test_name_from_request() {
    assert_eq!(extract_name_from_request("I want to meet Ramu").as_deref(), Some("Ramu"));
    assert_eq!(
        extract_name_from_request("what is the email of priya sharma").as_deref(),
        Some("Priya Sharma")
    );
    assert_eq!(extract_name_from_request("Who is Anil?").as_deref(), Some("Anil"));
    assert_eq!(
        extract_name_from_request("I'm looking for Mr Sharma please").as_deref(),
        Some("Sharma")
    );
    assert_eq!(extract_name_from_request("hello"), None);
}

#[test]
fn test_presence_name() {
    assert_eq!(extract_presence_name("Is Ramu present today?").as_deref(), Some("Ramu"));
    assert_eq!(extract_presence_name("did priya come in today").as_deref(), Some("Priya"));
    assert_eq!(extract_presence_name("Has Anil arrived?").as_deref(), Some("Anil"));
    assert_eq!(extract_presence_name("does Meena work here").as_deref(), Some("Meena"));
}

#[test]
fn test_presence_subject_needs_an_attendance_question() {
    assert_eq!(extract_presence_subject("Is Priya here?").as_deref(), Some("Priya"));
    assert_eq!(extract_presence_subject("I'm here to meet Priya"), None);
    assert_eq!(extract_presence_subject("Can you ask Priya to come to the reception"), None);
    assert_eq!(
        extract_name_from_request("Can you ask Priya to come to the reception").as_deref(),
        Some("Priya")
    );
}

#[test]
fn test_identity_claims() {
    assert_eq!(extract_identity_claim("My name is Priya").as_deref(), Some("Priya"));
    assert_eq!(extract_identity_claim("Hi, I am John Doe").as_deref(), Some("John Doe"));
    assert_eq!(extract_identity_claim("call me Sam").as_deref(), Some("Sam"));
    assert_eq!(extract_identity_claim("I’m Ravi").as_deref(), Some("Ravi"));
}

#[test]
fn test_identity_claim_after_denial() {
    assert_eq!(extract_identity_claim("I am not Ramu, I am Priya").as_deref(), Some("Priya"));
    assert_eq!(
        extract_identity_claim("I'm not Ramu I'm Priya Sharma").as_deref(),
        Some("Priya Sharma")
    );
    assert_eq!(extract_identity_claim("No, I'm not Ramu. It's Meena.").as_deref(), Some("Meena"));
    assert_eq!(extract_identity_claim("I am not feeling well"), None);
}

#[test]
fn test_states_are_not_identity_claims() {
    assert_eq!(extract_identity_claim("I'm fine"), None);
    assert_eq!(extract_identity_claim("I am looking for the HR department"), None);
    assert_eq!(extract_identity_claim("I am here to meet Ramu"), None);
    assert_eq!(extract_identity_claim("I'm not Ramu"), None);
}

#[test]
fn test_denied_name() {
    assert_eq!(extract_denied_name("I'm not Ramu").as_deref(), Some("Ramu"));
    assert_eq!(extract_denied_name("no, I am not Priya Sharma").as_deref(), Some("Priya Sharma"));
    assert_eq!(extract_denied_name("I am Priya"), None);
}

#[test]
fn test_field_and_name() {
    let req = extract_field_and_name("What is Priya's email?");
    assert_eq!(req.field, RequestedField::Field(EmployeeField::Email));
    assert_eq!(req.name.as_deref(), Some("Priya"));

    let req = extract_field_and_name("tell me about Ramu");
    assert_eq!(req.field, RequestedField::General);
    assert_eq!(req.name.as_deref(), Some("Ramu"));

    let req = extract_field_and_name("which department is Meena in");
    assert_eq!(req.field, RequestedField::Field(EmployeeField::Department));

    assert_eq!(RequestedField::from_key("ctc"), RequestedField::Salary);
    assert_eq!(
        RequestedField::from_key("join_date"),
        RequestedField::Field(EmployeeField::JoinDate)
    );
}
