use chrono::{NaiveDate, NaiveTime};
use rreception::errors::AppError;
use rreception::export::parse_range;
use rreception::utils::date::{date_arg_or_today, next_weekday, upcoming_day_month};
use rreception::utils::formatting::join_spoken;
use rreception::utils::time::{add_minutes, format_clock, overlaps};
use rreception::utils::{normalize_e164, ordinal, time_greeting, title_case};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

#[test]
fn test_normalize_e164() {
    assert_eq!(normalize_e164("98765 43210", "+91").as_deref(), Some("+919876543210"));
    assert_eq!(normalize_e164("919876543210", "+1").as_deref(), Some("+919876543210"));
    assert_eq!(normalize_e164("+44 7700 900123", "+91").as_deref(), Some("+447700900123"));
    assert_eq!(normalize_e164("5551234", "1").as_deref(), Some("+15551234"));
    assert_eq!(normalize_e164("12-34", "+91"), None);
    assert_eq!(normalize_e164("", "+91"), None);
}

#[test]
fn test_ordinal() {
    let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111].into_iter().map(ordinal).collect();
    assert_eq!(
        got,
        ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th"]
    );
}

#[test]
fn test_time_greeting_boundaries() {
    assert_eq!(time_greeting(4), "Good Evening");
    assert_eq!(time_greeting(5), "Good Morning");
    assert_eq!(time_greeting(11), "Good Morning");
    assert_eq!(time_greeting(12), "Good Afternoon");
    assert_eq!(time_greeting(16), "Good Afternoon");
    assert_eq!(time_greeting(17), "Good Evening");
}

#[test]
fn test_title_case_and_join_spoken() {
    assert_eq!(title_case("ramu  kumar"), "Ramu Kumar");
    assert_eq!(title_case("McDonald"), "McDonald");

    let items = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(join_spoken(&[]), "");
    assert_eq!(join_spoken(&items(&["a"])), "a");
    assert_eq!(join_spoken(&items(&["a", "b"])), "a and b");
    assert_eq!(join_spoken(&items(&["a", "b", "c"])), "a, b and c");
}

#[test]
fn test_clock_helpers() {
    assert_eq!(format_clock(t(9, 5)), "9:05 AM");
    assert_eq!(format_clock(t(14, 30)), "2:30 PM");
    assert_eq!(add_minutes(t(17, 30), 30), Some(t(18, 0)));
    assert_eq!(add_minutes(t(23, 45), 30), None);

    assert!(overlaps(t(10, 0), t(10, 30), t(10, 15), t(10, 45)));
    assert!(!overlaps(t(9, 30), t(10, 0), t(10, 0), t(10, 30)));
}

#[test]
fn test_calendar_date_helpers() {
    let monday = d(2025, 10, 20);
    assert_eq!(next_weekday(monday, chrono::Weekday::Wed), d(2025, 10, 22));
    assert_eq!(next_weekday(monday, chrono::Weekday::Mon), d(2025, 10, 27));

    assert_eq!(upcoming_day_month(monday, 12, 25), Some(d(2025, 12, 25)));
    assert_eq!(upcoming_day_month(monday, 1, 5), Some(d(2026, 1, 5)));
    assert_eq!(upcoming_day_month(monday, 2, 30), None);
}

#[test]
fn test_parse_range() {
    assert_eq!(parse_range("2025").expect("year"), (d(2025, 1, 1), d(2025, 12, 31)));
    assert_eq!(parse_range("2024-02").expect("month"), (d(2024, 2, 1), d(2024, 2, 29)));
    assert_eq!(
        parse_range("2025-10-01:2025-10-15").expect("days"),
        (d(2025, 10, 1), d(2025, 10, 15))
    );
    assert!(parse_range("2025-10:2025").is_err());
    assert!(parse_range("2025-12:2025-01").is_err());
    assert!(parse_range("October").is_err());
}

#[test]
fn test_date_arg_or_today() {
    assert_eq!(date_arg_or_today(Some(" 2025-10-20 ")).expect("date"), d(2025, 10, 20));
    assert!(date_arg_or_today(None).is_ok());
    assert!(matches!(
        date_arg_or_today(Some("20/10/2025")),
        Err(AppError::InvalidDate(_))
    ));
}
