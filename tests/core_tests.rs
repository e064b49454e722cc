mod common;
use chrono::NaiveTime;
use common::{at, monday, seeded_pool, setup_test_db, temp_out};
use rreception::config::CalendarConfig;
use rreception::core::attendance;
use rreception::core::calendar::{Availability, Calendar};
use rreception::core::directory::{Directory, import_csv, load_csv, mobile_of};
use rreception::db::pool::DbPool;
use rreception::errors::AppError;
use rreception::models::appointment::AppointmentStatus;
use rreception::models::employee::Employee;
use std::fs;
use std::path::PathBuf;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

#[test]
fn test_first_arrival_of_the_day_wins() {
    let pool = seeded_pool("core_first_arrival");
    let day = monday();

    assert!(attendance::log_arrival(&pool.conn, "Ramu Kumar", at(day, 9, 5)).expect("log"));
    assert!(!attendance::log_arrival(&pool.conn, "Ramu Kumar", at(day, 11, 40)).expect("log"));

    assert_eq!(
        attendance::lookup(&pool.conn, "Ramu Kumar", day).expect("lookup"),
        Some(t(9, 5))
    );
    assert_eq!(attendance::present_on(&pool.conn, day).expect("present").len(), 1);

    // a new day is a new arrival
    let tuesday = day.succ_opt().expect("next day");
    assert!(attendance::log_arrival(&pool.conn, "Ramu Kumar", at(tuesday, 8, 55)).expect("log"));
}

#[test]
fn test_remove_arrival() {
    let pool = seeded_pool("core_remove_arrival");
    let day = monday();
    attendance::log_arrival(&pool.conn, "Alex", at(day, 9, 0)).expect("log");

    assert_eq!(attendance::remove_arrival(&pool.conn, "Alex", day).expect("remove"), 1);
    assert_eq!(attendance::remove_arrival(&pool.conn, "Alex", day).expect("remove"), 0);
    assert!(attendance::present_on(&pool.conn, day).expect("present").is_empty());
}

#[test]
fn test_slots_skip_bookings_and_past_times() {
    let pool = seeded_pool("core_slots");
    let cal = Calendar::default();
    let day = monday();
    let now = at(day, 16, 10);

    cal.schedule(&pool.conn, "Alex", "Priya Sharma", day, t(17, 0), 30, at(day, 8, 0))
        .expect("book");

    let slots = cal
        .available_slots(&pool.conn, "Priya Sharma", day, 30, now)
        .expect("slots");
    assert_eq!(slots, vec![t(16, 30), t(17, 30)]);
}

#[test]
fn test_availability_reasons() {
    let pool = seeded_pool("core_availability");
    let cal = Calendar::default();
    let day = monday();
    let now = at(day, 10, 0);

    let check = |start| {
        cal.check_availability(&pool.conn, "Priya Sharma", day, start, 30, now)
            .expect("check")
    };

    assert_eq!(check(t(9, 0)), Availability::InPast);
    assert_eq!(check(t(17, 45)), Availability::OutsideHours);
    assert_eq!(check(t(11, 0)), Availability::Available);

    cal.schedule(&pool.conn, "Ramu Kumar", "Priya Sharma", day, t(11, 0), 60, now)
        .expect("book");
    assert!(matches!(check(t(11, 30)), Availability::Conflict(_)));
    // back-to-back is fine
    assert_eq!(check(t(12, 0)), Availability::Available);
}

#[test]
fn test_double_booking_is_rejected() {
    let pool = seeded_pool("core_double_booking");
    let cal = Calendar::default();
    let day = monday();
    let now = at(day, 8, 0);

    cal.schedule(&pool.conn, "Ramu Kumar", "Priya Sharma", day, t(14, 0), 30, now)
        .expect("book");
    let err = cal
        .schedule(&pool.conn, "Alex", "Priya Sharma", day, t(14, 15), 30, now)
        .expect_err("overlap");
    assert!(matches!(err, AppError::SlotUnavailable(_)));
}

#[test]
fn test_cancel_frees_the_slot() {
    let pool = seeded_pool("core_cancel");
    let cal = Calendar::default();
    let day = monday();
    let now = at(day, 8, 0);

    let a = cal
        .schedule(&pool.conn, "Ramu Kumar", "Priya Sharma", day, t(14, 0), 30, now)
        .expect("book");
    let cancelled = cal.cancel(&pool.conn, a.id).expect("cancel");
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    assert!(
        cal.check_availability(&pool.conn, "Priya Sharma", day, t(14, 0), 30, now)
            .expect("check")
            .is_available()
    );
    assert!(matches!(
        cal.cancel(&pool.conn, 9999),
        Err(AppError::AppointmentNotFound(9999))
    ));
}

#[test]
fn test_cancel_next_picks_earliest_matching() {
    let pool = seeded_pool("core_cancel_next");
    let cal = Calendar::default();
    let day = monday();
    let now = at(day, 8, 0);

    cal.schedule(&pool.conn, "Ramu Kumar", "Alex", day, t(10, 0), 30, now).expect("book");
    cal.schedule(&pool.conn, "Ramu Kumar", "Priya Sharma", day, t(11, 0), 30, now).expect("book");

    let c = cal
        .cancel_next(&pool.conn, "Ramu Kumar", Some("Priya"), None, None, now)
        .expect("cancel")
        .expect("one cancelled");
    assert_eq!(c.participant, "Priya Sharma");

    let upcoming = cal.upcoming_for(&pool.conn, "Ramu Kumar", now).expect("upcoming");
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].participant, "Alex");
}

#[test]
fn test_cancel_next_honours_start_time() {
    let pool = seeded_pool("core_cancel_at_time");
    let cal = Calendar::default();
    let day = monday();
    let now = at(day, 8, 0);

    cal.schedule(&pool.conn, "Ramu Kumar", "Priya Sharma", day, t(15, 0), 30, now).expect("book");
    cal.schedule(&pool.conn, "Ramu Kumar", "Alex", day, t(16, 0), 30, now).expect("book");

    let none = cal
        .cancel_next(&pool.conn, "Ramu Kumar", None, None, Some(t(17, 0)), now)
        .expect("cancel");
    assert!(none.is_none());
    assert_eq!(cal.upcoming_for(&pool.conn, "Ramu Kumar", now).expect("upcoming").len(), 2);

    let c = cal
        .cancel_next(&pool.conn, "Ramu Kumar", None, Some(day), Some(t(16, 0)), now)
        .expect("cancel")
        .expect("one cancelled");
    assert_eq!(c.participant, "Alex");

    let upcoming = cal.upcoming_for(&pool.conn, "Ramu Kumar", now).expect("upcoming");
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].participant, "Priya Sharma");
}

#[test]
fn test_nearest_slots() {
    let slots = vec![t(9, 0), t(10, 0), t(14, 0), t(15, 30), t(16, 0)];
    assert_eq!(
        Calendar::nearest_slots(&slots, t(15, 0), 3),
        vec![t(15, 30), t(14, 0), t(16, 0)]
    );
}

#[test]
fn test_calendar_from_config_validates_hours() {
    let cfg = CalendarConfig {
        office_start: "18:00".to_string(),
        office_end: "09:00".to_string(),
        slot_minutes: 30,
        default_duration: 30,
    };
    assert!(Calendar::from_config(&cfg).is_err());

    let cfg = CalendarConfig {
        office_start: "08:30".to_string(),
        ..CalendarConfig::default()
    };
    assert_eq!(Calendar::from_config(&cfg).expect("valid").office_start, t(8, 30));
}

fn write_csv(name: &str, body: &str) -> PathBuf {
    let path = PathBuf::from(temp_out(name, "csv"));
    fs::write(&path, body).expect("write csv");
    path
}

#[test]
fn test_directory_sql_then_first_name() {
    let pool = seeded_pool("core_directory_sql");
    let dir = Directory::new(None);

    assert_eq!(dir.search(&pool.conn, "priya sharma").map(|e| e.name), Some("Priya Sharma".to_string()));
    assert_eq!(dir.search(&pool.conn, "Ramu").map(|e| e.name), Some("Ramu Kumar".to_string()));
    assert!(dir.search(&pool.conn, "Nobody").is_none());
    assert!(dir.search(&pool.conn, "  ").is_none());
}

#[test]
fn test_directory_csv_fallback() {
    let pool = seeded_pool("core_directory_csv");
    let csv = write_csv(
        "core_directory_csv",
        "Name,Department,Phone_Number,Email\nAnil Menon,Sales,+44 7700 900123,anil@example.com\n",
    );
    let dir = Directory::new(Some(csv));

    let anil = dir.search(&pool.conn, "Anil").expect("csv hit");
    assert_eq!(anil.department, "Sales");
    assert_eq!(mobile_of(&anil, "+91").as_deref(), Some("+447700900123"));

    // SQL keeps priority over the CSV
    assert_eq!(dir.search(&pool.conn, "Ramu").map(|e| e.department), Some("Engineering".to_string()));
}

#[test]
fn test_directory_missing_csv_is_not_found() {
    let pool = seeded_pool("core_directory_missing_csv");
    let dir = Directory::new(Some(PathBuf::from(temp_out("core_directory_missing", "csv"))));
    assert!(dir.search(&pool.conn, "Anil").is_none());
}

#[test]
fn test_import_csv_skips_existing_names() {
    let db = setup_test_db("core_import_csv");
    let pool = DbPool::open_initialized(&db).expect("open");
    let csv = write_csv(
        "core_import_csv",
        "name,department,phone,email\nRamu Kumar,Engineering,9876543210,ramu@example.com\nPriya Sharma,HR,9123456780,priya@example.com\n,HR,1,x\n",
    );

    assert_eq!(load_csv(&csv).expect("load").len(), 2);
    assert_eq!(import_csv(&pool.conn, &csv).expect("import"), (2, 0));
    assert_eq!(import_csv(&pool.conn, &csv).expect("import"), (0, 2));
}

#[test]
fn test_mobile_of_requires_a_number() {
    let e = Employee::new("Meena Iyer", "Finance", "", "");
    assert_eq!(mobile_of(&e, "+91"), None);
    let e = Employee::new("Ramu Kumar", "Engineering", "98765 43210", "");
    assert_eq!(mobile_of(&e, "+91").as_deref(), Some("+919876543210"));
}
