mod common;
use common::{init_db_with_staff, rr, setup_test_db, temp_out};
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rr().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_employee_add_list_show_del() {
    let db_path = setup_test_db("cli_employee");
    init_db_with_staff(&db_path);

    rr().args(["--db", &db_path, "employee", "list"])
        .assert()
        .success()
        .stdout(contains("Ramu Kumar"))
        .stdout(contains("Priya Sharma"))
        .stdout(contains("Engineering"));

    rr().args(["--db", &db_path, "employee", "show", "ramu"])
        .assert()
        .success()
        .stdout(contains("Ramu Kumar"))
        .stdout(contains("ramu@example.com"))
        .stdout(contains("+919876543210"));

    rr().args(["--db", &db_path, "employee", "del", "Priya Sharma"])
        .assert()
        .success()
        .stdout(contains("deleted"));

    rr().args(["--db", &db_path, "employee", "del", "Priya Sharma"])
        .assert()
        .failure()
        .stderr(contains("Employee not found"));
}

#[test]
fn test_employee_add_rejects_empty_name() {
    let db_path = setup_test_db("cli_employee_empty");
    init_db_with_staff(&db_path);

    rr().args(["--db", &db_path, "employee", "add", "  "])
        .assert()
        .failure();
}

#[test]
fn test_attendance_log_list_and_export() {
    let db_path = setup_test_db("cli_attendance");
    init_db_with_staff(&db_path);

    rr().args([
        "--db", &db_path, "attendance", "log", "Ramu Kumar", "--date", "2025-10-20", "--time",
        "09:15",
    ])
    .assert()
    .success()
    .stdout(contains("Arrival of Ramu Kumar recorded at 9:15 AM."));

    rr().args([
        "--db", &db_path, "attendance", "log", "Ramu Kumar", "--date", "2025-10-20", "--time",
        "11:00",
    ])
    .assert()
    .success()
    .stdout(contains("already recorded"));

    rr().args(["--db", &db_path, "attendance", "list", "--date", "2025-10-20"])
        .assert()
        .success()
        .stdout(contains("Ramu Kumar"))
        .stdout(contains("09:15"));

    let csv = temp_out("cli_attendance", "csv");
    rr().args([
        "--db", &db_path, "attendance", "export", "--format", "csv", "--file", &csv, "--range",
        "2025-10",
    ])
    .assert()
    .success();
    let content = fs::read_to_string(&csv).expect("read csv");
    assert!(content.starts_with("date,name,arrival_time"));
    assert!(content.contains("2025-10-20,Ramu Kumar,09:15"));

    let json = temp_out("cli_attendance", "json");
    rr().args([
        "--db", &db_path, "attendance", "export", "--format", "json", "--file", &json,
    ])
    .assert()
    .success();
    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json).expect("read json")).expect("parse json");
    assert_eq!(rows[0]["name"], "Ramu Kumar");
    assert_eq!(rows[0]["arrival_time"], "09:15");
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = setup_test_db("cli_export_relative");
    init_db_with_staff(&db_path);

    rr().args([
        "--db", &db_path, "attendance", "export", "--format", "csv", "--file", "out.csv",
    ])
    .assert()
    .failure()
    .stderr(contains("must be absolute"));
}

#[test]
fn test_appointment_booking_conflict_slots_and_cancel() {
    let db_path = setup_test_db("cli_appointment");
    init_db_with_staff(&db_path);

    rr().args([
        "--db", &db_path, "appointment", "add", "--organizer", "Priya Sharma", "--with",
        "Ramu Kumar", "--date", "2099-03-02", "--time", "10:00",
    ])
    .assert()
    .success()
    .stdout(contains("Appointment #1 booked"));

    rr().args([
        "--db", &db_path, "appointment", "add", "--organizer", "Alex", "--with", "Ramu Kumar",
        "--date", "2099-03-02", "--time", "10:15",
    ])
    .assert()
    .failure()
    .stderr(contains("Slot unavailable"));

    rr().args(["--db", &db_path, "appointment", "slots", "Ramu Kumar", "--date", "2099-03-02"])
        .assert()
        .success()
        .stdout(contains("9:00 AM, 9:30 AM, 10:30 AM"));

    rr().args(["--db", &db_path, "appointment", "list", "--person", "Ramu Kumar"])
        .assert()
        .success()
        .stdout(contains("Priya Sharma"))
        .stdout(contains("scheduled"));

    rr().args(["--db", &db_path, "appointment", "cancel", "1"])
        .assert()
        .success()
        .stdout(contains("is cancelled"));

    rr().args(["--db", &db_path, "appointment", "cancel", "99"])
        .assert()
        .failure()
        .stderr(contains("Appointment not found"));
}

#[test]
fn test_ask_department_sends_sms_to_receptionist() {
    let db_path = setup_test_db("cli_ask");
    init_db_with_staff(&db_path);

    rr().args(["--db", &db_path, "ask", "Where is the HR department?"])
        .assert()
        .success()
        .stdout(contains("Alex will come and assist you"));

    rr().args(["--db", &db_path, "sms", "list"])
        .assert()
        .success()
        .stdout(contains("+919000000001"))
        .stdout(contains("HR department location"));
}

#[test]
fn test_log_print_lists_operations() {
    let db_path = setup_test_db("cli_log");
    init_db_with_staff(&db_path);

    rr().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("employee_add"));

    rr().args(["--db", &db_path, "log", "--print", "--op", "init"])
        .assert()
        .success()
        .stdout(contains("init"));
}
