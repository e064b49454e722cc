#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rreception::agents::llm::{LanguageModel, OfflineModel};
use rreception::agents::sms::SmsSender;
use rreception::core::calendar::Calendar;
use rreception::core::directory::Directory;
use rreception::db::employees::insert_employee;
use rreception::db::pool::DbPool;
use rreception::dialogue::{DialogueEngine, EngineSettings, Speaker};
use rreception::errors::{AppError, AppResult};
use rreception::models::employee::Employee;
use rreception::models::sms::Delivery;
use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

pub fn rr() -> Command {
    cargo_bin_cmd!("rreception")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rreception.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB through the CLI and add the standard staff
pub fn init_db_with_staff(db_path: &str) {
    rr().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for (name, dept, phone, email) in [
        ("Ramu Kumar", "Engineering", "9876543210", "ramu@example.com"),
        ("Priya Sharma", "HR", "9123456780", "priya@example.com"),
        ("Alex", "Admin", "9000000001", "alex@example.com"),
    ] {
        rr().args([
            "--db",
            db_path,
            "employee",
            "add",
            name,
            "--department",
            dept,
            "--phone",
            phone,
            "--email",
            email,
        ])
        .assert()
        .success();
    }
}

/// Staff used by the library tests. Meena has no phone on record.
pub fn staff() -> Vec<Employee> {
    let mut ramu = Employee::new("Ramu Kumar", "Engineering", "9876543210", "ramu@example.com");
    ramu.position = "Developer".to_string();
    ramu.join_date = "2021-06-01".to_string();
    ramu.salary = "100000".to_string();
    vec![
        ramu,
        Employee::new("Priya Sharma", "HR", "9123456780", "priya@example.com"),
        Employee::new("Alex", "Admin", "9000000001", "alex@example.com"),
        Employee::new("Meena Iyer", "Finance", "", "meena@example.com"),
    ]
}

/// Fresh initialized database with the standard staff.
pub fn seeded_pool(name: &str) -> DbPool {
    let db_path = setup_test_db(name);
    let pool = DbPool::open_initialized(&db_path).expect("open db");
    for e in staff() {
        insert_employee(&pool.conn, &e).expect("insert employee");
    }
    pool
}

/// Messages handed to the gateway: (recipient, body).
pub type Sent = Rc<RefCell<Vec<(String, String)>>>;

pub struct RecordingSms(pub Sent);

impl SmsSender for RecordingSms {
    fn send(&mut self, to: &str, body: &str) -> AppResult<Delivery> {
        self.0.borrow_mut().push((to.to_string(), body.to_string()));
        Ok(Delivery::Sent)
    }
}

pub struct FailingSms;

impl SmsSender for FailingSms {
    fn send(&mut self, _to: &str, _body: &str) -> AppResult<Delivery> {
        Err(AppError::Sms("gateway down".into()))
    }
}

/// Model that always answers with the same text.
pub struct CannedModel(pub String);

impl LanguageModel for CannedModel {
    fn ask(&mut self, _prompt: &str) -> AppResult<String> {
        Ok(self.0.clone())
    }
}

pub fn engine_with_model(name: &str, model: Box<dyn LanguageModel>) -> (DialogueEngine, Sent) {
    let sent: Sent = Rc::new(RefCell::new(Vec::new()));
    let engine = DialogueEngine::new(
        seeded_pool(name),
        Directory::new(None),
        Calendar::default(),
        model,
        Box::new(RecordingSms(sent.clone())),
        EngineSettings::default(),
    );
    (engine, sent)
}

/// Engine over a seeded DB, offline model, recording SMS gateway.
pub fn engine(name: &str) -> (DialogueEngine, Sent) {
    engine_with_model(name, Box::new(OfflineModel))
}

pub fn engine_as(name: &str, speaker: Speaker) -> (DialogueEngine, Sent) {
    let (mut e, sent) = engine(name);
    e.begin_session(speaker);
    (e, sent)
}

/// Monday 2025-10-20.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).expect("valid date")
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).expect("valid time")
}
