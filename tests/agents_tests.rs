mod common;
use common::{FailingSms, RecordingSms, Sent, seeded_pool, temp_out};
use rreception::agents::face::{ConsoleRecognizer, FaceDb, FaceRecognizer, FixedRecognizer};
use rreception::agents::llm::{extract_json_object, parse_field_name, parse_model_reply};
use rreception::agents::sms::{TwilioCredentials, deliver};
use rreception::agents::voice::{ConsoleVoice, Voice, is_incomplete, split_questions};
use rreception::agents::wake::{LineWake, WakeWord, WakeWordMatcher};
use rreception::db::outbox::list_sms;
use rreception::models::sms::Delivery;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::rc::Rc;

#[test]
fn test_face_identify_best_match() {
    let mut db = FaceDb::default();
    db.enroll("Ramu Kumar", vec![1.0, 0.0, 0.0]).expect("enroll");
    db.enroll("Priya Sharma", vec![0.0, 1.0, 0.0]).expect("enroll");

    let m = db.identify(&[0.9, 0.1, 0.0]).expect("match");
    assert_eq!(m.name, "Ramu Kumar");
    assert!(m.score > 0.9);
    assert!(m.second_best < m.score);
    assert!(m.accepted(0.3));

    let m = db.identify(&[0.0, 0.0, 1.0]).expect("comparable");
    assert!(!m.accepted(0.3));
}

#[test]
fn test_face_skips_mismatched_lengths_and_zero_vectors() {
    let mut db = FaceDb::default();
    db.enroll("Ramu Kumar", vec![1.0, 0.0]).expect("enroll");
    assert!(db.enroll("Nobody", vec![0.0, 0.0]).is_err());

    assert!(db.identify(&[1.0, 0.0, 0.0]).is_none());
    assert!(db.identify(&[0.0, 0.0]).is_none());
}

#[test]
fn test_face_db_save_load_and_legacy_format() {
    let path = PathBuf::from(temp_out("agents_face_db", "json"));
    let mut db = FaceDb::default();
    db.enroll("Ramu Kumar", vec![1.0, 0.0]).expect("enroll");
    db.enroll("Ramu Kumar", vec![0.9, 0.1]).expect("enroll");
    db.save(&path).expect("save");

    let loaded = FaceDb::load(&path).expect("load");
    assert_eq!(loaded.names(), vec![("Ramu Kumar".to_string(), 2)]);

    // one vector per person
    std::fs::write(&path, r#"{"Priya Sharma": [0.0, 1.0]}"#).expect("write");
    let legacy = FaceDb::load(&path).expect("load legacy");
    assert_eq!(legacy.names(), vec![("Priya Sharma".to_string(), 1)]);

    let mut legacy = legacy;
    assert!(legacy.remove("Priya Sharma"));
    assert!(legacy.is_empty());

    let missing = PathBuf::from(temp_out("agents_face_missing", "json"));
    assert!(FaceDb::load(&missing).expect("missing is empty").is_empty());
}

#[test]
fn test_console_and_fixed_recognizers() {
    let mut console = ConsoleRecognizer::new(Cursor::new("Ramu Kumar\n\n"));
    assert_eq!(console.recognize().expect("read"), Some("Ramu Kumar".to_string()));
    assert_eq!(console.recognize().expect("read"), None);

    let mut fixed = FixedRecognizer(Some("Alex".to_string()));
    assert_eq!(fixed.recognize().expect("fixed"), Some("Alex".to_string()));
}

#[test]
fn test_model_reply_shapes() {
    assert_eq!(
        parse_model_reply(r#"{"choices":[{"message":{"content":" Hello there "}}]}"#),
        "Hello there"
    );
    assert_eq!(parse_model_reply(r#"{"content":[{"text":"Hi"}]}"#), "Hi");
    assert_eq!(parse_model_reply(r#"{"outputText":"Welcome"}"#), "Welcome");
    assert_eq!(parse_model_reply("  plain words "), "plain words");
}

#[test]
fn test_field_name_extraction_from_model_text() {
    let obj = extract_json_object("Sure! {\"field\": \"email\", \"name\": \"Priya\"} hope that helps")
        .expect("object");
    assert_eq!(
        parse_field_name(&obj),
        Some(("email".to_string(), "Priya".to_string()))
    );

    let obj = extract_json_object("{'field': 'department', 'name': 'Ramu'}").expect("object");
    assert_eq!(
        parse_field_name(&obj),
        Some(("department".to_string(), "Ramu".to_string()))
    );

    assert!(extract_json_object("no structure here").is_none());
}

#[test]
fn test_split_questions() {
    assert_eq!(
        split_questions("where is the HR department and who is present today"),
        vec![
            "where is the HR department".to_string(),
            "who is present today".to_string()
        ]
    );
    assert_eq!(
        split_questions("I want to meet Ramu and Priya"),
        vec!["I want to meet Ramu and Priya".to_string()]
    );
    assert!(split_questions("   ").is_empty());
}

#[test]
fn test_split_questions_ignores_separator_case() {
    assert_eq!(
        split_questions("Where is HR AND who is present"),
        vec!["Where is HR".to_string(), "who is present".to_string()]
    );
    assert_eq!(
        split_questions("Where is HR Also is Priya here?"),
        vec!["Where is HR".to_string(), "is Priya here?".to_string()]
    );
}

#[test]
fn test_incomplete_speech() {
    assert!(is_incomplete("hi"));
    assert!(is_incomplete("I want to meet with"));
    assert!(!is_incomplete("I want to meet Ramu"));
}

#[test]
fn test_wake_word_matching() {
    let m = WakeWordMatcher::new("Jarvis");
    assert!(m.matches("hey jarvis"));
    assert!(m.matches("Jarvi, are you there?"));
    assert!(m.matches("jarvin"));
    assert!(!m.matches("hello there"));
    assert!(!WakeWordMatcher::new("  ").matches("anything"));
}

#[test]
fn test_line_wake_waits_for_word_and_stops_at_eof() {
    let input = Cursor::new("good morning\n\nhey jarvis\n");
    let mut wake = LineWake::new(WakeWordMatcher::new("jarvis"), input);
    assert!(wake.wait().expect("wake"));
    assert!(!wake.wait().expect("eof"));
}

#[test]
fn test_console_voice_listen() {
    let mut voice = ConsoleVoice::new(Cursor::new("where is HR\n\n"), 60);
    assert_eq!(voice.listen().expect("listen"), Some("where is HR".to_string()));
    assert_eq!(voice.listen().expect("listen"), None);
    assert!(!voice.is_closed());
    assert_eq!(voice.listen().expect("listen"), None);
    assert!(voice.is_closed());
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k: &str| map.get(k).cloned()
}

#[test]
fn test_twilio_credentials() {

    let creds = TwilioCredentials::from_lookup(env(&[
        ("TWILIO_ACCOUNT_SID", "AC123"),
        ("TWILIO_AUTH_TOKEN", "tok"),
        ("TWILIO_PHONE_NUMBER", "+15550001111"),
    ]))
    .expect("account credentials");
    assert_eq!(creds.basic_auth(), ("AC123", "tok"));

    let err = TwilioCredentials::from_lookup(env(&[
        ("TWILIO_ACCOUNT_SID", "SK999"),
        ("TWILIO_PHONE_NUMBER", "+15550001111"),
    ]))
    .expect_err("API key without secret");
    assert!(err.to_string().contains("TWILIO_API_KEY_SECRET"));

    let creds = TwilioCredentials::from_lookup(env(&[
        ("TWILIO_ACCOUNT_SID", "SK999"),
        ("TWILIO_API_KEY_SECRET", "shh"),
        ("TWILIO_PHONE_NUMBER", "+15550001111"),
    ]))
    .expect("API key credentials");
    assert_eq!(creds.basic_auth(), ("SK999", "shh"));
}

#[test]
fn test_deliver_records_outbox() {
    let pool = seeded_pool("agents_deliver");
    let sent: Sent = Rc::new(RefCell::new(Vec::new()));

    let mut ok = RecordingSms(sent.clone());
    assert_eq!(deliver(&mut ok, &pool.conn, "+919000000001", "hello"), Delivery::Sent);

    let mut failing = FailingSms;
    assert_eq!(deliver(&mut failing, &pool.conn, "+919000000002", "again"), Delivery::Failed);

    let rows = list_sms(&pool.conn, 10).expect("outbox");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status, Delivery::Failed);
    assert!(rows[0].error.contains("gateway down"));
    assert_eq!(rows[1].recipient, "+919000000001");
    assert_eq!(sent.borrow().len(), 1);
}
