//! Slot extraction from free text: names, dates, times and requested fields.

use crate::dialogue::intents::Utterance;
use crate::models::employee::EmployeeField;
use crate::utils::date::{month_from_name, next_weekday, upcoming_day_month, weekday_from_name};
use crate::utils::title_case;
use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

fn compiled(cell: &'static OnceLock<Vec<Regex>>, patterns: &[&str]) -> &'static [Regex] {
    cell.get_or_init(|| {
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("valid regex"))
            .collect()
    })
}

/// Words skipped before a name starts.
const LEADING_FILLERS: &[&str] = &[
    "with", "the", "a", "an", "to", "mr", "mrs", "ms", "dr", "miss", "mister", "sir", "madam",
    "our", "your", "my", "his", "her", "their", "this", "that", "please", "someone", "somebody",
    "anyone", "you", "him", "them", "me", "us", "for", "of", "about", "is", "what", "whats",
    "what's", "where", "tell", "give", "show", "get", "find", "search", "provide", "who", "does",
    "do", "did", "has", "have", "i", "want", "need", "like", "would", "can", "could", "am", "see",
    "meet", "visit", "know", "let", "kindly", "just", "also", "mam", "ma'am",
];

/// Words that end a name.
const BOUNDARY_WORDS: &[&str] = &[
    "and", "or", "at", "on", "in", "for", "about", "today", "tomorrow", "tonight", "now", "please",
    "regarding", "because", "who", "is", "are", "was", "from", "to", "by", "with", "the", "a",
    "an", "this", "that", "next", "his", "her", "their", "email", "mail", "gmail", "phone",
    "mobile", "number", "contact", "department", "dept", "position", "role", "salary", "joining",
    "join", "date", "details", "detail", "information", "info", "works", "work", "working",
    "present", "here", "there", "available", "sir", "madam", "office", "reception", "meeting",
    "appointment", "o'clock", "am", "pm", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday", "january", "february", "march", "april", "june", "july", "august",
    "september", "october", "november", "december", "if", "when", "so", "again", "employee",
    "arrived", "came", "come", "does", "do", "did", "has", "have", "id", "address", "plus", "also",
    "then", "it", "s",
];

/// First words that show an "I am …" sentence is not an introduction.
const NOT_A_NAME: &[&str] = &[
    "looking", "here", "fine", "good", "ok", "okay", "not", "visiting", "waiting", "from", "new",
    "sorry", "back", "done", "busy", "late", "great", "well", "a", "an", "the", "also", "just",
    "going", "trying", "interested", "glad", "happy", "employee", "visitor", "staff",
    "there", "in", "at", "on", "with", "sure", "ready", "leaving", "finished", "very", "so",
    "feeling", "tired", "lost", "confused", "alright", "hungry",
];

fn word_key(w: &str) -> String {
    w.to_lowercase()
}

/// Trim fillers around a captured name and title-case it. At most three words.
fn clean_name(captured: &str) -> Option<String> {
    let words: Vec<String> = captured
        .split_whitespace()
        .map(|w| {
            let w = w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-');
            let w = w
                .strip_suffix("'s")
                .or_else(|| w.strip_suffix("’s"))
                .unwrap_or(w);
            w.to_string()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let name: Vec<&str> = words
        .iter()
        .skip_while(|w| LEADING_FILLERS.contains(&word_key(w).as_str()))
        .take_while(|w| !BOUNDARY_WORDS.contains(&word_key(w).as_str()))
        .take(3)
        .map(String::as_str)
        .collect();

    if name.is_empty() || name.iter().any(|w| w.chars().any(|c| c.is_ascii_digit())) {
        return None;
    }
    let words: Vec<String> = name.iter().map(|w| lowercase_unless_initials(w)).collect();
    Some(title_case(&words.join(" ")))
}

/// Two or three letter upper-case words ("AK", "HR") are kept as written.
fn lowercase_unless_initials(w: &str) -> String {
    let upper = w.chars().all(|c| !c.is_alphabetic() || c.is_uppercase());
    if upper && (2..=3).contains(&w.chars().count()) {
        w.to_string()
    } else {
        w.to_lowercase()
    }
}

fn first_clean_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|c| c.get(1))
            .find_map(|m| clean_name(m.as_str()))
    })
}

/// Name of the person a request is about ("I want to meet Ramu",
/// "what is the email of Priya", "who is Anil").
pub fn extract_name_from_request(text: &str) -> Option<String> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = compiled(
        &RE,
        &[
            r"(?i)\bask\s+([a-z][a-z\s'\-]*?)\s+to\s+(?:come|meet|see)\b",
            r"(?i)\b(?:meet|see|visit|visiting|talk to|speak to|talk with|speak with|call|connect with|ping|here for)\s+([a-z][a-z\s'\-]*)",
            r"(?i)\b(?:looking for|searching for|find)\s+([a-z][a-z\s'\-]*)",
            r"(?i)\b(?:what is|what's|whats|tell me|get|find|search for|show me|give me|provide)\s+(?:the\s+)?(?:email|phone|mobile|contact|department|position|salary|joining date|join date|details?|information)(?:\s+(?:id|number|address))?\s+(?:of|for|about)\s+([a-z][a-z\s'\-]*)",
            r"(?i)\b(?:email|phone|mobile|contact|department|position|salary|joining date|join date|details?|information)(?:\s+(?:id|number|address))?\s+(?:of|for|about)\s+([a-z][a-z\s'\-]*)",
            r"(?i)([a-z][a-z\s'\-]*?)(?:'s)?\s+(?:email|phone|mobile|contact|department|position|salary|joining date|join date)\b",
            r"(?i)([a-z][a-z\s'\-]*?)\s+(?:details?|information)\b",
            r"(?i)\bwho\s+is\s+([a-z][a-z\s'\-]*)",
            r"(?i)([a-z][a-z\s'\-]*?)\s+(?:is|works|employee)\b",
        ],
    );
    first_clean_capture(patterns, text)
}

/// Name in an attendance question ("is Ramu present", "did Priya come in").
pub fn extract_presence_name(text: &str) -> Option<String> {
    extract_presence_subject(text).or_else(|| extract_name_from_request(text))
}

/// Like [`extract_presence_name`], but only for a question that is itself
/// about someone being in ("is Priya here", "has Ramu arrived").
pub fn extract_presence_subject(text: &str) -> Option<String> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = compiled(
        &RE,
        &[
            r"(?i)\bis\s+([a-z][a-z\s'\-]*?)\s+(?:present|here|in(?:\s+the)?\s+office|at\s+work|in\s+today|available|in)\b",
            r"(?i)\bdid\s+([a-z][a-z\s'\-]*?)\s+(?:come|arrive|check)",
            r"(?i)\bhas\s+([a-z][a-z\s'\-]*?)\s+(?:arrived|come|came|checked)",
            r"(?i)\bdoes\s+([a-z][a-z\s'\-]*?)\s+work\b",
            r"(?i)\battendance\s+(?:of|for)\s+([a-z][a-z\s'\-]*)",
        ],
    );
    first_clean_capture(patterns, text)
}

/// Name the speaker gives for themselves ("my name is Ramu", "I am Priya",
/// "I'm not Ramu, I'm Priya").
pub fn extract_identity_claim(text: &str) -> Option<String> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let text = text.replace('’', "'");
    let patterns = compiled(
        &RE,
        &[
            r"(?i)\bmy\s+name\s+is\s+([a-z][a-z\s'\-]*)",
            r"(?i)\bcall\s+me\s+([a-z][a-z\s'\-]*)",
            r"(?i)^(?:(?:hi|hello|hey|no|sorry|actually)[\s,!.]+)*(?:i(?:\s+am|'m|m)\s+not\s+[a-z\s'\-]+?(?:[,;.!]+\s*|\s+)(?:(?:but|no|sorry|actually)[\s,!.]+)*)?(?:this\s+is|i\s+am|i'm|im|it's|it\s+is)\s+([a-z][a-z\s'\-]*?)[\s.!]*$",
        ],
    );

    for re in patterns {
        let Some(m) = re.captures(text.trim()).and_then(|c| c.get(1)) else {
            continue;
        };
        let first = m
            .as_str()
            .split_whitespace()
            .next()
            .map(word_key)
            .unwrap_or_default();
        if NOT_A_NAME.contains(&first.as_str()) {
            continue;
        }
        if let Some(name) = clean_name(m.as_str()) {
            return Some(name);
        }
    }
    None
}

/// "I'm not Ramu" → "Ramu".
pub fn extract_denied_name(text: &str) -> Option<String> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = compiled(&RE, &[r"(?i)\bi(?:\s+am|'m|m)\s+not\s+([a-z][a-z\s'\-]*)"]);
    first_clean_capture(patterns, text)
}

fn bare_hour(h: u32) -> Option<u32> {
    match h {
        1..=7 => Some(h + 12),
        8..=12 => Some(h),
        13..=23 => Some(h),
        0 => Some(0),
        _ => None,
    }
}

fn with_meridiem(h: u32, meridiem: &str) -> Option<u32> {
    if !(1..=12).contains(&h) {
        return None;
    }
    let pm = meridiem.to_lowercase().starts_with('p');
    Some(match (h, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    })
}

/// Time mentioned in free text: "3 PM", "3:30 p.m.", "15:00", "at 4", "noon".
///
/// Hours without AM/PM are read as office hours: 1–7 → afternoon, 8–11 → morning.
pub fn parse_time_string(text: &str) -> Option<NaiveTime> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = compiled(
        &RE,
        &[
            // 0: h:mm with optional meridiem
            r"(?i)\b(\d{1,2})[:.](\d{2})\s*(a\.?\s?m\b\.?|p\.?\s?m\b\.?)?",
            // 1: h meridiem
            r"(?i)\b(\d{1,2})\s*(a\.?\s?m\b\.?|p\.?\s?m\b\.?)",
            // 2: at/by/around h
            r"(?i)\b(?:at|by|around|after|before)\s+(\d{1,2})(?:\s*o'?\s?clock)?(?:[^\d:.]|$)",
            // 3: h o'clock
            r"(?i)\b(\d{1,2})\s*o'?\s?clock",
            // 4: just a number
            r"^\s*(\d{1,2})\s*$",
        ],
    );

    let u = Utterance::new(text);
    if u.has_any(&["noon", "midday", "12 noon"]) {
        return NaiveTime::from_hms_opt(12, 0, 0);
    }

    if let Some(c) = patterns[0].captures(text) {
        let h: u32 = c[1].parse().ok()?;
        let m: u32 = c[2].parse().ok()?;
        let hour = match c.get(3) {
            Some(mer) => with_meridiem(h, mer.as_str())?,
            None if h <= 12 => bare_hour(h)?,
            None => h,
        };
        return NaiveTime::from_hms_opt(hour, m, 0);
    }

    if let Some(c) = patterns[1].captures(text) {
        let h: u32 = c[1].parse().ok()?;
        return NaiveTime::from_hms_opt(with_meridiem(h, &c[2])?, 0, 0);
    }

    for re in &patterns[2..] {
        if let Some(c) = re.captures(text) {
            let h: u32 = c[1].parse().ok()?;
            return NaiveTime::from_hms_opt(bare_hour(h)?, 0, 0);
        }
    }
    None
}

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

/// Date mentioned in free text, relative to `today`.
///
/// today / tomorrow / day after tomorrow, weekday names (next occurrence
/// after today), `YYYY-MM-DD`, "21st October", "October 21". Day-month
/// dates already past roll over to next year.
pub fn parse_date_string(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let day_month = format!(r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})\b");
    let month_day = format!(r"(?i)\b({MONTHS})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b");
    let patterns = compiled(
        &RE,
        &[
            r"\b(\d{4})-(\d{2})-(\d{2})\b",
            day_month.as_str(),
            &month_day,
            r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        ],
    );

    let u = Utterance::new(text);
    if u.has("day after tomorrow") {
        return Some(today + Duration::days(2));
    }
    if u.has("tomorrow") {
        return Some(today + Duration::days(1));
    }
    if u.has_any(&["today", "this morning", "this afternoon", "this evening", "tonight"]) {
        return Some(today);
    }

    if let Some(c) = patterns[0].captures(text) {
        return NaiveDate::from_ymd_opt(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?);
    }
    if let Some(c) = patterns[1].captures(text) {
        let day: u32 = c[1].parse().ok()?;
        return upcoming_day_month(today, month_from_name(&c[2])?, day);
    }
    if let Some(c) = patterns[2].captures(text) {
        let day: u32 = c[2].parse().ok()?;
        return upcoming_day_month(today, month_from_name(&c[1])?, day);
    }
    if let Some(c) = patterns[3].captures(text) {
        return Some(next_weekday(today, weekday_from_name(&c[1])?));
    }
    None
}

/// Slots of a scheduling or cancellation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentRequest {
    pub person: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

pub fn extract_appointment_details(text: &str, today: NaiveDate) -> AppointmentRequest {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = compiled(
        &RE,
        &[
            r"(?i)\b(?:with|meet|see)\s+([a-z][a-z\s'\-]*)",
            r"(?i)\bfor\s+([a-z][a-z\s'\-]*)",
        ],
    );

    AppointmentRequest {
        person: first_clean_capture(patterns, text),
        date: parse_date_string(text, today),
        time: parse_time_string(text),
    }
}

/// What an employee query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedField {
    Field(EmployeeField),
    Salary,
    General,
}

impl RequestedField {
    /// Field key as returned by the extraction model.
    pub fn from_key(key: &str) -> Self {
        let k = key.trim().to_lowercase();
        if ["salary", "pay", "ctc", "compensation", "income"].contains(&k.as_str()) {
            return RequestedField::Salary;
        }
        EmployeeField::from_key(&k)
            .map(RequestedField::Field)
            .unwrap_or(RequestedField::General)
    }
}

/// Field keywords, in priority order.
pub fn detect_field(u: &Utterance) -> RequestedField {
    if u.has_any(&["email", "emails", "email id", "email address", "mail", "gmail", "e mail"]) {
        RequestedField::Field(EmployeeField::Email)
    } else if u.has_any(&["department", "dept", "team", "division"]) {
        RequestedField::Field(EmployeeField::Department)
    } else if u.has_any(&["phone", "phone number", "mobile", "number", "contact", "telephone"]) {
        RequestedField::Field(EmployeeField::Phone)
    } else if u.has_any(crate::dialogue::intents::SALARY_KEYWORDS) {
        RequestedField::Salary
    } else if u.has_any(&["position", "role", "designation", "job title", "title"]) {
        RequestedField::Field(EmployeeField::Position)
    } else if u.has_any(&[
        "joining date",
        "join date",
        "joined",
        "hire date",
        "start date",
        "date of joining",
    ]) {
        RequestedField::Field(EmployeeField::JoinDate)
    } else {
        RequestedField::General
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRequest {
    pub field: RequestedField,
    pub name: Option<String>,
}

/// Heuristic field/name extraction used when no model answer is available.
pub fn extract_field_and_name(text: &str) -> FieldRequest {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = compiled(
        &RE,
        &[
            r"(?i)\btell\s+me\s+(?:about|the)\s+([a-z][a-z\s'\-]*)",
            r"(?i)\babout\s+([a-z][a-z\s'\-]*)",
            r"(?i)([a-z][a-z\s'\-]*?)\s+(?:works|employee|staff)\b",
        ],
    );

    let field = detect_field(&Utterance::new(text));
    let name = extract_name_from_request(text)
        .or_else(|| first_clean_capture(patterns, text))
        .or_else(|| capitalised_guess(text));

    FieldRequest { field, name }
}

/// Up to two capitalised words that are not fillers.
fn capitalised_guess(text: &str) -> Option<String> {
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphabetic() && c != '\'')
        .filter(|t| t.chars().next().is_some_and(char::is_uppercase))
        .filter(|t| {
            let k = word_key(t);
            !LEADING_FILLERS.contains(&k.as_str()) && !BOUNDARY_WORDS.contains(&k.as_str())
        })
        .take(2)
        .collect();
    if tokens.is_empty() {
        None
    } else {
        clean_name(&tokens.join(" "))
    }
}
