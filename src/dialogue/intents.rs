//! Keyword tables and intent tests.
//!
//! Matching is done on whole words: the utterance is lowercased, punctuation
//! becomes spaces and the result is padded, so `has(" here ")` never fires
//! inside "where".

/// Lowercased utterance prepared for whole-word phrase tests.
#[derive(Debug, Clone)]
pub struct Utterance {
    raw: String,
    padded: String,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        let lowered = text.to_lowercase().replace(['’', '‘'], "'");
        let words: String = lowered
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '\'' { c } else { ' ' })
            .collect();
        let padded = format!(" {} ", words.split_whitespace().collect::<Vec<_>>().join(" "));
        Self {
            raw: text.trim().to_string(),
            padded,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whole-word (or whole-phrase) containment.
    pub fn has(&self, phrase: &str) -> bool {
        self.padded.contains(&format!(" {} ", phrase.trim()))
    }

    pub fn has_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.has(p))
    }

    pub fn is_empty(&self) -> bool {
        self.padded.trim().is_empty()
    }
}

pub const GOODBYE: &[&str] = &[
    "bye", "goodbye", "good bye", "bye bye", "see you", "see you later", "exit", "that's all",
    "that is all", "thats all",
];

pub const YES: &[&str] = &[
    "yes", "yeah", "yep", "yup", "sure", "ok", "okay", "please do", "go ahead", "of course",
    "please",
];

pub const NO: &[&str] = &[
    "no", "nope", "nah", "don't", "do not", "never mind", "nevermind", "not now", "cancel",
    "no thanks",
];

const LOCATION_KEYWORDS: &[&str] = &[
    "where is", "where's", "location of", "directions to", "direction to", "how to get to",
    "how do i get to", "where can i find", "where do i go for", "where do i go", "way to",
    "can you tell me where", "i need to find", "where are",
];

/// Department label and the phrases that name it.
const DEPARTMENTS: &[(&str, &[&str])] = &[
    ("HR", &["hr", "human resources", "human resource"]),
    ("IT", &["it department", "it team", "it office", "it support", "information technology"]),
    ("Engineering", &["engineering"]),
    ("Finance", &["finance", "accounts", "accounting"]),
    ("Marketing", &["marketing"]),
    ("Sales", &["sales"]),
    ("Operations", &["operations"]),
    ("Support", &["support", "customer support"]),
    ("Admin", &["admin", "administration"]),
];

pub fn is_goodbye(u: &Utterance) -> bool {
    u.has_any(GOODBYE)
}

pub fn is_yes(u: &Utterance) -> bool {
    u.has_any(YES) && !u.has_any(&["no", "not", "don't"])
}

pub fn is_no(u: &Utterance) -> bool {
    u.has_any(NO)
}

/// Department named in the utterance. "IT" counts only when written in
/// capitals or followed by department/team/office/support.
pub fn detect_department(u: &Utterance) -> Option<&'static str> {
    for (label, phrases) in DEPARTMENTS {
        if u.has_any(phrases) {
            return Some(label);
        }
    }
    let raw_has_it = u
        .raw()
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == "IT");
    raw_has_it.then_some("IT")
}

pub fn is_department_query(u: &Utterance) -> bool {
    if !u.has_any(LOCATION_KEYWORDS) {
        return false;
    }
    u.has("department") || u.has("dept") || detect_department(u).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentIntent {
    Cancel,
    Schedule,
    Check,
}

const MEETING_NOUNS: &[&str] = &[
    "appointment", "appointments", "meeting", "meetings", "booking", "slot", "call",
];

pub fn appointment_intent(u: &Utterance) -> Option<AppointmentIntent> {
    let mentions_meeting = u.has_any(MEETING_NOUNS);
    let mentions_schedule = u.has("schedule") || u.has("calendar");

    if u.has_any(&["cancel", "call off", "drop"]) && (mentions_meeting || mentions_schedule) {
        return Some(AppointmentIntent::Cancel);
    }
    if u.has_any(&["schedule", "book", "set up", "arrange", "fix", "reserve", "plan"])
        && (mentions_meeting || u.has("with"))
    {
        return Some(AppointmentIntent::Schedule);
    }
    if u.has_any(&["appointment", "appointments", "meeting", "meetings"]) || mentions_schedule {
        return Some(AppointmentIntent::Check);
    }
    None
}

pub fn is_presence_query(u: &Utterance) -> bool {
    if u.has_any(&["work here", "works here", "working here"]) {
        return false;
    }
    u.has_any(&[
        "present",
        "attendance",
        "came",
        "come in",
        "come",
        "arrived",
        "in office",
        "in the office",
        "at work",
        "in today",
        "here today",
        "here",
    ])
}

pub fn is_present_list_query(u: &Utterance) -> bool {
    u.has_any(&["who", "employees", "people", "staff", "everyone", "anyone", "list"])
        && u.has_any(&["present", "in office", "in the office", "here", "at work", "in today"])
        && !u.has_any(&["who is", "who's"])
        || u.has_any(&["who is present", "who's present", "who is here", "who is in today"])
}

pub const DETAIL_KEYWORDS: &[&str] = &[
    "email", "emails", "email id", "mail", "gmail", "e mail", "phone", "phone number", "mobile",
    "contact", "number", "department", "dept", "position", "role", "designation", "detail",
    "details", "joining date", "join date", "joined", "salary", "pay", "ctc", "compensation",
    "income", "earn", "earns",
];

pub fn is_employee_detail_query(u: &Utterance) -> bool {
    u.has_any(DETAIL_KEYWORDS) || u.has("information about") || u.has("tell me about")
}

pub const SALARY_KEYWORDS: &[&str] = &[
    "salary", "salaries", "pay", "paid", "ctc", "compensation", "income", "earn", "earns",
    "earning", "earnings",
];

pub fn asks_salary(u: &Utterance) -> bool {
    u.has_any(SALARY_KEYWORDS)
}

const SENSITIVE_KEYWORDS: &[&str] = &[
    "email", "mail", "gmail", "mobile", "phone", "number", "contact", "salary", "join", "joined",
    "joining date", "position", "address",
];

pub fn is_sensitive_request(u: &Utterance) -> bool {
    u.has_any(SENSITIVE_KEYWORDS)
}

pub fn is_meeting_request(u: &Utterance) -> bool {
    u.has_any(&[
        "meet",
        "see",
        "visit",
        "visiting",
        "talk to",
        "speak to",
        "talk with",
        "speak with",
        "looking for",
        "find",
        "call",
        "here for",
    ]) || (u.has("ask") && u.has_any(&["to come", "come to", "come down", "come over"]))
}

pub fn is_restroom_query(u: &Utterance) -> bool {
    u.has_any(&["rest room", "restroom", "washroom", "toilet", "bathroom", "loo"])
}

pub fn is_verification_query(u: &Utterance) -> bool {
    u.has_any(&[
        "does",
        "do",
        "work here",
        "works here",
        "working here",
        "is here",
        "present",
        "in this company",
        "employee",
    ])
}

pub fn is_greeting(u: &Utterance) -> bool {
    u.has_any(&[
        "hello",
        "hi",
        "hey",
        "good morning",
        "good afternoon",
        "good evening",
        "how are you",
    ])
}

pub fn is_identity_denial(u: &Utterance) -> bool {
    u.has_any(&[
        "not me",
        "that's not me",
        "that is not me",
        "wrong name",
        "wrong person",
        "not my name",
        "got my name wrong",
        "you got it wrong",
        "that's not my name",
    ])
}
