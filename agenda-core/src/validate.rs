//! Form validation.
//!
//! Validators are pure and report every violated field in one pass so a form
//! can show all problems at once.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::models::{FormField, MeetingDraft, MeetingField, NoteDraft, NoteField};

/// Field name to error message. Empty means the draft is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors<F: Ord> {
    errors: BTreeMap<F, String>,
}

impl<F: FormField> ValidationErrors<F> {
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: F) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Messages keyed by wire field name.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, msg)| (field.as_str(), msg.clone()))
            .collect()
    }
}

impl<F: FormField> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

pub const DATE_FORMAT_MESSAGE: &str = "Please enter a valid date in YYYY-MM-DD format";
pub const TIME_FORMAT_MESSAGE: &str = "Please enter a valid time in HH:MM format";

pub fn validate_note(draft: &NoteDraft) -> ValidationErrors<NoteField> {
    let mut errors = ValidationErrors::new();

    require(&mut errors, NoteField::Title, &draft.title, "Title is required");
    require(&mut errors, NoteField::Content, &draft.content, "Content is required");
    if require(&mut errors, NoteField::Date, &draft.date, "Date is required")
        && !is_iso_date(draft.date.trim())
    {
        errors.insert(NoteField::Date, DATE_FORMAT_MESSAGE);
    }
    require(&mut errors, NoteField::Author, &draft.author, "Created By is required");

    errors
}

pub fn validate_meeting(draft: &MeetingDraft) -> ValidationErrors<MeetingField> {
    let mut errors = ValidationErrors::new();

    require(&mut errors, MeetingField::Title, &draft.title, "Title is required");
    require(&mut errors, MeetingField::Agenda, &draft.agenda, "Agenda is required");
    if require(&mut errors, MeetingField::Date, &draft.date, "Date is required")
        && !is_iso_date(draft.date.trim())
    {
        errors.insert(MeetingField::Date, DATE_FORMAT_MESSAGE);
    }

    let start = required_time(
        &mut errors,
        MeetingField::StartTime,
        &draft.start_time,
        "Start time is required",
    );
    let end = required_time(
        &mut errors,
        MeetingField::EndTime,
        &draft.end_time,
        "End time is required",
    );
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.insert(MeetingField::EndTime, "End time must be after start time");
        }
    }

    if draft.participants().is_empty() {
        errors.insert(MeetingField::Persons, "At least one participant is required");
    }

    errors
}

/// Records `message` when `value` is blank. Returns whether a value is present.
fn require<F: FormField>(
    errors: &mut ValidationErrors<F>,
    field: F,
    value: &str,
    message: &str,
) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, message);
        false
    } else {
        true
    }
}

fn required_time<F: FormField>(
    errors: &mut ValidationErrors<F>,
    field: F,
    value: &str,
    message: &str,
) -> Option<NaiveTime> {
    if !require(errors, field, value, message) {
        return None;
    }
    let time = parse_clock_time(value.trim());
    if time.is_none() {
        errors.insert(field, TIME_FORMAT_MESSAGE);
    }
    time
}

/// Strict `YYYY-MM-DD` naming a real calendar day.
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    shape_ok && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// `HH:MM` or `HH:MM:SS`, zero padded.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    let shape_ok = matches!(bytes.len(), 5 | 8)
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b':',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }

    let format = if bytes.len() == 5 { "%H:%M" } else { "%H:%M:%S" };
    NaiveTime::parse_from_str(value, format).ok()
}
