use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Draft, Entity, FormField};
use crate::validate::{self, ValidationErrors};

/// A scheduled meeting.
///
/// The start is stored combined (`meetingdatetime`, `YYYY-MM-DDTHH:MM`) while
/// the edit form works on separate date and start time fields; see
/// [`split_datetime`] and [`join_datetime`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default, deserialize_with = "super::id::deserialize")]
    pub id: String,
    pub title: String,
    pub agenda: String,
    #[serde(rename = "meetingdatetime")]
    pub starts_at: String,
    #[serde(rename = "endtime")]
    pub end_time: String,
    #[serde(default)]
    pub persons: Vec<String>,
}

/// Input for creating or updating a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingInput {
    pub title: String,
    pub agenda: String,
    #[serde(rename = "meetingdatetime")]
    pub starts_at: String,
    #[serde(rename = "endtime")]
    pub end_time: String,
    pub persons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeetingField {
    Title,
    Agenda,
    Date,
    StartTime,
    EndTime,
    Persons,
}

impl FormField for MeetingField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::Agenda,
        Self::Date,
        Self::StartTime,
        Self::EndTime,
        Self::Persons,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Agenda => "agenda",
            Self::Date => "date",
            Self::StartTime => "starttime",
            Self::EndTime => "endtime",
            Self::Persons => "persons",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Title => "Meeting Title",
            Self::Agenda => "Agenda",
            Self::Date => "Date",
            Self::StartTime => "Start time",
            Self::EndTime => "End time",
            Self::Persons => "Participants (comma separated)",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "agenda" => Some(Self::Agenda),
            "date" => Some(Self::Date),
            "starttime" => Some(Self::StartTime),
            "endtime" => Some(Self::EndTime),
            "persons" => Some(Self::Persons),
            _ => None,
        }
    }
}

impl fmt::Display for MeetingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingDraft {
    pub title: String,
    pub agenda: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    /// Participants as typed, comma separated.
    pub persons: String,
    /// Participants of the record being edited. Used verbatim while `persons`
    /// still reads as their display form, so names containing commas survive.
    loaded_persons: Vec<String>,
}

impl MeetingDraft {
    /// Participant names, trimmed, without empty entries.
    pub fn participants(&self) -> Vec<String> {
        if !self.loaded_persons.is_empty() && self.persons == self.loaded_persons.join(", ") {
            return self.loaded_persons.clone();
        }
        parse_persons(&self.persons)
    }
}

impl Draft for MeetingDraft {
    type Field = MeetingField;
    type Input = MeetingInput;

    const DATE_FIELD: MeetingField = MeetingField::Date;

    fn get(&self, field: MeetingField) -> String {
        match field {
            MeetingField::Title => self.title.clone(),
            MeetingField::Agenda => self.agenda.clone(),
            MeetingField::Date => self.date.clone(),
            MeetingField::StartTime => self.start_time.clone(),
            MeetingField::EndTime => self.end_time.clone(),
            MeetingField::Persons => self.persons.clone(),
        }
    }

    fn set(&mut self, field: MeetingField, value: &str) {
        let slot = match field {
            MeetingField::Title => &mut self.title,
            MeetingField::Agenda => &mut self.agenda,
            MeetingField::Date => &mut self.date,
            MeetingField::StartTime => &mut self.start_time,
            MeetingField::EndTime => &mut self.end_time,
            MeetingField::Persons => &mut self.persons,
        };
        *slot = value.to_owned();
    }

    fn validate(&self) -> ValidationErrors<MeetingField> {
        validate::validate_meeting(self)
    }

    fn to_input(&self) -> MeetingInput {
        MeetingInput {
            title: self.title.clone(),
            agenda: self.agenda.clone(),
            starts_at: join_datetime(self.date.trim(), self.start_time.trim()),
            end_time: self.end_time.trim().to_owned(),
            persons: self.participants(),
        }
    }
}

impl Entity for Meeting {
    type Draft = MeetingDraft;

    const COLLECTION: &'static str = "meetings";
    const LABEL: &'static str = "Meeting";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_draft(&self) -> MeetingDraft {
        let (date, start_time) = split_datetime(&self.starts_at);
        MeetingDraft {
            title: self.title.clone(),
            agenda: self.agenda.clone(),
            date: date.to_owned(),
            start_time: start_time.to_owned(),
            end_time: self.end_time.clone(),
            persons: self.persons.join(", "),
            loaded_persons: self.persons.clone(),
        }
    }

    fn from_input(id: String, input: MeetingInput) -> Self {
        Self {
            id,
            title: input.title,
            agenda: input.agenda,
            starts_at: input.starts_at,
            end_time: input.end_time,
            persons: input.persons,
        }
    }

    fn timestamp(&self) -> Option<NaiveDateTime> {
        let value = self.starts_at.trim();
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }
}

/// Splits a combined `date T time` value. A value without `T` is all date.
pub fn split_datetime(combined: &str) -> (&str, &str) {
    combined.split_once('T').unwrap_or((combined, ""))
}

/// Inverse of [`split_datetime`] for values that carry a time.
pub fn join_datetime(date: &str, time: &str) -> String {
    format!("{}T{}", date, time)
}

/// Splits comma separated participant names.
pub fn parse_persons(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standup() -> Meeting {
        Meeting {
            id: "m1".into(),
            title: "Standup".into(),
            agenda: "Blockers".into(),
            starts_at: "2024-03-01T09:30".into(),
            end_time: "09:45".into(),
            persons: vec!["Ana".into(), "Bo".into()],
        }
    }

    #[test]
    fn edit_normalization_splits_the_start() {
        let draft = standup().to_draft();
        assert_eq!(draft.date, "2024-03-01");
        assert_eq!(draft.start_time, "09:30");
        assert_eq!(draft.persons, "Ana, Bo");
    }

    #[test]
    fn draft_round_trips_through_input() {
        let meeting = standup();
        let back = Meeting::from_input(meeting.id.clone(), meeting.to_draft().to_input());
        assert_eq!(back, meeting);
    }

    #[test]
    fn split_and_join_are_inverse() {
        for value in ["2024-03-01T09:30", "2024-12-31T23:59:59"] {
            let (date, time) = split_datetime(value);
            assert_eq!(join_datetime(date, time), value);
        }
        assert_eq!(split_datetime("2024-03-01"), ("2024-03-01", ""));
    }

    #[test]
    fn untouched_participants_keep_embedded_commas() {
        let mut meeting = standup();
        meeting.persons = vec!["Smith, J.".into(), "Ana".into()];
        let mut draft = meeting.to_draft();
        assert_eq!(draft.to_input().persons, meeting.persons);

        draft.set(MeetingField::Persons, "Smith, J., Ana, Bo");
        assert_eq!(draft.participants(), vec!["Smith", "J.", "Ana", "Bo"]);

        // Typing back the original text restores the original list.
        draft.set(MeetingField::Persons, "Smith, J., Ana");
        assert_eq!(draft.participants(), meeting.persons);
    }

    #[test]
    fn free_text_is_sent_as_typed() {
        let mut meeting = standup();
        meeting.title = " Standup ".into();
        meeting.agenda = "  1. Blockers\n".into();

        let input = meeting.to_draft().to_input();
        assert_eq!(input.title, " Standup ");
        assert_eq!(input.agenda, "  1. Blockers\n");
    }

    #[test]
    fn persons_ignore_blank_entries() {
        assert_eq!(parse_persons(" Ana , ,Bo,"), vec!["Ana", "Bo"]);
        assert!(parse_persons(" , ").is_empty());
    }

    #[test]
    fn wire_names_match_the_data_service() {
        let json = serde_json::to_value(standup()).unwrap();
        assert_eq!(json["meetingdatetime"], "2024-03-01T09:30");
        assert_eq!(json["endtime"], "09:45");

        let parsed: Meeting = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, standup());
    }

    #[test]
    fn timestamp_accepts_seconds() {
        let mut meeting = standup();
        assert!(meeting.timestamp().is_some());
        meeting.starts_at = "2024-03-01T09:30:15".into();
        assert!(meeting.timestamp().is_some());
        meeting.starts_at = "soon".into();
        assert!(meeting.timestamp().is_none());
    }
}
