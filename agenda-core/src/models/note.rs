use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Draft, Entity, FormField};
use crate::validate::{self, ValidationErrors};

/// A dated note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, deserialize_with = "super::id::deserialize")]
    pub id: String,
    pub title: String,
    pub content: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(alias = "createdBy", alias = "person")]
    pub author: String,
}

/// Input for creating or updating a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub date: String,
    #[serde(alias = "createdBy", alias = "person")]
    pub author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoteField {
    Title,
    Content,
    Date,
    Author,
}

impl FormField for NoteField {
    const ALL: &'static [Self] = &[Self::Title, Self::Content, Self::Date, Self::Author];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Date => "date",
            Self::Author => "author",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Content => "Content",
            Self::Date => "Date",
            Self::Author => "Created By",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "content" => Some(Self::Content),
            "date" => Some(Self::Date),
            "author" | "createdBy" | "person" => Some(Self::Author),
            _ => None,
        }
    }
}

impl fmt::Display for NoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub date: String,
    pub author: String,
}

impl Draft for NoteDraft {
    type Field = NoteField;
    type Input = NoteInput;

    const DATE_FIELD: NoteField = NoteField::Date;

    fn get(&self, field: NoteField) -> String {
        match field {
            NoteField::Title => self.title.clone(),
            NoteField::Content => self.content.clone(),
            NoteField::Date => self.date.clone(),
            NoteField::Author => self.author.clone(),
        }
    }

    fn set(&mut self, field: NoteField, value: &str) {
        let slot = match field {
            NoteField::Title => &mut self.title,
            NoteField::Content => &mut self.content,
            NoteField::Date => &mut self.date,
            NoteField::Author => &mut self.author,
        };
        *slot = value.to_owned();
    }

    fn validate(&self) -> ValidationErrors<NoteField> {
        validate::validate_note(self)
    }

    fn to_input(&self) -> NoteInput {
        NoteInput {
            title: self.title.clone(),
            content: self.content.clone(),
            date: self.date.trim().to_owned(),
            author: self.author.clone(),
        }
    }
}

impl Entity for Note {
    type Draft = NoteDraft;

    const COLLECTION: &'static str = "notes";
    const LABEL: &'static str = "Note";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            date: self.date.clone(),
            author: self.author.clone(),
        }
    }

    fn from_input(id: String, input: NoteInput) -> Self {
        Self {
            id,
            title: input.title,
            content: input.content,
            date: input.date,
            author: input.author,
        }
    }

    fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_accepts_legacy_field_names() {
        let from_created_by: Note = serde_json::from_str(
            r#"{"id": 1, "title": "t", "content": "c", "date": "2024-03-01", "createdBy": "CPC"}"#,
        )
        .unwrap();
        let from_person: Note = serde_json::from_str(
            r#"{"id": "2", "title": "t", "content": "c", "date": "2024-03-01", "person": "Ana"}"#,
        )
        .unwrap();

        assert_eq!(from_created_by.id, "1");
        assert_eq!(from_created_by.author, "CPC");
        assert_eq!(from_person.author, "Ana");
    }

    #[test]
    fn draft_round_trips_through_input() {
        let note = Note {
            id: "n1".into(),
            title: "Q1 Review".into(),
            content: "Budget discussion".into(),
            date: "2024-03-01".into(),
            author: "CPC".into(),
        };

        let back = Note::from_input(note.id.clone(), note.to_draft().to_input());
        assert_eq!(back, note);
    }

    #[test]
    fn input_keeps_surrounding_whitespace_of_free_text() {
        let mut draft = NoteDraft::default();
        draft.set(NoteField::Title, "Retro ");
        draft.set(NoteField::Content, "  indented\n");
        draft.set(NoteField::Date, " 2024-03-01 ");

        let input = draft.to_input();
        assert_eq!(input.title, "Retro ");
        assert_eq!(input.content, "  indented\n");
        assert_eq!(input.date, "2024-03-01");
    }

    #[test]
    fn field_names_parse_back() {
        for field in NoteField::ALL {
            assert_eq!(NoteField::parse(field.as_str()), Some(*field));
        }
        assert_eq!(NoteField::parse("createdBy"), Some(NoteField::Author));
        assert_eq!(NoteField::parse("body"), None);
    }

    #[test]
    fn unparseable_date_has_no_timestamp() {
        let mut note = Note::from_input(
            "n".into(),
            NoteInput {
                title: "t".into(),
                content: "c".into(),
                date: "yesterday".into(),
                author: "a".into(),
            },
        );
        assert!(note.timestamp().is_none());

        note.date = "2024-02-29".into();
        assert!(note.timestamp().is_some());
    }
}
