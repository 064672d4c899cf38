//! Presentation-neutral projection of a record list.
//!
//! Renderers (terminal, plain text) draw [`Card`]s; everything that must be
//! identical between the grid and list variants lives here: ordering,
//! truncation and the empty-list placeholder.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{split_datetime, Entity, Meeting, Note};

/// Character budget for free text in compact (grid) cards.
pub const TRUNCATE_AT: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }

    pub fn is_compact(self) -> bool {
        self == Self::Grid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view {0:?}, expected grid or list")]
pub struct ParseViewModeError(String);

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(ParseViewModeError(other.to_owned())),
        }
    }
}

/// What a renderer reports back to its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Edit(String),
    Delete(String),
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub lines: Vec<String>,
}

impl Card {
    pub fn edit(&self) -> Intent {
        Intent::Edit(self.id.clone())
    }

    pub fn delete(&self) -> Intent {
        Intent::Delete(self.id.clone())
    }
}

/// A page body: either cards or the placeholder shown for an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Empty(&'static str),
    Cards(Vec<Card>),
}

/// Records that know how to present themselves.
pub trait Presentable: Entity {
    const PAGE_TITLE: &'static str;
    const PLACEHOLDER: &'static str;

    fn card(&self, mode: ViewMode) -> Card;
}

impl Presentable for Note {
    const PAGE_TITLE: &'static str = "Take a Notes...";
    const PLACEHOLDER: &'static str = "No notes available. Add a new note to get started!";

    fn card(&self, mode: ViewMode) -> Card {
        Card {
            id: self.id.clone(),
            title: self.title.clone(),
            lines: vec![
                body_text(&self.content, mode).into_owned(),
                format!("Date: {}", self.date),
                format!("By: {}", self.author),
            ],
        }
    }
}

impl Presentable for Meeting {
    const PAGE_TITLE: &'static str = "Meeting Scheduler";
    const PLACEHOLDER: &'static str = "No meetings scheduled. Add a new meeting to get started!";

    fn card(&self, mode: ViewMode) -> Card {
        let (date, start) = split_datetime(&self.starts_at);
        Card {
            id: self.id.clone(),
            title: self.title.clone(),
            lines: vec![
                format!("Agenda: {}", body_text(&self.agenda, mode)),
                format!("Date: {}", date),
                format!("Time: {} - {}", start, self.end_time),
                format!("Participants: {}", self.persons.join(", ")),
            ],
        }
    }
}

fn body_text(text: &str, mode: ViewMode) -> Cow<'_, str> {
    if mode.is_compact() {
        truncate(text, TRUNCATE_AT)
    } else {
        Cow::Borrowed(text)
    }
}

/// Cuts `text` to `budget` characters followed by `...`.
pub fn truncate(text: &str, budget: usize) -> Cow<'_, str> {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Records in display order: most recent first, undated records last in
/// their original order. Used by every view mode.
pub fn arrange<R: Entity>(records: &[R]) -> Vec<&R> {
    let mut ordered: Vec<&R> = records.iter().collect();
    ordered.sort_by(|a, b| match (a.timestamp(), b.timestamp()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ordered
}

pub fn page<R: Presentable>(records: &[R], mode: ViewMode) -> PageView {
    if records.is_empty() {
        return PageView::Empty(R::PLACEHOLDER);
    }
    PageView::Cards(arrange(records).into_iter().map(|r| r.card(mode)).collect())
}
