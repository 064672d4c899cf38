//! Plain-text page rendering for the CLI.

use std::fmt::Write;

use agenda_core::view::{self, Card, PageView, Presentable};
use agenda_core::ViewMode;

pub const GRID_COLUMNS: usize = 3;
/// Outer width of a grid card, borders included.
pub const CARD_WIDTH: usize = 36;

pub fn render_page<R: Presentable>(records: &[R], mode: ViewMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} view)", R::PAGE_TITLE, mode.as_str());
    let _ = writeln!(out);

    match view::page(records, mode) {
        PageView::Empty(placeholder) => {
            let _ = writeln!(out, "{}", placeholder);
        }
        PageView::Cards(cards) => match mode {
            ViewMode::Grid => render_grid(&cards, &mut out),
            ViewMode::List => render_list(&cards, &mut out),
        },
    }
    out
}

fn render_grid(cards: &[Card], out: &mut String) {
    for row in cards.chunks(GRID_COLUMNS) {
        let boxes: Vec<Vec<String>> = row.iter().map(boxed).collect();
        let height = boxes.iter().map(Vec::len).max().unwrap_or(0);
        let blank = " ".repeat(CARD_WIDTH);

        for line in 0..height {
            let joined: Vec<&str> = boxes
                .iter()
                .map(|b| b.get(line).map(String::as_str).unwrap_or(blank.as_str()))
                .collect();
            let _ = writeln!(out, "{}", joined.join(" ").trim_end());
        }
    }
}

fn render_list(cards: &[Card], out: &mut String) {
    for (index, card) in cards.iter().enumerate() {
        if index > 0 {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{}  #{}", card.title, card.id);
        for line in &card.lines {
            let _ = writeln!(out, "  {}", line);
        }
    }
}

/// A card drawn in a fixed-width box.
fn boxed(card: &Card) -> Vec<String> {
    let inner = CARD_WIDTH - 4;
    let rule = format!("+{}+", "-".repeat(CARD_WIDTH - 2));

    let mut lines = vec![rule.clone(), format!("| {} |", fit(&card.title, inner))];
    lines.extend(card.lines.iter().map(|l| format!("| {} |", fit(l, inner))));
    lines.push(rule);
    lines
}

/// Clips or pads `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('~');
        clipped
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::models::Note;

    fn note(id: &str, date: &str) -> Note {
        Note {
            id: id.into(),
            title: format!("Note {}", id),
            content: "Budget discussion".into(),
            date: date.into(),
            author: "CPC".into(),
        }
    }

    #[test]
    fn empty_page_shows_placeholder() {
        let text = render_page::<Note>(&[], ViewMode::Grid);
        assert!(text.contains("No notes available. Add a new note to get started!"));
    }

    #[test]
    fn list_shows_newest_first_with_ids() {
        let text = render_page(&[note("1", "2024-01-01"), note("2", "2024-02-01")], ViewMode::List);
        let first = text.find("Note 2  #2").unwrap();
        let second = text.find("Note 1  #1").unwrap();
        assert!(first < second);
        assert!(text.contains("  By: CPC"));
    }

    #[test]
    fn grid_lines_stay_within_the_row_width() {
        let notes: Vec<Note> = (0..4).map(|i| note(&i.to_string(), "2024-01-01")).collect();
        let text = render_page(&notes, ViewMode::Grid);

        let limit = GRID_COLUMNS * CARD_WIDTH + GRID_COLUMNS - 1;
        assert!(text.lines().all(|line| line.chars().count() <= limit));
        assert_eq!(text.matches("| Note ").count(), 4);
    }

    #[test]
    fn fit_pads_and_clips() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc~");
    }
}
