//! UI rendering with Ratatui.
//!
//! Design: Minimal black and white aesthetic. No colored borders.

use agenda_core::models::{Draft, FieldOf, FormField};
use agenda_core::store::FormState;
use agenda_core::view::{self, Card, PageView, Presentable};
use agenda_core::ViewMode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Page, PageState};

pub const GRID_COLUMNS: usize = 3;
const SIDEBAR_WIDTH: u16 = 16;

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: content area + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar (single line, no border)
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[0]);

    render_sidebar(frame, app, columns[0]);
    match app.page {
        Page::Notes => render_page(frame, &app.notes, app.view_mode, columns[1]),
        Page::Meetings => render_page(frame, &app.meetings, app.view_mode, columns[1]),
    }
    render_status(frame, app, chunks[1]);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Page::ALL
        .iter()
        .map(|page| {
            let style = if *page == app.page {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {}", page.label())).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().title(" agenda ").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_page<R: Presentable>(frame: &mut Frame, state: &PageState<R>, mode: ViewMode, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header::<R>(frame, mode, rows[0]);

    if state.store.form_state() == FormState::Closed {
        render_cards(frame, state, mode, rows[1]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        render_cards(frame, state, mode, body[0]);
        render_form(frame, state, body[1]);
    }
}

/// Page title plus the grid/list toggle.
fn render_header<R: Presentable>(frame: &mut Frame, mode: ViewMode, area: Rect) {
    let toggle = |m: ViewMode| {
        let style = if m == mode {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        Span::styled(format!(" {} ", m.as_str()), style)
    };

    let line = Line::from(vec![
        Span::styled(R::PAGE_TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        toggle(ViewMode::Grid),
        toggle(ViewMode::List),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn render_cards<R: Presentable>(frame: &mut Frame, state: &PageState<R>, mode: ViewMode, area: Rect) {
    let cards = match view::page(state.store.records(), mode) {
        PageView::Empty(placeholder) => {
            let text = Paragraph::new(placeholder)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(text, area);
            return;
        }
        PageView::Cards(cards) => cards,
    };

    match mode {
        ViewMode::Grid => render_grid(frame, &cards, state.selected, area),
        ViewMode::List => render_list(frame, &cards, state.selected, area),
    }
}

fn render_grid(frame: &mut Frame, cards: &[Card], selected: usize, area: Rect) {
    let height = cards.iter().map(|c| c.lines.len()).max().unwrap_or(0) as u16 + 4;
    let visible = (area.height / height).max(1) as usize;
    let first_row = (selected / GRID_COLUMNS).saturating_sub(visible - 1);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(height); visible])
        .split(area);

    for (row_index, row) in cards.chunks(GRID_COLUMNS).enumerate().skip(first_row).take(visible) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(row_areas[row_index - first_row]);

        for (column, card) in row.iter().enumerate() {
            let is_selected = row_index * GRID_COLUMNS + column == selected;
            frame.render_widget(card_widget(card, is_selected), cells[column]);
        }
    }
}

fn card_widget(card: &Card, selected: bool) -> Paragraph<'_> {
    let border = if selected {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
    };
    let lines: Vec<Line> = card.lines.iter().map(|l| Line::raw(l.as_str())).collect();

    Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(format!(" {} ", card.title), border))
            .borders(Borders::ALL)
            .border_style(border),
    )
}

fn render_list(frame: &mut Frame, cards: &[Card], selected: usize, area: Rect) {
    let items: Vec<ListItem> = cards
        .iter()
        .map(|card| {
            let mut text = Text::from(Line::styled(
                card.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            text.extend(card.lines.iter().map(|l| Line::raw(format!("  {}", l))));
            text.push_line(Line::raw(""));
            ListItem::new(text)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// The create/edit form with inline field errors.
fn render_form<R: Presentable>(frame: &mut Frame, state: &PageState<R>, area: Rect) {
    let Some(draft) = state.store.draft() else {
        return;
    };
    let focused = state.focused_field();

    let mut lines = Vec::new();
    for field in <FieldOf<R> as FormField>::ALL {
        let label_style = if *field == focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(field.label(), label_style));

        let value = draft.get(*field);
        if *field == focused {
            lines.push(Line::from(vec![
                Span::raw("> "),
                Span::styled(value, Style::default().add_modifier(Modifier::REVERSED)),
                Span::raw("_"),
            ]));
        } else {
            lines.push(Line::raw(format!("  {}", value)));
        }

        if let Some(message) = state.store.error(*field) {
            lines.push(Line::styled(
                format!("  ! {}", message),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
    }

    let verb = match state.store.form_state() {
        FormState::OpenEdit => "Edit",
        _ => "New",
    };
    let mut title = format!(" {} {} ", verb, R::LABEL.to_lowercase());
    if state.store.is_saving() {
        title.push_str("(saving...) ");
    }

    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(form, area);
}

/// Render the status bar.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));

    let status_text = if let Some(err) = app.banner() {
        Line::from(vec![
            Span::raw("error: "),
            Span::styled(err, Style::default().add_modifier(Modifier::DIM)),
            Span::raw("  "),
            key("x"),
            Span::raw(" dismiss"),
        ])
    } else if let Some(ref notice) = app.notice {
        Line::from(vec![Span::raw(notice.as_str())])
    } else if app.form_open() {
        Line::from(vec![
            key("tab"),
            Span::raw(" next field  "),
            key("enter"),
            Span::raw(" save  "),
            key("esc"),
            Span::raw(" cancel"),
        ])
    } else {
        Line::from(vec![
            key("tab"),
            Span::raw(" page  "),
            key("v"),
            Span::raw(" view  "),
            key("n"),
            Span::raw(" new  "),
            key("e"),
            Span::raw(" edit  "),
            key("d"),
            Span::raw(" delete  "),
            key("q"),
            Span::raw(" quit"),
        ])
    };

    frame.render_widget(Paragraph::new(status_text), area);
}
