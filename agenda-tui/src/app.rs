//! Application state for the Agenda TUI.
//!
//! Each page owns a [`RecordStore`]. Data service calls run on the tokio
//! runtime and report back through a channel that the event loop drains
//! between frames, so the terminal stays responsive while a call is out.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use agenda::client::HttpDataService;
use agenda::config::Config;
use agenda_core::models::{Draft, Entity, FieldOf, FormField, Meeting, Note};
use agenda_core::service::DataService;
use agenda_core::store::{FormState, LoadTicket, Mutation};
use agenda_core::view::{self, Presentable};
use agenda_core::{RecordStore, ServiceError, StoreError, ViewMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Handle;

use crate::ui::GRID_COLUMNS;

/// How long a save or delete may run before it is logged as stalled.
pub const STALL_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Notes,
    Meetings,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Notes, Page::Meetings];

    pub fn label(self) -> &'static str {
        match self {
            Page::Notes => "Notes",
            Page::Meetings => "Meetings",
        }
    }

    fn next(self) -> Self {
        match self {
            Page::Notes => Page::Meetings,
            Page::Meetings => Page::Notes,
        }
    }
}

/// One page: its store, the selected card and the focused form field.
pub struct PageState<R: Entity> {
    pub store: RecordStore<R>,
    /// Index into the page's display order.
    pub selected: usize,
    /// Index into the form's field list.
    pub focus: usize,
}

impl<R: Entity> PageState<R> {
    fn new() -> Self {
        Self {
            store: RecordStore::new(),
            selected: 0,
            focus: 0,
        }
    }

    pub fn selected_id(&self) -> Option<String> {
        view::arrange(self.store.records())
            .get(self.selected)
            .map(|record| record.id().to_owned())
    }

    pub fn focused_field(&self) -> FieldOf<R> {
        let fields = <FieldOf<R> as FormField>::ALL;
        fields[self.focus.min(fields.len() - 1)]
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.records().len().saturating_sub(1));
    }

    fn move_selection(&mut self, delta: isize) {
        let last = self.store.records().len().saturating_sub(1) as isize;
        self.selected = (self.selected as isize + delta).clamp(0, last) as usize;
    }

    fn move_focus(&mut self, forward: bool) {
        let count = <FieldOf<R> as FormField>::ALL.len();
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
    }
}

/// Result of a background call, tagged with what it was.
#[derive(Debug)]
pub enum Outcome<R> {
    Loaded(LoadTicket, Result<Vec<R>, ServiceError>),
    Saved(Result<Option<R>, ServiceError>),
    Deleted(Result<(), ServiceError>),
}

#[derive(Debug)]
pub enum Completion {
    Notes(Outcome<Note>),
    Meetings(Outcome<Meeting>),
}

/// Connects a record type to its page, its service and its completion tag.
pub trait Routed: Presentable {
    fn state(app: &App) -> &PageState<Self>;
    fn state_mut(app: &mut App) -> &mut PageState<Self>;
    fn service(app: &App) -> HttpDataService<Self>;
    fn complete(outcome: Outcome<Self>) -> Completion;
}

impl Routed for Note {
    fn state(app: &App) -> &PageState<Self> {
        &app.notes
    }

    fn state_mut(app: &mut App) -> &mut PageState<Self> {
        &mut app.notes
    }

    fn service(app: &App) -> HttpDataService<Self> {
        app.note_service.clone()
    }

    fn complete(outcome: Outcome<Self>) -> Completion {
        Completion::Notes(outcome)
    }
}

impl Routed for Meeting {
    fn state(app: &App) -> &PageState<Self> {
        &app.meetings
    }

    fn state_mut(app: &mut App) -> &mut PageState<Self> {
        &mut app.meetings
    }

    fn service(app: &App) -> HttpDataService<Self> {
        app.meeting_service.clone()
    }

    fn complete(outcome: Outcome<Self>) -> Completion {
        Completion::Meetings(outcome)
    }
}

/// Application state.
pub struct App {
    pub page: Page,
    pub view_mode: ViewMode,
    pub notes: PageState<Note>,
    pub meetings: PageState<Meeting>,
    /// Local feedback (validation, busy) shown when no banner is up.
    pub notice: Option<String>,
    pub should_quit: bool,
    runtime: Handle,
    note_service: HttpDataService<Note>,
    meeting_service: HttpDataService<Meeting>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl App {
    pub fn new(config: &Config, runtime: Handle) -> Result<Self, ServiceError> {
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            page: Page::Notes,
            view_mode: ViewMode::default(),
            notes: PageState::new(),
            meetings: PageState::new(),
            notice: None,
            should_quit: false,
            runtime,
            note_service: HttpDataService::new(config)?,
            meeting_service: HttpDataService::new(config)?,
            tx,
            rx,
        })
    }

    pub fn form_open(&self) -> bool {
        match self.page {
            Page::Notes => self.notes.store.form_state() != FormState::Closed,
            Page::Meetings => self.meetings.store.form_state() != FormState::Closed,
        }
    }

    pub fn banner(&self) -> Option<&str> {
        match self.page {
            Page::Notes => self.notes.store.banner(),
            Page::Meetings => self.meetings.store.banner(),
        }
    }

    pub fn load_all(&mut self) {
        self.load::<Note>();
        self.load::<Meeting>();
    }

    /// Applies finished calls and checks for stalled ones. Called once per frame.
    pub fn tick(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            match completion {
                Completion::Notes(outcome) => self.apply(outcome),
                Completion::Meetings(outcome) => self.apply(outcome),
            }
        }
        self.notes.store.warn_if_stalled(STALL_AFTER);
        self.meetings.store.warn_if_stalled(STALL_AFTER);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.page {
            Page::Notes => self.handle_page_key::<Note>(key),
            Page::Meetings => self.handle_page_key::<Meeting>(key),
        }
    }

    fn handle_page_key<R: Routed>(&mut self, key: KeyEvent) {
        if R::state(self).store.form_state() != FormState::Closed {
            self.handle_form_key::<R>(key);
            return;
        }

        let step = match self.view_mode {
            ViewMode::Grid => GRID_COLUMNS as isize,
            ViewMode::List => 1,
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.page = self.page.next();
                self.notice = None;
            }
            KeyCode::Char('v') => self.view_mode = self.view_mode.toggled(),
            KeyCode::Char('n') => self.open_new::<R>(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_selected::<R>(),
            KeyCode::Char('d') => self.delete_selected::<R>(),
            KeyCode::Char('r') => self.load::<R>(),
            KeyCode::Char('x') => R::state_mut(self).store.dismiss_banner(),
            KeyCode::Up | KeyCode::Char('k') => R::state_mut(self).move_selection(-step),
            KeyCode::Down | KeyCode::Char('j') => R::state_mut(self).move_selection(step),
            KeyCode::Left | KeyCode::Char('h') => R::state_mut(self).move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => R::state_mut(self).move_selection(1),
            _ => {}
        }
    }

    fn handle_form_key<R: Routed>(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                let result = R::state_mut(self).store.cancel();
                self.report(result);
            }
            KeyCode::Enter => self.save::<R>(),
            KeyCode::Tab | KeyCode::Down => R::state_mut(self).move_focus(true),
            KeyCode::BackTab | KeyCode::Up => R::state_mut(self).move_focus(false),
            KeyCode::Backspace => self.edit_focused::<R>(|value| {
                value.pop();
            }),
            KeyCode::Char(c) => self.edit_focused::<R>(|value| value.push(c)),
            _ => {}
        }
    }

    fn edit_focused<R: Routed>(&mut self, edit: impl FnOnce(&mut String)) {
        let state = R::state_mut(self);
        let field = state.focused_field();
        let Some(draft) = state.store.draft() else {
            return;
        };
        let mut value = draft.get(field);
        edit(&mut value);
        let result = state.store.update_draft_field(field, &value);
        self.report(result);
    }

    fn open_new<R: Routed>(&mut self) {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let state = R::state_mut(self);
        let result = state.store.begin_create().and_then(|()| {
            state
                .store
                .update_draft_field(<R::Draft as Draft>::DATE_FIELD, &today)
        });
        state.focus = 0;
        self.report(result);
    }

    fn open_selected<R: Routed>(&mut self) {
        let state = R::state_mut(self);
        let Some(id) = state.selected_id() else {
            return;
        };
        let result = state.store.begin_edit(&id);
        state.focus = 0;
        self.report(result);
    }

    fn load<R: Routed>(&mut self) {
        let ticket = R::state_mut(self).store.begin_load();
        let service = R::service(self);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = service.list().await;
            let _ = tx.send(R::complete(Outcome::Loaded(ticket, result)));
        });
    }

    fn save<R: Routed>(&mut self) {
        let mutation = match R::state_mut(self).store.begin_save() {
            Ok(mutation) => mutation,
            Err(e) => {
                self.report(Err(e));
                return;
            }
        };
        self.notice = None;
        let service = R::service(self);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = match mutation {
                Mutation::Create { input } => service.create(&input).await,
                Mutation::Update { id, input } => service.update(&id, &input).await,
            };
            let _ = tx.send(R::complete(Outcome::Saved(result)));
        });
    }

    fn delete_selected<R: Routed>(&mut self) {
        let Some(id) = R::state(self).selected_id() else {
            return;
        };
        if let Err(e) = R::state_mut(self).store.begin_delete(&id) {
            self.report(Err(e));
            return;
        }
        let service = R::service(self);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = service.delete(&id).await;
            let _ = tx.send(R::complete(Outcome::Deleted(result)));
        });
    }

    pub fn apply<R: Routed>(&mut self, outcome: Outcome<R>) {
        let state = R::state_mut(self);
        let result = match outcome {
            // A refreshed list says nothing about the form, so the notice stays.
            Outcome::Loaded(ticket, result) => {
                state.store.finish_load(ticket, result);
                state.clamp_selection();
                return;
            }
            Outcome::Saved(result) => state.store.finish_save(result),
            Outcome::Deleted(result) => state.store.finish_delete(result),
        };
        state.clamp_selection();
        self.report(result);
    }

    /// Turns a store result into the status line notice. Service failures
    /// already raised a banner, so they only clear the notice.
    fn report(&mut self, result: Result<(), StoreError>) {
        self.notice = match result {
            Ok(()) | Err(StoreError::Service(_)) => None,
            Err(StoreError::Invalid(count)) => Some(format!("{} field(s) need attention", count)),
            Err(e) => Some(e.to_string()),
        };
    }
}
