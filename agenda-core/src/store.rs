//! Page-level record store.
//!
//! A [`RecordStore`] owns the in-memory record list of one page and the state
//! of its create/edit form. Every network operation comes in two halves:
//! `begin_*` performs the state transition and describes the request,
//! `finish_*` applies the response. Event loops that run calls in the
//! background use the halves directly; [`RecordStore::load`],
//! [`RecordStore::save`] and [`RecordStore::delete`] drive a [`DataService`]
//! end to end.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;

use crate::models::{Draft, Entity, FieldOf, InputOf};
use crate::service::{DataService, ServiceError};
use crate::validate::ValidationErrors;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no form is open")]
    FormClosed,

    #[error("another change is still in flight")]
    Busy,

    #[error("{0} field(s) need attention")]
    Invalid(usize),

    #[error("no record with id {0}")]
    UnknownRecord(String),

    #[error("no change is in flight")]
    NothingInFlight,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    OpenCreate,
    OpenEdit,
}

/// The single create or update call a valid save turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<I> {
    Create { input: I },
    Update { id: String, input: I },
}

/// Identifies one issued load; completions older than the newest applied one
/// are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct Form<D: Draft> {
    /// Id of the record being edited, `None` when creating.
    editing: Option<String>,
    draft: D,
    errors: ValidationErrors<D::Field>,
}

#[derive(Debug)]
enum Operation<I> {
    Save(Mutation<I>),
    Delete(String),
}

#[derive(Debug)]
struct InFlight<I> {
    operation: Operation<I>,
    since: Instant,
    warned: bool,
}

#[derive(Debug)]
pub struct RecordStore<R: Entity> {
    records: Vec<R>,
    form: Option<Form<R::Draft>>,
    in_flight: Option<InFlight<InputOf<R>>>,
    banner: Option<String>,
    issued_loads: u64,
    applied_load: u64,
}

impl<R: Entity> RecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            form: None,
            in_flight: None,
            banner: None,
            issued_loads: 0,
            applied_load: 0,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn form_state(&self) -> FormState {
        match &self.form {
            None => FormState::Closed,
            Some(form) if form.editing.is_some() => FormState::OpenEdit,
            Some(_) => FormState::OpenCreate,
        }
    }

    pub fn draft(&self) -> Option<&R::Draft> {
        self.form.as_ref().map(|form| &form.draft)
    }

    /// Id of the record open in the edit form.
    pub fn editing_id(&self) -> Option<&str> {
        self.form.as_ref().and_then(|form| form.editing.as_deref())
    }

    pub fn errors(&self) -> Option<&ValidationErrors<FieldOf<R>>> {
        self.form.as_ref().map(|form| &form.errors)
    }

    pub fn error(&self, field: FieldOf<R>) -> Option<&str> {
        self.errors().and_then(|errors| errors.get(field))
    }

    /// Whether a save or delete call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_saving(&self) -> bool {
        matches!(
            self.in_flight,
            Some(InFlight {
                operation: Operation::Save(_),
                ..
            })
        )
    }

    /// Last network failure, for a transient banner.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued_loads += 1;
        LoadTicket(self.issued_loads)
    }

    /// Applies a list response. Returns `false` when a newer load was already
    /// applied and this one was discarded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<R>, ServiceError>,
    ) -> bool {
        if ticket.0 < self.applied_load {
            tracing::debug!(
                "Discarding stale {} load #{} (already at #{})",
                R::COLLECTION,
                ticket.0,
                self.applied_load
            );
            return false;
        }
        self.applied_load = ticket.0;

        match result {
            Ok(records) => {
                self.records = accept_list(records);
                tracing::info!("Loaded {} {}", self.records.len(), R::COLLECTION);
            }
            Err(e) => {
                tracing::error!("Error fetching {}: {}", R::COLLECTION, e);
                self.records.clear();
                self.banner = Some(format!("Could not load {}: {}", R::COLLECTION, e));
            }
        }
        true
    }

    pub async fn load<S: DataService<R>>(&mut self, service: &S) -> bool {
        let ticket = self.begin_load();
        let result = service.list().await;
        self.finish_load(ticket, result)
    }

    // ------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------

    pub fn begin_create(&mut self) -> Result<(), StoreError> {
        self.ensure_form_unlocked()?;
        self.form = Some(Form {
            editing: None,
            draft: R::Draft::default(),
            errors: ValidationErrors::new(),
        });
        tracing::debug!("Opened new {} form", R::LABEL);
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &str) -> Result<(), StoreError> {
        self.ensure_form_unlocked()?;
        let record = self
            .find(id)
            .ok_or_else(|| StoreError::UnknownRecord(id.to_owned()))?;
        let draft = record.to_draft();

        self.form = Some(Form {
            editing: Some(id.to_owned()),
            draft,
            errors: ValidationErrors::new(),
        });
        tracing::debug!("Editing {} {}", R::LABEL, id);
        Ok(())
    }

    /// Sets one draft field and clears that field's error only.
    pub fn update_draft_field(&mut self, field: FieldOf<R>, value: &str) -> Result<(), StoreError> {
        self.ensure_form_unlocked()?;
        let form = self.form.as_mut().ok_or(StoreError::FormClosed)?;
        form.draft.set(field, value);
        form.errors.remove(field);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), StoreError> {
        self.ensure_form_unlocked()?;
        if self.form.take().is_some() {
            tracing::debug!("Closed {} form", R::LABEL);
        }
        Ok(())
    }

    fn ensure_form_unlocked(&self) -> Result<(), StoreError> {
        if self.is_busy() {
            Err(StoreError::Busy)
        } else {
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Validates the draft and, if valid, marks the store busy and returns
    /// the one call to issue. An invalid draft records its errors and issues
    /// nothing.
    pub fn begin_save(&mut self) -> Result<Mutation<InputOf<R>>, StoreError> {
        if self.in_flight.is_some() {
            return Err(StoreError::Busy);
        }
        let form = self.form.as_mut().ok_or(StoreError::FormClosed)?;

        let errors = form.draft.validate();
        if !errors.is_empty() {
            let count = errors.len();
            tracing::debug!("{} draft has {} invalid field(s)", R::LABEL, count);
            form.errors = errors;
            return Err(StoreError::Invalid(count));
        }
        form.errors = ValidationErrors::new();

        let input = form.draft.to_input();
        let mutation = match &form.editing {
            Some(id) => Mutation::Update {
                id: id.clone(),
                input,
            },
            None => Mutation::Create { input },
        };

        self.in_flight = Some(InFlight {
            operation: Operation::Save(mutation.clone()),
            since: Instant::now(),
            warned: false,
        });
        Ok(mutation)
    }

    /// Applies the response to the call returned by [`RecordStore::begin_save`].
    /// Success reconciles the list from the response body and closes the
    /// form; failure keeps the form open.
    pub fn finish_save(&mut self, result: Result<Option<R>, ServiceError>) -> Result<(), StoreError> {
        let mutation = match self.in_flight.take() {
            Some(InFlight {
                operation: Operation::Save(mutation),
                ..
            }) => mutation,
            other => {
                self.in_flight = other;
                return Err(StoreError::NothingInFlight);
            }
        };

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                let action = match mutation {
                    Mutation::Create { .. } => "creating",
                    Mutation::Update { .. } => "updating",
                };
                tracing::error!("Error {} {}: {}", action, R::LABEL, e);
                self.banner = Some(format!("Could not save {}: {}", R::LABEL, e));
                return Err(e.into());
            }
        };

        match mutation {
            Mutation::Create { input } => {
                let mut record = match body {
                    Some(mut record) => {
                        if record.id().trim().is_empty() {
                            record.set_id(self.synthesize_id());
                        }
                        record
                    }
                    None => {
                        tracing::warn!("{} created without a usable body, keeping local copy", R::LABEL);
                        R::from_input(self.synthesize_id(), input)
                    }
                };
                if self.find(record.id()).is_some() {
                    let local = self.synthesize_id();
                    tracing::warn!(
                        "{} created with id {} already held by another record, listing it as {}",
                        R::LABEL,
                        record.id(),
                        local
                    );
                    record.set_id(local);
                }
                tracing::info!("{} created: {}", R::LABEL, record.id());
                self.records.push(record);
            }
            Mutation::Update { id, input } => {
                let mut record = match body {
                    Some(record) => record,
                    None => {
                        tracing::warn!("{} {} updated without a usable body, keeping local copy", R::LABEL, id);
                        R::from_input(id.clone(), input)
                    }
                };
                record.set_id(id.clone());
                tracing::info!("{} updated: {}", R::LABEL, id);
                self.upsert(record);
            }
        }

        self.form = None;
        Ok(())
    }

    pub async fn save<S: DataService<R>>(&mut self, service: &S) -> Result<(), StoreError> {
        let result = match self.begin_save()? {
            Mutation::Create { input } => service.create(&input).await,
            Mutation::Update { id, input } => service.update(&id, &input).await,
        };
        self.finish_save(result)
    }

    // ------------------------------------------------------------------
    // Deleting
    // ------------------------------------------------------------------

    pub fn begin_delete(&mut self, id: &str) -> Result<(), StoreError> {
        if self.in_flight.is_some() {
            return Err(StoreError::Busy);
        }
        if self.find(id).is_none() {
            return Err(StoreError::UnknownRecord(id.to_owned()));
        }

        self.in_flight = Some(InFlight {
            operation: Operation::Delete(id.to_owned()),
            since: Instant::now(),
            warned: false,
        });
        Ok(())
    }

    pub fn finish_delete(&mut self, result: Result<(), ServiceError>) -> Result<(), StoreError> {
        let id = match self.in_flight.take() {
            Some(InFlight {
                operation: Operation::Delete(id),
                ..
            }) => id,
            other => {
                self.in_flight = other;
                return Err(StoreError::NothingInFlight);
            }
        };

        if let Err(e) = result {
            tracing::error!("Error deleting {} {}: {}", R::LABEL, id, e);
            self.banner = Some(format!("Could not delete {}: {}", R::LABEL, e));
            return Err(e.into());
        }

        self.records.retain(|record| record.id() != id);
        if self.editing_id() == Some(id.as_str()) {
            self.form = None;
        }
        tracing::info!("{} deleted: {}", R::LABEL, id);
        Ok(())
    }

    pub async fn delete<S: DataService<R>>(&mut self, id: &str, service: &S) -> Result<(), StoreError> {
        self.begin_delete(id)?;
        let result = service.delete(id).await;
        self.finish_delete(result)
    }

    /// Logs, once per call, a save or delete outstanding for longer than
    /// `threshold`. Returns whether the outstanding call is stalled.
    pub fn warn_if_stalled(&mut self, threshold: Duration) -> bool {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return false;
        };
        if in_flight.since.elapsed() < threshold {
            return false;
        }

        if !in_flight.warned {
            in_flight.warned = true;
            let what = match &in_flight.operation {
                Operation::Save(_) => "save".to_owned(),
                Operation::Delete(id) => format!("delete of {}", id),
            };
            tracing::warn!(
                "{} {} still pending after {:?}",
                R::LABEL,
                what,
                in_flight.since.elapsed()
            );
        }
        true
    }

    fn upsert(&mut self, record: R) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
    }

    /// Local id for a created record the service returned without one:
    /// Unix time in milliseconds, bumped until unused.
    fn synthesize_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.find(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

impl<R: Entity> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops records without an id and repeated ids, keeping the first.
fn accept_list<R: Entity>(records: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let id = record.id();
            if id.trim().is_empty() {
                tracing::warn!("Dropping {} without an id", R::LABEL);
                return false;
            }
            if !seen.insert(id.to_owned()) {
                tracing::warn!("Dropping duplicate {} {}", R::LABEL, id);
                return false;
            }
            true
        })
        .collect()
}
