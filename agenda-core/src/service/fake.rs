//! In-memory data service for tests and offline demos.

use std::sync::{Mutex, MutexGuard};

use super::{DataService, ServiceError};
use crate::models::{Entity, InputOf};

/// A call received by [`FakeService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create,
    Update(String),
    Delete(String),
}

#[derive(Debug)]
struct State<R> {
    records: Vec<R>,
    calls: Vec<Call>,
    next_id: u64,
    failure: Option<ServiceError>,
    bodyless: bool,
}

/// Echoing CRUD service backed by a vector.
///
/// Created records get ids `srv-1`, `srv-2`, ... Failures can be injected for
/// every following call with [`FakeService::fail_with`].
#[derive(Debug)]
pub struct FakeService<R> {
    state: Mutex<State<R>>,
}

impl<R: Entity> FakeService<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            state: Mutex::new(State {
                records,
                calls: Vec::new(),
                next_id: 1,
                failure: None,
                bodyless: false,
            }),
        }
    }

    /// Every following call fails with `error` until [`FakeService::recover`].
    pub fn fail_with(&self, error: ServiceError) {
        self.state().failure = Some(error);
    }

    pub fn recover(&self) {
        self.state().failure = None;
    }

    /// Successful create/update calls answer without a record body.
    pub fn respond_without_body(&self, bodyless: bool) {
        self.state().bodyless = bodyless;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Calls other than `List`.
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::List)
            .collect()
    }

    pub fn records(&self) -> Vec<R> {
        self.state().records.clone()
    }

    fn state(&self) -> MutexGuard<'_, State<R>> {
        // A panicking test thread must not hide the recorded calls.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self, call: Call) -> Result<MutexGuard<'_, State<R>>, ServiceError> {
        let mut state = self.state();
        state.calls.push(call);
        match state.failure.clone() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

impl<R: Entity> Default for FakeService<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Entity> DataService<R> for FakeService<R> {
    async fn list(&self) -> Result<Vec<R>, ServiceError> {
        let state = self.record_call(Call::List)?;
        Ok(state.records.clone())
    }

    async fn create(&self, input: &InputOf<R>) -> Result<Option<R>, ServiceError> {
        let mut state = self.record_call(Call::Create)?;
        let id = format!("srv-{}", state.next_id);
        state.next_id += 1;

        let record = R::from_input(id, input.clone());
        state.records.push(record.clone());
        Ok((!state.bodyless).then_some(record))
    }

    async fn update(&self, id: &str, input: &InputOf<R>) -> Result<Option<R>, ServiceError> {
        let mut state = self.record_call(Call::Update(id.to_owned()))?;
        let bodyless = state.bodyless;
        let slot = state
            .records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(ServiceError::Status(404))?;

        *slot = R::from_input(id.to_owned(), input.clone());
        Ok((!bodyless).then(|| slot.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut state = self.record_call(Call::Delete(id.to_owned()))?;
        let before = state.records.len();
        state.records.retain(|record| record.id() != id);
        if state.records.len() == before {
            return Err(ServiceError::Status(404));
        }
        Ok(())
    }
}
