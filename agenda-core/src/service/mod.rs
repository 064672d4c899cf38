//! The data service seam: list/create/update/delete for one record type.

pub mod fake;

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::models::{Entity, InputOf};

/// Failure of a single data service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("data service responded with status {0}")]
    Status(u16),
}

/// A REST-like CRUD endpoint for one entity type.
///
/// `create` and `update` yield `None` when the call succeeded but the response
/// body did not describe a record.
pub trait DataService<R: Entity>: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<R>, ServiceError>> + Send;

    fn create(
        &self,
        input: &InputOf<R>,
    ) -> impl Future<Output = Result<Option<R>, ServiceError>> + Send;

    fn update(
        &self,
        id: &str,
        input: &InputOf<R>,
    ) -> impl Future<Output = Result<Option<R>, ServiceError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Decodes a list response. Anything other than a JSON array is an empty
/// list; array elements that are not records are skipped.
pub fn decode_list<R: Entity>(body: &[u8]) -> Vec<R> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{} list response is not JSON: {}", R::COLLECTION, e);
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        tracing::warn!("{} list response is not an array", R::COLLECTION);
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<R>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed {} at index {}: {}", R::LABEL, index, e);
                None
            }
        })
        .collect()
}

/// Decodes a single-record response body, `None` if it does not match.
pub fn decode_record<R: Entity>(body: &[u8]) -> Option<R> {
    match serde_json::from_slice::<R>(body) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("Unexpected {} response body: {}", R::LABEL, e);
            None
        }
    }
}
