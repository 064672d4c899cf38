mod id;
mod meeting;
mod note;

pub use meeting::*;
pub use note::*;

use std::fmt;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::validate::ValidationErrors;

/// A record type served by one data service collection.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Draft: Draft;

    /// Path segment of the REST collection, e.g. `notes`.
    const COLLECTION: &'static str;
    /// Human readable singular name, e.g. `Note`.
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Editable copy of this record, with any field normalization applied.
    fn to_draft(&self) -> Self::Draft;

    /// Builds a record from a validated input, the inverse of `to_draft` + `Draft::to_input`.
    fn from_input(id: String, input: InputOf<Self>) -> Self;

    /// The datetime views order by, `None` when the stored value does not parse.
    fn timestamp(&self) -> Option<NaiveDateTime>;
}

/// A mutable, possibly invalid record under construction.
pub trait Draft: Clone + fmt::Debug + Default + PartialEq + Send + Sync + 'static {
    type Field: FormField;
    type Input: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Field the form prefills with today's date.
    const DATE_FIELD: Self::Field;

    fn get(&self, field: Self::Field) -> String;
    fn set(&mut self, field: Self::Field, value: &str);
    fn validate(&self) -> ValidationErrors<Self::Field>;

    /// Payload for a create or update call. Only meaningful once `validate` is empty.
    fn to_input(&self) -> Self::Input;
}

/// A named form field.
pub trait FormField: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every field, in form order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn parse(s: &str) -> Option<Self>;
}

pub type FieldOf<R> = <<R as Entity>::Draft as Draft>::Field;
pub type InputOf<R> = <<R as Entity>::Draft as Draft>::Input;
