//! Core library for Agenda.
//!
//! This crate provides the record models, form validation, the page-level
//! record store and the persistence used by the mock data service,
//! independent of any transport layer (HTTP, terminal UI, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use agenda_core::models::{Note, NoteField};
//! use agenda_core::service::fake::FakeService;
//! use agenda_core::store::RecordStore;
//!
//! # tokio_test::block_on(async {
//! let service = FakeService::<Note>::new();
//! let mut store = RecordStore::<Note>::new();
//! store.load(&service).await;
//!
//! store.begin_create()?;
//! store.update_draft_field(NoteField::Title, "Q1 Review")?;
//! store.update_draft_field(NoteField::Content, "Budget discussion")?;
//! store.update_draft_field(NoteField::Date, "2024-03-01")?;
//! store.update_draft_field(NoteField::Author, "CPC")?;
//! store.save(&service).await?;
//! # Ok::<(), agenda_core::store::StoreError>(())
//! # });
//! ```

pub mod db;
pub mod models;
pub mod service;
pub mod store;
pub mod validate;
pub mod view;

// Re-export commonly used types at crate root
pub use db::Database;
pub use service::{DataService, ServiceError};
pub use store::{RecordStore, StoreError};
pub use view::ViewMode;
