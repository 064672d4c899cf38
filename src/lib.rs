//! Agenda: notes and meetings over a REST data service.
//!
//! - [`client`] consumes a data service over HTTP.
//! - [`api`] serves the same contract locally as a mock backend.
//! - [`render`] prints record pages as plain text for the CLI.

pub mod api;
pub mod client;
pub mod config;
pub mod render;
pub mod seed;
