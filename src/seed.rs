//! Seeding the mock backend from static JSON files.
//!
//! A seed directory holds `notes.json` and/or `meetings.json`, each a JSON
//! array of records. Missing files are skipped; malformed entries are dropped.

use std::path::Path;

use agenda_core::models::{Entity, Meeting, Note};
use agenda_core::service::decode_list;
use agenda_core::Database;
use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub notes: usize,
    pub meetings: usize,
}

pub fn seed_from_dir(db: &Database, dir: &Path) -> Result<SeedReport> {
    let notes = read_collection::<Note>(dir)?;
    let meetings = read_collection::<Meeting>(dir)?;

    let report = SeedReport {
        notes: db.import_notes(&notes)?,
        meetings: db.import_meetings(&meetings)?,
    };
    tracing::info!(
        "Seeded {} notes and {} meetings from {}",
        report.notes,
        report.meetings,
        dir.display()
    );
    Ok(report)
}

fn read_collection<R: Entity>(dir: &Path) -> Result<Vec<R>> {
    let path = dir.join(format!("{}.json", R::COLLECTION));
    if !path.exists() {
        tracing::debug!("No seed file at {}", path.display());
        return Ok(Vec::new());
    }

    let body = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<R> = decode_list(&body);
    Ok(records
        .into_iter()
        .filter(|record| !record.id().trim().is_empty())
        .collect())
}
