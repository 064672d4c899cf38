use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use super::{new_id, now, Database};
use crate::models::{Note, NoteInput};

const COLUMNS: &str = "id, title, content, date, author";

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        date: row.get(3)?,
        author: row.get(4)?,
    })
}

impl Database {
    pub fn get_all_notes(&self) -> Result<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM notes ORDER BY rowid", COLUMNS))?;
        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    pub fn get_note(&self, id: &str) -> Result<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!("SELECT {} FROM notes WHERE id = ?1", COLUMNS),
                [id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    pub fn create_note(&self, input: &NoteInput) -> Result<Note> {
        let note = Note {
            id: new_id(),
            title: input.title.clone(),
            content: input.content.clone(),
            date: input.date.clone(),
            author: input.author.clone(),
        };
        let stamp = now();

        self.conn()?.execute(
            "INSERT INTO notes (id, title, content, date, author, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![note.id, note.title, note.content, note.date, note.author, stamp],
        )?;
        tracing::debug!("Inserted note {}", note.id);
        Ok(note)
    }

    /// Returns `None` when no note has this id.
    pub fn update_note(&self, id: &str, input: &NoteInput) -> Result<Option<Note>> {
        let changed = self.conn()?.execute(
            "UPDATE notes SET title = ?1, content = ?2, date = ?3, author = ?4, updated_at = ?5
             WHERE id = ?6",
            params![input.title, input.content, input.date, input.author, now(), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_note(id)
    }

    pub fn delete_note(&self, id: &str) -> Result<bool> {
        let changed = self.conn()?.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Inserts or replaces notes with their own ids. Returns the number written.
    pub fn import_notes(&self, notes: &[Note]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let stamp = now();
        for note in notes {
            tx.execute(
                "INSERT OR REPLACE INTO notes (id, title, content, date, author, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![note.id, note.title, note.content, note.date, note.author, stamp],
            )?;
        }
        tx.commit()?;
        Ok(notes.len())
    }
}
