use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use super::{new_id, now, Database};
use crate::models::{Meeting, MeetingInput};

const COLUMNS: &str = "id, title, agenda, meetingdatetime, endtime, persons";

fn meeting_from_row(row: &Row<'_>) -> rusqlite::Result<Meeting> {
    let persons: String = row.get(5)?;
    let persons = serde_json::from_str(&persons).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Meeting {
        id: row.get(0)?,
        title: row.get(1)?,
        agenda: row.get(2)?,
        starts_at: row.get(3)?,
        end_time: row.get(4)?,
        persons,
    })
}

impl Database {
    pub fn get_all_meetings(&self) -> Result<Vec<Meeting>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM meetings ORDER BY rowid", COLUMNS))?;
        let meetings = stmt
            .query_map([], meeting_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(meetings)
    }

    pub fn get_meeting(&self, id: &str) -> Result<Option<Meeting>> {
        let conn = self.conn()?;
        let meeting = conn
            .query_row(
                &format!("SELECT {} FROM meetings WHERE id = ?1", COLUMNS),
                [id],
                meeting_from_row,
            )
            .optional()?;
        Ok(meeting)
    }

    pub fn create_meeting(&self, input: &MeetingInput) -> Result<Meeting> {
        let meeting = Meeting {
            id: new_id(),
            title: input.title.clone(),
            agenda: input.agenda.clone(),
            starts_at: input.starts_at.clone(),
            end_time: input.end_time.clone(),
            persons: input.persons.clone(),
        };
        let persons = serde_json::to_string(&meeting.persons)?;
        let stamp = now();

        self.conn()?.execute(
            "INSERT INTO meetings (id, title, agenda, meetingdatetime, endtime, persons, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                meeting.id,
                meeting.title,
                meeting.agenda,
                meeting.starts_at,
                meeting.end_time,
                persons,
                stamp
            ],
        )?;
        tracing::debug!("Inserted meeting {}", meeting.id);
        Ok(meeting)
    }

    /// Returns `None` when no meeting has this id.
    pub fn update_meeting(&self, id: &str, input: &MeetingInput) -> Result<Option<Meeting>> {
        let persons = serde_json::to_string(&input.persons)?;
        let changed = self.conn()?.execute(
            "UPDATE meetings SET title = ?1, agenda = ?2, meetingdatetime = ?3, endtime = ?4,
                persons = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                input.title,
                input.agenda,
                input.starts_at,
                input.end_time,
                persons,
                now(),
                id
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_meeting(id)
    }

    pub fn delete_meeting(&self, id: &str) -> Result<bool> {
        let changed = self.conn()?.execute("DELETE FROM meetings WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Inserts or replaces meetings with their own ids. Returns the number written.
    pub fn import_meetings(&self, meetings: &[Meeting]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let stamp = now();
        for meeting in meetings {
            tx.execute(
                "INSERT OR REPLACE INTO meetings
                    (id, title, agenda, meetingdatetime, endtime, persons, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    meeting.id,
                    meeting.title,
                    meeting.agenda,
                    meeting.starts_at,
                    meeting.end_time,
                    serde_json::to_string(&meeting.persons)?,
                    stamp
                ],
            )?;
        }
        tx.commit()?;
        Ok(meetings.len())
    }
}
