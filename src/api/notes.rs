use agenda_core::models::{Note, NoteInput};
use agenda_core::Database;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;

pub async fn list(State(db): State<Database>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(db.get_all_notes()?))
}

pub async fn create(
    State(db): State<Database>,
    Json(input): Json<NoteInput>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = db.create_note(&input)?;
    tracing::info!("Created note {}", note.id);
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(input): Json<NoteInput>,
) -> Result<Json<Note>, ApiError> {
    let note = db
        .update_note(&id, &input)?
        .ok_or_else(|| ApiError::NotFound(format!("note {}", id)))?;
    tracing::info!("Updated note {}", id);
    Ok(Json(note))
}

pub async fn delete(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !db.delete_note(&id)? {
        return Err(ApiError::NotFound(format!("note {}", id)));
    }
    tracing::info!("Deleted note {}", id);
    Ok(StatusCode::NO_CONTENT)
}
