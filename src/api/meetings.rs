use agenda_core::models::{Meeting, MeetingInput};
use agenda_core::Database;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;

pub async fn list(State(db): State<Database>) -> Result<Json<Vec<Meeting>>, ApiError> {
    Ok(Json(db.get_all_meetings()?))
}

pub async fn create(
    State(db): State<Database>,
    Json(input): Json<MeetingInput>,
) -> Result<(StatusCode, Json<Meeting>), ApiError> {
    let meeting = db.create_meeting(&input)?;
    tracing::info!("Created meeting {}", meeting.id);
    Ok((StatusCode::CREATED, Json(meeting)))
}

pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(input): Json<MeetingInput>,
) -> Result<Json<Meeting>, ApiError> {
    let meeting = db
        .update_meeting(&id, &input)?
        .ok_or_else(|| ApiError::NotFound(format!("meeting {}", id)))?;
    tracing::info!("Updated meeting {}", id);
    Ok(Json(meeting))
}

pub async fn delete(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !db.delete_meeting(&id)? {
        return Err(ApiError::NotFound(format!("meeting {}", id)));
    }
    tracing::info!("Deleted meeting {}", id);
    Ok(StatusCode::NO_CONTENT)
}
