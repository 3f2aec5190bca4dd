//! Progress-note endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use api_shared::dto::{CreateProgressNoteDto, ProgressNoteResponse};

use crate::{map_error, AppState};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNoteListParams {
    pub patient_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/progressnotes",
    params(ProgressNoteListParams),
    responses(
        (status = 200, description = "Progress notes, optionally scoped to a patient", body = Vec<ProgressNoteResponse>)
    )
)]
pub async fn list_progress_notes(
    State(state): State<AppState>,
    Query(params): Query<ProgressNoteListParams>,
) -> Result<Json<Vec<ProgressNoteResponse>>, (StatusCode, String)> {
    state
        .progress_notes
        .list(params.patient_id)
        .map(Json)
        .map_err(map_error)
}

#[utoipa::path(
    get,
    path = "/api/progressnotes/{id}",
    responses(
        (status = 200, description = "Progress note found", body = ProgressNoteResponse),
        (status = 404, description = "Progress note not found")
    )
)]
pub async fn get_progress_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProgressNoteResponse>, (StatusCode, String)> {
    match state.progress_notes.get(id).map_err(map_error)? {
        Some(note) => Ok(Json(note)),
        None => Err((StatusCode::NOT_FOUND, "Progress note not found".into())),
    }
}

#[utoipa::path(
    post,
    path = "/api/progressnotes",
    request_body = CreateProgressNoteDto,
    responses(
        (status = 201, description = "Progress note created; a critical note escalates the patient", body = ProgressNoteResponse),
        (status = 400, description = "Blank title, unknown patient or author")
    )
)]
pub async fn create_progress_note(
    State(state): State<AppState>,
    Json(dto): Json<CreateProgressNoteDto>,
) -> Result<(StatusCode, Json<ProgressNoteResponse>), (StatusCode, String)> {
    let note = state.progress_notes.create(dto).map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(note)))
}
