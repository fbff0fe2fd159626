use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::dto::MessageResponse;
use crate::auth::extractors::StaffUser;
use crate::error::ApiError;
use crate::events::dto::{CreateEventRequest, EventResponse, UpdateEventRequest};
use crate::events::repo;
use crate::state::AppState;

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[instrument(skip(state))]
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = repo::list_all(&state.db).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

#[instrument(skip(state))]
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;
    Ok(Json(EventResponse::from(event)))
}

#[instrument(skip(state, payload, staff))]
async fn create_event(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".into()));
    }

    let event = repo::insert(&state.db, payload.into_new_event(staff.id)).await?;

    info!(event_id = %event.id, created_by = %staff.id, "event created");
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

#[instrument(skip(state, payload, staff))]
async fn update_event(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = repo::update(&state.db, id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;
    info!(event_id = %event.id, updated_by = %staff.id, "event updated");
    Ok(Json(EventResponse::from(event)))
}

#[instrument(skip(state, staff))]
async fn delete_event(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Event not found".into()));
    }
    info!(event_id = %id, deleted_by = %staff.id, "event deleted");
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
