use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::achievements::dto::{
    AchievementResponse, CreateAchievementRequest, UpdateAchievementRequest,
};
use crate::achievements::repo;
use crate::auth::dto::MessageResponse;
use crate::auth::extractors::StaffUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn achievement_routes() -> Router<AppState> {
    Router::new()
        .route("/achievements", get(list_achievements).post(create_achievement))
        .route("/achievements/user/:user_id", get(list_achievements_by_user))
        .route(
            "/achievements/:id",
            get(get_achievement)
                .put(update_achievement)
                .delete(delete_achievement),
        )
}

#[instrument(skip(state))]
async fn list_achievements(
    State(state): State<AppState>,
) -> Result<Json<Vec<AchievementResponse>>, ApiError> {
    let rows = repo::list_all(&state.db).await?;
    Ok(Json(rows.into_iter().map(AchievementResponse::from).collect()))
}

#[instrument(skip(state))]
async fn list_achievements_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<AchievementResponse>>, ApiError> {
    let rows = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(AchievementResponse::from).collect()))
}

#[instrument(skip(state))]
async fn get_achievement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AchievementResponse>, ApiError> {
    let achievement = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".into()))?;
    Ok(Json(AchievementResponse::from(achievement)))
}

#[instrument(skip(state, payload, staff))]
async fn create_achievement(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<CreateAchievementRequest>,
) -> Result<(StatusCode, Json<AchievementResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }

    let achievement = repo::insert(&state.db, payload.into_new_achievement(staff.id)).await?;

    info!(achievement_id = %achievement.id, created_by = %staff.id, "achievement created");
    Ok((
        StatusCode::CREATED,
        Json(AchievementResponse::from(achievement)),
    ))
}

#[instrument(skip(state, payload, staff))]
async fn update_achievement(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAchievementRequest>,
) -> Result<Json<AchievementResponse>, ApiError> {
    let achievement = repo::update(&state.db, id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Achievement not found".into()))?;
    info!(achievement_id = %achievement.id, updated_by = %staff.id, "achievement updated");
    Ok(Json(AchievementResponse::from(achievement)))
}

#[instrument(skip(state, staff))]
async fn delete_achievement(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Achievement not found".into()));
    }
    info!(achievement_id = %id, deleted_by = %staff.id, "achievement deleted");
    Ok(Json(MessageResponse::new("Achievement deleted successfully")))
}
