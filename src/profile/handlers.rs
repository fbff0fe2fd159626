use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::auth::dto::PublicUser;
use crate::auth::extractors::ActiveUser;
use crate::auth::user::User;
use crate::error::ApiError;
use crate::members::dto::UpdateProfileRequest;
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile/me", get(get_my_profile).put(update_my_profile))
}

/// Accounts pending a forced password change use `/auth/me` for their
/// self-view until the change completes.
#[instrument(skip_all)]
async fn get_my_profile(ActiveUser(user): ActiveUser) -> Json<PublicUser> {
    Json(PublicUser::from(user))
}

/// Self-service profile edit. The owner can only reach profile fields; the
/// update body rejects role and credential fields outright.
#[instrument(skip(state, payload, user))]
async fn update_my_profile(
    State(state): State<AppState>,
    ActiveUser(user): ActiveUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let updated = User::update_profile(&state.db, user.id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(PublicUser::from(updated)))
}
