use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::dto::{MessageResponse, PublicUser};
use crate::auth::extractors::AdminUser;
use crate::auth::handlers::{is_valid_email, normalize_email};
use crate::auth::otp::generate_temporary_password;
use crate::auth::password::hash_password;
use crate::auth::user::User;
use crate::committee::dto::{CreateCommitteeRequest, CreatedCommitteeResponse};
use crate::error::ApiError;
use crate::mailer::send_or_rollback;
use crate::members::dto::UpdateProfileRequest;
use crate::state::AppState;

pub fn committee_routes() -> Router<AppState> {
    Router::new()
        .route("/committee", get(list_committee).post(create_committee))
        .route(
            "/committee/:id",
            get(get_committee_member)
                .put(update_committee_member)
                .delete(delete_committee_member),
        )
}

/// Public listing of committee and admin accounts, newest first.
#[instrument(skip(state))]
async fn list_committee(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let staff = User::list_staff(&state.db).await?;
    Ok(Json(staff.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
async fn get_committee_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let member = User::find_by_id(&state.db, id)
        .await?
        .filter(|u| u.role.is_staff())
        .ok_or_else(|| ApiError::NotFound("Committee member not found".into()))?;
    Ok(Json(PublicUser::from(member)))
}

/// Creates the account, emails the temporary password, and rolls the account
/// back if the email cannot be delivered. An account nobody can log into is
/// not an acceptable outcome.
#[instrument(skip(state, payload, admin))]
async fn create_committee(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(mut payload): Json<CreateCommitteeRequest>,
) -> Result<(StatusCode, Json<CreatedCommitteeResponse>), ApiError> {
    payload.email = normalize_email(&payload.email);
    if !is_valid_email(&payload.email) {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        return Err(ApiError::BadRequest(
            "User with this email already exists".into(),
        ));
    }

    let temporary_password = generate_temporary_password();
    let hash = hash_password(&temporary_password)?;

    let member = User::insert(&state.db, payload.into_new_user(hash)).await?;

    send_or_rollback(
        state
            .mailer
            .send_temporary_password(&member.email, &member.name, &temporary_password),
        async { User::delete(&state.db, member.id).await.map(|_| ()) },
        "Failed to send email. User not created.",
    )
    .await?;

    info!(admin_id = %admin.id, member_id = %member.id, "committee member created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedCommitteeResponse {
            user: PublicUser::from(member),
            message: "Committee member created. Temporary password has been sent to email.".into(),
        }),
    ))
}

/// Profile fields only; the target's role and password are never touched.
#[instrument(skip(state, payload, admin))]
async fn update_committee_member(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    User::find_by_id(&state.db, id)
        .await?
        .filter(|u| u.role.is_staff())
        .ok_or_else(|| ApiError::NotFound("Committee member not found".into()))?;

    let member = User::update_profile(&state.db, id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Committee member not found".into()))?;
    info!(admin_id = %admin.id, member_id = %member.id, "committee member updated");
    Ok(Json(PublicUser::from(member)))
}

#[instrument(skip(state, admin))]
async fn delete_committee_member(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    User::find_by_id(&state.db, id)
        .await?
        .filter(|u| u.role.is_staff())
        .ok_or_else(|| ApiError::NotFound("Committee member not found".into()))?;

    User::delete(&state.db, id).await?;
    info!(admin_id = %admin.id, member_id = %id, "committee member deleted");
    Ok(Json(MessageResponse::new(
        "Committee member deleted successfully",
    )))
}
