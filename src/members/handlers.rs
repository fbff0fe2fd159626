use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::{MessageResponse, PublicUser};
use crate::auth::extractors::{ActiveUser, AdminUser};
use crate::auth::handlers::{check_password_length, is_valid_email, normalize_email};
use crate::auth::password::hash_password;
use crate::auth::user::{Capability, NewUser, Role, User};
use crate::error::ApiError;
use crate::members::dto::{CreateMemberRequest, UpdateProfileRequest};
use crate::state::AppState;

/// Admin-created members obey the same credential rules as self-registration.
fn validate_new_member(payload: &CreateMemberRequest) -> Result<(), ApiError> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    check_password_length(&payload.password)
}

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
}

/// Public listing of member-role accounts, newest first.
#[instrument(skip(state))]
async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let members = User::list_by_role(&state.db, Role::Member).await?;
    Ok(Json(members.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let member = User::find_by_id(&state.db, id)
        .await?
        .filter(|u| u.role == Role::Member)
        .ok_or_else(|| ApiError::NotFound("Member not found".into()))?;
    Ok(Json(PublicUser::from(member)))
}

#[instrument(skip(state, payload, admin))]
async fn create_member(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(mut payload): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = normalize_email(&payload.email);
    validate_new_member(&payload)?;
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        return Err(ApiError::BadRequest(
            "User with this email already exists".into(),
        ));
    }

    let hash = hash_password(&payload.password)?;
    let member = User::insert(
        &state.db,
        NewUser {
            name: payload.name.trim().to_string(),
            email: payload.email,
            password_hash: hash,
            role: Role::Member,
            must_change_password: false,
            skills: payload.skills,
            github: payload.github,
            phone: payload.phone,
            course: payload.course,
            year: payload.year,
            photo: payload.photo,
        },
    )
    .await?;

    info!(admin_id = %admin.id, member_id = %member.id, "member created");
    Ok((StatusCode::CREATED, Json(PublicUser::from(member))))
}

/// Members may edit their own profile; admins may edit anyone's.
#[instrument(skip(state, payload, caller))]
async fn update_member(
    State(state): State<AppState>,
    ActiveUser(caller): ActiveUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if caller.id != id && !caller.role.can(Capability::ManageUsers) {
        warn!(caller_id = %caller.id, target_id = %id, "member update denied");
        return Err(ApiError::Forbidden("Access denied".into()));
    }

    let member = User::update_profile(&state.db, id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".into()))?;
    Ok(Json(PublicUser::from(member)))
}

#[instrument(skip(state, admin))]
async fn delete_member(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Member not found".into()));
    }
    info!(admin_id = %admin.id, member_id = %id, "member deleted");
    Ok(Json(MessageResponse::new("Member deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_password(password: &str) -> CreateMemberRequest {
        serde_json::from_str(&format!(
            r#"{{"name":"Alice","email":"alice@x.edu","password":"{password}"}}"#
        ))
        .unwrap()
    }

    #[test]
    fn admin_created_member_needs_minimum_password() {
        assert!(validate_new_member(&request_with_password("12345")).is_err());
        assert!(validate_new_member(&request_with_password("123456")).is_ok());
    }

    #[test]
    fn admin_created_member_needs_valid_email() {
        let mut payload = request_with_password("123456");
        payload.email = "not-an-email".into();
        assert!(validate_new_member(&payload).is_err());
    }
}
