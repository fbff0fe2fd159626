use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::auth::user::{Capability, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Pull the bearer token out of the Authorization header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
}

/// Accounts in the forced password change substate may only hit
/// `/auth/me` and `/auth/change-password`.
fn require_password_changed(user: &User) -> Result<(), ApiError> {
    if user.must_change_password {
        return Err(ApiError::Forbidden("Password change required".into()));
    }
    Ok(())
}

fn require_capability(user: &User, cap: Capability, denial: &str) -> Result<(), ApiError> {
    if !user.role.can(cap) {
        return Err(ApiError::Forbidden(denial.into()));
    }
    Ok(())
}

/// Authenticated caller: validates the bearer token and resolves it to a
/// live user record. A valid token whose subject no longer exists is
/// rejected the same way as a bad token.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing or invalid Authorization header".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "token subject no longer exists");
                ApiError::Unauthorized("User not found".into())
            })?;

        Ok(CurrentUser(user))
    }
}

/// Authenticated caller who has completed any forced password change.
/// Accounts in the must-change substate may only hit `/auth/me` and
/// `/auth/change-password`; every other protected route goes through here.
pub struct ActiveUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        require_password_changed(&user)?;
        Ok(ActiveUser(user))
    }
}

/// Caller with the `Write` capability (committee or admin).
pub struct StaffUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ActiveUser(user) = ActiveUser::from_request_parts(parts, state).await?;
        require_capability(
            &user,
            Capability::Write,
            "Access denied. Committee or admin role required",
        )?;
        Ok(StaffUser(user))
    }
}

/// Caller with the `ManageUsers` capability (admin only).
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ActiveUser(user) = ActiveUser::from_request_parts(parts, state).await?;
        require_capability(&user, Capability::ManageUsers, "Access denied. Admin role required")?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::{sample_user, Role};
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_strips_scheme() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_accepts_lowercase_scheme() {
        let headers = headers_with("bearer abc");
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let headers = headers_with("Basic dXNlcjpwdw==");
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn pending_password_change_blocks_protected_routes() {
        let mut user = sample_user(Role::Committee);
        user.must_change_password = true;
        let err = require_password_changed(&user).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(err.to_string(), "Password change required");

        user.must_change_password = false;
        assert!(require_password_changed(&user).is_ok());
    }

    #[test]
    fn member_is_denied_staff_writes() {
        let denial = "Access denied. Committee or admin role required";
        let err =
            require_capability(&sample_user(Role::Member), Capability::Write, denial).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(err.to_string(), denial);

        assert!(require_capability(&sample_user(Role::Committee), Capability::Write, denial).is_ok());
        assert!(require_capability(&sample_user(Role::Admin), Capability::Write, denial).is_ok());
    }

    #[test]
    fn only_admin_manages_accounts() {
        let denial = "Access denied. Admin role required";
        for role in [Role::Member, Role::Committee] {
            let err = require_capability(&sample_user(role), Capability::ManageUsers, denial)
                .unwrap_err();
            assert_eq!(err.to_string(), denial);
        }
        assert!(require_capability(&sample_user(Role::Admin), Capability::ManageUsers, denial).is_ok());
    }
}
