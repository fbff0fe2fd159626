use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::user::{Role, User};

/// Request body for user registration. Unknown fields are rejected so
/// clients cannot smuggle privileged attributes into the record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request body for login. `email`/`password` drive the normal flow; a body
/// carrying only `role` is the legacy demo-login shim.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sanitized user representation: credential fields are structurally absent,
/// not merely skipped.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub github: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub photo: Option<String>,
    pub must_change_password: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            skills: u.skills,
            github: u.github,
            phone: u.phone,
            course: u.course,
            year: u.year,
            photo: u.photo,
            must_change_password: u.must_change_password,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Synthetic user for the legacy demo-login path. Its nil subject resolves
/// to no database row, so protected routes still reject the token.
pub fn demo_user(role: Role) -> PublicUser {
    let now = OffsetDateTime::now_utc();
    PublicUser {
        id: Uuid::nil(),
        name: match role {
            Role::Admin => "Admin User".into(),
            _ => "Member User".into(),
        },
        email: "demo@marwadiuniversity.ac.in".into(),
        role,
        skills: Vec::new(),
        github: None,
        phone: None,
        course: None,
        year: None,
        photo: None,
        must_change_password: false,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_unknown_fields() {
        let body = r#"{"name":"A","email":"a@x.edu","password":"secret1","isAdmin":true}"#;
        assert!(serde_json::from_str::<RegisterRequest>(body).is_err());
    }

    #[test]
    fn login_parses_demo_shim_body() {
        let req: LoginRequest = serde_json::from_str(r#"{"role":"admin"}"#).unwrap();
        assert!(req.email.is_none());
        assert!(req.password.is_none());
        assert_eq!(req.role, Some(Role::Admin));
    }

    #[test]
    fn verify_otp_uses_camel_case() {
        let body = r#"{"email":"a@x.edu","otp":"123456","newPassword":"secret2"}"#;
        let req: VerifyOtpRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.new_password, "secret2");
    }

    #[test]
    fn public_user_has_no_credential_fields() {
        let user = demo_user(Role::Member);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("otpHash").is_none());
        assert!(json.get("otpExpiresAt").is_none());
        assert_eq!(json["mustChangePassword"], false);
    }

    #[test]
    fn demo_user_has_nil_id() {
        assert_eq!(demo_user(Role::Admin).id, Uuid::nil());
        assert_eq!(demo_user(Role::Admin).name, "Admin User");
    }
}
