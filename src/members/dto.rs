use serde::Deserialize;

use crate::auth::user::ProfileUpdate;

/// Admin-initiated member creation. Role is forced server-side; it is not a
/// field here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Profile-field update shared by the member, committee and profile routes.
/// Role, password and OTP state are structurally unreachable from this body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            name: r.name,
            skills: r.skills,
            github: r.github,
            phone: r.phone,
            course: r.course,
            year: r.year,
            photo: r.photo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_rejects_role_smuggling() {
        let body = r#"{"name":"Eve","role":"admin"}"#;
        assert!(serde_json::from_str::<UpdateProfileRequest>(body).is_err());
    }

    #[test]
    fn update_rejects_password_smuggling() {
        let body = r#"{"password":"hacked"}"#;
        assert!(serde_json::from_str::<UpdateProfileRequest>(body).is_err());
    }

    #[test]
    fn create_rejects_client_supplied_role() {
        let body = r#"{"name":"A","email":"a@x.edu","password":"secret1","role":"admin"}"#;
        assert!(serde_json::from_str::<CreateMemberRequest>(body).is_err());
    }

    #[test]
    fn partial_update_parses() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"skills":["rust","sql"]}"#).unwrap();
        assert_eq!(req.skills.as_deref(), Some(["rust".to_string(), "sql".to_string()].as_slice()));
        assert!(req.name.is_none());
    }
}
