use serde::{Deserialize, Serialize};

use crate::auth::dto::PublicUser;
use crate::auth::user::{NewUser, Role};

/// Admin-initiated committee account creation. No password field: a
/// temporary one is generated and emailed, and role is forced server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCommitteeRequest {
    pub name: String,
    pub email: String,
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

impl CreateCommitteeRequest {
    /// Committee accounts always start in the forced password change
    /// substate, with the role fixed server-side.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            email: self.email,
            password_hash,
            role: Role::Committee,
            must_change_password: true,
            skills: self.skills,
            github: self.github,
            phone: self.phone,
            course: self.course,
            year: self.year,
            photo: self.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedCommitteeResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::dto::demo_user;
    use crate::auth::user::Role;

    #[test]
    fn create_rejects_password_field() {
        let body = r#"{"name":"C","email":"c@x.edu","password":"mine"}"#;
        assert!(serde_json::from_str::<CreateCommitteeRequest>(body).is_err());
    }

    #[test]
    fn create_rejects_role_field() {
        let body = r#"{"name":"C","email":"c@x.edu","role":"admin"}"#;
        assert!(serde_json::from_str::<CreateCommitteeRequest>(body).is_err());
    }

    #[test]
    fn new_committee_account_requires_password_change() {
        let req: CreateCommitteeRequest =
            serde_json::from_str(r#"{"name":"Carol","email":"carol@x.edu"}"#).unwrap();
        let new = req.into_new_user("argon2-hash".into());
        assert_eq!(new.role, Role::Committee);
        assert!(new.must_change_password);
        assert_eq!(new.password_hash, "argon2-hash");
    }

    #[test]
    fn created_response_flattens_user() {
        let resp = CreatedCommitteeResponse {
            user: demo_user(Role::Committee),
            message: "Committee member created".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["role"], "committee");
        assert!(json["message"].as_str().unwrap().contains("created"));
    }
}
