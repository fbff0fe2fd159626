use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::achievements::repo::{Achievement, AchievementPatch, NewAchievement};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAchievementRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// The member being awarded.
    pub user_id: Uuid,
    /// Award date; defaults to now when omitted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

impl CreateAchievementRequest {
    /// The creator is always the authenticated caller, never the payload.
    pub fn into_new_achievement(self, created_by: Uuid) -> NewAchievement {
        NewAchievement {
            name: self.name,
            description: self.description,
            user_id: self.user_id,
            date: self.date.unwrap_or_else(OffsetDateTime::now_utc),
            created_by,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAchievementRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

impl From<UpdateAchievementRequest> for AchievementPatch {
    fn from(r: UpdateAchievementRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            user_id: r.user_id,
            date: r.date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Achievement> for AchievementResponse {
    fn from(a: Achievement) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            user_id: a.user_id,
            date: a.date,
            created_by: a.created_by,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_created_by() {
        let body = r#"{"name":"Best Paper","userId":"6d9c17b2-6a67-4d2d-8b2b-6f2de3f0a001","createdBy":"6d9c17b2-6a67-4d2d-8b2b-6f2de3f0a002"}"#;
        assert!(serde_json::from_str::<CreateAchievementRequest>(body).is_err());
    }

    #[test]
    fn create_date_is_optional() {
        let body = r#"{"name":"Best Paper","userId":"6d9c17b2-6a67-4d2d-8b2b-6f2de3f0a001"}"#;
        let req: CreateAchievementRequest = serde_json::from_str(body).unwrap();
        assert!(req.date.is_none());
        assert_eq!(req.description, "");
    }

    #[test]
    fn missing_date_defaults_to_now_and_creator_is_stamped() {
        let body = r#"{"name":"Best Paper","userId":"6d9c17b2-6a67-4d2d-8b2b-6f2de3f0a001"}"#;
        let req: CreateAchievementRequest = serde_json::from_str(body).unwrap();
        let staff_id = Uuid::new_v4();
        let new = req.into_new_achievement(staff_id);
        assert_eq!(new.created_by, staff_id);
        assert!(new.date <= OffsetDateTime::now_utc());
    }
}
