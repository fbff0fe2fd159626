use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::events::repo::{Event, EventPatch, NewEvent};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub location: Option<String>,
}

impl CreateEventRequest {
    /// The creator is always the authenticated caller, never the payload.
    pub fn into_new_event(self, created_by: Uuid) -> NewEvent {
        NewEvent {
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            created_by,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(default)]
    pub location: Option<String>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(r: UpdateEventRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            date: r.date,
            location: r.location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub location: Option<String>,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            title: e.title,
            description: e.description,
            date: e.date,
            location: e.location,
            created_by: e.created_by,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_creator_smuggling() {
        let body = r#"{"title":"Hackathon","date":"2026-09-01T10:00:00Z","createdBy":"00000000-0000-0000-0000-000000000001"}"#;
        assert!(serde_json::from_str::<CreateEventRequest>(body).is_err());
    }

    #[test]
    fn create_parses_rfc3339_date() {
        let body = r#"{"title":"Hackathon","date":"2026-09-01T10:00:00Z"}"#;
        let req: CreateEventRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.date.unix_timestamp(), 1788256800);
        assert_eq!(req.description, "");
    }

    #[test]
    fn creator_comes_from_caller_identity() {
        let body = r#"{"title":"Hackathon","date":"2026-09-01T10:00:00Z"}"#;
        let req: CreateEventRequest = serde_json::from_str(body).unwrap();
        let staff_id = Uuid::new_v4();
        assert_eq!(req.into_new_event(staff_id).created_by, staff_id);
    }

    #[test]
    fn update_allows_partial_body() {
        let req: UpdateEventRequest = serde_json::from_str(r#"{"location":"Lab 2"}"#).unwrap();
        assert_eq!(req.location.as_deref(), Some("Lab 2"));
        assert!(req.date.is_none());
    }
}
