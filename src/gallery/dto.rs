use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::gallery::repo::{GalleryItem, GalleryItemPatch, NewGalleryItem};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGalleryItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub event_id: Option<Uuid>,
}

impl CreateGalleryItemRequest {
    /// The creator is always the authenticated caller, never the payload.
    pub fn into_new_item(self, created_by: Uuid) -> NewGalleryItem {
        NewGalleryItem {
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            event_id: self.event_id,
            created_by,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateGalleryItemRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub event_id: Option<Uuid>,
}

impl From<UpdateGalleryItemRequest> for GalleryItemPatch {
    fn from(r: UpdateGalleryItemRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            image_url: r.image_url,
            event_id: r.event_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub event_id: Option<Uuid>,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<GalleryItem> for GalleryItemResponse {
    fn from(g: GalleryItem) -> Self {
        Self {
            id: g.id,
            title: g.title,
            description: g.description,
            image_url: g.image_url,
            event_id: g.event_id,
            created_by: g.created_by,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_image_url() {
        let body = r#"{"title":"Tech Fest 2026"}"#;
        assert!(serde_json::from_str::<CreateGalleryItemRequest>(body).is_err());
    }

    #[test]
    fn create_rejects_creator_smuggling() {
        let body = r#"{"title":"Tech Fest","imageUrl":"https://cdn.local/p.jpg","createdBy":"6d9c17b2-6a67-4d2d-8b2b-6f2de3f0a001"}"#;
        assert!(serde_json::from_str::<CreateGalleryItemRequest>(body).is_err());
    }

    #[test]
    fn event_link_is_optional() {
        let body = r#"{"title":"Tech Fest","imageUrl":"https://cdn.local/p.jpg"}"#;
        let req: CreateGalleryItemRequest = serde_json::from_str(body).unwrap();
        assert!(req.event_id.is_none());
    }
}
