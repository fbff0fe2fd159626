use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::dto::MessageResponse;
use crate::auth::extractors::StaffUser;
use crate::error::ApiError;
use crate::gallery::dto::{CreateGalleryItemRequest, GalleryItemResponse, UpdateGalleryItemRequest};
use crate::gallery::repo;
use crate::state::AppState;

pub fn gallery_routes() -> Router<AppState> {
    Router::new()
        .route("/event-gallery", get(list_gallery).post(create_gallery_item))
        .route(
            "/event-gallery/:id",
            get(get_gallery_item)
                .put(update_gallery_item)
                .delete(delete_gallery_item),
        )
}

#[instrument(skip(state))]
async fn list_gallery(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryItemResponse>>, ApiError> {
    let items = repo::list_all(&state.db).await?;
    Ok(Json(items.into_iter().map(GalleryItemResponse::from).collect()))
}

#[instrument(skip(state))]
async fn get_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GalleryItemResponse>, ApiError> {
    let item = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gallery item not found".into()))?;
    Ok(Json(GalleryItemResponse::from(item)))
}

#[instrument(skip(state, payload, staff))]
async fn create_gallery_item(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<CreateGalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItemResponse>), ApiError> {
    if payload.title.trim().is_empty() || payload.image_url.trim().is_empty() {
        return Err(ApiError::BadRequest("Title and image URL are required".into()));
    }

    let item = repo::insert(&state.db, payload.into_new_item(staff.id)).await?;

    info!(item_id = %item.id, created_by = %staff.id, "gallery item created");
    Ok((StatusCode::CREATED, Json(GalleryItemResponse::from(item))))
}

#[instrument(skip(state, payload, staff))]
async fn update_gallery_item(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGalleryItemRequest>,
) -> Result<Json<GalleryItemResponse>, ApiError> {
    let item = repo::update(&state.db, id, payload.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Gallery item not found".into()))?;
    info!(item_id = %item.id, updated_by = %staff.id, "gallery item updated");
    Ok(Json(GalleryItemResponse::from(item)))
}

#[instrument(skip(state, staff))]
async fn delete_gallery_item(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Gallery item not found".into()));
    }
    info!(item_id = %id, deleted_by = %staff.id, "gallery item deleted");
    Ok(Json(MessageResponse::new("Gallery item deleted successfully")))
}
