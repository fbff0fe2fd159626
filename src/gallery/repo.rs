use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Optional link back to the event the picture was taken at.
    pub event_id: Option<Uuid>,
    /// Always the authenticated creator, never client input.
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewGalleryItem {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub event_id: Option<Uuid>,
    pub created_by: Uuid,
}

#[derive(Debug, Default)]
pub struct GalleryItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub event_id: Option<Uuid>,
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<GalleryItem>> {
    let rows =
        sqlx::query_as::<_, GalleryItem>(r#"SELECT * FROM gallery_items ORDER BY created_at DESC"#)
            .fetch_all(db)
            .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<GalleryItem>> {
    let row = sqlx::query_as::<_, GalleryItem>(r#"SELECT * FROM gallery_items WHERE id = $1"#)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, new: NewGalleryItem) -> anyhow::Result<GalleryItem> {
    let row = sqlx::query_as::<_, GalleryItem>(
        r#"
        INSERT INTO gallery_items (title, description, image_url, event_id, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(new.title)
    .bind(new.description)
    .bind(new.image_url)
    .bind(new.event_id)
    .bind(new.created_by)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    patch: GalleryItemPatch,
) -> anyhow::Result<Option<GalleryItem>> {
    let row = sqlx::query_as::<_, GalleryItem>(
        r#"
        UPDATE gallery_items SET
            title       = COALESCE($2, title),
            description = COALESCE($3, description),
            image_url   = COALESCE($4, image_url),
            event_id    = COALESCE($5, event_id),
            updated_at  = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(patch.title)
    .bind(patch.description)
    .bind(patch.image_url)
    .bind(patch.event_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(r#"DELETE FROM gallery_items WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
