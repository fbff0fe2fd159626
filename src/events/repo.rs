use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: OffsetDateTime,
    pub location: Option<String>,
    /// Always the authenticated creator, never client input.
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: OffsetDateTime,
    pub location: Option<String>,
    pub created_by: Uuid,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<OffsetDateTime>,
    pub location: Option<String>,
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Event>> {
    let rows = sqlx::query_as::<_, Event>(r#"SELECT * FROM events ORDER BY date DESC"#)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Event>> {
    let row = sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1"#)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, new: NewEvent) -> anyhow::Result<Event> {
    let row = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (title, description, date, location, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(new.title)
    .bind(new.description)
    .bind(new.date)
    .bind(new.location)
    .bind(new.created_by)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, patch: EventPatch) -> anyhow::Result<Option<Event>> {
    let row = sqlx::query_as::<_, Event>(
        r#"
        UPDATE events SET
            title       = COALESCE($2, title),
            description = COALESCE($3, description),
            date        = COALESCE($4, date),
            location    = COALESCE($5, location),
            updated_at  = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(patch.title)
    .bind(patch.description)
    .bind(patch.date)
    .bind(patch.location)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(r#"DELETE FROM events WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
