use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// The member the achievement is awarded to.
    pub user_id: Uuid,
    pub date: OffsetDateTime,
    /// Always the authenticated creator, never client input.
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewAchievement {
    pub name: String,
    pub description: String,
    pub user_id: Uuid,
    pub date: OffsetDateTime,
    pub created_by: Uuid,
}

#[derive(Debug, Default)]
pub struct AchievementPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<Uuid>,
    pub date: Option<OffsetDateTime>,
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Achievement>> {
    let rows = sqlx::query_as::<_, Achievement>(r#"SELECT * FROM achievements ORDER BY date DESC"#)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Achievement>> {
    let rows = sqlx::query_as::<_, Achievement>(
        r#"SELECT * FROM achievements WHERE user_id = $1 ORDER BY date DESC"#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Achievement>> {
    let row = sqlx::query_as::<_, Achievement>(r#"SELECT * FROM achievements WHERE id = $1"#)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, new: NewAchievement) -> anyhow::Result<Achievement> {
    let row = sqlx::query_as::<_, Achievement>(
        r#"
        INSERT INTO achievements (name, description, user_id, date, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(new.name)
    .bind(new.description)
    .bind(new.user_id)
    .bind(new.date)
    .bind(new.created_by)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    patch: AchievementPatch,
) -> anyhow::Result<Option<Achievement>> {
    let row = sqlx::query_as::<_, Achievement>(
        r#"
        UPDATE achievements SET
            name        = COALESCE($2, name),
            description = COALESCE($3, description),
            user_id     = COALESCE($4, user_id),
            date        = COALESCE($5, date),
            updated_at  = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(patch.name)
    .bind(patch.description)
    .bind(patch.user_id)
    .bind(patch.date)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(r#"DELETE FROM achievements WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
