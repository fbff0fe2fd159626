use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed role set. Not a hierarchy: `admin` and `committee` both count as
/// staff, and only `admin` may manage accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "role", rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Committee,
    Admin,
}

/// Capabilities are resolved once from the role and checked uniformly by the
/// route gates, instead of ad hoc per-route role comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    /// Create/update/delete events, achievements and gallery items.
    Write,
    /// Account management: member and committee create/delete, any-field edits.
    ManageUsers,
}

impl Role {
    pub fn can(self, cap: Capability) -> bool {
        match cap {
            Capability::Read => true,
            Capability::Write => matches!(self, Role::Committee | Role::Admin),
            Capability::ManageUsers => matches!(self, Role::Admin),
        }
    }

    pub fn is_staff(self) -> bool {
        self.can(Capability::Write)
    }
}

/// User record in the database. Credential fields never leave the server;
/// responses are built from `PublicUser` in the auth DTOs.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub github: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub photo: Option<String>,
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<OffsetDateTime>,
    pub must_change_password: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub must_change_password: bool,
    pub skills: Vec<String>,
    pub github: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub photo: Option<String>,
}

/// Partial profile update; `None` leaves the stored value untouched.
/// Credential fields and role are deliberately not expressible here.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub skills: Option<Vec<String>>,
    pub github: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub photo: Option<String>,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn insert(db: &PgPool, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (name, email, password_hash, role, must_change_password,
                 skills, github, phone, course, year, photo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role)
        .bind(new.must_change_password)
        .bind(new.skills)
        .bind(new.github)
        .bind(new.phone)
        .bind(new.course)
        .bind(new.year)
        .bind(new.photo)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Partial update of profile fields only. Role, password and OTP state
    /// are not reachable from here.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        update: ProfileUpdate,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name   = COALESCE($2, name),
                skills = COALESCE($3, skills),
                github = COALESCE($4, github),
                phone  = COALESCE($5, phone),
                course = COALESCE($6, course),
                year   = COALESCE($7, year),
                photo  = COALESCE($8, photo),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.skills)
        .bind(update.github)
        .bind(update.phone)
        .bind(update.course)
        .bind(update.year)
        .bind(update.photo)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Store a pending reset, unconditionally overwriting any prior one.
    /// At most one pending OTP exists per user; last writer wins.
    pub async fn store_otp(
        db: &PgPool,
        id: Uuid,
        otp_hash: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET otp_hash = $2, otp_expires_at = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(otp_hash)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn clear_otp(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET otp_hash = NULL, otp_expires_at = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Set the new password, drop the pending OTP and leave the forced
    /// change substate. One row, one statement.
    pub async fn complete_reset(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                otp_hash = NULL,
                otp_expires_at = NULL,
                must_change_password = FALSE,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn change_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, must_change_password = FALSE, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_by_role(db: &PgPool, role: Role) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC"#,
        )
        .bind(role)
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Committee and admin accounts, newest first.
    pub async fn list_staff(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE role = 'committee' OR role = 'admin'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }
}

#[cfg(test)]
pub(crate) fn sample_user(role: Role) -> User {
    let now = OffsetDateTime::now_utc();
    User {
        id: Uuid::new_v4(),
        name: "Test User".into(),
        email: "test@x.edu".into(),
        password_hash: "argon2-hash".into(),
        role,
        skills: Vec::new(),
        github: None,
        phone: None,
        course: None,
        year: None,
        photo: None,
        otp_hash: None,
        otp_expires_at: None,
        must_change_password: false,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_matrix() {
        for role in [Role::Member, Role::Committee, Role::Admin] {
            assert!(role.can(Capability::Read));
        }
        assert!(!Role::Member.can(Capability::Write));
        assert!(Role::Committee.can(Capability::Write));
        assert!(Role::Admin.can(Capability::Write));

        assert!(!Role::Member.can(Capability::ManageUsers));
        assert!(!Role::Committee.can(Capability::ManageUsers));
        assert!(Role::Admin.can(Capability::ManageUsers));
    }

    #[test]
    fn staff_is_the_write_capability() {
        assert!(!Role::Member.is_staff());
        assert!(Role::Committee.is_staff());
        assert!(Role::Admin.is_staff());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(
            serde_json::from_str::<Role>(r#""committee""#).unwrap(),
            Role::Committee
        );
    }

    #[test]
    fn default_role_is_member() {
        assert_eq!(Role::default(), Role::Member);
    }
}
