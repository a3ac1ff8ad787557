/**
 * User Model and Database Operations
 *
 * The server-side user row, its projections into the public profile and the
 * owner's account view, and the PostgreSQL implementation of `UserStore`.
 */

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::backend::store::{
    CounterDelta, Counters, PgStore, StoreError, StoreResult, UserStore, UserUpdate,
};
use crate::shared::{AccountView, Role, UserProfile};

/// User struct representing a user in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub occupation: String,
    pub bio: String,
    pub profile_picture: String,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub deactivated: bool,
    pub status: Option<String>,
    pub status_changed_at: Option<DateTime<Utc>>,
    pub post_count: i64,
    pub friend_count: i64,
    pub activity: i64,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub occupation: String,
    pub bio: String,
    pub profile_picture: String,
    pub verified: bool,
    pub verification_token: Option<String>,
}

impl NewUser {
    /// Build the full row with a fresh id and zeroed counters
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            occupation: self.occupation,
            bio: self.bio,
            profile_picture: self.profile_picture,
            verified: self.verified,
            verification_token: self.verification_token,
            reset_token: None,
            reset_token_expires_at: None,
            deactivated: false,
            status: None,
            status_changed_at: None,
            post_count: 0,
            friend_count: 0,
            activity: 0,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The status text, if it was set less than `ttl` ago
    pub fn fresh_status(&self, ttl: Duration) -> Option<String> {
        match (&self.status, self.status_changed_at) {
            (Some(text), Some(at)) if Utc::now() - at < ttl => Some(text.clone()),
            _ => None,
        }
    }

    pub fn to_profile(&self, status_ttl: Duration) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            occupation: self.occupation.clone(),
            bio: self.bio.clone(),
            profile_picture: self.profile_picture.clone(),
            status: self.fresh_status(status_ttl),
            post_count: self.post_count,
            friend_count: self.friend_count,
            activity: self.activity,
            role: self.role,
            created_at: self.created_at,
        }
    }

    pub fn to_account_view(&self, status_ttl: Duration) -> AccountView {
        AccountView {
            profile: self.to_profile(status_ttl),
            email: self.email.clone(),
            verified: self.verified,
            deactivated: self.deactivated,
        }
    }

    /// Apply an update in place, stamping `updated_at`
    pub fn apply(&mut self, update: UserUpdate) {
        match update {
            UserUpdate::Bio(bio) => self.bio = bio,
            UserUpdate::Occupation(occupation) => self.occupation = occupation,
            UserUpdate::ProfilePicture(picture) => self.profile_picture = picture,
            UserUpdate::Status { text, changed_at } => {
                self.status = text;
                self.status_changed_at = Some(changed_at);
            }
            UserUpdate::PasswordHash(hash) => self.password_hash = hash,
            UserUpdate::Verified => {
                self.verified = true;
                self.verification_token = None;
            }
            UserUpdate::ResetToken { token, expires_at } => {
                self.reset_token = Some(token);
                self.reset_token_expires_at = Some(expires_at);
            }
            UserUpdate::ResetPassword(hash) => {
                self.password_hash = hash;
                self.reset_token = None;
                self.reset_token_expires_at = None;
            }
            UserUpdate::Deactivated(deactivated) => self.deactivated = deactivated,
            UserUpdate::Role(role) => self.role = role,
        }
        self.updated_at = Utc::now();
    }

    pub fn apply_delta(&mut self, delta: CounterDelta) {
        self.post_count += delta.post_count;
        self.friend_count += delta.friend_count;
        self.activity += delta.activity;
    }
}

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, first_name, last_name, occupation, bio,
    profile_picture, verified, verification_token, reset_token, reset_token_expires_at,
    deactivated, status, status_changed_at, post_count, friend_count, activity, role,
    created_at, updated_at
"#;

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    let role: String = row.try_get("role")?;
    let role = Role::from_str(&role).ok_or_else(|| StoreError::Corrupt {
        entity: "user",
        message: format!("unknown role '{}'", role),
    })?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        occupation: row.try_get("occupation")?,
        bio: row.try_get("bio")?,
        profile_picture: row.try_get("profile_picture")?,
        verified: row.try_get("verified")?,
        verification_token: row.try_get("verification_token")?,
        reset_token: row.try_get("reset_token")?,
        reset_token_expires_at: row.try_get("reset_token_expires_at")?,
        deactivated: row.try_get("deactivated")?,
        status: row.try_get("status")?,
        status_changed_at: row.try_get("status_changed_at")?,
        post_count: row.try_get("post_count")?,
        friend_count: row.try_get("friend_count")?,
        activity: row.try_get("activity")?,
        role,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let what = match db_err.constraint() {
                Some(c) if c.contains("email") => "Email",
                _ => "Username",
            };
            StoreError::Conflict(format!("{} already exists", what))
        }
        _ => StoreError::Database(err),
    }
}

impl PgStore {
    async fn user_where(&self, clause: &str, value: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, clause);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = user.into_user();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, first_name, last_name,
                               occupation, bio, profile_picture, verified, verification_token,
                               role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.occupation)
        .bind(&user.bio)
        .bind(&user.profile_picture)
        .bind(user.verified)
        .bind(&user.verification_token)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.user_where("username", username).await
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.user_where("email", email).await
    }

    async fn user_by_verification_token(&self, token: &str) -> StoreResult<Option<User>> {
        self.user_where("verification_token", token).await
    }

    async fn user_by_reset_token(&self, token: &str) -> StoreResult<Option<User>> {
        self.user_where("reset_token", token).await
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        let rows = sqlx::query(&sql).bind(ids).fetch_all(&self.pool).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let set = match &update {
            UserUpdate::Bio(_) => "bio = $2",
            UserUpdate::Occupation(_) => "occupation = $2",
            UserUpdate::ProfilePicture(_) => "profile_picture = $2",
            UserUpdate::Status { .. } => "status = $2, status_changed_at = $3",
            UserUpdate::PasswordHash(_) => "password_hash = $2",
            UserUpdate::Verified => "verified = TRUE, verification_token = NULL",
            UserUpdate::ResetToken { .. } => "reset_token = $2, reset_token_expires_at = $3",
            UserUpdate::ResetPassword(_) => {
                "password_hash = $2, reset_token = NULL, reset_token_expires_at = NULL"
            }
            UserUpdate::Deactivated(_) => "deactivated = $2",
            UserUpdate::Role(_) => "role = $2",
        };
        let sql = format!(
            "UPDATE users SET {}, updated_at = NOW() WHERE id = $1 RETURNING {}",
            set, USER_COLUMNS
        );

        let query = sqlx::query(&sql).bind(id);
        let query = match update {
            UserUpdate::Bio(value)
            | UserUpdate::Occupation(value)
            | UserUpdate::ProfilePicture(value)
            | UserUpdate::PasswordHash(value)
            | UserUpdate::ResetPassword(value) => query.bind(value),
            UserUpdate::Status { text, changed_at } => query.bind(text).bind(changed_at),
            UserUpdate::Verified => query,
            UserUpdate::ResetToken { token, expires_at } => query.bind(token).bind(expires_at),
            UserUpdate::Deactivated(flag) => query.bind(flag),
            UserUpdate::Role(role) => query.bind(role.as_str()),
        };

        let row = query
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("User"))?;

        user_from_row(&row)
    }

    async fn set_counters(&self, id: Uuid, counters: Counters) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET post_count = $2, friend_count = $3, activity = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(counters.post_count)
        .bind(counters.friend_count)
        .bind(counters.activity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
