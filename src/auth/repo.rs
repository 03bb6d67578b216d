use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, User};

/// Persistence for user records, keyed by unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Insert a user unless the email is already taken.
    ///
    /// The check and the write are a single atomic step: `Ok(None)` means
    /// another record with the same email exists and nothing was written.
    async fn insert(&self, new_user: NewUser<'_>) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, first_name, last_name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new_user: NewUser<'_>) -> anyhow::Result<Option<User>> {
        // The unique index on email decides; a conflicting row yields no RETURNING row.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password, first_name, last_name, created_at
            "#,
        )
        .bind(new_user.email)
        .bind(new_user.password)
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
