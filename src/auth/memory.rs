use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::UserStore;
use crate::auth::repo_types::{NewUser, User};

/// In-process user store. Insert-if-absent happens under a single write
/// lock, so it upholds the same uniqueness guarantee as the unique index.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn count(&self) -> anyhow::Result<usize> {
        let users = self
            .users
            .read()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        Ok(users.len())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        Ok(users.get(email).cloned())
    }

    async fn insert(&self, new_user: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let mut users = self
            .users
            .write()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        if users.contains_key(new_user.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.to_owned(),
            password: new_user.password.to_owned(),
            first_name: new_user.first_name.to_owned(),
            last_name: new_user.last_name.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.email.clone(), user.clone());
        Ok(Some(user))
    }
}
