//! In-memory user store for tests and local development.
//!
//! Backed by a `Vec` under an `RwLock`, which makes the natural (insertion)
//! order of `find_many` explicit.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::{SortField, SortOrder, User, UserQuery};
use crate::store::{NewUserRecord, StoreError, UserChanges, UserStore};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the lifecycle use cases. Test
    /// helper for fixtures that need a known id or role.
    pub fn seed(&self, user: User) {
        self.users.write().expect("store lock poisoned").push(user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, record: &NewUserRecord) -> Result<User, StoreError> {
        let mut users = self.users.write().expect("store lock poisoned");

        // The unique-index backstop the real backend provides.
        if users.iter().any(|u| u.email == record.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            password_hash: record.password_hash.clone(),
            role: record.role,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().expect("store lock poisoned");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let users = self.users.read().expect("store lock poisoned");
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_many(
        &self,
        query: &UserQuery,
    ) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().expect("store lock poisoned");

        let mut matched: Vec<User> = users
            .iter()
            .filter(|u| query.role.is_none_or(|role| u.role == role))
            .cloned()
            .collect();

        if let Some(field) = query.sort_by {
            match field {
                SortField::Name => matched.sort_by(|a, b| a.name.cmp(&b.name)),
                SortField::CreatedAt => {
                    matched.sort_by(|a, b| a.created_at.cmp(&b.created_at))
                }
            }
            if query.order == Some(SortOrder::Desc) {
                matched.reverse();
            }
        }

        Ok(matched)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().expect("store lock poisoned");

        if let Some(ref email) = changes.email {
            if users.iter().any(|u| u.email == *email && u.id != id) {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().expect("store lock poisoned");
        let position = users.iter().position(|u| u.id == id);
        Ok(position.map(|idx| users.remove(idx)))
    }

    async fn touch_last_login(
        &self,
        id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().expect("store lock poisoned");
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        let now = Utc::now();
        user.last_login = Some(now);
        user.updated_at = now;

        Ok(Some(user.clone()))
    }
}
