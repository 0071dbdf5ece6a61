//! PostgreSQL-backed implementation of the [`UserStore`] port.
//!
//! E-mail uniqueness is enforced by the `users_email_key` unique index, so
//! a concurrent duplicate-e-mail race surfaces here as
//! [`StoreError::DuplicateEmail`] no matter what the use case checked
//! beforehand.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::{Role, SortField, SortOrder, User, UserQuery};
use crate::store::{NewUserRecord, StoreError, UserChanges, UserStore};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, last_login, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(StoreError::Backend)?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Backend(err.to_string())
}

fn order_by_clause(query: &UserQuery) -> &'static str {
    let descending = query.order == Some(SortOrder::Desc);
    match query.sort_by {
        Some(SortField::Name) if descending => " ORDER BY name DESC",
        Some(SortField::Name) => " ORDER BY name ASC",
        Some(SortField::CreatedAt) if descending => " ORDER BY created_at DESC",
        Some(SortField::CreatedAt) => " ORDER BY created_at ASC",
        // Natural order: heap order tracks insertion for this workload.
        None => "",
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn create(&self, record: &NewUserRecord) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.email)
            .bind(&record.password_hash)
            .bind(record.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_many(
        &self,
        query: &UserQuery,
    ) -> Result<Vec<User>, StoreError> {
        let mut sql = format!("SELECT {USER_COLUMNS} FROM users");
        if query.role.is_some() {
            sql.push_str(" WHERE role = $1");
        }
        sql.push_str(order_by_clause(query));

        let mut select = sqlx::query_as::<_, UserRow>(&sql);
        if let Some(role) = query.role {
            select = select.bind(role.as_str());
        }

        let rows = select
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET \
               name = COALESCE($2, name), \
               email = COALESCE($3, email), \
               password_hash = COALESCE($4, password_hash), \
               role = COALESCE($5, role), \
               updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.role.map(|r| r.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()
    }

    async fn touch_last_login(
        &self,
        id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET last_login = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(User::try_from).transpose()
    }
}
