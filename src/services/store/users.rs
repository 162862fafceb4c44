use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{Store, StoreError};
use crate::models::{PublicUser, UserId};

/// Account to insert, password already digested
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub admin: bool,
    pub graduate: bool,
    pub employer: bool,
}

/// Account plus the material needed to check a password
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: PublicUser,
    pub password_hash: String,
    pub salt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKind {
    Graduate,
    Employer,
}

const USER_COLUMNS: &str = "id, username, email, admin, graduate, employer";

pub(super) fn user_from_row(row: &SqliteRow) -> Result<PublicUser, sqlx::Error> {
    Ok(PublicUser {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        admin: row.try_get("admin")?,
        graduate: row.try_get("graduate")?,
        employer: row.try_get("employer")?,
    })
}

impl Store {
    pub async fn create_user(&self, new: NewUser) -> Result<PublicUser, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, salt, admin, graduate, employer)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.salt)
        .bind(new.admin)
        .bind(new.graduate)
        .bind(new.employer)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            StoreError::on_unique(e, format!("User with username '{}' already exists", new.username))
        })?;

        tracing::debug!("Created user {} ({})", result.last_insert_rowid(), new.username);

        Ok(PublicUser {
            id: result.last_insert_rowid(),
            username: new.username,
            email: new.email,
            admin: new.admin,
            graduate: new.graduate,
            employer: new.employer,
        })
    }

    pub async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, StoreError> {
        let query = format!(
            "SELECT {}, password_hash, salt FROM users WHERE username = ?",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(StoredCredentials {
                user: user_from_row(&row)?,
                password_hash: row.try_get("password_hash")?,
                salt: row.try_get("salt")?,
            })),
            None => Ok(None),
        }
    }

    pub async fn get_user(&self, id: UserId) -> Result<PublicUser, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {}", id)))?;

        Ok(user_from_row(&row)?)
    }

    pub async fn list_users(&self, kind: UserKind) -> Result<Vec<PublicUser>, StoreError> {
        let column = match kind {
            UserKind::Graduate => "graduate",
            UserKind::Employer => "employer",
        };
        let query = format!(
            "SELECT {} FROM users WHERE {} = TRUE ORDER BY id",
            USER_COLUMNS, column
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| user_from_row(row).map_err(StoreError::from))
            .collect()
    }
}
