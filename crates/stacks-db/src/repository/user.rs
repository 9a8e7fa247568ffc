//! # User Repository
//!
//! Registered library users. The credential hash column is read only by
//! [`UserRepository::credential_hash`]; [`User`] never carries it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stacks_core::{NewUser, Role, User};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Getting user");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT email, first_name, last_name, dob, role
            FROM library_users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Whether a user with this email is registered.
    pub async fn exists(&self, email: &str) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM library_users WHERE email = ?1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    /// Inserts a user with an already-hashed credential.
    ///
    /// A duplicate email surfaces as [`crate::DbError::UniqueViolation`].
    pub async fn insert(
        &self,
        user: &NewUser,
        role: Role,
        credential_hash: &str,
    ) -> DbResult<User> {
        debug!(email = %user.email, role = role.label(), "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO library_users (
                email, first_name, last_name, dob, role, credential_hash, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.dob)
        .bind(role)
        .bind(credential_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(User {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            dob: user.dob,
            role,
        })
    }

    /// Gets the stored credential hash for a login attempt.
    pub async fn credential_hash(&self, email: &str) -> DbResult<Option<String>> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT credential_hash FROM library_users WHERE email = ?1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(hash)
    }

    /// Every patron, by last name then first name.
    pub async fn list_patrons(&self) -> DbResult<Vec<User>> {
        let patrons = sqlx::query_as::<_, User>(
            r#"
            SELECT email, first_name, last_name, dob, role
            FROM library_users
            WHERE role = ?1
            ORDER BY last_name, first_name, email
            "#,
        )
        .bind(Role::Patron)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = patrons.len(), "Listed patrons");
        Ok(patrons)
    }
}
