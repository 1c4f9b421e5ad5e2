//! User Repository

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{AccountStatus, User, UserCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email (stored lowercase)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// The unique index on `email` is the authority on duplicates; a
    /// violation comes back as [`RepoError::Duplicate`].
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let created: Option<User> = self.base.db().create("user").content(data).await?;
        created.ok_or_else(|| RepoError::Database("User create returned no record".to_string()))
    }

    /// Set account status (identity-level suspension)
    ///
    /// Never touches the user's bookings.
    pub async fn set_account_status(
        &self,
        id: &str,
        status: AccountStatus,
    ) -> RepoResult<User> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $user SET account_status = $status RETURN AFTER")
            .bind(("user", thing))
            .bind(("status", status))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Stamp last login time
    pub async fn touch_last_login(&self, id: &RecordId, at: String) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $user SET last_login = $at")
            .bind(("user", id.clone()))
            .bind(("at", at))
            .await?;
        Ok(())
    }

    /// Total user count
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
