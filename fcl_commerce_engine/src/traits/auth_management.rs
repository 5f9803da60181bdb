use thiserror::Error;

use crate::db_types::{NewUser, User};

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Email is already registered")]
    EmailAlreadyRegistered,
    #[error("User not found")]
    UserNotFound,
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

/// The `AuthManagement` trait defines behaviour for storing and retrieving user accounts.
///
/// Password hashing and token issuing live in the server layer; backends only ever see the finished password hash.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Creates a new user account. Returns [`AuthApiError::EmailAlreadyRegistered`] if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError>;

    /// Fetches the user with the given email, or `None` if no such user exists.
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;

    /// Fetches the user with the given id, or `None` if no such user exists.
    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AuthApiError>;
}
