//! Unifies API for accessing user accounts.

use std::fmt::Debug;

use crate::{
    db_types::{NewUser, User},
    traits::{AuthApiError, AuthManagement},
};

/// The `AuthApi` provides a unified API for creating and looking up user accounts.
///
/// Credential handling (password hashing, token issuing) lives in the server layer. This API only ever sees the
/// finished password hash inside [`NewUser`].
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates a new user record. Fails with [`AuthApiError::EmailAlreadyRegistered`] if the email is taken.
    pub async fn register(&self, user: NewUser) -> Result<User, AuthApiError> {
        self.db.create_user(user).await
    }

    /// Fetches the user with the given email. If no user exists, `None` is returned.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        self.db.fetch_user_by_email(email).await
    }

    /// Fetches the user with the given id. If no user exists, `None` is returned.
    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, AuthApiError> {
        self.db.fetch_user_by_id(id).await
    }
}
