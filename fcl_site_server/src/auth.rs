//! JWT issuance and password hashing.
//!
//! Login and registration hand out HS256-signed access tokens that are valid for 24 hours. The claims carry the
//! user id, email and roles so that the ACL middleware can authorize requests without a database round-trip.
//! Passwords are hashed with Argon2id and never leave this module in the clear.

use std::future::{ready, Ready};

use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use fcl_commerce_engine::db_types::{Role, User};
use fcl_common::Secret;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError};

/// Access tokens are valid for 24 hours from issuance.
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user id.
    pub sub: i64,
    pub email: String,
    pub roles: Vec<Role>,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// Issues and validates access tokens. One instance is shared across the server as app data.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Secret<String>,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { secret: config.jwt_secret.clone() }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let roles = match user.role {
            // Admins hold both roles, so that user-level endpoints accept admin tokens too
            Role::Admin => vec![Role::Admin, Role::User],
            Role::User => vec![Role::User],
        };
        let claims = JwtClaims {
            sub: user.id,
            email: user.email.clone(),
            roles,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp(),
        };
        let key = EncodingKey::from_secret(self.secret.reveal().as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key).map_err(|e| AuthError::CredentialError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let key = DecodingKey::from_secret(self.secret.reveal().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data =
            decode::<JwtClaims>(token, &key, &validation).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(token_data.claims)
    }
}

/// Pulls the bearer token out of the `Authorization` header, if there is one.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extracting [`JwtClaims`] authenticates the request. If the ACL middleware already validated the token, the
/// claims are taken from the request extensions; otherwise the bearer token is validated here. A missing or bad
/// token fails the extraction with a 401.
impl FromRequest for JwtClaims {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<JwtClaims>() {
            return ready(Ok(claims.clone()));
        }
        let Some(issuer) = req.app_data::<web::Data<TokenIssuer>>() else {
            debug!("🔐️ No token issuer configured. Cannot authenticate request.");
            return ready(Err(AuthError::CredentialError("Token issuer is not configured".into())));
        };
        let result = match bearer_token(req) {
            Some(token) => issuer.validate_token(token),
            None => Err(AuthError::MissingToken),
        };
        ready(result)
    }
}

//-----------------------------------------------  Password hashing  --------------------------------------------------

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::CredentialError(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}
