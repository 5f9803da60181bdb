//! Server configuration.
//!
//! All configuration is sourced from environment variables (a `.env` file is loaded at startup if present). Every
//! variable has a sane fallback so that the server always starts, but missing production-critical values (the
//! database URL, the JWT secret, gateway credentials) are loudly logged.
//!
//! | Variable                     | Description                                              | Default           |
//! |------------------------------|----------------------------------------------------------|-------------------|
//! | `FCL_HOST`                   | Interface to bind to                                     | `127.0.0.1`       |
//! | `FCL_PORT`                   | Port to listen on                                        | `5000`            |
//! | `FCL_DATABASE_URL`           | Sqlite database URL                                      | (empty)           |
//! | `FCL_JWT_SECRET`             | HS256 signing secret for access tokens                   | random per-session|
//! | `FCL_USE_X_FORWARDED_FOR`    | Trust `X-Forwarded-For` for client IPs                   | `false`           |
//! | `FCL_USE_FORWARDED`          | Trust `Forwarded` for client IPs                         | `false`           |
//! | `FCL_SMTP_HOST`              | SMTP relay host                                          | (empty)           |
//! | `FCL_SMTP_PORT`              | SMTP relay port                                          | `587`             |
//! | `FCL_SMTP_USERNAME`          | SMTP username                                            | (empty)           |
//! | `FCL_SMTP_PASSWORD`          | SMTP password                                            | (empty)           |
//! | `FCL_EMAIL_FROM`             | From address for transactional mail                      | (empty)           |
//! | `FCL_ADMIN_EMAIL`            | Recipient for contact-form notifications                 | (empty)           |
//!
//! The Stripe and Coinbase gateway variables (`FCL_STRIPE_*`, `FCL_COINBASE_*`) are documented in the
//! `payment_gateways` crate.

use std::env;

use fcl_common::Secret;
use log::*;
use payment_gateways::{CoinbaseConfig, StripeConfig};
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_FCL_HOST: &str = "127.0.0.1";
const DEFAULT_FCL_PORT: u16 = 5000;
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    pub email: EmailConfig,
    pub stripe: StripeConfig,
    pub coinbase: CoinbaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FCL_HOST.to_string(),
            port: DEFAULT_FCL_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
            email: EmailConfig::default(),
            stripe: StripeConfig::default(),
            coinbase: CoinbaseConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FCL_HOST").ok().unwrap_or_else(|| DEFAULT_FCL_HOST.into());
        let port = env::var("FCL_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FCL_PORT. {e} Using the default, {DEFAULT_FCL_PORT}, instead."
                    );
                    DEFAULT_FCL_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FCL_PORT);
        let database_url = env::var("FCL_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ FCL_DATABASE_URL is not set. Please set it to the URL for the site database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let use_x_forwarded_for =
            env::var("FCL_USE_X_FORWARDED_FOR").map(|s| &s == "1" || &s == "true").unwrap_or(false);
        let use_forwarded = env::var("FCL_USE_FORWARDED").map(|s| &s == "1" || &s == "true").unwrap_or(false);
        let email = EmailConfig::from_env_or_default();
        let stripe = StripeConfig::new_from_env_or_default();
        let coinbase = CoinbaseConfig::new_from_env_or_default();
        Self { host, port, database_url, auth, use_x_forwarded_for, use_forwarded, email, stripe, coinbase }
    }
}

//-------------------------------------------------  AuthConfig  ------------------------------------------------------

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret used to sign and verify access tokens (HS256).
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. All issued tokens \
             will be invalidated when the server restarts. DO NOT operate on production like this. Set the \
             FCL_JWT_SECRET environment variable instead. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("FCL_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [FCL_JWT_SECRET]")))?;
        if secret.len() < 32 {
            warn!("🪛️ FCL_JWT_SECRET is shorter than 32 characters. Consider using a longer secret.");
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}

//-------------------------------------------------  EmailConfig  -----------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: Secret<String>,
    /// The From address on all transactional mail.
    pub from_address: String,
    /// Contact-form notifications are sent here.
    pub admin_email: String,
}

impl EmailConfig {
    pub fn from_env_or_default() -> Self {
        let smtp_host = env::var("FCL_SMTP_HOST").ok().unwrap_or_else(|| {
            info!("🪛️ FCL_SMTP_HOST is not set. Transactional email is disabled for this session.");
            String::default()
        });
        let smtp_port = env::var("FCL_SMTP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for FCL_SMTP_PORT. {e} Using {DEFAULT_SMTP_PORT} instead.");
                    DEFAULT_SMTP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SMTP_PORT);
        let smtp_username = env::var("FCL_SMTP_USERNAME").ok().unwrap_or_default();
        let smtp_password = Secret::new(env::var("FCL_SMTP_PASSWORD").ok().unwrap_or_default());
        let from_address = env::var("FCL_EMAIL_FROM").ok().unwrap_or_else(|| {
            if !smtp_host.is_empty() {
                warn!("🪛️ FCL_EMAIL_FROM is not set. Outgoing mail will fail to build without a From address.");
            }
            String::default()
        });
        let admin_email = env::var("FCL_ADMIN_EMAIL").ok().unwrap_or_else(|| {
            if !smtp_host.is_empty() {
                warn!("🪛️ FCL_ADMIN_EMAIL is not set. Contact-form notifications will not be delivered.");
            }
            String::default()
        });
        Self { smtp_host, smtp_port, smtp_username, smtp_password, from_address, admin_email }
    }

    /// True when enough of the SMTP configuration is present to try sending mail.
    pub fn is_configured(&self) -> bool {
        !self.smtp_host.is_empty() && !self.from_address.is_empty()
    }
}

//-----------------------------------------------  ServerOptions  -----------------------------------------------------

/// A subset of the server configuration that handlers need at request time. Kept small and free of secrets.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}
