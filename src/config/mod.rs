//! Configuration module for the employee registry backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fallback token secret for development; `main` warns when it is in use.
pub const INSECURE_DEV_SECRET: &str = "dev-secret-change-in-production-min-32-chars";

/// Fallback bootstrap admin password; `main` warns when it is in use.
pub const INSECURE_DEV_PASSWORD: &str = "admin123";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Directory where uploaded employee photos are stored
    pub photo_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub token_ttl_minutes: i64,
    /// Email of the bootstrap admin account, created at startup if absent
    pub bootstrap_admin_email: String,
    /// Plaintext password for the bootstrap admin; hashed before persisting
    pub bootstrap_admin_password: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("EMR_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let photo_dir = env::var("EMR_PHOTO_DIR")
            .unwrap_or_else(|_| "./data/photos".to_string())
            .into();

        let bind_addr = env::var("EMR_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid EMR_BIND_ADDR format");

        let log_level = env::var("EMR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jwt_secret =
            env::var("EMR_JWT_SECRET").unwrap_or_else(|_| INSECURE_DEV_SECRET.to_string());

        let token_ttl_minutes = env::var("EMR_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1440);

        let bootstrap_admin_email =
            env::var("EMR_BOOTSTRAP_ADMIN_EMAIL").unwrap_or_else(|_| "admin@admin.com".to_string());

        let bootstrap_admin_password = env::var("EMR_BOOTSTRAP_ADMIN_PASSWORD")
            .unwrap_or_else(|_| INSECURE_DEV_PASSWORD.to_string());

        Self {
            db_path,
            photo_dir,
            bind_addr,
            log_level,
            jwt_secret,
            token_ttl_minutes,
            bootstrap_admin_email,
            bootstrap_admin_password,
        }
    }
}
