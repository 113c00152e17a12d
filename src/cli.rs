//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::{Database, UserRole};
use crate::password;
use crate::revocation;
use clap::Parser;
use tracing::{error, info};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "Flashdeck", about = "Flashcard learning API server")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "flashdeck.db")]
    pub database: String,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Bearer token lifetime in hours
    #[arg(long, env = "TOKEN_TTL_HOURS", default_value = "8")]
    pub token_ttl_hours: u64,

    /// Create an ADMIN account with this email on startup if it does not exist
    #[arg(long)]
    pub seed_admin: Option<String>,

    /// Password for the seeded admin account
    #[arg(long, env = "SEED_ADMIN_PASSWORD")]
    pub seed_admin_password: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Handle the --seed-admin flag: create an ADMIN account unless the email
/// is already registered.
pub async fn handle_seed_admin(db: &Database, email: &str, password: Option<&str>) {
    match db.users().get_by_email(email).await {
        Ok(Some(_)) => {
            info!(email = %email, "Admin account already exists, skipping seed");
        }
        Ok(None) => {
            let Some(password) = password else {
                error!("--seed-admin requires --seed-admin-password or SEED_ADMIN_PASSWORD");
                std::process::exit(1);
            };

            let digest = match password::hash(password) {
                Ok(digest) => digest,
                Err(e) => {
                    error!(error = %e, "Failed to hash admin password");
                    std::process::exit(1);
                }
            };

            match db.users().create(email, &digest, UserRole::Admin).await {
                Ok(id) => {
                    info!(email = %email, id = id, "Admin account created");
                }
                Err(e) => {
                    error!(error = %e, "Failed to create admin account");
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to check for existing admin");
            std::process::exit(1);
        }
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(db: Database, jwt_secret: String, token_ttl_hours: u64) -> ServerConfig {
    ServerConfig {
        db,
        jwt_secret: jwt_secret.into_bytes(),
        token_ttl_secs: token_ttl_hours * 60 * 60,
        revocations: revocation::in_memory(),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
