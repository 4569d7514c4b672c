use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
/// Longest accepted operator token lifetime (30 days).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 30 * 24 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub admin_username: String,
    pub admin_password_hash: String,
    /// Plain operator password, only consulted when no hash is configured.
    pub admin_password: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("DATABASE_PATH not set, using clinic.db");
                    PathBuf::from("clinic.db")
                }),
            host: env::var("HOST")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_USERNAME not set, using default");
                    "admin".to_string()
                }),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                .unwrap_or_default(),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, admin access disabled");
                    String::new()
                }),
            token_ttl_minutes: parse_token_ttl(env::var("TOKEN_TTL_MINUTES").ok().as_deref()),
        };

        if !config.is_admin_configured() {
            warn!("Admin access not configured - set JWT_SECRET and ADMIN_PASSWORD_HASH");
        }

        config
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn is_admin_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
            && (!self.admin_password_hash.is_empty() || self.admin_password.is_some())
    }
}

fn parse_token_ttl(value: Option<&str>) -> i64 {
    let Some(raw) = value else {
        return DEFAULT_TOKEN_TTL_MINUTES;
    };

    match raw.trim().parse::<i64>() {
        Ok(minutes) if (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) => minutes,
        _ => {
            warn!(
                "TOKEN_TTL_MINUTES={:?} is not between 1 and {}, using {}",
                raw, MAX_TOKEN_TTL_MINUTES, DEFAULT_TOKEN_TTL_MINUTES
            );
            DEFAULT_TOKEN_TTL_MINUTES
        }
    }
}
