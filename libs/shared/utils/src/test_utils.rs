use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use shared_config::AppConfig;
use shared_database::Database;
use shared_models::auth::{JwtClaims, ADMIN_ROLE};

use crate::jwt::encode_token;
use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

/// A migrated database in a temporary directory, removed on drop.
pub struct TestDatabase {
    pub database: Database,
    _dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let database = Database::new(dir.path().join("clinic-test.db"));
        database.initialize().expect("initialize test database");
        Self { database, _dir: dir }
    }

    pub fn path(&self) -> PathBuf {
        self.database.path().to_path_buf()
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestConfig {
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password_hash: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            admin_username: "admin".to_string(),
            admin_password_hash: String::new(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self, database_path: PathBuf) -> AppConfig {
        AppConfig {
            database_path,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            admin_username: self.admin_username.clone(),
            admin_password_hash: self.admin_password_hash.clone(),
            admin_password: None,
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_minutes: 60,
        }
    }

    /// Router state backed by `db`.
    pub fn to_state(&self, db: &TestDatabase) -> AppState {
        AppState::new(self.to_app_config(db.path()))
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_token(subject: &str, role: &str, secret: &str, exp_minutes: i64) -> String {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.to_string(),
            role: Some(role.to_string()),
            exp: Some((now + Duration::minutes(exp_minutes)).timestamp().max(0) as u64),
            iat: Some(now.timestamp() as u64),
        };
        encode_token(&claims, secret).expect("sign test token")
    }

    pub fn admin_token() -> String {
        Self::create_token("admin", ADMIN_ROLE, TEST_JWT_SECRET, 60)
    }

    pub fn non_admin_token() -> String {
        Self::create_token("clerk", "staff", TEST_JWT_SECRET, 60)
    }

    pub fn expired_token() -> String {
        Self::create_token("admin", ADMIN_ROLE, TEST_JWT_SECRET, -5)
    }

    pub fn invalid_signature_token() -> String {
        Self::create_token("admin", ADMIN_ROLE, "wrong-secret", 60)
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::validate_token;

    #[test]
    fn test_database_is_migrated() {
        let db = TestDatabase::new();
        let conn = db.database.connect().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn admin_token_validates_with_test_secret() {
        let operator = validate_token(&JwtTestUtils::admin_token(), TEST_JWT_SECRET).unwrap();
        assert!(operator.is_admin());
    }

    #[test]
    fn state_points_at_test_database() {
        let db = TestDatabase::new();
        let state = TestConfig::default().to_state(&db);
        assert_eq!(state.database.path(), db.path().as_path());
        assert_eq!(state.config.jwt_secret, TEST_JWT_SECRET);
    }
}
