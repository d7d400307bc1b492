//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::sync::{OnceLock, RwLock};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub cors_allowed_origins: Vec<String>,
    pub face_encodings_path: String,
    pub face_match_tolerance: f32,
    pub scan_cooldown_seconds: i64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Values that are missing or fail to parse fall back to their defaults.
    /// `JWT_SECRET` only falls back to a development key outside production.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if app_env.eq_ignore_ascii_case("production") => {
                tracing::error!("JWT_SECRET is not set in production; token signing will be rejected");
                String::new()
            }
            _ => DEV_JWT_SECRET.into(),
        };

        Self {
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "attendance-api".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,db=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/attendance.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parse_or("PORT", 3000),
            jwt_secret,
            jwt_duration_minutes: parse_or("JWT_DURATION_MINUTES", 30),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            face_encodings_path: env::var("FACE_ENCODINGS_PATH")
                .unwrap_or_else(|_| "face_encodings.json".into()),
            face_match_tolerance: parse_or("FACE_MATCH_TOLERANCE", 0.6),
            scan_cooldown_seconds: parse_or("SCAN_COOLDOWN_SECONDS", 300),
            env: app_env,
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_face_encodings_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.face_encodings_path = value.into());
    }

    pub fn set_face_match_tolerance(value: f32) {
        AppConfig::set_field(|cfg| cfg.face_match_tolerance = value);
    }

    pub fn set_scan_cooldown_seconds(value: i64) {
        AppConfig::set_field(|cfg| cfg.scan_cooldown_seconds = value);
    }
}

// --- Free accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn cors_allowed_origins() -> Vec<String> {
    AppConfig::global().cors_allowed_origins.clone()
}

pub fn face_encodings_path() -> String {
    AppConfig::global().face_encodings_path.clone()
}

pub fn face_match_tolerance() -> f32 {
    AppConfig::global().face_match_tolerance
}

pub fn scan_cooldown_seconds() -> i64 {
    AppConfig::global().scan_cooldown_seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn setters_override_loaded_values() {
        AppConfig::set_scan_cooldown_seconds(42);
        AppConfig::set_face_match_tolerance(0.25);
        assert_eq!(scan_cooldown_seconds(), 42);
        assert!((face_match_tolerance() - 0.25).abs() < f32::EPSILON);

        AppConfig::reset();
        assert_eq!(scan_cooldown_seconds(), parse_or("SCAN_COOLDOWN_SECONDS", 300));
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        // Key is never set by the suite.
        assert_eq!(parse_or::<u16>("ATTENDANCE_TEST_UNSET_PORT", 8080), 8080);
    }
}
