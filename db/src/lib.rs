pub mod error;
pub mod models;
pub mod reports;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Turns `DATABASE_PATH` into a connection URL. Anything that already looks
/// like a DSN is used as-is; otherwise it is a SQLite file path.
pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        return path_or_url.to_string();
    }

    // SQLite won't create intermediate directories.
    if let Some(parent) = Path::new(path_or_url).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    format!("sqlite://{path_or_url}?mode=rwc")
}

pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = database_url(&config::database_path());
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    Database::connect(opts).await
}

#[cfg(test)]
mod tests {
    use super::database_url;

    #[test]
    fn dsn_is_kept_and_paths_become_sqlite_urls() {
        assert_eq!(database_url("sqlite::memory:"), "sqlite::memory:");
        let dir = std::env::temp_dir().join("attendance-url-test");
        let file = dir.join("a.db");
        let url = database_url(file.to_str().unwrap());
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("a.db?mode=rwc"));
    }
}
