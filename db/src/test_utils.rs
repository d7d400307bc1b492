use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::models::role;

/// Fresh in-memory database with the schema applied and the default roles seeded.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    role::Model::ensure_defaults(&db)
        .await
        .expect("Failed to seed roles");

    db
}
