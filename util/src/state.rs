//! Application state container shared across Axum route handlers.
//!
//! This struct holds shared resources such as the database connection and the
//! face registry. It is passed into route handlers via Axum's `State<T>` extractor.

use crate::faces::FaceRegistry;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The face registry consulted by registration and face-scan check-in.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    faces: Arc<FaceRegistry>,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and face registry.
    pub fn new(db: DatabaseConnection, faces: Arc<FaceRegistry>) -> Self {
        Self { db, faces }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    ///
    /// This is ideal when the caller does not need ownership.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn faces(&self) -> &FaceRegistry {
        &self.faces
    }
}

impl AppState {
    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn faces_clone(&self) -> Arc<FaceRegistry> {
        self.faces.clone()
    }
}
