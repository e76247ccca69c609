//! Shared helpers for integration tests.

use catalogo_servicios::db::{DbPool, establish_connection_pool, run_migrations};
use tempfile::TempDir;

/// Temporary SQLite database with every migration applied.
///
/// The file lives in its own temporary directory, removed on drop.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("utf-8 temp path").to_string();

        let pool = establish_connection_pool(&url).expect("build pool");
        run_migrations(&pool).expect("run migrations");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
