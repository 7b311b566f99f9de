use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bankroll::store::{create_pool, run_migrations, DbPool, SqliteLedger};

/// Temporary SQLite database for integration tests.
pub struct TempDb {
    path: PathBuf,
    pool: DbPool,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        path.push(format!("bankroll-{name}-{nanos}.db"));

        let pool = create_pool(&path.display().to_string()).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");

        Self { path, pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn ledger(&self) -> SqliteLedger {
        SqliteLedger::from_pool(self.pool.clone())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
