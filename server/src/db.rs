use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to create database pool: {0}")]
    Pool(#[from] r2d2::PoolError),

    #[error("Failed to run database migrations: {0}")]
    Migration(String),
}

/// Per-connection SQLite settings, applied whenever the pool hands out a connection.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")
            .map_err(r2d2::Error::QueryError)
    }
}

/// SQLite's throwaway database. Every connection that opens it gets its own
/// private, empty copy.
pub const IN_MEMORY_URL: &str = ":memory:";

/// Open the database and run pending migrations.
///
/// `database_url` is a file path, or `:memory:` for a throwaway database. An
/// in-memory database is limited to a single pooled connection regardless of
/// `max_size`, since only the connection that ran the migrations can see them.
pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, DbError> {
    let max_size = if database_url == IN_MEMORY_URL && max_size > 1 {
        tracing::warn!(
            requested = max_size,
            "In-memory database supports one connection, shrinking pool to 1"
        );
        1
    } else {
        max_size
    };

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;

    // Run pending migrations on startup
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::Migration(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::recipes;

    #[test]
    fn test_in_memory_pool_is_single_connection() {
        let pool = create_pool(IN_MEMORY_URL, 4).unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn test_in_memory_pool_sees_migrations_from_every_thread() {
        let pool = create_pool(IN_MEMORY_URL, 4).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    let mut conn = pool.get().unwrap();
                    recipes::table.count().get_result::<i64>(&mut conn)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 0);
        }
    }
}
