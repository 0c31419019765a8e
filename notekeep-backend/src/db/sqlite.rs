//! SQLite-backed store shared by every request handler.
//!
//! Connections come from an r2d2 pool; each table's queries live in an
//! `impl Database` block under `db::tables`.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use std::time::Duration;

pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Store failures. Handlers log these and answer with a generic server error.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("tag encoding error: {0}")]
    Tags(#[from] serde_json::Error),
    /// A UNIQUE constraint rejected the write.
    #[error("unique constraint violated")]
    Conflict,
}

pub type DbResult<T> = Result<T, DbError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_on TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        is_pinned INTEGER NOT NULL DEFAULT 0,
        created_on TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_notes_owner ON notes(user_id, is_pinned);
";

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) a file-backed database and apply the schema.
    /// `:memory:` yields a private in-memory store.
    pub fn open(path: &str, pool_size: u32) -> DbResult<Self> {
        if path == ":memory:" {
            log::warn!("[DB] Using an in-memory database; data is lost on exit");
            return Self::open_in_memory();
        }
        let manager = SqliteConnectionManager::file(path).with_init(init_connection);
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;
        let db = Self { pool };
        db.init_schema()?;
        log::info!("[DB] Opened database at {} (pool size {})", path, pool_size.max(1));
        Ok(db)
    }

    /// Every pooled `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection.
    pub fn open_in_memory() -> DbResult<Self> {
        let manager = SqliteConnectionManager::memory().with_init(init_connection);
        let pool = Pool::builder().max_size(1).build(manager)?;
        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    pub fn conn(&self) -> DbResult<DbConn> {
        Ok(self.pool.get()?)
    }

    fn init_schema(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }
}

fn init_connection(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    register_functions(conn)
}

/// `unicode_lower(text)`: full Unicode lower-casing. SQLite's built-in
/// `lower()` and `LIKE` only fold ASCII letters.
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )
}

/// Map SQLite's unique-constraint failure onto `DbError::Conflict`.
pub(crate) fn map_unique_violation(err: rusqlite::Error) -> DbError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DbError::Conflict
        }
        other => DbError::Sqlite(other),
    }
}
