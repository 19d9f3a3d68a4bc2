//! Store connection
//!
//! This module wraps the SQLite connection pool backing the store.
//! Every operation acquires a connection for its own duration and releases
//! it on drop, including on failure paths.

use crate::error::Result;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::path::{Path, PathBuf};

/// Connections kept by the pool.
///
/// Commands run one at a time, so a single connection is enough.
const MAX_CONNECTIONS: u32 = 1;

/// Handle to the relational store
#[derive(Clone)]
pub struct Store {
    /// Connection pool
    pool: SqlitePool,
    /// Database file
    path: PathBuf,
}

impl Store {
    /// Open (creating if missing) the SQLite database at `path`
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::debug!(path = %path.display(), "opened store");

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    /// Acquire a connection for the duration of one operation
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the pool, waiting for connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
