use std::sync::Arc;

use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, Pool},
};
use tracing::error;

use crate::{mailer::Mailer, util_resp::ApiError};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: DbPool, mailer: Arc<dyn Mailer>) -> Self {
        Self { pool, mailer }
    }

    /// Checks a connection out of the pool and runs `f` on the blocking
    /// thread pool. Pool exhaustion and panics surface as a 500.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                error!("failed to check out a connection: {e}");
                ApiError::ServerError
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            error!("blocking task failed: {e}");
            ApiError::ServerError
        })?
    }
}
