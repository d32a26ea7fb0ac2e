//! MySQL connection handle and parameterized query helpers.

pub mod param;
pub mod row;

pub use param::Param;
pub use row::Row;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::config::DatabaseConfig;
use crate::error::AppError;

const CHARSET: &str = "utf8mb4";

/// Shared database handle. Clones refer to the same underlying connections.
#[derive(Clone, Debug)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Connect eagerly. Failure is logged here and reported to the caller only as
    /// [`AppError::Unavailable`].
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        if config.pass.is_empty() {
            tracing::warn!(user = %config.user, "Database password is empty");
        }

        match pool_options(config)
            .connect_with(connect_options(config))
            .await
        {
            Ok(pool) => {
                tracing::info!(
                    host = %config.host,
                    port = config.port,
                    database = %config.name,
                    "Database connected"
                );
                Ok(Self { pool })
            }
            Err(e) => {
                tracing::error!(
                    host = %config.host,
                    port = config.port,
                    database = %config.name,
                    user = %config.user,
                    "Database connection failed: {}",
                    sanitize(&e, config)
                );
                Err(AppError::Unavailable)
            }
        }
    }

    /// Build the handle without opening a connection. The first operation connects.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = pool_options(config).connect_lazy_with(connect_options(config));
        Self { pool }
    }

    /// Run a statement and return every row. Parameters are bound to `?` placeholders
    /// in order; the statement is prepared fresh and not cached.
    pub async fn query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>, sqlx::Error> {
        let rows = bind_all(sql, params).fetch_all(&self.pool).await?;
        rows.iter().map(row::decode).collect()
    }

    /// Run a statement that returns no rows and report how many rows it touched.
    pub async fn execute(&self, sql: &str, params: &[Param]) -> Result<u64, sqlx::Error> {
        let result = bind_all(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database handle closed");
    }
}

fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.pass)
        .charset(CHARSET)
        .statement_cache_capacity(0)
}

fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
}

fn bind_all<'q>(
    sql: &'q str,
    params: &'q [Param],
) -> sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments> {
    params
        .iter()
        .fold(sqlx::query(sql).persistent(false), |query, param| {
            param.bind(query)
        })
}

fn sanitize(err: &sqlx::Error, config: &DatabaseConfig) -> String {
    let message = err.to_string();
    if config.pass.is_empty() {
        message
    } else {
        message.replace(&config.pass, "<redacted>")
    }
}
