use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sea_orm::sqlx::ConnectOptions as _;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use sea_orm_migration::MigratorTrait;

use crate::{config::AppConfig, migration::Migrator};

/// Create a SeaORM connection.
pub async fn create_orm_conn(config: &AppConfig) -> Result<DatabaseConnection> {
    if config.pin_connections && config.database_url.starts_with("sqlite:") {
        return pinned_sqlite_conn(config).await;
    }

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(1)
        .sqlx_logging(config.sql_logging);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// SQLite pool whose connections are never recycled.
///
/// `ConnectOptions` can only shorten sqlx's default lifetimes, and dropping the
/// last connection to `sqlite::memory:` drops the database with it.
async fn pinned_sqlite_conn(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut connect = SqliteConnectOptions::from_str(&config.database_url)?;
    if !config.sql_logging {
        connect = connect.disable_statement_logging();
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .max_lifetime(None::<Duration>)
        .idle_timeout(None::<Duration>)
        .connect_with(connect)
        .await?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Apply every pending migration.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}
