use exchange_portal::config::{Config, DatabaseConfig};
use exchange_portal::db::Database;
use uuid::Uuid;

/// A dedicated throwaway database on the server configured by `PORTAL_DB_*`.
pub struct TestDb {
    pub db: Database,
    pub config: Config,
    pub db_name: String,
}

fn base_config() -> Config {
    let _ = dotenvy::dotenv();
    Config::from_env().expect("PORTAL_DB_NAME and PORTAL_DB_USER must be set for tests")
}

async fn admin_handle(config: &DatabaseConfig) -> Database {
    Database::connect(config)
        .await
        .expect("Failed to connect to the configured test server")
}

/// Create a fresh database and connect to it.
pub async fn spawn_db() -> TestDb {
    let mut config = base_config();

    let db_name = format!("exchange_test_{}", Uuid::now_v7().simple());

    let admin = admin_handle(&config.database).await;
    admin
        .execute(&format!("CREATE DATABASE `{db_name}` CHARACTER SET utf8mb4"), &[])
        .await
        .expect("Failed to create test database");
    admin.close().await;

    config.database.name = db_name.clone();
    let db = Database::connect(&config.database)
        .await
        .expect("Failed to connect to test database");

    TestDb { db, config, db_name }
}

/// Drop the test database after a test completes.
pub async fn cleanup(test_db: TestDb) {
    test_db.db.close().await;

    let admin = admin_handle(&base_config().database).await;
    let _ = admin
        .execute(&format!("DROP DATABASE IF EXISTS `{}`", test_db.db_name), &[])
        .await;
    admin.close().await;
}
