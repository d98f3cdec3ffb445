//! Per-test databases inside one shared Postgres container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers_modules::{
    postgres::Postgres as PostgresImage,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

const USER: &str = "attar_test";
const PASSWORD: &str = "attar_test_password";

/// Started on first use and shared by every test in the binary.
static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases to drop once their `TestDb` goes away.
static DROPPER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name("attar_test")
        .with_tag("16-alpine")
        .start()
        .await
        .expect("postgres container should start")
}

async fn server_url(database: &str) -> String {
    let container = CONTAINER.get_or_init(start_container).await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("postgres port should be mapped");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

async fn spawn_dropper() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            let Ok(mut conn) = PgConnection::connect(&server_url("postgres").await).await else {
                continue;
            };

            // Names are generated by `TestDb::new`, never taken from input.
            let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
                .execute(&mut conn)
                .await;

            let _ = conn.close().await;
        }
    });

    sender
}

/// A freshly migrated database, dropped in the background when this value is.
///
/// Services commit their own transactions, so isolation comes from every
/// test owning its database rather than from rollback.
#[derive(Debug)]
pub(crate) struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub(crate) async fn new() -> Self {
        DROPPER.get_or_init(spawn_dropper).await;

        let name = format!("attar_{}", Uuid::now_v7().simple());

        let mut conn = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("maintenance database should accept connections");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("test database should be created");

        conn.close().await.expect("maintenance connection should close");

        let pool = PgPool::connect(&server_url(&name).await)
            .await
            .expect("test database should accept connections");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("migrations should apply");

        Self { pool, name }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROPPER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_the_stored_procedures() {
        let db = TestDb::new().await;

        let procedures: Vec<String> = sqlx::query_scalar(
            "SELECT proname::TEXT FROM pg_proc \
             WHERE pronamespace = 'public'::regnamespace \
             ORDER BY proname",
        )
        .fetch_all(db.pool())
        .await
        .expect("catalog query should succeed");

        assert_eq!(
            procedures,
            [
                "create_order_with_items",
                "get_cart_with_perfumes",
                "get_orders_with_items",
                "get_wishlist_with_perfumes",
            ]
        );
    }
}
