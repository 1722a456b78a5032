//! ClickHouse for the store tests: a testcontainer, or an existing server
//! named by `LEDGER_TEST_CLICKHOUSE_URL`.

use clickhouse_client::{health::check_connection, ClickHouseClient, ClickHouseConfig};
use std::time::{Duration, Instant};
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

const CLICKHOUSE_IMAGE: &str = "clickhouse/clickhouse-server";
const CLICKHOUSE_TAG: &str = "24.3";
const HTTP_PORT: u16 = 8123;
const STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

/// A reachable ClickHouse server. Dropping it stops the container, if any.
pub struct ClickHouseServer {
    _container: Option<ContainerAsync<GenericImage>>,
    pub url: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ClickHouseServer {
    pub async fn start() -> Self {
        let external = std::env::var("LEDGER_TEST_CLICKHOUSE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let server = match external {
            Some(url) => Self {
                _container: None,
                url,
                database: std::env::var("LEDGER_TEST_CLICKHOUSE_DB")
                    .unwrap_or_else(|_| "ledger_test".into()),
                username: std::env::var("LEDGER_TEST_CLICKHOUSE_USER").ok(),
                password: std::env::var("LEDGER_TEST_CLICKHOUSE_PASSWORD").ok(),
            },
            None => {
                let container = GenericImage::new(CLICKHOUSE_IMAGE, CLICKHOUSE_TAG)
                    .with_wait_for(WaitFor::seconds(3))
                    .with_exposed_port(HTTP_PORT.tcp())
                    .with_env_var("CLICKHOUSE_DEFAULT_ACCESS_MANAGEMENT", "1")
                    .with_env_var("CLICKHOUSE_USER", "default")
                    .with_env_var("CLICKHOUSE_PASSWORD", "")
                    .start()
                    .await
                    .expect("Failed to start ClickHouse container");

                let port = container
                    .get_host_port_ipv4(HTTP_PORT)
                    .await
                    .expect("ClickHouse HTTP port not mapped");

                Self {
                    _container: Some(container),
                    url: format!("http://127.0.0.1:{}", port),
                    database: "ledger_test".into(),
                    username: Some("default".into()),
                    password: None,
                }
            }
        };

        server.wait_until_ready().await;
        server
    }

    /// Polls `SELECT 1` against the `default` database until it answers.
    async fn wait_until_ready(&self) {
        let config = ClickHouseConfig::new(&self.url)
            .with_database("default")
            .with_credentials(self.username.clone(), self.password.clone())
            .with_timeout_secs(2);
        let client = ClickHouseClient::new(config).expect("Invalid ClickHouse URL");

        let started = Instant::now();
        while started.elapsed() < STARTUP_TIMEOUT {
            if check_connection(&client).await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        panic!("ClickHouse at {} not ready after {:?}", self.url, STARTUP_TIMEOUT);
    }
}
