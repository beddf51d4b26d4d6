use reqwest::Client;
use std::time::Duration;

/// Snapshot deletions on large repositories can block for many minutes.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 1200;

pub fn build_store_client() -> Client {
    build_store_client_with_timeout(DEFAULT_REQUEST_TIMEOUT_SECS)
}

pub fn build_store_client_with_timeout(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}
