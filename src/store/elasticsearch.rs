use super::http_client::{build_store_client, build_store_client_with_timeout};
use super::{CleanupStats, DeleteOutcome, SnapshotStore, StoreFuture};
use crate::config::Config;
use crate::error::{ConfigError, StoreError};
use crate::snapshot::SnapshotInfo;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

const SNAPSHOT_DELETE_ACTION: &str = "cluster:admin/snapshot/delete";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Snapshot repository served by an Elasticsearch cluster's `_snapshot` API.
pub struct ElasticsearchStore {
    endpoint: Url,
    repository: String,
    credentials: Option<(String, String)>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TasksResponse {
    #[serde(default)]
    tasks: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SnapshotsResponse {
    #[serde(default)]
    snapshots: Vec<SnapshotInfo>,
}

#[derive(Debug, Deserialize)]
struct CleanupResponse {
    results: CleanupResults,
}

#[derive(Debug, Deserialize)]
struct CleanupResults {
    #[serde(default)]
    deleted_bytes: u64,
    #[serde(default)]
    deleted_blobs: u64,
}

impl ElasticsearchStore {
    pub fn new(endpoint: Url, repository: impl Into<String>) -> Self {
        Self {
            endpoint,
            repository: repository.into(),
            credentials: None,
            client: build_store_client(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint_url()?;
        let mut store = Self::new(endpoint, config.repository_name.clone())
            .with_client(build_store_client_with_timeout(config.request_timeout_secs));
        if let Some(username) = &config.username {
            store = store.with_basic_auth(username, config.password.as_deref().unwrap_or(""));
        }
        Ok(store)
    }

    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Decode(format!("endpoint {} cannot carry a path", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn snapshot_url(&self, tail: &[&str]) -> Result<Url, StoreError> {
        let mut segments = vec!["_snapshot", self.repository.as_str()];
        segments.extend_from_slice(tail);
        self.url(&segments)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorize(request).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl SnapshotStore for ElasticsearchStore {
    fn running_deletions(&self) -> StoreFuture<'_, usize> {
        Box::pin(async move {
            let url = self.url(&["_tasks"])?;
            debug!("Listing running snapshot delete tasks at {url}");
            let request = self
                .client
                .get(url)
                .query(&[("actions", SNAPSHOT_DELETE_ACTION), ("group_by", "parents")]);
            let response: TasksResponse = self.send_json(request).await?;
            Ok(response.tasks.len())
        })
    }

    fn verify_repository(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let url = self.snapshot_url(&["_verify"])?;
            debug!("Verifying repository {}", self.repository);
            self.send(self.client.post(url)).await?;
            Ok(())
        })
    }

    fn list_snapshots(&self) -> StoreFuture<'_, Vec<SnapshotInfo>> {
        Box::pin(async move {
            let url = self.snapshot_url(&["_all"])?;
            debug!("Listing snapshots in repository {}", self.repository);
            let request = self.client.get(url).query(&[("verbose", "false")]);
            let response: SnapshotsResponse = self.send_json(request).await?;
            Ok(response.snapshots)
        })
    }

    fn delete_snapshot<'a>(&'a self, name: &'a str) -> StoreFuture<'a, DeleteOutcome> {
        Box::pin(async move {
            let url = self.snapshot_url(&[name])?;
            let response = self.authorize(self.client.delete(url)).send().await?;

            if response.status() == StatusCode::NOT_FOUND {
                info!("Snapshot {name} already absent");
                return Ok(DeleteOutcome::AlreadyAbsent);
            }
            if !response.status().is_success() {
                return Err(api_error(response).await);
            }

            info!("Deleted snapshot {name}");
            Ok(DeleteOutcome::Deleted)
        })
    }

    fn cleanup_repository(&self) -> StoreFuture<'_, CleanupStats> {
        Box::pin(async move {
            let url = self.snapshot_url(&["_cleanup"])?;
            debug!("Cleaning up repository {}", self.repository);
            let response: CleanupResponse = self.send_json(self.client.post(url)).await?;
            Ok(CleanupStats {
                deleted_bytes: response.results.deleted_bytes,
                deleted_blobs: response.results.deleted_blobs,
            })
        })
    }
}

async fn api_error(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    StoreError::Api {
        status,
        body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(endpoint: &str) -> ElasticsearchStore {
        ElasticsearchStore::new(Url::parse(endpoint).unwrap(), "nightly")
    }

    #[test]
    fn snapshot_urls_append_to_root_endpoint() {
        let url = store("http://127.0.0.1:9200/").snapshot_url(&["_all"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9200/_snapshot/nightly/_all");
    }

    #[test]
    fn snapshot_urls_keep_endpoint_path_prefix() {
        let url = store("https://search.internal/es/")
            .snapshot_url(&["_verify"])
            .unwrap();
        assert_eq!(url.as_str(), "https://search.internal/es/_snapshot/nightly/_verify");
    }

    #[test]
    fn snapshot_names_are_percent_encoded() {
        let url = store("http://localhost:9200")
            .snapshot_url(&["odd/name"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/_snapshot/nightly/odd%2Fname");
    }

    #[test]
    fn from_config_targets_the_configured_repository() {
        let config = Config {
            repository_name: "weekly".into(),
            ..Config::default()
        };
        let store = ElasticsearchStore::from_config(&config).unwrap();

        assert_eq!(store.repository(), "weekly");
        assert_eq!(
            store.snapshot_url(&["_all"]).unwrap().as_str(),
            "http://127.0.0.1:9200/_snapshot/weekly/_all"
        );
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé…");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn tasks_response_counts_parent_tasks() {
        let response: TasksResponse = serde_json::from_value(serde_json::json!({
            "tasks": {
                "oTUltX4IQMOUUVeiohTt8A:124": {"action": SNAPSHOT_DELETE_ACTION},
                "oTUltX4IQMOUUVeiohTt8A:125": {"action": SNAPSHOT_DELETE_ACTION}
            }
        }))
        .unwrap();
        assert_eq!(response.tasks.len(), 2);

        let empty: TasksResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.tasks.is_empty());
    }
}
