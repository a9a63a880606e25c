//! HTTP client for the external event-analytics backend.
//!
//! The backend exposes a ClickHouse-style HTTP API: the SQL text is posted
//! as the request body and `default_format=JSON` selects a JSON response
//! whose `data` field holds one object per row. This layer is strictly
//! read-only — only SELECTs are ever sent.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

use casalytics_core::config::Config;
use casalytics_core::store::EventStore;

#[derive(Clone)]
pub struct EventStoreClient {
    client: Client,
    url: String,
    database: String,
    user: String,
    password: String,
}

impl EventStoreClient {
    pub fn new(url: &str, database: &str, user: &str, password: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
            database: database.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.eventstore_url,
            &config.eventstore_database,
            &config.eventstore_user,
            &config.eventstore_password,
        )
    }

    /// Execute a SELECT and return the `data` array.
    async fn query(&self, sql: &str) -> Result<Vec<Value>> {
        let mut url = reqwest::Url::parse(&self.url).context("Invalid event store URL")?;
        {
            let mut qs = url.query_pairs_mut();
            qs.append_pair("default_format", "JSON");
            qs.append_pair("database", &self.database);
        }

        let resp = self
            .client
            .post(url)
            .basic_auth(&self.user, Some(&self.password))
            .body(sql.to_string())
            .send()
            .await
            .context("event store HTTP request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("event store error {status}: {body}");
        }

        let json: Value = resp
            .json()
            .await
            .context("event store response parse failed")?;
        Ok(json
            .get("data")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl EventStore for EventStoreClient {
    async fn select(&self, sql: &str) -> Result<Vec<Value>> {
        self.query(sql).await
    }

    async fn ping(&self) -> Result<()> {
        self.query("SELECT 1").await.map(|_| ())
    }
}
