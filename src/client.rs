//! HTTP classification client.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! [`ClassifyClient`] is the production [`Classify`] implementation;
//! [`ClassifyClientBuilder`] is the only way to construct one.

use crate::batch::Batch;
use crate::classify::{ClassificationResponse, Classify};
use crate::transport::HttpTransport;
use crate::Result;
use async_trait::async_trait;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.monkeylearn.com";

/// Client for a remote text classification service.
///
/// One instance is safe to share across all dispatcher worker tasks; the
/// underlying connection pool handles concurrent requests.
#[derive(Debug)]
pub struct ClassifyClient {
    transport: HttpTransport,
}

#[async_trait]
impl Classify for ClassifyClient {
    async fn classify(&self, classifier_id: &str, batch: &Batch) -> Result<ClassificationResponse> {
        let path = format!("/v3/classifiers/{classifier_id}/classify/");
        let body = json!({ "data": batch.documents() });

        let start = std::time::Instant::now();
        let value = self.transport.post_json(&path, &body).await?;
        let response: ClassificationResponse = serde_json::from_value(value)?;

        tracing::debug!(
            batch = batch.index(),
            documents = batch.len(),
            records = response.records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "batch classified"
        );
        Ok(response)
    }
}

/// Builder for creating clients with custom configuration.
pub struct ClassifyClientBuilder {
    token: Option<String>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
}

impl ClassifyClientBuilder {
    pub fn new() -> Self {
        Self {
            token: None,
            base_url_override: None,
        }
    }

    /// Set the API token explicitly.
    ///
    /// Without one, the build falls back to the OS keyring and then the
    /// `DOCCLASSIFY_API_TOKEN` environment variable, and fails if neither
    /// yields a token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the service base URL.
    ///
    /// This is primarily for testing with mock servers. In production the
    /// default service URL is used.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ClassifyClient> {
        let base_url = self
            .base_url_override
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let transport = HttpTransport::new(&base_url, self.token)?;
        Ok(ClassifyClient { transport })
    }
}

impl Default for ClassifyClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
