use crate::transport::TransportError;
use crate::{Error, Result};
use keyring::Entry;
use std::env;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

const KEYRING_SERVICE: &str = "docclassify";

#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let token = token
            .or_else(Self::resolve_token)
            .ok_or_else(|| {
                Error::configuration(
                    "API token is mandatory: pass one explicitly, store it in the OS keyring, \
                     or set DOCCLASSIFY_API_TOKEN",
                )
            })?;

        Url::parse(base_url).map_err(|e| {
            Error::configuration(format!("invalid base URL {base_url:?}: {e}"))
        })?;

        // Minimal production-friendly defaults (env-overridable).
        let timeout_secs = env::var("DOCCLASSIFY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(
                env::var("DOCCLASSIFY_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn resolve_token() -> Option<String> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, "api-token") {
            if let Ok(token) = entry.get_password() {
                return Some(token);
            }
        }

        // 2. Try environment variable
        env::var("DOCCLASSIFY_API_TOKEN").ok()
    }

    /// POST a JSON body to `path` and return the decoded JSON response.
    ///
    /// Non-2xx statuses become [`Error::Remote`] with the raw body as the
    /// message; 429 and 5xx are flagged retryable. Body decode failures are
    /// recoverable errors, never panics.
    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("x-docclassify-request-id", &request_id)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            let retryable = status == 429 || (500..=599).contains(&status);
            tracing::info!(
                http_status = status,
                retryable,
                request_id = request_id.as_str(),
                path,
                "classification request failed"
            );
            return Err(Error::Remote {
                status,
                message,
                retryable,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))
    }
}
