//! HTTP client for the prompt store and test executor

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use promptlab_core::prelude::*;
use promptlab_core::{Prompt, PromptId, TestRun, TestRunId, VersionId};

use crate::requests::{
    CreatePromptRequest, CreateVersionRequest, QuickTestRequest, TestRunRequest, VersionMutation,
};

/// Default bound on a single request, LLM-backed runs included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Header carrying the provider API key on test submissions
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Longest error body excerpt carried into an error message
const MAX_ERROR_BODY: usize = 200;

/// Every operation the remote prompt store and test executor expose
#[trait_variant::make(PromptApi: Send)]
pub trait LocalPromptApi {
    /// `GET /api/prompts`
    async fn list_prompts(&self) -> Result<Vec<Prompt>>;

    /// `GET /api/prompts/{id}`
    async fn get_prompt(&self, id: PromptId) -> Result<Prompt>;

    /// `POST /api/prompts`
    async fn create_prompt(&self, request: &CreatePromptRequest) -> Result<Prompt>;

    /// `POST /api/prompts/{id}/versions`
    async fn create_version(&self, id: PromptId, content: &str) -> Result<VersionMutation>;

    /// `POST /api/test-runs`
    async fn run_test(&self, request: &TestRunRequest, api_key: Option<&str>) -> Result<TestRun>;

    /// `POST /api/quick-test`
    async fn quick_test(
        &self,
        request: &QuickTestRequest,
        api_key: Option<&str>,
    ) -> Result<TestRun>;

    /// `GET /api/test-runs/version/{versionId}`
    async fn test_run_history(&self, version_id: VersionId) -> Result<Vec<TestRun>>;

    /// `GET /api/test-runs/{id}`
    async fn get_test_run(&self, id: TestRunId) -> Result<TestRun>;
}

/// reqwest-backed [`PromptApi`]
#[derive(Debug, Clone)]
pub struct HttpPromptApi {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpPromptApi {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        info!("Backend client targeting {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| Error::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
            })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<RequestBuilder> {
        Ok(self.request(Method::POST, path)?.json(body))
    }

    fn with_api_key(builder: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
        builder.header(API_KEY_HEADER, api_key.unwrap_or(""))
    }

    /// Send a request and decode its JSON body
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let value = self.send_value(builder).await?;
        serde_json::from_value(value).map_err(|e| Error::decode(e.to_string()))
    }

    async fn send_value(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await.map_err(|e| self.map_reqwest_error(e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!("Backend returned {}: {}", status, message);
            return Err(Error::http(status.as_u16(), message));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| Error::decode(e.to_string()))
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            warn!("Request timed out after {:?}", self.timeout);
            Error::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else if err.is_decode() {
            Error::decode(err.to_string())
        } else {
            warn!("Transport failure: {}", err);
            Error::transport(err.to_string())
        }
    }
}

impl PromptApi for HttpPromptApi {
    async fn list_prompts(&self) -> Result<Vec<Prompt>> {
        let builder = self.request(Method::GET, "api/prompts")?;
        self.send(builder).await
    }

    async fn get_prompt(&self, id: PromptId) -> Result<Prompt> {
        let builder = self.request(Method::GET, &format!("api/prompts/{id}"))?;
        self.send(builder).await
    }

    async fn create_prompt(&self, request: &CreatePromptRequest) -> Result<Prompt> {
        let builder = self.post_json("api/prompts", request)?;
        self.send(builder).await
    }

    async fn create_version(&self, id: PromptId, content: &str) -> Result<VersionMutation> {
        let body = CreateVersionRequest {
            content: content.to_string(),
        };
        let builder = self.post_json(&format!("api/prompts/{id}/versions"), &body)?;
        let value = self.send_value(builder).await?;
        Ok(VersionMutation::from_value(value))
    }

    async fn run_test(&self, request: &TestRunRequest, api_key: Option<&str>) -> Result<TestRun> {
        let builder = Self::with_api_key(self.post_json("api/test-runs", request)?, api_key);
        self.send(builder).await
    }

    async fn quick_test(
        &self,
        request: &QuickTestRequest,
        api_key: Option<&str>,
    ) -> Result<TestRun> {
        let builder = Self::with_api_key(self.post_json("api/quick-test", request)?, api_key);
        self.send(builder).await
    }

    async fn test_run_history(&self, version_id: VersionId) -> Result<Vec<TestRun>> {
        let builder = self.request(Method::GET, &format!("api/test-runs/version/{version_id}"))?;
        self.send(builder).await
    }

    async fn get_test_run(&self, id: TestRunId) -> Result<TestRun> {
        let builder = self.request(Method::GET, &format!("api/test-runs/{id}"))?;
        self.send(builder).await
    }
}

/// Parse a base URL and make sure relative joins append to its path
fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|_| Error::InvalidUrl {
        url: trimmed.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl {
            url: trimmed.to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Best human-readable message from an error response body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                if !msg.trim().is_empty() {
                    return msg.to_string();
                }
            }
        }
    }

    let text = body.trim();
    if text.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    text.chars().take(MAX_ERROR_BODY).collect()
}
