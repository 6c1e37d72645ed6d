// GitHub API HTTP client.
// Handles authentication, rate limiting, and request/response processing.

use std::sync::{Arc, RwLock};

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::DashboardConfig;
use crate::error::{DashError, Result};

use super::credentials::Credentials;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use super::types::{ErrorBody, RateLimit};

/// GitHub API client with optional bearer authentication and rate limit tracking.
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<Credentials>,
    base_url: String,
    api_version: String,
    user_agent: String,
    rate_limit: RwLock<RateLimit>,
}

impl GitHubClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<Credentials>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_url: config.api_base_url.clone(),
            api_version: config.api_version.clone(),
            user_agent: config.user_agent.clone(),
            rate_limit: RwLock::new(RateLimit::default()),
        }
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// Rate limit snapshot from the most recent response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .read()
            .map(|guard| *guard)
            .unwrap_or_default()
    }

    /// Make a GET request to the GitHub API.
    ///
    /// `segments` are percent-encoded individually, so an org handle can never
    /// escape its path position. Non-success responses become typed errors, with
    /// `fallback_message` used when GitHub sends no message of its own.
    pub async fn get(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
        fallback_message: &str,
    ) -> Result<HttpResponse> {
        let url = self.build_url(segments, params)?;
        let request = HttpRequest {
            url,
            headers: self.headers(),
        };

        tracing::debug!(
            url = %request.url,
            authenticated = request.header("authorization").is_some(),
            "GET"
        );
        let response = self.transport.get(request).await?;

        self.update_rate_limit(&response);
        self.check_response(response, fallback_message)
    }

    /// Make a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
        fallback_message: &str,
    ) -> Result<T> {
        let response = self.get(segments, params, fallback_message).await?;
        let value = serde_json::from_slice(&response.body)?;
        Ok(value)
    }

    fn build_url(&self, segments: &[&str], params: &[(&str, String)]) -> Result<String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DashError::Other(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DashError::Other("API base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            (
                "accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
            ("x-github-api-version".to_string(), self.api_version.clone()),
            ("user-agent".to_string(), self.user_agent.clone()),
        ];
        if let Some(token) = self.credentials.token() {
            headers.push(("authorization".to_string(), format!("Bearer {}", token)));
        }
        headers
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &HttpResponse) {
        let parse = |name: &str| -> Option<u64> { response.header(name)?.parse().ok() };

        let Ok(mut rate_limit) = self.rate_limit.write() else {
            return;
        };
        if let Some(limit) = parse("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = parse("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = parse("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    fn check_response(
        &self,
        response: HttpResponse,
        fallback_message: &str,
    ) -> Result<HttpResponse> {
        if response.is_success() {
            return Ok(response);
        }

        let body: ErrorBody = if response.is_json() {
            serde_json::from_slice(&response.body).unwrap_or_default()
        } else {
            ErrorBody::default()
        };
        let documentation_url = body.documentation_url;

        match response.status {
            404 => Err(DashError::NotFound {
                message: body
                    .message
                    .unwrap_or_else(|| "Organization not found".to_string()),
                documentation_url,
            }),
            403 => {
                let rate_limit = self.rate_limit();
                let reset_at = if rate_limit.remaining == 0 {
                    rate_limit.reset_at()
                } else {
                    None
                };
                Err(DashError::RateLimitedOrForbidden {
                    message: body.message.unwrap_or_else(|| {
                        "Rate limit exceeded or access forbidden by GitHub API".to_string()
                    }),
                    documentation_url,
                    reset_at,
                })
            }
            status => Err(DashError::RequestFailed {
                status,
                message: body
                    .message
                    .unwrap_or_else(|| fallback_message.to_string()),
                documentation_url,
            }),
        }
    }
}
