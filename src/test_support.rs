// Scripted transport and fixtures shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::config::DashboardConfig;
use crate::error::{DashError, Result};
use crate::github::credentials::Credentials;
use crate::github::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::github::{GitHubClient, Repository};

/// Replays canned responses by URL path and records every request.
///
/// The last queued response for a path is sticky; unknown paths answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    gates: Mutex<HashMap<String, VecDeque<oneshot::Receiver<()>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, path: &str, response: HttpResponse) {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    /// Hold the next request to `path` until the returned sender fires.
    pub fn hold(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }
}

fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default()
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = path_of(&request.url);
        self.requests.lock().unwrap().push(request);

        let gate = self
            .gates
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(|q| q.pop_front());
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| DashError::Other("gate dropped".to_string()))?;
        }

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| json_response(404, json!({"message": "Not Found"}))))
    }
}

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![(
            "content-type".to_string(),
            "application/json; charset=utf-8".to_string(),
        )],
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub fn text_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "text/html".to_string())],
        body: body.as_bytes().to_vec(),
    }
}

pub fn repo_json(org: &str, id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("repo-{id}"),
        "full_name": format!("{org}/repo-{id}"),
        "html_url": format!("https://github.com/{org}/repo-{id}"),
        "description": null,
        "stargazers_count": id * 10,
        "forks_count": id,
        "updated_at": "2024-01-01T00:00:00Z",
        "language": "Rust",
        "owner": { "login": org, "avatar_url": "" }
    })
}

/// A JSON array of `count` repositories with ids starting at `first_id`.
pub fn repos_page(org: &str, first_id: u64, count: u64) -> Value {
    Value::Array(
        (first_id..first_id + count)
            .map(|id| repo_json(org, id))
            .collect(),
    )
}

pub fn repo(org: &str, id: u64) -> Repository {
    serde_json::from_value(repo_json(org, id)).unwrap()
}

pub fn org_json(login: &str) -> Value {
    json!({
        "login": login,
        "name": null,
        "avatar_url": "",
        "description": null,
        "public_repos": 0,
        "followers": 0,
        "following": 0,
        "html_url": format!("https://github.com/{login}")
    })
}

pub fn test_config() -> DashboardConfig {
    DashboardConfig {
        retry_min_delay: std::time::Duration::ZERO,
        retry_max_delay: std::time::Duration::ZERO,
        ..DashboardConfig::default()
    }
}

pub fn client_with(transport: Arc<ScriptedTransport>) -> GitHubClient {
    GitHubClient::new(transport, Arc::new(Credentials::new()), &test_config())
}
