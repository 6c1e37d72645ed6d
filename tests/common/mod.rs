// Fake GitHub transport for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orgdash::cache::MemoryStorage;
use orgdash::github::{HttpRequest, HttpResponse, HttpTransport};
use orgdash::query::ManualClock;
use orgdash::{Dashboard, DashboardConfig};
use serde_json::{Value, json};

/// Answers by URL path (query string ignored); unknown paths get a JSON 404.
#[derive(Default)]
pub struct FakeGitHub {
    routes: Mutex<HashMap<String, Vec<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeGitHub {
    /// Queue a response; the last one queued for a path repeats.
    pub fn respond(&self, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(HttpResponse {
                status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: serde_json::to_vec(&body).unwrap(),
            });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }
}

fn path_of(url: &str) -> String {
    let without_host = url.trim_start_matches("https://api.github.com");
    without_host
        .split('?')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl HttpTransport for FakeGitHub {
    async fn get(&self, request: HttpRequest) -> orgdash::Result<HttpResponse> {
        let path = path_of(&request.url);
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(&path) {
            Some(queue) if queue.len() > 1 => Some(queue.remove(0)),
            Some(queue) => queue.first().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| HttpResponse {
            status: 404,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: br#"{"message":"Not Found"}"#.to_vec(),
        }))
    }
}

pub fn repos(org: &str, ids: std::ops::Range<u64>) -> Value {
    Value::Array(
        ids.map(|id| {
            json!({
                "id": id,
                "name": format!("r{id}"),
                "full_name": format!("{org}/r{id}"),
                "html_url": format!("https://github.com/{org}/r{id}"),
                "description": "a repository",
                "stargazers_count": 100 - id,
                "forks_count": id,
                "updated_at": format!("2024-01-{:02}T00:00:00Z", (id % 28) + 1),
                "language": null,
                "owner": { "login": org, "avatar_url": "https://avatars.githubusercontent.com/u/1" }
            })
        })
        .collect(),
    )
}

pub fn org(login: &str) -> Value {
    json!({
        "login": login,
        "name": "The Org",
        "avatar_url": "https://avatars.githubusercontent.com/u/1",
        "description": "We build things",
        "public_repos": 12,
        "followers": 3,
        "following": 0,
        "html_url": format!("https://github.com/{login}")
    })
}

pub struct Harness {
    pub github: Arc<FakeGitHub>,
    pub clock: Arc<ManualClock>,
    pub storage: Arc<MemoryStorage>,
    pub dashboard: Dashboard,
}

pub fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let github = Arc::new(FakeGitHub::default());
    let clock = Arc::new(ManualClock::default());
    let storage = Arc::new(MemoryStorage::new());
    let config = DashboardConfig {
        retry_min_delay: std::time::Duration::ZERO,
        retry_max_delay: std::time::Duration::ZERO,
        ..DashboardConfig::default()
    };
    let dashboard = Dashboard::new(config, github.clone(), storage.clone(), clock.clone());
    Harness {
        github,
        clock,
        storage,
        dashboard,
    }
}
