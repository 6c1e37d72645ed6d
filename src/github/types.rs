// GitHub API response types.
// Defines structs for deserializing the org, repository, and language endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub organization metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub html_url: String,
}

impl Organization {
    /// Name to show as the panel heading; falls back to the login handle.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// Back-reference from a repository to its owning account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// GitHub repository as listed under an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
    pub owner: RepoOwner,
}

/// Language name to byte count for one repository.
pub type LanguageBytes = BTreeMap<String, u64>;

/// Error body GitHub attaches to non-success responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub documentation_url: Option<String>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        if self.reset == 0 {
            return None;
        }
        DateTime::from_timestamp(self.reset as i64, 0)
    }
}
