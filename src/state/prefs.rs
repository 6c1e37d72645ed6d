// Persisted UI preferences.
// The record the store writes on every mutation, plus the repository orderings it selects.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::github::Repository;

/// Repository ordering chosen in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Stars,
    Forks,
    Updated,
}

impl SortField {
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Stars => "Stars",
            SortField::Forks => "Forks",
            SortField::Updated => "Recently updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPreferences {
    pub org_name: String,
    pub sort_by: SortField,
    pub page: u32,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            org_name: String::new(),
            sort_by: SortField::default(),
            page: 1,
        }
    }
}

impl UiPreferences {
    /// The org name that drives queries; empty means no query runs.
    pub fn active_org(&self) -> &str {
        self.org_name.trim()
    }
}

/// A sorted view over `repos`, largest first. The input is left untouched.
pub fn sort_repositories(repos: &[Repository], sort_by: SortField) -> Vec<&Repository> {
    let mut sorted: Vec<&Repository> = repos.iter().collect();
    match sort_by {
        SortField::Stars => sorted.sort_by_key(|r| Reverse(r.stargazers_count)),
        SortField::Forks => sorted.sort_by_key(|r| Reverse(r.forks_count)),
        SortField::Updated => sorted.sort_by_key(|r| Reverse(r.updated_at)),
    }
    sorted
}
