// Dashboard configuration.
// Defaults mirror the GitHub REST API and the dashboard's caching policy.

use std::time::Duration;

use serde::Deserialize;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Cached data is served without a network call for this long.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);
/// Inactive cache entries become eligible for eviction after this long.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_MAX_RETRIES: usize = 2;
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);
pub const STORAGE_KEY: &str = "github-org-dashboard/ui-state";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub page_size: u32,
    pub stale_time: Duration,
    pub gc_time: Duration,
    pub max_retries: usize,
    pub retry_min_delay: Duration,
    pub retry_max_delay: Duration,
    pub search_debounce: Duration,
    pub storage_key: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: GITHUB_API_BASE.to_string(),
            api_version: GITHUB_API_VERSION.to_string(),
            user_agent: "orgdash".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            stale_time: DEFAULT_STALE_TIME,
            gc_time: DEFAULT_GC_TIME,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_min_delay: Duration::from_secs(1),
            retry_max_delay: Duration::from_secs(30),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}
