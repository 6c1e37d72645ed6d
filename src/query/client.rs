// Cached queries over the GitHub client.
// Serves fresh data from memory, refetches stale keys, and accumulates repository pages.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Mutex as AsyncMutex;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::github::{GitHubClient, Organization, Repository};
use crate::languages::{LanguageEntry, fetch_language_distribution, repo_set_key};

use super::cache::{QueryCache, QueryKey};
use super::clock::Clock;
use super::pages::InfinitePages;
use super::retry::RetryPolicy;

/// Accumulated repository listing for one org.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgRepos {
    /// Every fetched page flattened in fetch order, ids unique.
    pub repositories: Vec<Repository>,
    pub has_next_page: bool,
    /// Number of the most recently fetched page.
    pub last_page: u32,
}

impl OrgRepos {
    fn from_pages(pages: &InfinitePages<Repository>) -> Self {
        let mut seen = HashSet::new();
        let repositories = pages
            .items()
            .filter(|repo| seen.insert(repo.id))
            .cloned()
            .collect();
        Self {
            repositories,
            has_next_page: pages.has_next_page(),
            last_page: pages.last_page(),
        }
    }
}

struct Caches {
    details: QueryCache<Organization>,
    repos: QueryCache<InfinitePages<Repository>>,
    languages: QueryCache<Vec<LanguageEntry>>,
}

pub struct QueryClient {
    github: Arc<GitHubClient>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    page_size: u32,
    caches: Mutex<Caches>,
    /// One fetch at a time per key.
    in_flight: Mutex<HashMap<QueryKey, Arc<AsyncMutex<()>>>>,
}

impl QueryClient {
    pub fn new(github: Arc<GitHubClient>, clock: Arc<dyn Clock>, config: &DashboardConfig) -> Self {
        let (stale, gc) = (config.stale_time, config.gc_time);
        Self {
            github,
            clock,
            retry: RetryPolicy::from_config(config),
            page_size: config.page_size,
            caches: Mutex::new(Caches {
                details: QueryCache::new(stale, gc),
                repos: QueryCache::new(stale, gc),
                languages: QueryCache::new(stale, gc),
            }),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn github(&self) -> &Arc<GitHubClient> {
        &self.github
    }

    fn caches(&self) -> MutexGuard<'_, Caches> {
        self.caches.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn key_lock(&self, key: &QueryKey) -> Arc<AsyncMutex<()>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.entry(key.clone()).or_default().clone()
    }

    /// Organization metadata. `Ok(None)` when the org is blank and the query is disabled.
    pub async fn org_details(&self, org: &str) -> Result<Option<Organization>> {
        let org = org.trim();
        if org.is_empty() {
            return Ok(None);
        }
        let key = QueryKey::OrgDetails {
            org: org.to_string(),
        };

        let lock = self.key_lock(&key);
        let _guard = lock.lock().await;

        if let Some(cached) = self.caches().details.get_fresh(&key, self.clock.now()) {
            tracing::debug!(org, "org details cache hit");
            return Ok(Some(cached));
        }

        tracing::debug!(org, "org details cache miss");
        let details = self
            .retry
            .run("fetch org details", || self.github.fetch_org_details(org))
            .await?;
        self.caches()
            .details
            .insert(key, details.clone(), self.clock.now());
        Ok(Some(details))
    }

    /// Repository listing. Loads page 1 on first use; a stale listing is
    /// refetched page by page up to the number of pages already loaded.
    pub async fn org_repos(&self, org: &str) -> Result<OrgRepos> {
        let org = org.trim();
        if org.is_empty() {
            return Ok(OrgRepos::default());
        }
        let key = QueryKey::OrgRepos {
            org: org.to_string(),
        };

        let lock = self.key_lock(&key);
        let _guard = lock.lock().await;

        let pages_loaded = {
            let now = self.clock.now();
            let mut caches = self.caches();
            if let Some(pages) = caches.repos.get_fresh(&key, now) {
                tracing::debug!(org, "org repos cache hit");
                return Ok(OrgRepos::from_pages(&pages));
            }
            caches
                .repos
                .get_any(&key, now)
                .map(|pages| pages.last_page())
                .unwrap_or(0)
                .max(1)
        };

        tracing::debug!(org, pages_loaded, "org repos cache miss");
        let mut pages = InfinitePages::new(self.page_size);
        while let Some(page) = pages.next_page_param() {
            if page > pages_loaded {
                break;
            }
            let items = self.fetch_repos_page(org, page).await?;
            pages.push_page(page, items);
        }

        let result = OrgRepos::from_pages(&pages);
        self.caches().repos.insert(key, pages, self.clock.now());
        Ok(result)
    }

    /// Fetch the page after the last loaded one.
    ///
    /// Returns `Ok(None)` without a request when the org is blank, the first page
    /// has not been loaded, the listing is exhausted, or another fetch for this
    /// org is already running.
    pub async fn fetch_next_page(&self, org: &str) -> Result<Option<OrgRepos>> {
        let org = org.trim();
        if org.is_empty() {
            return Ok(None);
        }
        let key = QueryKey::OrgRepos {
            org: org.to_string(),
        };

        let lock = self.key_lock(&key);
        let Ok(_guard) = lock.try_lock() else {
            tracing::debug!(org, "page fetch already in flight");
            return Ok(None);
        };

        let next = {
            let mut caches = self.caches();
            caches
                .repos
                .get_mut(&key, self.clock.now())
                .filter(|pages| pages.has_next_page())
                .and_then(|pages| pages.next_page_param())
        };
        let Some(page) = next else {
            return Ok(None);
        };

        let items = self.fetch_repos_page(org, page).await?;

        let mut caches = self.caches();
        let Some(pages) = caches.repos.get_mut(&key, self.clock.now()) else {
            // Evicted or invalidated while the request was out.
            return Ok(None);
        };
        pages.push_page(page, items);
        Ok(Some(OrgRepos::from_pages(pages)))
    }

    async fn fetch_repos_page(&self, org: &str, page: u32) -> Result<Vec<Repository>> {
        self.retry
            .run("fetch org repos", || {
                self.github.fetch_org_repos(org, page, self.page_size)
            })
            .await
    }

    /// Aggregated languages for the given repository set of `org`.
    ///
    /// Disabled (empty) for a blank org or no repositories. Keyed by the
    /// repository ids, so a new page or a different org recomputes.
    pub async fn language_distribution(
        &self,
        org: &str,
        repos: &[Repository],
    ) -> Vec<LanguageEntry> {
        let org = org.trim();
        if org.is_empty() || repos.is_empty() {
            return Vec::new();
        }
        let key = QueryKey::Languages {
            org: org.to_string(),
            repo_ids: repo_set_key(repos),
        };

        let lock = self.key_lock(&key);
        let _guard = lock.lock().await;

        if let Some(cached) = self.caches().languages.get_fresh(&key, self.clock.now()) {
            tracing::debug!(org, "language distribution cache hit");
            return cached;
        }

        let entries = fetch_language_distribution(&self.github, repos).await;
        self.caches()
            .languages
            .insert(key, entries.clone(), self.clock.now());
        entries
    }

    /// Last cached listing for `org`, stale or not.
    pub fn cached_repos(&self, org: &str) -> Option<OrgRepos> {
        let key = QueryKey::OrgRepos {
            org: org.trim().to_string(),
        };
        self.caches()
            .repos
            .get_any(&key, self.clock.now())
            .map(|pages| OrgRepos::from_pages(&pages))
    }

    /// Drop everything cached for `org` so the next query refetches.
    pub fn invalidate(&self, org: &str) {
        let org = org.trim();
        let mut caches = self.caches();
        caches.details.remove_org(org);
        caches.repos.remove_org(org);
        caches.languages.remove_org(org);
        tracing::debug!(org, "invalidated cached queries");
    }

    /// Evict entries idle past the GC window. Returns how many were dropped.
    pub fn collect_garbage(&self) -> usize {
        let now = self.clock.now();
        let evicted = {
            let mut caches = self.caches();
            caches.details.sweep(now) + caches.repos.sweep(now) + caches.languages.sweep(now)
        };

        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.retain(|_, lock| Arc::strong_count(lock) > 1);

        if evicted > 0 {
            tracing::debug!(evicted, "collected idle cache entries");
        }
        evicted
    }

    pub fn cached_entries(&self) -> usize {
        let caches = self.caches();
        caches.details.len() + caches.repos.len() + caches.languages.len()
    }
}
