// Dashboard state and data flow.
// The store's org name drives the details and repos queries; repos drive the language query.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::{FileStorage, KeyValueStorage};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::github::{
    Credentials, GitHubClient, HttpTransport, Organization, ReqwestTransport, Repository,
};
use crate::languages::{LanguageEntry, repo_set_key};
use crate::query::{Clock, OrgRepos, QueryClient, SystemClock};
use crate::state::{
    Debouncer, QueryState, SortField, UiPreferences, UiStateStore, sort_repositories,
};

/// What each panel currently shows, for the org that is currently selected.
#[derive(Debug, Clone, Default)]
struct Panels {
    org: String,
    details: QueryState<Organization>,
    repos: QueryState<OrgRepos>,
    languages: QueryState<Vec<LanguageEntry>>,
}

impl Panels {
    fn for_org(org: &str) -> Self {
        Self {
            org: org.to_string(),
            ..Self::default()
        }
    }
}

pub struct Dashboard {
    queries: QueryClient,
    clock: Arc<dyn Clock>,
    store: Mutex<UiStateStore>,
    search: Mutex<Debouncer<String>>,
    panels: Mutex<Panels>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Dashboard {
    pub fn new(
        config: DashboardConfig,
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let github = Arc::new(GitHubClient::new(
            transport,
            Arc::new(Credentials::new()),
            &config,
        ));
        let queries = QueryClient::new(github, clock.clone(), &config);
        let store = UiStateStore::open(storage, config.storage_key.clone());
        let panels = Panels::for_org(store.preferences().active_org());

        Self {
            queries,
            clock,
            store: Mutex::new(store),
            search: Mutex::new(Debouncer::new(config.search_debounce)),
            panels: Mutex::new(panels),
        }
    }

    /// Network transport, cache-dir storage, and wall-clock time.
    pub fn with_defaults(config: DashboardConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        let storage = Arc::new(FileStorage::in_cache_dir()?);
        Ok(Self::new(config, transport, storage, Arc::new(SystemClock)))
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        self.queries.github().credentials()
    }

    pub fn set_token(&self, token: &str) {
        self.credentials().set(token);
    }

    pub fn clear_token(&self) {
        self.credentials().clear();
    }

    pub fn preferences(&self) -> UiPreferences {
        lock(&self.store).preferences().clone()
    }

    /// The trimmed org name that keys every active query.
    pub fn active_org(&self) -> String {
        lock(&self.panels).org.clone()
    }

    /// Record keystrokes in the search box; see [`Dashboard::poll_search`].
    pub fn type_search(&self, input: &str) {
        lock(&self.search).push(input.to_string(), self.clock.now());
    }

    /// Apply the search value once typing has settled. Returns whether the org changed.
    pub fn poll_search(&self) -> Result<bool> {
        let settled = lock(&self.search).poll(self.clock.now());
        match settled {
            Some(value) => self.select_org(&value),
            None => Ok(false),
        }
    }

    /// Switch to `org` (trimmed) and reset the page to 1.
    ///
    /// Panel state for the previous org is dropped; anything still in flight
    /// for it is discarded when it resolves. Returns whether the org changed.
    pub fn select_org(&self, org: &str) -> Result<bool> {
        let org = org.trim();
        let changed = {
            let mut panels = lock(&self.panels);
            if panels.org == org {
                false
            } else {
                tracing::info!(from = %panels.org, to = org, "switching organization");
                *panels = Panels::for_org(org);
                true
            }
        };

        let mut store = lock(&self.store);
        store.set_org_name(org)?;
        store.reset_page()?;
        Ok(changed)
    }

    pub fn set_sort(&self, sort_by: SortField) -> Result<()> {
        lock(&self.store).set_sort_by(sort_by)
    }

    /// Load (or serve from cache) every panel for the active org.
    pub async fn refresh(&self) {
        self.queries.collect_garbage();
        tokio::join!(self.load_details(), self.load_repos());
        self.load_languages().await;
    }

    /// Drop cached data for the active org and load it again.
    pub async fn refetch(&self) {
        self.queries.invalidate(&self.active_org());
        self.refresh().await;
    }

    pub async fn load_details(&self) {
        let org = {
            let mut panels = lock(&self.panels);
            if panels.org.is_empty() {
                panels.details = QueryState::Idle;
                return;
            }
            panels.details.start();
            panels.org.clone()
        };

        let result = self.queries.org_details(&org).await;

        let mut panels = lock(&self.panels);
        if panels.org != org {
            tracing::debug!(org = %org, "discarding superseded org details");
            return;
        }
        match result {
            Ok(Some(details)) => panels.details.succeed(details),
            Ok(None) => panels.details = QueryState::Idle,
            Err(e) => panels.details.fail(Arc::new(e)),
        }
    }

    pub async fn load_repos(&self) {
        let org = {
            let mut panels = lock(&self.panels);
            if panels.org.is_empty() {
                panels.repos = QueryState::Idle;
                return;
            }
            panels.repos.start();
            panels.org.clone()
        };

        let result = self.queries.org_repos(&org).await;
        self.apply_repos(&org, result.map(Some));
    }

    /// Infinite-scroll trigger: fetch the next page if there is one and none is
    /// already loading. Returns whether a page was appended.
    pub async fn load_more(&self) -> bool {
        self.queries.collect_garbage();
        let org = {
            let mut panels = lock(&self.panels);
            let has_next = panels.repos.data().is_some_and(|r| r.has_next_page);
            if !has_next || panels.repos.is_fetching() {
                return false;
            }
            panels.repos.start();
            panels.org.clone()
        };

        let result = self.queries.fetch_next_page(&org).await;
        let appended = matches!(result, Ok(Some(_)));
        self.apply_repos(&org, result);

        if appended {
            self.load_languages().await;
        }
        appended
    }

    fn apply_repos(&self, org: &str, result: Result<Option<OrgRepos>>) {
        let last_page = {
            let mut panels = lock(&self.panels);
            if panels.org != org {
                tracing::debug!(org, "discarding superseded repositories");
                return;
            }
            match result {
                Ok(Some(repos)) => {
                    let last_page = repos.last_page;
                    panels.repos.succeed(repos);
                    last_page
                }
                Ok(None) => {
                    // Nothing fetched; go back to what the cache holds.
                    match self.queries.cached_repos(org) {
                        Some(repos) => panels.repos.succeed(repos),
                        None => panels.repos = QueryState::Idle,
                    }
                    return;
                }
                Err(e) => {
                    panels.repos.fail(Arc::new(e));
                    return;
                }
            }
        };

        if let Err(e) = lock(&self.store).set_page(last_page) {
            tracing::warn!("Failed to persist page index: {}", e);
        }
    }

    pub async fn load_languages(&self) {
        let (org, repos) = {
            let mut panels = lock(&self.panels);
            let repos = panels
                .repos
                .data()
                .map(|r| r.repositories.clone())
                .unwrap_or_default();
            if panels.org.is_empty() || repos.is_empty() {
                panels.languages = QueryState::Idle;
                return;
            }
            panels.languages.start();
            (panels.org.clone(), repos)
        };
        let dispatched = repo_set_key(&repos);

        let entries = self.queries.language_distribution(&org, &repos).await;

        let mut panels = lock(&self.panels);
        let current = panels
            .repos
            .data()
            .map(|r| repo_set_key(&r.repositories))
            .unwrap_or_default();
        if panels.org != org || current != dispatched {
            tracing::debug!(org = %org, "discarding superseded language distribution");
            return;
        }
        panels.languages.succeed(entries);
    }

    pub fn details(&self) -> QueryState<Organization> {
        lock(&self.panels).details.clone()
    }

    pub fn repos(&self) -> QueryState<OrgRepos> {
        lock(&self.panels).repos.clone()
    }

    pub fn languages(&self) -> QueryState<Vec<LanguageEntry>> {
        lock(&self.panels).languages.clone()
    }

    /// Accumulated repositories in the selected sort order.
    pub fn sorted_repositories(&self) -> Vec<Repository> {
        let sort_by = lock(&self.store).sort_by();
        let panels = lock(&self.panels);
        let repos = panels
            .repos
            .data()
            .map(|r| r.repositories.as_slice())
            .unwrap_or_default();
        sort_repositories(repos, sort_by)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Evict idle cache entries. Returns how many were dropped.
    pub fn collect_garbage(&self) -> usize {
        self.queries.collect_garbage()
    }
}
