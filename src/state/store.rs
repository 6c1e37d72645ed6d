// UI state store.
// Holds org name, sort field, and page; rehydrates once and persists on every mutation.

use std::sync::Arc;

use crate::cache::KeyValueStorage;
use crate::error::Result;

use super::prefs::{SortField, UiPreferences};

pub struct UiStateStore {
    prefs: UiPreferences,
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl UiStateStore {
    /// Load the persisted record under `key`, falling back to defaults when it is
    /// missing or unreadable.
    pub fn open(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let prefs = match storage.load(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<UiPreferences>(&raw) {
                Ok(mut prefs) => {
                    prefs.page = prefs.page.max(1);
                    tracing::info!(
                        org = prefs.active_org(),
                        page = prefs.page,
                        "restored UI state"
                    );
                    prefs
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable UI state: {}", e);
                    UiPreferences::default()
                }
            },
            Ok(None) => UiPreferences::default(),
            Err(e) => {
                tracing::warn!("Failed to load UI state: {}", e);
                UiPreferences::default()
            }
        };

        Self {
            prefs,
            storage,
            key,
        }
    }

    pub fn preferences(&self) -> &UiPreferences {
        &self.prefs
    }

    pub fn org_name(&self) -> &str {
        &self.prefs.org_name
    }

    pub fn sort_by(&self) -> SortField {
        self.prefs.sort_by
    }

    pub fn page(&self) -> u32 {
        self.prefs.page
    }

    /// Does not touch the page; callers pair this with `reset_page`.
    pub fn set_org_name(&mut self, org_name: impl Into<String>) -> Result<()> {
        self.prefs.org_name = org_name.into();
        self.persist()
    }

    pub fn set_sort_by(&mut self, sort_by: SortField) -> Result<()> {
        self.prefs.sort_by = sort_by;
        self.persist()
    }

    /// Page indices start at 1; 0 is stored as 1.
    pub fn set_page(&mut self, page: u32) -> Result<()> {
        self.prefs.page = page.max(1);
        self.persist()
    }

    pub fn reset_page(&mut self) -> Result<()> {
        self.set_page(1)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.prefs)?;
        self.storage.save(&self.key, &json)
    }
}
