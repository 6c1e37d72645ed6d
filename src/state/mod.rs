// State management module.
// Per-panel query state, persisted UI preferences, and search input handling.

pub mod prefs;
pub mod query_state;
pub mod search;
pub mod store;

pub use prefs::{SortField, UiPreferences, sort_repositories};
pub use query_state::QueryState;
pub use search::Debouncer;
pub use store::UiStateStore;
