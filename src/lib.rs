// orgdash: data layer for a GitHub organization dashboard.
// Fetches org details, paginated repositories, and language distribution with caching.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod github;
pub mod languages;
pub mod query;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{DashError, ErrorKind, Result};
pub use languages::LanguageEntry;
