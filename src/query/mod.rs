// Cache/query layer.
// Keyed caching, staleness, retry, and infinite pagination on top of the GitHub client.

pub mod cache;
pub mod client;
pub mod clock;
pub mod pages;
pub mod retry;

pub use cache::{CacheEntry, QueryCache, QueryKey};
pub use client::{OrgRepos, QueryClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use pages::InfinitePages;
pub use retry::RetryPolicy;
