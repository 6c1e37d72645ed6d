// Language distribution across an organization's repositories.
// Fans out one languages request per repository and merges whatever succeeds.

use std::collections::HashMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::github::{GitHubClient, LanguageBytes, Repository};

/// One language's share of the org's code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub bytes: u64,
    /// 0-100, unrounded.
    pub percentage: f64,
}

/// Stable identity of a repository set, used in the languages cache key.
pub fn repo_set_key(repos: &[Repository]) -> String {
    repos
        .iter()
        .map(|r| r.id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Merge per-repository byte maps into entries sorted by bytes, largest first.
///
/// Ties keep first-seen order. Returns nothing when the merged total is zero.
pub fn aggregate<I>(maps: I) -> Vec<LanguageEntry>
where
    I: IntoIterator<Item = LanguageBytes>,
{
    let mut totals: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for map in maps {
        for (name, bytes) in map {
            match index.get(&name) {
                Some(&i) => totals[i].1 += bytes,
                None => {
                    index.insert(name.clone(), totals.len());
                    totals.push((name, bytes));
                }
            }
        }
    }

    let total: u64 = totals.iter().map(|(_, bytes)| bytes).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut entries: Vec<LanguageEntry> = totals
        .into_iter()
        .map(|(name, bytes)| LanguageEntry {
            name,
            bytes,
            percentage: bytes as f64 / total as f64 * 100.0,
        })
        .collect();
    entries.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    entries
}

/// Fetch every repository's languages concurrently and aggregate the successes.
///
/// A failed repository is logged and left out; this never fails as a whole.
pub async fn fetch_language_distribution(
    client: &GitHubClient,
    repos: &[Repository],
) -> Vec<LanguageEntry> {
    if repos.is_empty() {
        return Vec::new();
    }

    let results = join_all(
        repos
            .iter()
            .map(|repo| client.fetch_repo_languages(&repo.owner.login, &repo.name)),
    )
    .await;

    let mut failed = 0usize;
    let maps: Vec<LanguageBytes> = results
        .into_iter()
        .zip(repos)
        .filter_map(|(result, repo)| match result {
            Ok(map) => Some(map),
            Err(e) => {
                failed += 1;
                tracing::warn!("Skipping languages for {}: {}", repo.full_name, e);
                None
            }
        })
        .collect();

    tracing::debug!(
        repos = repos.len(),
        failed,
        "Aggregated language distribution"
    );
    aggregate(maps)
}

/// The `n` largest entries, for chart legends.
pub fn top_languages(entries: &[LanguageEntry], n: usize) -> &[LanguageEntry] {
    &entries[..entries.len().min(n)]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::test_support::{ScriptedTransport, client_with, json_response, repo};

    fn bytes(pairs: &[(&str, u64)]) -> LanguageBytes {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_aggregate_sums_and_orders() {
        let entries = aggregate([bytes(&[("A", 100)]), bytes(&[("A", 50), ("B", 50)])]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "A");
        assert_eq!(entries[0].bytes, 150);
        assert!((entries[0].percentage - 75.0).abs() < 1e-9);
        assert_eq!(entries[1].name, "B");
        assert_eq!(entries[1].bytes, 50);
        assert!((entries[1].percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_empty_and_zero() {
        assert!(aggregate(Vec::<LanguageBytes>::new()).is_empty());
        assert!(aggregate([bytes(&[("A", 0)]), LanguageBytes::new()]).is_empty());
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let entries = aggregate([bytes(&[("A", 1), ("B", 1), ("C", 1)])]);
        let sum: f64 = entries.iter().map(|e| e.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let entries = aggregate([bytes(&[("Zig", 10)]), bytes(&[("Ada", 10)])]);
        assert_eq!(entries[0].name, "Zig");
        assert_eq!(entries[1].name, "Ada");
    }

    #[test]
    fn test_repo_set_key_and_top() {
        let repos = vec![repo("o", 3), repo("o", 1)];
        assert_eq!(repo_set_key(&repos), "3,1");

        let entries = aggregate([bytes(&[("A", 3), ("B", 2), ("C", 1)])]);
        assert_eq!(top_languages(&entries, 2).len(), 2);
        assert_eq!(top_languages(&entries, 10).len(), 3);
    }

    #[tokio::test]
    async fn test_failed_repo_is_skipped() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on("/repos/o/repo-1/languages", json_response(200, json!({"A": 100})));
        transport.on("/repos/o/repo-2/languages", json_response(500, json!({})));
        transport.on(
            "/repos/o/repo-3/languages",
            json_response(200, json!({"A": 50, "B": 50})),
        );
        let client = client_with(transport.clone());

        let repos = vec![repo("o", 1), repo("o", 2), repo("o", 3)];
        let entries = fetch_language_distribution(&client, &repos).await;

        assert_eq!(transport.requests().len(), 3);
        assert_eq!(entries[0].bytes, 150);
        assert_eq!(entries[1].bytes, 50);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = client_with(transport.clone());

        let repos = vec![repo("o", 1), repo("o", 2)];
        assert!(fetch_language_distribution(&client, &repos).await.is_empty());
        assert!(fetch_language_distribution(&client, &[]).await.is_empty());
    }
}
