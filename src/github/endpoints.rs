// GitHub API endpoint functions.
// Provides typed methods for the org, org-repos, and repo-languages endpoints.

use crate::error::{DashError, Result};

use super::client::GitHubClient;
use super::types::{LanguageBytes, Organization, Repository};

impl GitHubClient {
    /// Get one page of an organization's repositories.
    ///
    /// A blank org is not an error here: the listing simply has nothing to show,
    /// and no request is made.
    pub async fn fetch_org_repos(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let org = org.trim();
        if org.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        self.get_json(
            &["orgs", org, "repos"],
            &params,
            "Failed to fetch organization repositories",
        )
        .await
    }

    /// Get organization metadata.
    pub async fn fetch_org_details(&self, org: &str) -> Result<Organization> {
        let org = org.trim();
        if org.is_empty() {
            return Err(DashError::InvalidInput {
                message: "Organization is required".to_string(),
            });
        }

        self.get_json(&["orgs", org], &[], "Failed to fetch organization details")
            .await
    }

    /// Get the language byte breakdown for a repository.
    pub async fn fetch_repo_languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes> {
        self.get_json(
            &["repos", owner, repo, "languages"],
            &[],
            "Failed to fetch repository languages",
        )
        .await
    }
}
