use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::types::{PullRequest, RepositoryRef};

use super::loader::{FetchError, PullRequestSource};

/// A source that serves pre-loaded fixture data without any network calls.
///
/// Useful for integration tests and demos that must not require API access.
#[derive(Debug, Clone, Default)]
pub struct StubSource {
    by_repository: HashMap<String, Vec<PullRequest>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

impl StubSource {
    /// Group fixture PRs by their repository id. PRs without a repository
    /// are dropped.
    pub fn from_pull_requests(pull_requests: Vec<PullRequest>) -> Self {
        let mut by_repository: HashMap<String, Vec<PullRequest>> = HashMap::new();
        for pr in pull_requests {
            if let Some(id) = pr.repository_id().map(str::to_owned) {
                by_repository.entry(id).or_default().push(pr);
            }
        }
        Self {
            by_repository,
            ..Self::default()
        }
    }

    /// Make every fetch of `repository_id` fail.
    pub fn failing(mut self, repository_id: impl Into<String>) -> Self {
        self.failing.insert(repository_id.into());
        self
    }

    /// Sleep before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl PullRequestSource for StubSource {
    async fn fetch(&self, repository: &RepositoryRef) -> Result<Vec<PullRequest>, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&repository.id) {
            return Err(FetchError::Repository {
                repository: repository.id.clone(),
                message: "stub failure".into(),
            });
        }
        Ok(self
            .by_repository
            .get(&repository.id)
            .cloned()
            .unwrap_or_default())
    }
}
