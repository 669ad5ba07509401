use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::types::{PullRequest, RepositoryRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("fetching pull requests for {repository}: {message}")]
    Repository { repository: String, message: String },
    #[error("fetch task for {repository} did not complete")]
    Task { repository: String },
}

/// Anything that can list the pull requests of one repository.
pub trait PullRequestSource: Send + Sync + 'static {
    fn fetch(
        &self,
        repository: &RepositoryRef,
    ) -> impl Future<Output = Result<Vec<PullRequest>, FetchError>> + Send;
}

/// Result of loading every tracked repository.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub pull_requests: Vec<PullRequest>,
    pub errors: Vec<FetchError>,
}

impl LoadOutcome {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Fetch all repositories concurrently and join the results.
///
/// Each repository's list is kept separate until every fetch has finished,
/// then the lists are concatenated in `repositories` order. A failing
/// repository is reported in `errors` and does not discard the others.
pub async fn load_all<S: PullRequestSource>(
    source: Arc<S>,
    repositories: &[RepositoryRef],
) -> LoadOutcome {
    let handles: Vec<_> = repositories
        .iter()
        .cloned()
        .map(|repository| {
            let source = Arc::clone(&source);
            tokio::spawn(async move { source.fetch(&repository).await })
        })
        .collect();

    let mut partials = Vec::with_capacity(handles.len());
    for (repository, handle) in repositories.iter().zip(handles) {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!("engine: fetch task for {} failed: {e}", repository.id);
                Err(FetchError::Task {
                    repository: repository.id.clone(),
                })
            }
        };
        partials.push(result);
    }

    let mut outcome = LoadOutcome::default();
    for result in partials {
        match result {
            Ok(prs) => outcome.pull_requests.extend(prs),
            Err(e) => {
                tracing::warn!("engine: {e}");
                outcome.errors.push(e);
            }
        }
    }
    tracing::debug!(
        "engine: loaded {} PRs from {} repositories ({} failed)",
        outcome.pull_requests.len(),
        repositories.len(),
        outcome.errors.len()
    );
    outcome
}
