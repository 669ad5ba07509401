use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{BranchRef, Identity, Label, RepositoryRef, Reviewer, ReviewerVote};

// ---------------------------------------------------------------------------
// PR domain types
// ---------------------------------------------------------------------------

/// A single pull request as loaded from a repository.
///
/// Everything except the id and title is optional on the wire so that a
/// partially-populated record still loads; filters referencing a missing
/// attribute simply don't match it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub pull_request_id: u64,
    pub title: String,
    #[serde(default = "epoch")]
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub author: Option<Identity>,
    #[serde(default)]
    pub reviewers: Vec<Reviewer>,
    #[serde(default)]
    pub source_branch: Option<BranchRef>,
    #[serde(default)]
    pub target_branch: Option<BranchRef>,
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Merge conflict or merge failure reported for the PR.
    #[serde(default)]
    pub has_failures: bool,
    #[serde(default)]
    pub is_auto_complete_set: bool,
    #[serde(default)]
    pub is_all_policies_ok: bool,
    /// New commits pushed since the list was last loaded.
    #[serde(default)]
    pub has_new_changes: bool,
    /// Vote cast by the current user (see [`PullRequest::resolve_current_user`]).
    #[serde(default)]
    pub my_vote: ReviewerVote,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl PullRequest {
    pub fn new(pull_request_id: u64, title: impl Into<String>) -> Self {
        Self {
            pull_request_id,
            title: title.into(),
            creation_date: epoch(),
            is_draft: false,
            author: None,
            reviewers: Vec::new(),
            source_branch: None,
            target_branch: None,
            repository: None,
            labels: Vec::new(),
            has_failures: false,
            is_auto_complete_set: false,
            is_all_policies_ok: false,
            has_new_changes: false,
            my_vote: ReviewerVote::NoVote,
        }
    }

    /// Compute `my_vote` from the reviewer entry for `user_id`.
    pub fn resolve_current_user(mut self, user_id: &str) -> Self {
        self.my_vote = self
            .reviewers
            .iter()
            .find(|r| r.id() == user_id)
            .map_or(ReviewerVote::NoVote, |r| r.vote);
        self
    }

    /// Replace the label set with one delivered after the initial load.
    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn is_ready_for_completion(&self) -> bool {
        self.is_all_policies_ok && !self.has_failures
    }

    pub fn project_id(&self) -> Option<&str> {
        self.repository.as_ref().and_then(RepositoryRef::project_id)
    }

    pub fn repository_id(&self) -> Option<&str> {
        self.repository.as_ref().map(|r| r.id.as_str())
    }

    pub fn has_reviewer(&self, id: &str) -> bool {
        self.reviewers.iter().any(|r| r.id() == id)
    }

    pub fn has_label(&self, id: &str) -> bool {
        self.labels.iter().any(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_reviewers() -> PullRequest {
        let mut pr = PullRequest::new(1, "Fix bug");
        pr.reviewers = vec![
            Reviewer::new(Identity::new("u1", "Ana"), ReviewerVote::Approved),
            Reviewer::new(Identity::new("u2", "Bo"), ReviewerVote::Rejected),
        ];
        pr
    }

    #[test]
    fn resolve_current_user_picks_own_vote() {
        let pr = with_reviewers().resolve_current_user("u2");
        assert_eq!(pr.my_vote, ReviewerVote::Rejected);
    }

    #[test]
    fn resolve_current_user_without_entry_is_no_vote() {
        let pr = with_reviewers().resolve_current_user("nobody");
        assert_eq!(pr.my_vote, ReviewerVote::NoVote);
    }

    #[test]
    fn ready_for_completion_needs_policies_and_no_failures() {
        let mut pr = PullRequest::new(1, "x");
        pr.is_all_policies_ok = true;
        assert!(pr.is_ready_for_completion());
        pr.has_failures = true;
        assert!(!pr.is_ready_for_completion());
    }

    #[test]
    fn minimal_record_deserializes() {
        let pr: PullRequest =
            serde_json::from_str(r#"{"pull_request_id": 7, "title": "Only a title"}"#).unwrap();
        assert_eq!(pr.pull_request_id, 7);
        assert!(pr.author.is_none());
        assert!(pr.source_branch.is_none());
        assert!(pr.reviewers.is_empty());
        assert_eq!(pr.my_vote, ReviewerVote::NoVote);
    }
}
