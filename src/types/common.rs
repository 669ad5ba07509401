use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums supporting common structs
// ---------------------------------------------------------------------------

/// A reviewer's vote, serialized as the numeric code used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ReviewerVote {
    Approved,
    ApprovedWithSuggestions,
    #[default]
    NoVote,
    WaitingForAuthor,
    Rejected,
    /// A code outside the known set, kept as-is so it still compares.
    Other(i32),
}

impl ReviewerVote {
    pub fn code(self) -> i32 {
        match self {
            Self::Approved => 10,
            Self::ApprovedWithSuggestions => 5,
            Self::NoVote => 0,
            Self::WaitingForAuthor => -5,
            Self::Rejected => -10,
            Self::Other(code) => code,
        }
    }
}

impl From<i32> for ReviewerVote {
    fn from(code: i32) -> Self {
        match code {
            10 => Self::Approved,
            5 => Self::ApprovedWithSuggestions,
            0 => Self::NoVote,
            -5 => Self::WaitingForAuthor,
            -10 => Self::Rejected,
            other => Self::Other(other),
        }
    }
}

impl From<ReviewerVote> for i32 {
    fn from(vote: ReviewerVote) -> Self {
        vote.code()
    }
}

// ---------------------------------------------------------------------------
// Common supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub unique_name: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            unique_name: None,
        }
    }
}

/// A reviewer on a pull request, with their current vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(default)]
    pub vote: ReviewerVote,
    #[serde(default)]
    pub is_required: bool,
}

impl Reviewer {
    pub fn new(identity: Identity, vote: ReviewerVote) -> Self {
        Self {
            identity,
            vote,
            is_required: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Full ref name, e.g. `refs/heads/main`.
    pub branch_name: String,
    pub display_name: String,
}

impl BranchRef {
    /// Build from a full ref name; the display name drops `refs/heads/`.
    pub fn from_ref_name(ref_name: &str) -> Self {
        let display = ref_name.strip_prefix("refs/heads/").unwrap_or(ref_name);
        Self {
            branch_name: ref_name.to_owned(),
            display_name: display.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
}

impl Label {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub project: Option<ProjectRef>,
}

impl RepositoryRef {
    pub fn project_id(&self) -> Option<&str> {
        self.project.as_ref().map(|p| p.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_display_name_strips_heads_prefix() {
        let b = BranchRef::from_ref_name("refs/heads/feature/login");
        assert_eq!(b.branch_name, "refs/heads/feature/login");
        assert_eq!(b.display_name, "feature/login");
    }

    #[test]
    fn branch_display_name_keeps_other_refs() {
        let b = BranchRef::from_ref_name("refs/tags/v1");
        assert_eq!(b.display_name, "refs/tags/v1");
    }

    #[test]
    fn vote_codes_map_both_ways() {
        assert_eq!(ReviewerVote::from(10), ReviewerVote::Approved);
        assert_eq!(ReviewerVote::from(-5), ReviewerVote::WaitingForAuthor);
        assert_eq!(ReviewerVote::from(3), ReviewerVote::Other(3));
        assert_eq!(ReviewerVote::Rejected.code(), -10);
    }

    #[test]
    fn reviewer_deserializes_flattened_identity() {
        let json = r#"{"id":"u1","display_name":"Ana","vote":5}"#;
        let r: Reviewer = serde_json::from_str(json).unwrap();
        assert_eq!(r.id(), "u1");
        assert_eq!(r.vote, ReviewerVote::ApprovedWithSuggestions);
        assert!(!r.is_required);
    }
}
