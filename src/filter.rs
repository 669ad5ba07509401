use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PullRequest, ReviewerVote};

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// A filter-bar dimension, listed in the order filters are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Projects,
    Title,
    Repositories,
    SourceBranches,
    TargetBranches,
    Authors,
    Reviewers,
    MyApprovalStatuses,
    AlternateStatus,
    Labels,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::Projects,
        Dimension::Title,
        Dimension::Repositories,
        Dimension::SourceBranches,
        Dimension::TargetBranches,
        Dimension::Authors,
        Dimension::Reviewers,
        Dimension::MyApprovalStatuses,
        Dimension::AlternateStatus,
        Dimension::Labels,
    ];

    /// Key used for this dimension in a saved filter state.
    pub fn key(self) -> &'static str {
        match self {
            Self::Projects => "selectedProjects",
            Self::Title => "pullRequestTitle",
            Self::Repositories => "selectedRepos",
            Self::SourceBranches => "selectedSourceBranches",
            Self::TargetBranches => "selectedTargetBranches",
            Self::Authors => "selectedAuthors",
            Self::Reviewers => "selectedReviewers",
            Self::MyApprovalStatuses => "selectedMyApprovalStatuses",
            Self::AlternateStatus => "selectedAlternateStatusPr",
            Self::Labels => "selectedTags",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("expected KEY=VALUE[,VALUE...], got \"{0}\"")]
    Malformed(String),
    #[error("unknown filter dimension \"{0}\"")]
    UnknownDimension(String),
}

/// Parse a `selectedAuthors=u1,u2` style selection. Values are split on
/// commas and trimmed; empty values are dropped.
pub fn parse_selection(arg: &str) -> Result<(Dimension, Vec<String>), SelectionError> {
    let (key, values) = arg
        .split_once('=')
        .ok_or_else(|| SelectionError::Malformed(arg.to_owned()))?;
    let dimension = Dimension::from_key(key.trim())
        .ok_or_else(|| SelectionError::UnknownDimension(key.trim().to_owned()))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect();
    Ok((dimension, values))
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Alternate status
// ---------------------------------------------------------------------------

/// Derived classifications selectable in the "status" dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlternateStatus {
    IsDraft,
    NotIsDraft,
    Conflicts,
    NotConflicts,
    AutoComplete,
    NotAutoComplete,
    ReadyForCompletion,
    NotReadyForCompletion,
    HasNewChanges,
}

#[derive(Debug, Error)]
#[error("unknown alternate status \"{0}\"")]
pub struct UnknownAlternateStatus(pub String);

impl AlternateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsDraft => "IsDraft",
            Self::NotIsDraft => "NotIsDraft",
            Self::Conflicts => "Conflicts",
            Self::NotConflicts => "NotConflicts",
            Self::AutoComplete => "AutoComplete",
            Self::NotAutoComplete => "NotAutoComplete",
            Self::ReadyForCompletion => "ReadyForCompletion",
            Self::NotReadyForCompletion => "NotReadyForCompletion",
            Self::HasNewChanges => "HasNewChanges",
        }
    }

    pub fn matches(self, pr: &PullRequest) -> bool {
        match self {
            Self::IsDraft => pr.is_draft,
            Self::NotIsDraft => !pr.is_draft,
            Self::Conflicts => pr.has_failures,
            Self::NotConflicts => !pr.has_failures,
            Self::AutoComplete => pr.is_auto_complete_set,
            Self::NotAutoComplete => !pr.is_auto_complete_set,
            Self::ReadyForCompletion => pr.is_ready_for_completion(),
            Self::NotReadyForCompletion => !pr.is_ready_for_completion(),
            Self::HasNewChanges => pr.has_new_changes,
        }
    }
}

impl FromStr for AlternateStatus {
    type Err = UnknownAlternateStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "IsDraft" => Self::IsDraft,
            "NotIsDraft" => Self::NotIsDraft,
            "Conflicts" => Self::Conflicts,
            "NotConflicts" => Self::NotConflicts,
            "AutoComplete" => Self::AutoComplete,
            "NotAutoComplete" => Self::NotAutoComplete,
            // Older saved states carry the misspelled tag.
            "ReadyForCompletion" | "ReadForCompletion" => Self::ReadyForCompletion,
            "NotReadyForCompletion" => Self::NotReadyForCompletion,
            "HasNewChanges" => Self::HasNewChanges,
            other => return Err(UnknownAlternateStatus(other.to_owned())),
        })
    }
}

impl fmt::Display for AlternateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Accept either a bare value or the filter bar's `{ "value": ... }` wrapper.
pub(crate) mod item_de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Item<T> {
        Wrapped { value: Option<T> },
        Plain(T),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        let item: Option<Item<T>> = Option::deserialize(deserializer)?;
        Ok(match item {
            None | Some(Item::Wrapped { value: None }) => T::default(),
            Some(Item::Wrapped { value: Some(v) } | Item::Plain(v)) => v,
        })
    }
}

/// Vote codes saved either as strings (`"-5"`) or as JSON numbers (`-5`).
pub(crate) mod vote_codes_de {
    use indexmap::IndexSet;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<IndexSet<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let codes: Vec<Code> = super::item_de::deserialize(deserializer)?;
        Ok(codes
            .into_iter()
            .map(|code| match code {
                Code::Text(s) => s,
                Code::Number(n) => n.to_string(),
            })
            .collect())
    }
}

#[derive(Debug, Error)]
pub enum FilterStateError {
    #[error("invalid filter state JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Current filter-bar selections.
///
/// An empty selection (or empty title) places no constraint on its
/// dimension. Selections keep insertion order and hold each value once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    #[serde(
        rename = "selectedProjects",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub projects: IndexSet<String>,
    #[serde(
        rename = "pullRequestTitle",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub title: String,
    #[serde(
        rename = "selectedRepos",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub repositories: IndexSet<String>,
    #[serde(
        rename = "selectedSourceBranches",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub source_branches: IndexSet<String>,
    #[serde(
        rename = "selectedTargetBranches",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub target_branches: IndexSet<String>,
    #[serde(
        rename = "selectedAuthors",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub authors: IndexSet<String>,
    #[serde(
        rename = "selectedReviewers",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub reviewers: IndexSet<String>,
    #[serde(
        rename = "selectedMyApprovalStatuses",
        deserialize_with = "vote_codes_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub my_approval_statuses: IndexSet<String>,
    #[serde(
        rename = "selectedAlternateStatusPr",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub alternate_statuses: IndexSet<String>,
    #[serde(
        rename = "selectedTags",
        deserialize_with = "item_de::deserialize",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub labels: IndexSet<String>,
}

impl FilterState {
    /// Selected values for a multi-value dimension. `None` for `Title`.
    pub fn selection(&self, dimension: Dimension) -> Option<&IndexSet<String>> {
        Some(match dimension {
            Dimension::Projects => &self.projects,
            Dimension::Title => return None,
            Dimension::Repositories => &self.repositories,
            Dimension::SourceBranches => &self.source_branches,
            Dimension::TargetBranches => &self.target_branches,
            Dimension::Authors => &self.authors,
            Dimension::Reviewers => &self.reviewers,
            Dimension::MyApprovalStatuses => &self.my_approval_statuses,
            Dimension::AlternateStatus => &self.alternate_statuses,
            Dimension::Labels => &self.labels,
        })
    }

    fn selection_mut(&mut self, dimension: Dimension) -> Option<&mut IndexSet<String>> {
        Some(match dimension {
            Dimension::Projects => &mut self.projects,
            Dimension::Title => return None,
            Dimension::Repositories => &mut self.repositories,
            Dimension::SourceBranches => &mut self.source_branches,
            Dimension::TargetBranches => &mut self.target_branches,
            Dimension::Authors => &mut self.authors,
            Dimension::Reviewers => &mut self.reviewers,
            Dimension::MyApprovalStatuses => &mut self.my_approval_statuses,
            Dimension::AlternateStatus => &mut self.alternate_statuses,
            Dimension::Labels => &mut self.labels,
        })
    }

    /// Replace the selection for `dimension`. For `Title` the first value
    /// becomes the search text.
    pub fn set_selection<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter().map(Into::into);
        match self.selection_mut(dimension) {
            Some(set) => *set = values.collect(),
            None => self.title = values.next().unwrap_or_default(),
        }
    }

    /// Builder form of [`FilterState::set_selection`].
    pub fn with<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_selection(dimension, values);
        self
    }

    /// Add values to a dimension's selection, keeping what is already there.
    /// For `Title` the first value replaces the search text.
    pub fn extend_selection<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter().map(Into::into);
        match self.selection_mut(dimension) {
            Some(set) => set.extend(values),
            None => {
                if let Some(title) = values.next() {
                    self.title = title;
                }
            }
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Whether `dimension` currently narrows the result.
    pub fn is_active(&self, dimension: Dimension) -> bool {
        match self.selection(dimension) {
            Some(set) => !set.is_empty(),
            None => !self.title.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !Dimension::ALL.into_iter().any(|d| self.is_active(d))
    }

    pub fn active_dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        Dimension::ALL.into_iter().filter(|d| self.is_active(*d))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_json(&self) -> Result<String, FilterStateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, FilterStateError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// One active dimension, with its selected values pre-parsed.
enum Predicate<'a> {
    Projects(&'a IndexSet<String>),
    Title(String),
    Repositories(&'a IndexSet<String>),
    SourceBranches(&'a IndexSet<String>),
    TargetBranches(&'a IndexSet<String>),
    Authors(&'a IndexSet<String>),
    Reviewers(&'a IndexSet<String>),
    MyVotes(Vec<ReviewerVote>),
    AlternateStatus(Vec<AlternateStatus>),
    Labels(&'a IndexSet<String>),
}

impl<'a> Predicate<'a> {
    fn compile(dimension: Dimension, state: &'a FilterState) -> Self {
        match dimension {
            Dimension::Projects => Self::Projects(&state.projects),
            Dimension::Title => Self::Title(state.title.to_lowercase()),
            Dimension::Repositories => Self::Repositories(&state.repositories),
            Dimension::SourceBranches => Self::SourceBranches(&state.source_branches),
            Dimension::TargetBranches => Self::TargetBranches(&state.target_branches),
            Dimension::Authors => Self::Authors(&state.authors),
            Dimension::Reviewers => Self::Reviewers(&state.reviewers),
            Dimension::MyApprovalStatuses => Self::MyVotes(
                state
                    .my_approval_statuses
                    .iter()
                    .filter_map(|v| match v.trim().parse::<i32>() {
                        Ok(code) => Some(ReviewerVote::from(code)),
                        Err(_) => {
                            tracing::debug!("filter: ignoring vote code {v:?}");
                            None
                        }
                    })
                    .collect(),
            ),
            Dimension::AlternateStatus => Self::AlternateStatus(
                state
                    .alternate_statuses
                    .iter()
                    .filter_map(|s| match s.parse::<AlternateStatus>() {
                        Ok(status) => Some(status),
                        Err(e) => {
                            tracing::debug!("filter: {e}");
                            None
                        }
                    })
                    .collect(),
            ),
            Dimension::Labels => Self::Labels(&state.labels),
        }
    }

    fn matches(&self, pr: &PullRequest) -> bool {
        match self {
            Self::Projects(ids) => pr.project_id().is_some_and(|id| ids.contains(id)),
            Self::Title(needle) => pr.title.to_lowercase().contains(needle.as_str()),
            Self::Repositories(ids) => pr.repository_id().is_some_and(|id| ids.contains(id)),
            Self::SourceBranches(names) => pr
                .source_branch
                .as_ref()
                .is_some_and(|b| names.contains(&b.display_name)),
            Self::TargetBranches(names) => pr
                .target_branch
                .as_ref()
                .is_some_and(|b| names.contains(&b.display_name)),
            Self::Authors(ids) => pr.author.as_ref().is_some_and(|a| ids.contains(&a.id)),
            Self::Reviewers(ids) => ids.iter().any(|id| pr.has_reviewer(id)),
            Self::MyVotes(votes) => votes.contains(&pr.my_vote),
            Self::AlternateStatus(statuses) => statuses.iter().any(|s| s.matches(pr)),
            Self::Labels(ids) => ids.iter().any(|id| pr.has_label(id)),
        }
    }
}

/// Indices of the pull requests matching every active dimension, in input
/// order.
///
/// Always starts from the full collection, so calling it again with the same
/// state gives the same answer.
pub fn filter_indices(pull_requests: &[PullRequest], state: &FilterState) -> Vec<usize> {
    let mut working: Vec<usize> = (0..pull_requests.len()).collect();
    for dimension in state.active_dimensions() {
        let predicate = Predicate::compile(dimension, state);
        working.retain(|&i| predicate.matches(&pull_requests[i]));
        tracing::trace!("filter: {dimension} left {} PRs", working.len());
    }
    working
}

/// The pull requests matching every active dimension, in input order.
pub fn apply_filters<'a>(
    pull_requests: &'a [PullRequest],
    state: &FilterState,
) -> Vec<&'a PullRequest> {
    filter_indices(pull_requests, state)
        .into_iter()
        .map(|i| &pull_requests[i])
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
