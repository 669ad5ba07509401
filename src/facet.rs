use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{BranchRef, Identity, Label, PullRequest};

// ---------------------------------------------------------------------------
// Facet options
// ---------------------------------------------------------------------------

/// One selectable value in a filter-bar dropdown.
///
/// Each variant has its own equality key: identities and labels are keyed by
/// id, branches by display name (the same branch name in two repositories is
/// one option).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetOption {
    Identity { id: String, display_name: String },
    Branch { branch_name: String, display_name: String },
    Label { id: String, name: String },
}

impl FacetOption {
    /// Value stored in a `FilterState` selection when this option is picked.
    pub fn key(&self) -> &str {
        match self {
            Self::Identity { id, .. } | Self::Label { id, .. } => id,
            Self::Branch { display_name, .. } => display_name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Identity { display_name, .. } | Self::Branch { display_name, .. } => {
                display_name
            }
            Self::Label { name, .. } => name,
        }
    }

    /// Same option under the variant's equality rule.
    pub fn same_as(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other) && self.key() == other.key()
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Branch { .. } => 0,
            Self::Identity { .. } | Self::Label { .. } => 1,
        }
    }
}

impl From<&Identity> for FacetOption {
    fn from(identity: &Identity) -> Self {
        Self::Identity {
            id: identity.id.clone(),
            display_name: identity.display_name.clone(),
        }
    }
}

impl From<&BranchRef> for FacetOption {
    fn from(branch: &BranchRef) -> Self {
        Self::Branch {
            branch_name: branch.branch_name.clone(),
            display_name: branch.display_name.clone(),
        }
    }
}

impl From<&Label> for FacetOption {
    fn from(label: &Label) -> Self {
        Self::Label {
            id: label.id.clone(),
            name: label.name.clone(),
        }
    }
}

/// Branches first, then identities and labels; within a kind,
/// case-insensitive by display name.
pub fn compare_options(a: &FacetOption, b: &FacetOption) -> Ordering {
    a.rank().cmp(&b.rank()).then_with(|| {
        a.display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase())
    })
}

// ---------------------------------------------------------------------------
// Facet lists
// ---------------------------------------------------------------------------

/// The dropdown contents derived from a pull-request collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetLists {
    pub authors: Vec<FacetOption>,
    pub source_branches: Vec<FacetOption>,
    pub target_branches: Vec<FacetOption>,
    pub reviewers: Vec<FacetOption>,
    pub labels: Vec<FacetOption>,
}

impl FacetLists {
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
            && self.source_branches.is_empty()
            && self.target_branches.is_empty()
            && self.reviewers.is_empty()
            && self.labels.is_empty()
    }
}

/// Push `option` unless an equal one is already present.
fn push_unique(list: &mut Vec<FacetOption>, option: FacetOption) -> bool {
    if list.iter().any(|o| o.same_as(&option)) {
        return false;
    }
    list.push(option);
    true
}

/// Drop duplicates (first occurrence wins), then sort.
pub fn dedup_sorted(options: impl IntoIterator<Item = FacetOption>) -> Vec<FacetOption> {
    let mut out = Vec::new();
    for option in options {
        push_unique(&mut out, option);
    }
    // sort_by is stable, so equal display names keep first-seen order.
    out.sort_by(compare_options);
    out
}

/// Rebuild every facet list from scratch.
///
/// Pull requests missing an author or a branch contribute nothing to that
/// list.
pub fn rebuild_facets(pull_requests: &[PullRequest]) -> FacetLists {
    let authors = dedup_sorted(
        pull_requests
            .iter()
            .filter_map(|pr| pr.author.as_ref())
            .map(FacetOption::from),
    );
    let source_branches = dedup_sorted(
        pull_requests
            .iter()
            .filter_map(|pr| pr.source_branch.as_ref())
            .map(FacetOption::from),
    );
    let target_branches = dedup_sorted(
        pull_requests
            .iter()
            .filter_map(|pr| pr.target_branch.as_ref())
            .map(FacetOption::from),
    );
    let reviewers = dedup_sorted(
        pull_requests
            .iter()
            .flat_map(|pr| pr.reviewers.iter())
            .map(|r| FacetOption::from(&r.identity)),
    );
    let labels = dedup_sorted(
        pull_requests
            .iter()
            .flat_map(|pr| pr.labels.iter())
            .map(FacetOption::from),
    );

    tracing::debug!(
        "facets: rebuilt from {} PRs (authors={}, source={}, target={}, reviewers={}, labels={})",
        pull_requests.len(),
        authors.len(),
        source_branches.len(),
        target_branches.len(),
        reviewers.len(),
        labels.len(),
    );

    FacetLists {
        authors,
        source_branches,
        target_branches,
        reviewers,
        labels,
    }
}

/// Add a label that arrived after the initial load.
///
/// Returns the list unchanged when a label with the same id is present.
pub fn append_label_facet(mut current: Vec<FacetOption>, label: &Label) -> Vec<FacetOption> {
    if push_unique(&mut current, FacetOption::from(label)) {
        current.sort_by(compare_options);
    }
    current
}
