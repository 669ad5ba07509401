use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::PullRequest;

/// Order of the "When" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    /// Newest first.
    #[default]
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

#[derive(Debug, Error)]
#[error("unknown sort order \"{0}\" (expected asc or desc)")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(UnknownSortOrder(s.to_owned())),
        }
    }
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Stable sort by creation date. PRs created at the same instant keep their
/// relative order.
pub fn sort_by_creation_date(pull_requests: &mut [PullRequest], order: SortOrder) {
    match order {
        SortOrder::Ascending => pull_requests.sort_by(|a, b| a.creation_date.cmp(&b.creation_date)),
        SortOrder::Descending => {
            pull_requests.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        }
    }
}
