use crate::facet::{self, FacetLists};
use crate::filter::{self, FilterState};
use crate::sort::{self, SortOrder};
use crate::types::{Label, PullRequest};

/// Events the board reacts to.
#[derive(Debug, Clone)]
pub enum Message {
    /// Start a reload of every tracked repository.
    Refresh,
    /// A reload finished; replaces the whole collection.
    PullRequestsLoaded(Vec<PullRequest>),
    /// A reload failed; the previous view stays in place.
    LoadFailed(String),
    /// Labels for one PR arrived after the initial load.
    LabelsUpdated {
        pull_request_id: u64,
        labels: Vec<Label>,
    },
    FilterChanged(FilterState),
    /// A saved filter state was restored from storage.
    FilterRestored(FilterState),
    FilterCleared,
    SortChanged(SortOrder),
}

/// Work the caller must carry out after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reload,
}

/// The pull-request list, its filter state, and everything derived from them.
///
/// Facets and the filtered view are recomputed from the full collection on
/// every change; nothing is patched incrementally except label facets.
#[derive(Debug, Default)]
pub struct Board {
    pull_requests: Vec<PullRequest>,
    facets: FacetLists,
    filter: FilterState,
    filtered_indices: Vec<usize>,
    sort_order: SortOrder,
    loading: bool,
    last_error: Option<String>,
}

impl Board {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            sort_order,
            ..Self::default()
        }
    }

    pub fn pull_requests(&self) -> &[PullRequest] {
        &self.pull_requests
    }

    pub fn facets(&self) -> &FacetLists {
        &self.facets
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The filtered view, in display order.
    pub fn view(&self) -> Vec<&PullRequest> {
        self.filtered_indices
            .iter()
            .map(|&i| &self.pull_requests[i])
            .collect()
    }

    /// Apply a message. Returns a command when the caller has I/O to do.
    pub fn update(&mut self, msg: Message) -> Option<Command> {
        match msg {
            Message::Refresh => {
                if self.loading {
                    tracing::debug!("board: reload already in flight, ignoring refresh");
                    return None;
                }
                self.loading = true;
                return Some(Command::Reload);
            }
            Message::PullRequestsLoaded(pull_requests) => {
                self.loading = false;
                self.last_error = None;
                self.pull_requests = pull_requests;
                sort::sort_by_creation_date(&mut self.pull_requests, self.sort_order);
                self.facets = facet::rebuild_facets(&self.pull_requests);
            }
            Message::LoadFailed(message) => {
                self.loading = false;
                tracing::warn!("board: load failed: {message}");
                self.last_error = Some(message);
                return None;
            }
            Message::LabelsUpdated {
                pull_request_id,
                labels,
            } => self.apply_labels(pull_request_id, labels),
            Message::FilterChanged(state) | Message::FilterRestored(state) => {
                self.filter = state;
            }
            Message::FilterCleared => self.filter.clear(),
            Message::SortChanged(order) => {
                self.sort_order = order;
                sort::sort_by_creation_date(&mut self.pull_requests, order);
            }
        }
        self.recompute();
        None
    }

    fn apply_labels(&mut self, pull_request_id: u64, labels: Vec<Label>) {
        let Some(pr) = self
            .pull_requests
            .iter_mut()
            .find(|pr| pr.pull_request_id == pull_request_id)
        else {
            tracing::debug!("board: labels for unknown PR #{pull_request_id}");
            return;
        };
        for label in &labels {
            let current = std::mem::take(&mut self.facets.labels);
            self.facets.labels = facet::append_label_facet(current, label);
        }
        pr.labels = labels;
    }

    fn recompute(&mut self) {
        self.filtered_indices = filter::filter_indices(&self.pull_requests, &self.filter);
        tracing::debug!(
            "board: showing {} of {} PRs",
            self.filtered_indices.len(),
            self.pull_requests.len()
        );
    }
}
