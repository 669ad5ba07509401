use pr_board::board::{Board, Command, Message};
use pr_board::filter::{Dimension, FilterState};
use pr_board::sort::SortOrder;
use pr_board::types::{Label, PullRequest};

fn load_fixture_prs() -> Vec<PullRequest> {
    let json = include_str!("fixtures/pull_requests.json");
    serde_json::from_str(json).expect("valid pull_requests.json fixture")
}

fn view_ids(board: &Board) -> Vec<u64> {
    board.view().iter().map(|pr| pr.pull_request_id).collect()
}

#[test]
fn loaded_collection_is_sorted_newest_first() {
    let mut board = Board::new(SortOrder::Descending);
    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    // 105 has no creation date and sorts last.
    assert_eq!(view_ids(&board), vec![104, 102, 103, 101, 105]);
    assert_eq!(board.facets().authors.len(), 3);
}

#[test]
fn sort_change_reorders_filtered_view() {
    let mut board = Board::new(SortOrder::Descending);
    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    board.update(Message::FilterChanged(FilterState::default().with_title("fix")));
    assert_eq!(view_ids(&board), vec![103, 101]);

    board.update(Message::SortChanged(SortOrder::Ascending));
    assert_eq!(view_ids(&board), vec![101, 103]);
}

#[test]
fn restored_filter_applies_to_next_load() {
    let mut board = Board::default();
    board.update(Message::FilterRestored(
        FilterState::default().with(Dimension::Projects, ["proj-2"]),
    ));
    assert!(board.view().is_empty());

    assert_eq!(board.update(Message::Refresh), Some(Command::Reload));
    assert!(board.is_loading());
    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    assert!(!board.is_loading());
    assert_eq!(view_ids(&board), vec![103]);
}

#[test]
fn reload_replaces_collection_instead_of_appending() {
    let mut board = Board::default();
    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    assert_eq!(board.pull_requests().len(), 5);
}

#[test]
fn failed_load_keeps_view_and_clears_on_success() {
    let mut board = Board::default();
    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    board.update(Message::Refresh);
    board.update(Message::LoadFailed("timeout".into()));
    assert_eq!(board.view().len(), 5);
    assert_eq!(board.last_error(), Some("timeout"));

    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    assert!(board.last_error().is_none());
}

#[test]
fn streamed_labels_extend_label_facet() {
    let mut board = Board::default();
    board.update(Message::PullRequestsLoaded(load_fixture_prs()));
    assert_eq!(board.facets().labels.len(), 2);

    board.update(Message::LabelsUpdated {
        pull_request_id: 105,
        labels: vec![Label::new("lbl-ops", "Ops"), Label::new("lbl-bug", "bug")],
    });
    let names: Vec<&str> = board
        .facets()
        .labels
        .iter()
        .map(|l| l.display_name())
        .collect();
    assert_eq!(names, vec!["bug", "Feature", "Ops"]);

    board.update(Message::FilterChanged(
        FilterState::default().with(Dimension::Labels, ["lbl-ops"]),
    ));
    assert_eq!(view_ids(&board), vec![105]);
}
