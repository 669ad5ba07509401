use pr_board::filter::{Dimension, FilterState, apply_filters, filter_indices};
use pr_board::types::PullRequest;

fn load_fixture_prs() -> Vec<PullRequest> {
    let json = include_str!("fixtures/pull_requests.json");
    serde_json::from_str(json).expect("valid pull_requests.json fixture")
}

fn ids(prs: &[&PullRequest]) -> Vec<u64> {
    prs.iter().map(|pr| pr.pull_request_id).collect()
}

/// One single-dimension state per dimension, each selecting something present
/// in the fixture.
fn sample_states() -> Vec<FilterState> {
    vec![
        FilterState::default().with(Dimension::Projects, ["proj-1"]),
        FilterState::default().with_title("fix"),
        FilterState::default().with(Dimension::Repositories, ["repo-web"]),
        FilterState::default().with(Dimension::SourceBranches, ["fix/a", "fix/c"]),
        FilterState::default().with(Dimension::TargetBranches, ["main"]),
        FilterState::default().with(Dimension::Authors, ["u-x"]),
        FilterState::default().with(Dimension::Reviewers, ["u-x"]),
        FilterState::default().with(Dimension::MyApprovalStatuses, ["0"]),
        FilterState::default().with(Dimension::AlternateStatus, ["NotIsDraft"]),
        FilterState::default().with(Dimension::Labels, ["lbl-bug"]),
    ]
}

#[test]
fn empty_state_returns_input_unchanged() {
    let prs = load_fixture_prs();
    let view = apply_filters(&prs, &FilterState::default());
    let expected: Vec<&PullRequest> = prs.iter().collect();
    assert_eq!(view, expected);
}

#[test]
fn filtering_is_idempotent() {
    let prs = load_fixture_prs();
    for state in sample_states() {
        let once = filter_indices(&prs, &state);
        let twice = filter_indices(&prs, &state);
        assert_eq!(once, twice);

        let narrowed: Vec<PullRequest> = once.iter().map(|&i| prs[i].clone()).collect();
        assert_eq!(
            apply_filters(&narrowed, &state).len(),
            narrowed.len(),
            "reapplying {state:?} to its own output changed it"
        );
    }
}

#[test]
fn activating_a_dimension_never_widens() {
    let prs = load_fixture_prs();
    let base = FilterState::default().with_title("fix");
    let base_len = apply_filters(&prs, &base).len();
    for dimension in Dimension::ALL {
        if dimension == Dimension::Title {
            continue;
        }
        let state = base.clone().with(dimension, ["anything", "proj-1", "main", "u-x"]);
        assert!(
            apply_filters(&prs, &state).len() <= base_len,
            "{dimension} widened the result"
        );
    }
}

#[test]
fn values_within_a_dimension_are_or() {
    let prs = load_fixture_prs();
    let state = FilterState::default().with(Dimension::Repositories, ["repo-api", "repo-ops"]);
    assert_eq!(ids(&apply_filters(&prs, &state)), vec![102, 103]);
}

#[test]
fn dimensions_are_and() {
    let prs = load_fixture_prs();
    let state = FilterState::default()
        .with(Dimension::Authors, ["u-x"])
        .with(Dimension::TargetBranches, ["main"]);
    assert_eq!(ids(&apply_filters(&prs, &state)), vec![101]);
}

#[test]
fn title_scenario_keeps_order() {
    let prs: Vec<PullRequest> = ["Fix bug A", "Add feature B", "Fix bug C"]
        .into_iter()
        .enumerate()
        .map(|(i, t)| PullRequest::new(i as u64, t))
        .collect();
    let view = apply_filters(&prs, &FilterState::default().with_title("fix"));
    let titles: Vec<&str> = view.iter().map(|pr| pr.title.as_str()).collect();
    assert_eq!(titles, vec!["Fix bug A", "Fix bug C"]);
}

#[test]
fn draft_scenario_keeps_only_drafts() {
    let prs = load_fixture_prs();
    assert_eq!(prs.len(), 5);
    let state = FilterState::default().with(Dimension::AlternateStatus, ["IsDraft"]);
    assert_eq!(ids(&apply_filters(&prs, &state)), vec![101, 104]);
}

#[test]
fn unknown_reviewer_gives_empty_result() {
    let prs = load_fixture_prs();
    let state = FilterState::default().with(Dimension::Reviewers, ["nobody"]);
    assert!(apply_filters(&prs, &state).is_empty());
}

#[test]
fn partial_record_only_matches_unconstrained_dimensions() {
    let prs = load_fixture_prs();
    let by_branch = FilterState::default().with(Dimension::TargetBranches, ["main", "release"]);
    assert!(!ids(&apply_filters(&prs, &by_branch)).contains(&105));

    let by_title = FilterState::default().with_title("partially");
    assert_eq!(ids(&apply_filters(&prs, &by_title)), vec![105]);
}

#[test]
fn my_approval_status_uses_resolved_vote() {
    let prs: Vec<PullRequest> = load_fixture_prs()
        .into_iter()
        .map(|pr| pr.resolve_current_user("u-me"))
        .collect();
    let waiting = FilterState::default().with(Dimension::MyApprovalStatuses, ["-5"]);
    assert_eq!(ids(&apply_filters(&prs, &waiting)), vec![101]);
}

#[test]
fn numeric_vote_codes_in_saved_state() {
    let prs: Vec<PullRequest> = load_fixture_prs()
        .into_iter()
        .map(|pr| pr.resolve_current_user("u-me"))
        .collect();
    let restored =
        FilterState::from_json(r#"{"selectedMyApprovalStatuses": {"value": [10, -5]}}"#).unwrap();
    assert_eq!(
        restored.my_approval_statuses.iter().collect::<Vec<_>>(),
        vec!["10", "-5"]
    );
    assert_eq!(ids(&apply_filters(&prs, &restored)), vec![101]);
}

#[test]
fn restored_host_state_filters_like_flat_state() {
    let prs = load_fixture_prs();
    let restored = FilterState::from_json(
        r#"{
            "selectedProjects": {"value": ["proj-1"]},
            "selectedAlternateStatusPr": {"value": ["HasNewChanges", "AutoComplete"]},
            "pullRequestTitle": {"value": ""}
        }"#,
    )
    .unwrap();
    assert_eq!(ids(&apply_filters(&prs, &restored)), vec![102]);

    let round_tripped = FilterState::from_json(&restored.to_json().unwrap()).unwrap();
    assert_eq!(round_tripped, restored);
}

#[test]
fn inputs_are_not_mutated() {
    let prs = load_fixture_prs();
    let before = prs.clone();
    let state = FilterState::default().with(Dimension::Labels, ["lbl-bug"]);
    let _ = apply_filters(&prs, &state);
    assert_eq!(prs, before);
}

#[test]
fn each_alternate_status_selects_expected_prs() {
    let prs = load_fixture_prs();
    let cases: &[(&[&str], &[u64])] = &[
        (&["IsDraft"], &[101, 104]),
        (&["NotIsDraft"], &[102, 103, 105]),
        (&["Conflicts"], &[102]),
        (&["NotConflicts"], &[101, 103, 104, 105]),
        (&["AutoComplete"], &[102]),
        (&["NotAutoComplete"], &[101, 103, 104, 105]),
        (&["ReadyForCompletion"], &[101, 103]),
        (&["NotReadyForCompletion"], &[102, 104, 105]),
        (&["HasNewChanges"], &[103]),
        // Unknown tags match nothing and are otherwise ignored.
        (&["Bogus"], &[]),
        (&["Bogus", "IsDraft"], &[101, 104]),
    ];
    for (tags, expected) in cases {
        let state = FilterState::default().with(Dimension::AlternateStatus, tags.iter().copied());
        assert_eq!(
            ids(&apply_filters(&prs, &state)),
            expected.to_vec(),
            "tags {tags:?}"
        );
    }
}
