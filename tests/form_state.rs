use std::path::PathBuf;

use odds_apex::history::{HISTORY_LEN, TrackedMetric};
use odds_apex::snapshot::{FieldId, MatchSnapshot};
use odds_apex::state::AppState;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn calculate_records_history_and_evaluation() {
    let mut state = AppState::new();
    state.set_field_text(FieldId::HomeXg, "1.4").unwrap();
    state.set_field_text(FieldId::AwayXg, "0.8").unwrap();
    state.set_field_text(FieldId::HomeGoals, "1").unwrap();
    state.calculate();

    let eval = state.evaluation.as_ref().expect("evaluation stored");
    assert!(eval.probabilities.home > eval.probabilities.away);
    assert_eq!(state.history.latest(TrackedMetric::HomeXg), Some(1.4));
    assert_eq!(state.calculations, 1);
    let last = state.logs.back().unwrap();
    assert!(last.contains("[INFO] Calculated"));
    let [rh, rd, ra] = eval.recommendations.map(|r| r.kind.label());
    assert!(last.ends_with(&format!("calls H {rh} D {rd} A {ra}")));
}

#[test]
fn history_keeps_last_ten_and_never_changes_results() {
    let mut state = AppState::new();
    state.set_field_text(FieldId::HomeXg, "1.1").unwrap();
    state.calculate();
    let first = state.evaluation.clone().unwrap();

    for _ in 0..HISTORY_LEN + 3 {
        state.calculate();
    }
    assert_eq!(state.history.values(TrackedMetric::HomeXg).len(), HISTORY_LEN);
    assert_eq!(state.evaluation.as_ref(), Some(&first));
}

#[test]
fn reset_zeroes_fields_and_clears_history() {
    let mut state = AppState::new();
    state.set_field_text(FieldId::ElapsedMinutes, "70").unwrap();
    state.set_field_text(FieldId::Profit, "25").unwrap();
    state.calculate();
    state.reset();

    assert_eq!(state.snapshot, MatchSnapshot::default());
    assert!(state.history.is_empty());
    assert!(state.evaluation.is_none());
}

#[test]
fn bad_text_is_logged_and_previous_value_kept() {
    let mut state = AppState::new();
    state.set_field_text(FieldId::HomeGoals, "2").unwrap();
    while state.selected_field() != FieldId::HomeGoals {
        state.select_next();
    }
    state.editing = Some("2.5".to_string());
    state.commit_edit();

    assert_eq!(state.snapshot.home_goals, 2);
    assert!(state.editing.is_none());
    let last = state.logs.back().unwrap();
    assert!(last.contains("[WARN]"));
    assert!(last.contains("Home Goals"));
}

#[test]
fn load_snapshot_fills_the_form() {
    let mut state = AppState::new();
    state
        .load_snapshot(&fixture("snapshot_level_ht.json"))
        .expect("fixture loads");
    assert_eq!(state.field_text(FieldId::ElapsedMinutes), "45.0");
    assert_eq!(state.field_text(FieldId::HomeSot), "4");

    assert!(state.load_snapshot(&fixture("snapshot_broken.json")).is_err());
    assert_eq!(state.snapshot.home_sot, 4);
}
