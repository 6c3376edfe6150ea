//! Tests for handler module

use std::path::PathBuf;

use super::keys::handle_key;
use super::*;
use crate::input_key::InputKey;
use crate::screens::{CompareSlot, DetailFocus};
use crate::state::{AppState, UiMode};
use promptlab_api::test_utils::sample_prompt;
use promptlab_api::VersionMutation;
use promptlab_core::{Field, Prompt, TestResult, TestRun, Version};

/// A run as the executor would return it for `version_id`
fn test_run(version_id: u64) -> TestRun {
    TestRun {
        prompt_version_id: Some(VersionId(version_id)),
        results: vec![TestResult {
            ai_response: "ok".into(),
            quality_score: 0.9,
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Open prompt 1 on the detail screen and deliver `versions` versions
fn detail_state(versions: u32) -> AppState {
    let mut state = AppState::new();
    update(&mut state, Message::OpenPrompt(PromptId(1)));
    let generation = state.detail.generation;
    update(
        &mut state,
        Message::PromptLoaded {
            target: PromptTarget::Detail,
            generation,
            prompt: sample_prompt(1, versions),
        },
    );
    state
}

/// Start a test run on the selected version with one filled input
fn start_run(state: &mut AppState) -> UpdateResult {
    update(
        state,
        Message::EditTestInput {
            index: 0,
            value: "What is Rust?".into(),
        },
    );
    update(state, Message::RunTest)
}

// ─────────────────────────────────────────────────────────────────────────────
// App control
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = AppState::new();
    update(&mut state, Message::Quit);
    assert!(state.should_quit());
}

#[test]
fn test_ctrl_c_quits_from_any_screen() {
    let mut state = detail_state(1);
    state.detail.focus = DetailFocus::Draft;
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_tick_prunes_expired_notifications() {
    let mut settings = crate::config::Settings::default();
    settings.ui.notification_ms = 0;
    let mut state = AppState::with_settings(settings);
    state.notifications.error("boom");

    update(&mut state, Message::Tick);

    assert!(state.notifications.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Prompt list
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_show_list_fetches_once() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::ShowPromptList);
    assert_eq!(result.action, Some(UpdateAction::FetchPrompts));
    assert!(state.prompt_list.loading);

    // Already loading: no duplicate request
    let result = update(&mut state, Message::ShowPromptList);
    assert!(result.action.is_none());
}

#[test]
fn test_list_failure_notifies() {
    let mut state = AppState::new();
    update(&mut state, Message::RefreshPrompts);
    update(&mut state, Message::PromptsLoadFailed("connection refused".into()));

    assert!(!state.prompt_list.loading);
    let note = state.notifications.latest_error().unwrap();
    assert!(note.message.contains("connection refused"));
}

#[test]
fn test_enter_on_list_opens_selected_prompt() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::PromptsLoaded(vec![sample_prompt(1, 1), sample_prompt(2, 1)]),
    );
    update(&mut state, Message::ListNext);

    let msg = handle_key(&state, InputKey::Enter).unwrap();
    let result = update(&mut state, msg);
    assert!(matches!(result.message, Some(Message::OpenPrompt(PromptId(2)))));
}

// ─────────────────────────────────────────────────────────────────────────────
// Detail: loading
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_open_prompt_sets_loading_and_fetches() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::OpenPrompt(PromptId(7)));

    assert_eq!(state.ui_mode, UiMode::Detail);
    assert!(state.detail.loading);
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchPrompt {
            prompt_id: PromptId(7),
            target: PromptTarget::Detail,
            generation: state.detail.generation,
        })
    );
}

#[test]
fn test_load_selects_latest_version_and_fetches_history() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenPrompt(PromptId(1)));
    let generation = state.detail.generation;
    let result = update(
        &mut state,
        Message::PromptLoaded {
            target: PromptTarget::Detail,
            generation,
            prompt: sample_prompt(1, 3),
        },
    );

    assert!(!state.detail.loading);
    assert_eq!(state.detail.selected_version_id, Some(VersionId(13)));
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchHistory {
            version_id: VersionId(13)
        })
    );
}

#[test]
fn test_stale_prompt_response_is_discarded() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenPrompt(PromptId(1)));
    let stale = state.detail.generation;
    update(&mut state, Message::OpenPrompt(PromptId(2)));

    let result = update(
        &mut state,
        Message::PromptLoaded {
            target: PromptTarget::Detail,
            generation: stale,
            prompt: sample_prompt(1, 2),
        },
    );

    assert!(result.action.is_none());
    assert!(state.detail.prompt.is_none());
    assert!(state.detail.loading);
    assert_eq!(state.detail.prompt_id, Some(PromptId(2)));
}

#[test]
fn test_load_failure_keeps_prior_prompt() {
    let mut state = detail_state(2);
    let (_, generation) = state.detail.begin_reload().unwrap();

    update(
        &mut state,
        Message::PromptLoadFailed {
            target: PromptTarget::Detail,
            generation,
            error: "HTTP 500".into(),
        },
    );

    assert!(!state.detail.loading);
    assert_eq!(state.detail.prompt, Some(sample_prompt(1, 2)));
    assert!(state.notifications.latest_error().is_some());
}

#[test]
fn test_first_load_failure_leaves_prompt_empty() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenPrompt(PromptId(1)));
    let generation = state.detail.generation;
    update(
        &mut state,
        Message::PromptLoadFailed {
            target: PromptTarget::Detail,
            generation,
            error: "timed out".into(),
        },
    );
    assert!(!state.detail.loading);
    assert!(state.detail.prompt.is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Detail: versions and draft
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_select_version_reseeds_draft_and_fetches_history() {
    let mut state = detail_state(3);
    state.detail.current_result = Some(test_run(13));

    let result = update(&mut state, Message::SelectVersion(VersionId(11)));

    assert_eq!(state.detail.draft, "v1: answer {{question}}");
    assert!(state.detail.current_result.is_none());
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchHistory {
            version_id: VersionId(11)
        })
    );
}

#[test]
fn test_select_unknown_version_is_ignored() {
    let mut state = detail_state(2);
    let result = update(&mut state, Message::SelectVersion(VersionId(99)));
    assert!(result.action.is_none());
    assert_eq!(state.detail.selected_version_id, Some(VersionId(12)));
}

#[test]
fn test_up_in_versions_selects_previous() {
    let mut state = detail_state(2);
    let msg = handle_key(&state, InputKey::Up).unwrap();
    update(&mut state, msg);
    assert_eq!(state.detail.selected_version_id, Some(VersionId(11)));
}

#[test]
fn test_save_rejected_when_not_modified() {
    let mut state = detail_state(1);
    assert!(!state.detail.is_modified());

    let result = update(&mut state, Message::SaveVersion);

    assert!(result.action.is_none());
    assert!(!state.detail.saving);
    assert!(state.notifications.latest().is_some());
}

#[test]
fn test_save_rejected_when_draft_blank() {
    let mut state = detail_state(1);
    update(&mut state, Message::EditDraft("   \n".into()));
    assert!(state.detail.is_modified());

    let result = update(&mut state, Message::SaveVersion);

    assert!(result.action.is_none());
    assert!(!state.detail.saving);
    assert!(state.notifications.latest_error().is_some());
}

#[test]
fn test_save_modified_draft_creates_version() {
    let mut state = detail_state(1);
    update(&mut state, Message::EditDraft("New content {{question}}".into()));

    let result = update(&mut state, Message::SaveVersion);

    assert!(state.detail.saving);
    assert_eq!(
        result.action,
        Some(UpdateAction::CreateVersion {
            prompt_id: PromptId(1),
            content: "New content {{question}}".into(),
        })
    );
}

#[test]
fn test_typing_in_draft_edits_it() {
    let mut state = detail_state(1);
    state.detail.focus = DetailFocus::Draft;
    let msg = handle_key(&state, InputKey::Char('!')).unwrap();
    update(&mut state, msg);
    assert_eq!(state.detail.draft, "v1: answer {{question}}!");
}

#[test]
fn test_aggregate_echo_replaces_prompt_and_selects_latest() {
    let mut state = detail_state(2);
    state.detail.selected_version_id = Some(VersionId(11));
    state.detail.saving = true;

    let result = update(
        &mut state,
        Message::VersionSaved {
            prompt_id: PromptId(1),
            mutation: VersionMutation::Aggregate(sample_prompt(1, 3)),
        },
    );

    assert!(!state.detail.saving);
    assert_eq!(state.detail.selected_version_id, Some(VersionId(13)));
    assert_eq!(state.detail.draft, "v3: answer {{question}}");
    assert!(!state.detail.is_modified());
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchHistory {
            version_id: VersionId(13)
        })
    );
}

#[test]
fn test_version_echo_is_appended_and_selected() {
    let mut state = detail_state(1);
    let version = Version {
        id: VersionId(500),
        prompt_id: Some(PromptId(1)),
        version_number: 2,
        content: "Second".into(),
        created_at: None,
    };

    update(
        &mut state,
        Message::VersionSaved {
            prompt_id: PromptId(1),
            mutation: VersionMutation::Version(version),
        },
    );

    let prompt = state.detail.prompt.as_ref().unwrap();
    assert_eq!(prompt.versions.len(), 2);
    assert_eq!(state.detail.selected_version_id, Some(VersionId(500)));
    assert_eq!(state.detail.draft, "Second");
}

#[test]
fn test_unrecognized_echo_triggers_reload() {
    let mut state = detail_state(1);
    let before = state.detail.generation;

    let result = update(
        &mut state,
        Message::VersionSaved {
            prompt_id: PromptId(1),
            mutation: VersionMutation::Unrecognized,
        },
    );

    assert!(state.detail.loading);
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchPrompt {
            prompt_id: PromptId(1),
            target: PromptTarget::Detail,
            generation: before + 1,
        })
    );

    // The reload lands on the newest version
    update(
        &mut state,
        Message::PromptLoaded {
            target: PromptTarget::Detail,
            generation: before + 1,
            prompt: sample_prompt(1, 2),
        },
    );
    assert_eq!(state.detail.selected_version_id, Some(VersionId(12)));
}

#[test]
fn test_unrecognized_echo_keeps_selection_when_reload_fails() {
    let mut state = detail_state(2);
    update(&mut state, Message::SelectVersion(VersionId(11)));
    let result = update(
        &mut state,
        Message::VersionSaved {
            prompt_id: PromptId(1),
            mutation: VersionMutation::Unrecognized,
        },
    );
    let Some(UpdateAction::FetchPrompt { generation, .. }) = result.action else {
        panic!("expected FetchPrompt, got {:?}", result.action);
    };

    update(
        &mut state,
        Message::PromptLoadFailed {
            target: PromptTarget::Detail,
            generation,
            error: "HTTP 500".into(),
        },
    );

    assert_eq!(state.detail.selected_version_id, Some(VersionId(11)));
    assert!(state.detail.selected_version().is_some());
    assert_eq!(state.detail.draft, "v1: answer {{question}}");
    // Tests can still target the version on screen
    assert!(matches!(
        start_run(&mut state).action,
        Some(UpdateAction::RunTest { .. })
    ));
}

#[test]
fn test_save_failure_resets_saving_and_keeps_draft() {
    let mut state = detail_state(1);
    update(&mut state, Message::EditDraft("changed".into()));
    update(&mut state, Message::SaveVersion);

    update(
        &mut state,
        Message::VersionSaveFailed {
            prompt_id: PromptId(1),
            error: "HTTP 500".into(),
        },
    );

    assert!(!state.detail.saving);
    assert_eq!(state.detail.draft, "changed");
}

// ─────────────────────────────────────────────────────────────────────────────
// Detail: test runs
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_run_with_blank_inputs_is_rejected() {
    let mut state = detail_state(1);
    update(&mut state, Message::AddTestInput);
    update(
        &mut state,
        Message::EditTestInput {
            index: 1,
            value: "   ".into(),
        },
    );

    let result = update(&mut state, Message::RunTest);

    assert!(result.action.is_none());
    assert!(!state.detail.testing);
    assert!(state.notifications.latest_error().is_some());
}

#[test]
fn test_run_submits_only_filled_inputs() {
    let mut state = detail_state(2);
    update(&mut state, Message::AddTestInput);
    let result = start_run(&mut state);

    assert!(state.detail.testing);
    let Some(UpdateAction::RunTest { sequence, request }) = result.action else {
        panic!("expected RunTest, got {:?}", result.action);
    };
    assert!(state.detail.is_current_run(sequence));
    assert_eq!(request.prompt_version_id, VersionId(12));
    assert_eq!(request.model_name, "gpt-4");
    assert_eq!(request.test_inputs.len(), 1);
    assert_eq!(request.test_inputs[0].question, "What is Rust?");
}

#[test]
fn test_run_rejected_while_testing() {
    let mut state = detail_state(1);
    start_run(&mut state);

    let result = update(&mut state, Message::RunTest);

    assert!(result.action.is_none());
    // Inputs remain editable during a run
    update(&mut state, Message::AddTestInput);
    assert_eq!(state.detail.test_inputs.len(), 2);
}

#[test]
fn test_run_without_version_is_rejected() {
    let mut state = detail_state(0);
    let result = start_run(&mut state);
    assert!(result.action.is_none());
    assert!(!state.detail.testing);
}

#[test]
fn test_run_success_sets_result_and_refetches_history() {
    let mut state = detail_state(1);
    start_run(&mut state);
    assert!(state.detail.current_result.is_none());
    let sequence = state.detail.run_sequence;

    let result = update(
        &mut state,
        Message::TestRunCompleted {
            sequence,
            version_id: VersionId(11),
            run: test_run(11),
        },
    );

    assert!(!state.detail.testing);
    assert_eq!(state.detail.current_result, Some(test_run(11)));
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchHistory {
            version_id: VersionId(11)
        })
    );
}

#[test]
fn test_run_failure_resets_testing_and_leaves_result_cleared() {
    let mut state = detail_state(1);
    state.detail.current_result = Some(test_run(11));
    start_run(&mut state);
    let sequence = state.detail.run_sequence;

    update(
        &mut state,
        Message::TestRunFailed {
            sequence,
            version_id: VersionId(11),
            error: "HTTP 502".into(),
        },
    );

    assert!(!state.detail.testing);
    assert!(state.detail.current_result.is_none());
    assert!(state.notifications.latest_error().is_some());
}

#[test]
fn test_result_for_deselected_version_is_discarded() {
    let mut state = detail_state(2);
    start_run(&mut state);
    let sequence = state.detail.run_sequence;
    update(&mut state, Message::SelectVersion(VersionId(11)));

    let result = update(
        &mut state,
        Message::TestRunCompleted {
            sequence,
            version_id: VersionId(12),
            run: test_run(12),
        },
    );

    assert!(!state.detail.testing);
    assert!(state.detail.current_result.is_none());
    // History is refreshed for what is selected now
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchHistory {
            version_id: VersionId(11)
        })
    );
}

/// Run on prompt 1, then open prompt 2 and run there
fn run_on_two_prompts() -> (AppState, u64) {
    let mut state = detail_state(1);
    start_run(&mut state);
    let first = state.detail.run_sequence;

    update(&mut state, Message::OpenPrompt(PromptId(2)));
    let generation = state.detail.generation;
    update(
        &mut state,
        Message::PromptLoaded {
            target: PromptTarget::Detail,
            generation,
            prompt: sample_prompt(2, 1),
        },
    );
    assert!(start_run(&mut state).action.is_some());
    assert!(state.detail.testing);
    (state, first)
}

#[test]
fn test_late_completion_from_previous_prompt_is_ignored() {
    let (mut state, first) = run_on_two_prompts();

    let result = update(
        &mut state,
        Message::TestRunCompleted {
            sequence: first,
            version_id: VersionId(11),
            run: test_run(11),
        },
    );

    assert!(result.action.is_none());
    assert!(state.detail.testing);
    assert!(state.detail.current_result.is_none());
    assert!(update(&mut state, Message::RunTest).action.is_none());
}

#[test]
fn test_late_failure_from_previous_prompt_is_ignored() {
    let (mut state, first) = run_on_two_prompts();

    let result = update(
        &mut state,
        Message::TestRunFailed {
            sequence: first,
            version_id: VersionId(11),
            error: "HTTP 502".into(),
        },
    );

    assert!(result.action.is_none());
    assert!(state.detail.testing);
    assert!(state.notifications.latest_error().is_none());
    assert!(update(&mut state, Message::RunTest).action.is_none());

    // The run in flight on prompt 2 still lands
    let sequence = state.detail.run_sequence;
    update(
        &mut state,
        Message::TestRunCompleted {
            sequence,
            version_id: VersionId(21),
            run: test_run(21),
        },
    );
    assert!(!state.detail.testing);
    assert_eq!(state.detail.current_result, Some(test_run(21)));
}

#[test]
fn test_history_for_deselected_version_is_discarded() {
    let mut state = detail_state(2);
    update(&mut state, Message::SelectVersion(VersionId(11)));

    update(
        &mut state,
        Message::HistoryLoaded {
            version_id: VersionId(12),
            runs: vec![test_run(12)],
        },
    );
    assert!(state.detail.history.is_empty());

    update(
        &mut state,
        Message::HistoryLoaded {
            version_id: VersionId(11),
            runs: vec![test_run(11)],
        },
    );
    assert_eq!(state.detail.history.len(), 1);
    assert!(!state.detail.history_loading);
}

#[test]
fn test_removing_last_input_is_noop() {
    let mut state = detail_state(1);
    update(&mut state, Message::RemoveTestInput(0));
    assert_eq!(state.detail.test_inputs.len(), 1);
}

#[test]
fn test_ctrl_p_cycles_provider() {
    let mut state = detail_state(1);
    let before = state.detail.provider;
    let msg = handle_key(&state, InputKey::CharCtrl('p')).unwrap();
    update(&mut state, msg);
    assert_eq!(state.detail.provider, before.next());
}

#[test]
fn test_export_requires_a_result() {
    let mut state = detail_state(1);
    let result = update(&mut state, Message::ExportResults(None));
    assert!(result.action.is_none());
}

#[test]
fn test_export_emits_csv_action() {
    let mut state = detail_state(1);
    state.detail.current_result = Some(test_run(11));

    let result = update(
        &mut state,
        Message::ExportResults(Some(PathBuf::from("out.csv"))),
    );

    assert_eq!(
        result.action,
        Some(UpdateAction::ExportCsv {
            path: PathBuf::from("out.csv"),
            results: test_run(11).results,
        })
    );
}

#[test]
fn test_default_export_name_carries_version_number() {
    let mut state = detail_state(3);
    state.detail.current_result = Some(test_run(13));

    let result = update(&mut state, Message::ExportResults(None));

    let Some(UpdateAction::ExportCsv { path, .. }) = result.action else {
        panic!("expected ExportCsv");
    };
    let name = path.to_string_lossy().into_owned();
    assert!(name.starts_with("promptlab-v3-"));
    assert!(name.ends_with(".csv"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Comparator
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compare_reuses_loaded_prompt() {
    let mut state = detail_state(3);
    let result = update(&mut state, Message::OpenCompare(PromptId(1)));

    assert_eq!(state.ui_mode, UiMode::Compare);
    assert!(result.action.is_none());
    assert_eq!(state.compare.slot_a, Some(VersionId(13)));
    assert_eq!(state.compare.slot_b, Some(VersionId(12)));
}

#[test]
fn test_compare_with_single_version_duplicates_it() {
    let mut state = detail_state(1);
    update(&mut state, Message::OpenCompare(PromptId(1)));
    assert_eq!(state.compare.slot_a, Some(VersionId(11)));
    assert_eq!(state.compare.slot_b, Some(VersionId(11)));
}

#[test]
fn test_compare_fetches_when_prompt_not_loaded() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::OpenCompare(PromptId(4)));
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchPrompt {
            prompt_id: PromptId(4),
            target: PromptTarget::Compare,
            generation: state.compare.generation,
        })
    );
}

#[test]
fn test_compare_run_emits_both_versions() {
    let mut state = detail_state(2);
    update(&mut state, Message::OpenCompare(PromptId(1)));
    state.compare.result_a = Some(test_run(12));

    let result = update(&mut state, Message::RunComparison);

    assert!(state.compare.running);
    assert!(state.compare.result_a.is_none());
    let Some(UpdateAction::RunComparison {
        version_a,
        version_b,
        model_name,
        input,
        ..
    }) = result.action
    else {
        panic!("expected RunComparison");
    };
    assert_eq!((version_a, version_b), (VersionId(12), VersionId(11)));
    assert_eq!(model_name, "gpt-3.5-turbo");
    assert_eq!(input.question, "Explain quantum computing");
}

#[test]
fn test_compare_blank_input_is_rejected() {
    let mut state = detail_state(2);
    update(&mut state, Message::OpenCompare(PromptId(1)));
    update(&mut state, Message::EditCompareInput("  ".into()));

    let result = update(&mut state, Message::RunComparison);
    assert!(result.action.is_none());
    assert!(!state.compare.running);
}

#[test]
fn test_compare_failure_shows_neither_result() {
    let mut state = detail_state(2);
    update(&mut state, Message::OpenCompare(PromptId(1)));
    update(&mut state, Message::RunComparison);
    let sequence = state.compare.sequence;

    update(
        &mut state,
        Message::ComparisonFailed {
            sequence,
            error: "HTTP 502".into(),
        },
    );

    assert!(!state.compare.running);
    assert!(state.compare.result_a.is_none());
    assert!(state.compare.result_b.is_none());
    assert_eq!(state.notifications.len(), 1);
}

#[test]
fn test_stale_comparison_is_discarded() {
    let mut state = detail_state(2);
    update(&mut state, Message::OpenCompare(PromptId(1)));
    update(&mut state, Message::RunComparison);
    let first = state.compare.sequence;
    update(
        &mut state,
        Message::ComparisonFailed {
            sequence: first,
            error: "x".into(),
        },
    );
    update(&mut state, Message::RunComparison);

    update(
        &mut state,
        Message::ComparisonCompleted {
            sequence: first,
            a: test_run(12),
            b: test_run(11),
        },
    );
    assert!(state.compare.running);
    assert!(state.compare.result_a.is_none());

    let current = state.compare.sequence;
    update(
        &mut state,
        Message::ComparisonCompleted {
            sequence: current,
            a: test_run(12),
            b: test_run(11),
        },
    );
    assert!(!state.compare.running);
    assert_eq!(state.compare.result_b, Some(test_run(11)));
}

#[test]
fn test_cycle_slot_key_moves_slot() {
    let mut state = detail_state(3);
    update(&mut state, Message::OpenCompare(PromptId(1)));
    let msg = handle_key(&state, InputKey::Left).unwrap();
    assert!(matches!(
        msg,
        Message::CycleCompareSlot {
            slot: CompareSlot::A,
            forward: false
        }
    ));
    update(&mut state, msg);
    assert_eq!(state.compare.slot_a, Some(VersionId(12)));
}

#[test]
fn test_back_from_compare_returns_to_detail() {
    let mut state = detail_state(2);
    update(&mut state, Message::OpenCompare(PromptId(1)));
    update(&mut state, Message::Back);
    assert_eq!(state.ui_mode, UiMode::Detail);
}

// ─────────────────────────────────────────────────────────────────────────────
// Quick test
// ─────────────────────────────────────────────────────────────────────────────

fn quick_state() -> AppState {
    let mut state = AppState::new();
    update(&mut state, Message::OpenQuickTest);
    update(
        &mut state,
        Message::EditQuickContent("Summarize: {{question}}".into()),
    );
    update(
        &mut state,
        Message::EditQuickInput {
            index: 0,
            value: "Rust ownership".into(),
        },
    );
    state
}

#[test]
fn test_quick_test_blank_content_is_rejected() {
    let mut state = quick_state();
    update(&mut state, Message::EditQuickContent(" ".into()));

    let result = update(&mut state, Message::RunQuickTest);

    assert!(result.action.is_none());
    let note = state.notifications.latest_error().unwrap();
    assert_eq!(note.message, "Prompt content cannot be empty");
}

#[test]
fn test_quick_test_success_records_history() {
    let mut state = quick_state();
    let result = update(&mut state, Message::RunQuickTest);
    assert!(matches!(result.action, Some(UpdateAction::RunQuickTest(_))));
    assert!(state.quick_test.running);

    update(&mut state, Message::QuickTestCompleted(test_run(0)));

    assert!(!state.quick_test.running);
    assert_eq!(state.quick_test.result, Some(test_run(0)));
    assert_eq!(state.quick_test.history.len(), 1);
    assert_eq!(state.quick_test.history[0].content, "Summarize: {{question}}");
}

#[test]
fn test_quick_test_failure_records_nothing() {
    let mut state = quick_state();
    update(&mut state, Message::RunQuickTest);
    update(&mut state, Message::QuickTestFailed("HTTP 500".into()));

    assert!(!state.quick_test.running);
    assert!(state.quick_test.history.is_empty());
    assert!(state.quick_test.pending.is_none());
}

#[test]
fn test_load_history_restores_submitted_form() {
    let mut state = quick_state();
    update(&mut state, Message::RunQuickTest);
    update(&mut state, Message::QuickTestCompleted(test_run(0)));
    update(&mut state, Message::EditQuickContent("other".into()));

    update(&mut state, Message::LoadQuickHistory(0));

    assert_eq!(state.quick_test.content, "Summarize: {{question}}");
    assert!(state.quick_test.result.is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Create prompt
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_create_invalid_form_sets_errors_without_request() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenCreatePrompt);

    let result = update(&mut state, Message::SubmitCreatePrompt);

    assert!(result.action.is_none());
    assert!(!state.create.submitting);
    assert!(state.create.errors.get(Field::Name).is_some());
    assert!(state.create.errors.get(Field::InitialContent).is_some());
}

#[test]
fn test_editing_field_clears_its_error() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenCreatePrompt);
    update(&mut state, Message::SubmitCreatePrompt);

    update(
        &mut state,
        Message::EditCreateField {
            field: Field::Name,
            value: "Support".into(),
        },
    );

    assert!(state.create.errors.get(Field::Name).is_none());
    assert!(state.create.errors.get(Field::InitialContent).is_some());
}

#[test]
fn test_create_valid_form_submits_trimmed_request() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenCreatePrompt);
    for (field, value) in [
        (Field::Name, " Support "),
        (Field::Description, "Helpdesk"),
        (Field::InitialContent, "Answer {{question}}"),
    ] {
        update(
            &mut state,
            Message::EditCreateField {
                field,
                value: value.into(),
            },
        );
    }

    let result = update(&mut state, Message::SubmitCreatePrompt);

    assert!(state.create.submitting);
    let Some(UpdateAction::CreatePrompt(request)) = result.action else {
        panic!("expected CreatePrompt");
    };
    assert_eq!(request.name, "Support");
    assert_eq!(request.initial_content, "Answer {{question}}");
}

#[test]
fn test_created_prompt_opens_detail_directly() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenCreatePrompt);
    let prompt: Prompt = sample_prompt(9, 1);

    let result = update(&mut state, Message::PromptCreated(prompt.clone()));

    assert_eq!(state.ui_mode, UiMode::Detail);
    assert!(!state.detail.loading);
    assert_eq!(state.detail.prompt, Some(prompt));
    assert_eq!(state.detail.selected_version_id, Some(VersionId(91)));
    assert_eq!(state.prompt_list.selected_id(), Some(PromptId(9)));
    // Only history is fetched; the aggregate is not
    assert_eq!(
        result.action,
        Some(UpdateAction::FetchHistory {
            version_id: VersionId(91)
        })
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// API key
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_settings_open_loads_key_and_back_returns() {
    let mut state = detail_state(1);
    let result = update(&mut state, Message::OpenSettings);
    assert_eq!(result.action, Some(UpdateAction::LoadApiKey));

    update(&mut state, Message::ApiKeyLoaded(Some("sk-1".into())));
    assert!(state.settings_screen.has_stored_key);
    assert_eq!(state.settings_screen.api_key, "sk-1");

    update(&mut state, Message::Back);
    assert_eq!(state.ui_mode, UiMode::Detail);
}

#[test]
fn test_save_key_trims_buffer() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenSettings);
    update(&mut state, Message::ApiKeyLoaded(None));
    update(&mut state, Message::EditApiKey("  sk-new  ".into()));

    let result = update(&mut state, Message::SaveApiKey);

    assert_eq!(
        result.action,
        Some(UpdateAction::SaveApiKey {
            key: "sk-new".into()
        })
    );
}

#[test]
fn test_clear_key_saves_blank() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenSettings);
    update(&mut state, Message::ApiKeyLoaded(Some("sk-1".into())));

    let result = update(&mut state, Message::ClearApiKey);
    let follow_up = result.message.unwrap();
    let result = update(&mut state, follow_up);

    assert_eq!(
        result.action,
        Some(UpdateAction::SaveApiKey { key: String::new() })
    );
    update(&mut state, Message::ApiKeySaved { stored: false });
    assert!(!state.settings_screen.has_stored_key);
    assert_eq!(
        state.notifications.latest().unwrap().message,
        "API key removed"
    );
}
