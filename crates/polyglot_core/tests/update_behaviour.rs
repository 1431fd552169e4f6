use std::sync::Once;

use polyglot_core::{
    update, AppState, Chapter, ChapterUpdate, Effect, JobStatus, Msg, Notice, RemoteStatus,
    WriteOrigin,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn chapter(id: &str, content: &str) -> Chapter {
    Chapter {
        id: id.to_string(),
        title: format!("Chapter {id}"),
        content: content.to_string(),
    }
}

fn chapter_update(id: &str, content: &str) -> ChapterUpdate {
    ChapterUpdate {
        chapter_id: id.to_string(),
        content: content.to_string(),
    }
}

fn loaded_state() -> AppState {
    let (state, effects) = update(
        AppState::new(),
        Msg::DocumentLoaded {
            session_id: "session-1".to_string(),
            chapters: vec![chapter("c1", "Hello"), chapter("c2", "World")],
            language: "fr".to_string(),
        },
    );
    assert!(effects.is_empty());
    state
}

fn started_state() -> AppState {
    let (state, effects) = update(loaded_state(), Msg::TranslateRequested);
    assert_eq!(
        effects,
        vec![Effect::StartJob {
            session_id: "session-1".to_string(),
            language: "fr".to_string(),
        }]
    );
    state
}

#[test]
fn full_translation_scenario_ingests_partial_results() {
    init_logging();
    let state = started_state();
    assert_eq!(state.view().job_status, JobStatus::Queued);

    let (state, effects) = update(
        state,
        Msg::PollArrived {
            status: RemoteStatus::InProgress,
            chapters: vec![chapter_update("c1", "Bonjour")],
        },
    );
    assert!(effects.is_empty());
    let session = state.session().unwrap();
    assert_eq!(session.job_status(), JobStatus::InProgress);
    assert_eq!(session.translation("c1").unwrap().content, "Bonjour");
    assert!(session.translation("c2").is_none());

    let (mut state, effects) = update(
        state,
        Msg::PollArrived {
            status: RemoteStatus::Completed,
            chapters: vec![chapter_update("c2", "Monde")],
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.job_status, JobStatus::Completed);
    assert_eq!(view.translated_count, 2);
    let session = state.session().unwrap();
    assert_eq!(session.translation("c1").unwrap().content, "Bonjour");
    assert_eq!(session.translation("c2").unwrap().content, "Monde");
    assert!(state.consume_dirty());
}

#[test]
fn empty_poll_leaves_translations_unchanged() {
    init_logging();
    let state = started_state();
    let (state, _) = update(
        state,
        Msg::PollArrived {
            status: RemoteStatus::InProgress,
            chapters: vec![chapter_update("c1", "Bonjour")],
        },
    );
    let before = state.session().unwrap().translated().clone();

    let (state, effects) = update(
        state,
        Msg::PollArrived {
            status: RemoteStatus::InProgress,
            chapters: Vec::new(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.session().unwrap().translated(), &before);
}

#[test]
fn translate_while_running_is_rejected_without_a_second_start() {
    init_logging();
    let state = started_state();
    let (mut state, effects) = update(state, Msg::TranslateRequested);

    assert!(effects.is_empty());
    assert_eq!(state.view().notice, Some(Notice::JobAlreadyRunning));
    assert_eq!(state.view().job_status, JobStatus::Queued);
    assert!(state.consume_dirty());
}

#[test]
fn start_failure_rolls_back_to_idle_and_allows_retry() {
    init_logging();
    let state = started_state();
    let (state, effects) = update(
        state,
        Msg::JobStartFailed {
            reason: "connection refused".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().job_status, JobStatus::Idle);
    assert_eq!(
        state.view().notice,
        Some(Notice::JobStartFailed("connection refused".to_string()))
    );

    let (_state, effects) = update(state, Msg::TranslateRequested);
    assert_eq!(effects.len(), 1);
}

#[test]
fn poll_failure_is_terminal_but_keeps_partial_output() {
    init_logging();
    let state = started_state();
    let (state, _) = update(
        state,
        Msg::PollArrived {
            status: RemoteStatus::InProgress,
            chapters: vec![chapter_update("c1", "Bonjour")],
        },
    );

    let (mut state, effects) = update(
        state,
        Msg::PollFailed {
            reason: "status request timed out".to_string(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.job_status, JobStatus::Failed);
    assert_eq!(view.translated_count, 1);
    assert_eq!(
        view.notice,
        Some(Notice::TranslationFailed(
            "status request timed out".to_string()
        ))
    );
    // Partial output is final once the loop has stopped.
    assert!(state.session().unwrap().chapter_is_final("c1"));
    assert!(state.consume_dirty());
}

#[test]
fn server_poll_overwrites_interim_local_edit() {
    init_logging();
    let state = started_state();
    let (state, _) = update(
        state,
        Msg::PollArrived {
            status: RemoteStatus::InProgress,
            chapters: vec![chapter_update("c1", "Bonjour")],
        },
    );
    let (state, _) = update(
        state,
        Msg::ChapterEdited {
            chapter_id: "c1".to_string(),
            content: "Bonjour!!".to_string(),
        },
    );
    assert_eq!(
        state.session().unwrap().translation("c1").unwrap().revision,
        2
    );

    // The job is still running, so a later poll legitimately wins.
    let (state, _) = update(
        state,
        Msg::PollArrived {
            status: RemoteStatus::InProgress,
            chapters: vec![chapter_update("c1", "Bonjour encore")],
        },
    );
    let stored = state.session().unwrap().translation("c1").unwrap().clone();
    assert_eq!(stored.content, "Bonjour encore");
    assert_eq!(stored.origin, WriteOrigin::Server);
    assert_eq!(stored.revision, 3);
}

#[test]
fn editing_an_unknown_chapter_sets_a_notice() {
    init_logging();
    let (mut state, effects) = update(
        loaded_state(),
        Msg::ChapterEdited {
            chapter_id: "c9".to_string(),
            content: "lost".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().notice,
        Some(Notice::UnknownChapter("c9".to_string()))
    );
    assert!(state.session().unwrap().translated().is_empty());
    assert!(state.consume_dirty());
}

#[test]
fn new_upload_replaces_session_and_cancels_polling() {
    init_logging();
    let state = started_state();
    let (state, effects) = update(
        state,
        Msg::DocumentLoaded {
            session_id: "session-2".to_string(),
            chapters: vec![chapter("d1", "Other")],
            language: "es".to_string(),
        },
    );
    assert_eq!(effects, vec![Effect::CancelPolling]);
    let view = state.view();
    assert_eq!(view.session_id, "session-2");
    assert_eq!(view.job_status, JobStatus::Idle);
    assert_eq!(view.translated_count, 0);
}

#[test]
fn reset_clears_the_session_and_cancels_polling() {
    init_logging();
    let state = started_state();
    let (state, effects) = update(state, Msg::Reset);
    assert_eq!(effects, vec![Effect::CancelPolling]);
    assert!(state.session().is_none());

    // A second reset has nothing left to cancel.
    let (state, effects) = update(state, Msg::Reset);
    assert!(effects.is_empty());
    assert!(state.session().is_none());
}

#[test]
fn invalid_upload_keeps_the_previous_session() {
    init_logging();
    let state = loaded_state();
    let (state, effects) = update(
        state,
        Msg::DocumentLoaded {
            session_id: "session-2".to_string(),
            chapters: Vec::new(),
            language: "es".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(matches!(
        state.view().notice,
        Some(Notice::InvalidDocument(_))
    ));
    assert_eq!(state.view().session_id, "session-1");
}

#[test]
fn snapshot_restore_rebuilds_the_session_as_local_content() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::SnapshotRestored {
            session_id: "session-1".to_string(),
            chapters: vec![chapter("c1", "Hello"), chapter("c2", "World")],
            translated: vec![chapter_update("c1", "Bonjour")],
            language: "fr".to_string(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.job_status, JobStatus::Idle);
    assert_eq!(view.translated_count, 1);

    let stored = state.session().unwrap().translation("c1").unwrap().clone();
    assert_eq!(stored.origin, WriteOrigin::LocalEdit);
    assert_eq!(stored.revision, 1);
    // No job is active, so restored chapters are immediately editable.
    let row = &view.chapters[0];
    assert!(row.final_for_job);
    assert!(state.consume_dirty());
}

#[test]
fn job_accepted_is_a_noop() {
    init_logging();
    let state = started_state();
    let before = state.clone();
    let (next, effects) = update(
        state,
        Msg::JobAccepted {
            job_id: "job-7".to_string(),
        },
    );
    assert_eq!(next, before);
    assert!(effects.is_empty());
}

#[test]
fn language_changes_are_ignored_while_a_job_runs() {
    init_logging();
    let (state, _) = update(loaded_state(), Msg::LanguageSelected("ES".to_string()));
    assert_eq!(state.view().language, "es");

    let (state, _) = update(state, Msg::TranslateRequested);
    let (state, _) = update(state, Msg::LanguageSelected("it".to_string()));
    assert_eq!(state.view().language, "es");
}

#[test]
fn view_model_estimates_translation_time_from_char_count() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::DocumentLoaded {
            session_id: "session-1".to_string(),
            chapters: vec![chapter("c1", &"a".repeat(1200))],
            language: "fr".to_string(),
        },
    );
    let view = state.view();
    assert_eq!(view.total_chars, 1200);
    assert_eq!(view.estimated_seconds, 3);
}
