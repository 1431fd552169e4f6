use crate::merge::WriteOrigin;
use crate::session::{JobStatus, Session};
use crate::view_model::Notice;
use crate::{AppState, Effect, Msg, RemoteStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentLoaded {
            session_id,
            chapters,
            language,
        } => {
            let had_active_job = state
                .session()
                .map(|session| session.job_status().is_active())
                .unwrap_or(false);
            match Session::new(session_id, chapters, &language) {
                Ok(session) => state.replace_session(session),
                Err(err) => {
                    state.set_notice(Notice::InvalidDocument(err.to_string()));
                    return (state, Vec::new());
                }
            }
            if had_active_job {
                vec![Effect::CancelPolling]
            } else {
                Vec::new()
            }
        }
        Msg::LanguageSelected(language) => {
            let changed = match state.session_mut() {
                Some(session) if !session.job_status().is_active() => {
                    session.set_language(&language);
                    true
                }
                _ => false,
            };
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TranslateRequested => {
            let begun = match state.session_mut() {
                None => Err(Notice::NoDocument),
                Some(session) => match session.set_job_status(JobStatus::Queued) {
                    Ok(()) => Ok((
                        session.session_id().to_string(),
                        session.language().to_string(),
                    )),
                    // The only moves into Queued the relation rejects come
                    // from an already active job.
                    Err(_) => Err(Notice::JobAlreadyRunning),
                },
            };
            match begun {
                Ok((session_id, language)) => {
                    state.mark_dirty();
                    vec![Effect::StartJob {
                        session_id,
                        language,
                    }]
                }
                Err(notice) => {
                    state.set_notice(notice);
                    Vec::new()
                }
            }
        }
        Msg::JobAccepted { .. } => Vec::new(),
        Msg::JobStartFailed { reason } => {
            let rolled_back = match state.session_mut() {
                Some(session) if session.job_status() == JobStatus::Queued => {
                    session.set_job_status(JobStatus::Idle).is_ok()
                }
                _ => false,
            };
            if rolled_back {
                state.set_notice(Notice::JobStartFailed(reason));
            }
            Vec::new()
        }
        Msg::PollArrived { status, chapters } => {
            let mut unknown = None;
            let changed = match state.session_mut() {
                Some(session) if session.job_status().is_active() => {
                    let mut changed = false;
                    for entry in chapters {
                        match session.set_translated(
                            &entry.chapter_id,
                            entry.content,
                            WriteOrigin::Server,
                        ) {
                            Ok(_) => changed = true,
                            Err(_) => unknown = Some(entry.chapter_id),
                        }
                    }
                    if advance_job_status(session, status) {
                        changed = true;
                    }
                    changed
                }
                // Stale poll after cancellation or reset; nothing to apply.
                _ => false,
            };
            if changed {
                state.mark_dirty();
            }
            if let Some(chapter_id) = unknown {
                state.set_notice(Notice::UnknownChapter(chapter_id));
            }
            Vec::new()
        }
        Msg::PollFailed { reason } => {
            let failed = match state.session_mut() {
                Some(session) if session.job_status().is_active() => {
                    session.set_job_status(JobStatus::Failed).is_ok()
                }
                _ => false,
            };
            if failed {
                state.set_notice(Notice::TranslationFailed(reason));
            }
            Vec::new()
        }
        Msg::ChapterEdited {
            chapter_id,
            content,
        } => {
            let result = match state.session_mut() {
                None => Err(Notice::NoDocument),
                Some(session) => session
                    .set_translated(&chapter_id, content, WriteOrigin::LocalEdit)
                    .map(|_| ())
                    .map_err(|_| Notice::UnknownChapter(chapter_id.clone())),
            };
            match result {
                Ok(()) => state.mark_dirty(),
                Err(notice) => state.set_notice(notice),
            }
            Vec::new()
        }
        Msg::SnapshotRestored {
            session_id,
            chapters,
            translated,
            language,
        } => {
            let had_active_job = state
                .session()
                .map(|session| session.job_status().is_active())
                .unwrap_or(false);
            let mut session = match Session::new(session_id, chapters, &language) {
                Ok(session) => session,
                Err(err) => {
                    state.set_notice(Notice::InvalidDocument(err.to_string()));
                    return (state, Vec::new());
                }
            };
            // The snapshot format carries no provenance; restored
            // translations re-enter as local content at revision 1. Entries
            // for chapters the snapshot no longer lists are dropped.
            for entry in translated {
                let _ = session.set_translated(
                    &entry.chapter_id,
                    entry.content,
                    WriteOrigin::LocalEdit,
                );
            }
            state.replace_session(session);
            if had_active_job {
                vec![Effect::CancelPolling]
            } else {
                Vec::new()
            }
        }
        Msg::Reset => {
            let had_active_job = state
                .session()
                .map(|session| session.job_status().is_active())
                .unwrap_or(false);
            state.clear_session();
            if had_active_job {
                vec![Effect::CancelPolling]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

/// Map a reported status onto the session, forward moves only. Repeated
/// `in_progress` polls and the `queued` echo right after start are no-ops.
fn advance_job_status(session: &mut Session, reported: RemoteStatus) -> bool {
    let target = match reported {
        RemoteStatus::Queued => return false,
        RemoteStatus::InProgress => JobStatus::InProgress,
        RemoteStatus::Completed => JobStatus::Completed,
        RemoteStatus::Failed => JobStatus::Failed,
    };
    if session.job_status() == target {
        return false;
    }
    session.set_job_status(target).is_ok()
}
