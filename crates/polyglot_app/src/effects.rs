use std::sync::Arc;
use std::time::Duration;

use polyglot_core::{ChapterUpdate, Effect, Msg, RemoteStatus};
use polyglot_engine::{
    ApiError, ApiSettings, HttpTranslationApi, JobControllerHandle, JobEvent,
};

/// Executes core effects against the job controller and maps controller
/// events back into core messages.
pub struct EffectRunner {
    controller: JobControllerHandle,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings, poll_interval: Duration) -> Result<Self, ApiError> {
        let api = Arc::new(HttpTranslationApi::new(settings)?);
        Ok(Self {
            controller: JobControllerHandle::new(api, poll_interval),
        })
    }

    /// Execute the effects produced by one update step.
    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob {
                    session_id,
                    language,
                } => {
                    log::info!("StartJob session={} language={}", session_id, language);
                    if let Err(err) = self.controller.request_translation(session_id, language) {
                        log::warn!("Translation request refused: {}", err);
                    }
                }
                Effect::CancelPolling => {
                    self.controller.cancel();
                }
            }
        }
    }

    /// Next controller event mapped into a core message, if one is ready.
    pub fn try_next_msg(&self) -> Option<Msg> {
        self.controller.try_recv().map(map_event)
    }
}

fn map_event(event: JobEvent) -> Msg {
    match event {
        JobEvent::Started { job_id } => Msg::JobAccepted { job_id },
        JobEvent::StartFailed { error } => Msg::JobStartFailed {
            reason: error.to_string(),
        },
        JobEvent::Poll { snapshot } => {
            if let (Some(completed), Some(total)) = (snapshot.completed, snapshot.total) {
                log::info!("Service progress: {}/{} chapters", completed, total);
            }
            Msg::PollArrived {
                status: map_status(snapshot.status),
                chapters: snapshot
                    .translated_chapters
                    .into_iter()
                    .map(|chapter| ChapterUpdate {
                        chapter_id: chapter.id,
                        content: chapter.content,
                    })
                    .collect(),
            }
        }
        JobEvent::PollFailed { error } => Msg::PollFailed {
            reason: error.to_string(),
        },
    }
}

fn map_status(status: polyglot_engine::RemoteStatus) -> RemoteStatus {
    match status {
        polyglot_engine::RemoteStatus::Queued => RemoteStatus::Queued,
        polyglot_engine::RemoteStatus::InProgress => RemoteStatus::InProgress,
        polyglot_engine::RemoteStatus::Completed => RemoteStatus::Completed,
        polyglot_engine::RemoteStatus::Failed => RemoteStatus::Failed,
    }
}
