use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::TranslationApi;
use crate::{JobEvent, RemoteStatus};

/// Default cadence between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Errors returned when asking the controller for a new job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// A poll loop is already live for this session.
    #[error("a translation job is already running")]
    AlreadyRunning,
    /// The controller thread is gone; no further jobs can be started.
    #[error("job controller is not available")]
    Unavailable,
}

enum ControllerCommand {
    Start { session_id: String, language: String },
    Cancel,
}

/// Handle to the job controller: a dedicated thread owning a tokio runtime,
/// commands in, events out. At most one poll loop is live at any time.
pub struct JobControllerHandle {
    cmd_tx: mpsc::Sender<ControllerCommand>,
    event_rx: mpsc::Receiver<JobEvent>,
    running: Arc<AtomicBool>,
}

impl JobControllerHandle {
    pub fn new(api: Arc<dyn TranslationApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(false));
        let loop_flag = running.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut active: Option<CancellationToken> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    ControllerCommand::Start {
                        session_id,
                        language,
                    } => {
                        let token = CancellationToken::new();
                        active = Some(token.clone());
                        let api = api.clone();
                        let events = event_tx.clone();
                        let flag = loop_flag.clone();
                        runtime.spawn(async move {
                            run_job(api, events, token, poll_interval, session_id, language)
                                .await;
                            flag.store(false, Ordering::SeqCst);
                        });
                    }
                    ControllerCommand::Cancel => {
                        if let Some(token) = active.take() {
                            token.cancel();
                        }
                    }
                }
            }
        });

        Self {
            cmd_tx,
            event_rx,
            running,
        }
    }

    /// Ask for a translation job. Rejected while a poll loop is live; retry
    /// after the current job's terminal event has been observed.
    pub fn request_translation(
        &self,
        session_id: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<(), JobError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(JobError::AlreadyRunning);
        }
        let command = ControllerCommand::Start {
            session_id: session_id.into(),
            language: language.into(),
        };
        if self.cmd_tx.send(command).is_err() {
            self.running.store(false, Ordering::SeqCst);
            return Err(JobError::Unavailable);
        }
        Ok(())
    }

    /// Stop polling. Fire-and-forget: the remote job keeps running and
    /// nothing already ingested is rolled back.
    pub fn cancel(&self) {
        let _ = self.cmd_tx.send(ControllerCommand::Cancel);
    }

    /// Non-blocking drain of the next controller event, if any.
    pub fn try_recv(&self) -> Option<JobEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Whether a poll loop is currently live.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

async fn run_job(
    api: Arc<dyn TranslationApi>,
    events: mpsc::Sender<JobEvent>,
    cancel: CancellationToken,
    poll_interval: Duration,
    session_id: String,
    language: String,
) {
    let started = tokio::select! {
        _ = cancel.cancelled() => return,
        result = api.start_job(&session_id, &language) => result,
    };
    let job_id = match started {
        Ok(job_id) => {
            let _ = events.send(JobEvent::Started {
                job_id: job_id.clone(),
            });
            job_id
        }
        Err(error) => {
            let _ = events.send(JobEvent::StartFailed { error });
            return;
        }
    };

    // First poll lands one full interval after the job was accepted.
    let mut ticker = time::interval_at(time::Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }
        let polled = tokio::select! {
            _ = cancel.cancelled() => return,
            result = api.poll_job(&job_id) => result,
        };
        match polled {
            Ok(snapshot) => {
                let terminal = matches!(
                    snapshot.status,
                    RemoteStatus::Completed | RemoteStatus::Failed
                );
                let _ = events.send(JobEvent::Poll { snapshot });
                if terminal {
                    return;
                }
            }
            Err(error) => {
                // Transient failures are terminal by design; no retry.
                let _ = events.send(JobEvent::PollFailed { error });
                return;
            }
        }
    }
}
