/// Side effects requested by `update`, executed by the driving runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a remote translation job for the current session.
    StartJob {
        session_id: String,
        language: String,
    },
    /// Stop the active poll loop. Ingested results stay; the remote job is
    /// not cancelled.
    CancelPolling,
}
