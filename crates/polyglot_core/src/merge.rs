/// Per-chapter write counter. Strictly increases on every accepted mutation.
pub type Revision = u64;

/// Where a translated-chapter write came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrigin {
    /// Delivered by a translation job poll.
    Server,
    /// Typed by the user in the editor.
    LocalEdit,
}

/// A single write against one chapter's translation, carrying the revision
/// it was stamped with at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterWrite {
    pub chapter_id: String,
    pub content: String,
    pub origin: WriteOrigin,
    pub revision: Revision,
}

/// Result of offering a write to the merge policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    Discarded,
}

/// Last-writer-wins on the per-chapter counter, not on wall-clock time:
/// a write lands only if its revision strictly exceeds the stored one.
pub(crate) fn resolve(stored: Option<Revision>, incoming: Revision) -> WriteOutcome {
    if incoming > stored.unwrap_or(0) {
        WriteOutcome::Applied
    } else {
        WriteOutcome::Discarded
    }
}
