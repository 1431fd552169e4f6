mod effects;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::Parser;

use client_logging::LogDestination;
use effects::EffectRunner;
use polyglot_core::{
    update, AppState, Chapter, ChapterUpdate, JobStatus, Msg, Notice,
};
use polyglot_engine::{
    ApiSettings, ChapterPayload, ChapterSeed, DocumentExporter, DocumentUploader,
    HttpDocumentExporter, HttpDocumentUploader, OutputDir, SessionSnapshot, SnapshotChapter,
    SnapshotStore, SnapshotTranslation, DEFAULT_ARTIFACT_FILENAME, DEFAULT_POLL_INTERVAL,
};

/// Upload a document, run a translation job to completion, and export the
/// merged result.
#[derive(Debug, Parser)]
#[command(name = "polyglot", version, about)]
struct Args {
    /// Document to translate (.md, .docx or .pdf). Omit with --restore.
    file: Option<PathBuf>,

    /// Target language code, e.g. de or fr.
    #[arg(short, long, default_value = "de")]
    language: String,

    /// Base URL of the translation service.
    #[arg(long, default_value = "http://localhost:8000/api")]
    service: String,

    /// Directory for the exported artifact and the saved session.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Seconds between status polls.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    poll_interval: u64,

    /// Export the saved session instead of uploading and translating.
    #[arg(long)]
    restore: bool,

    /// Log to the terminal as well as ./polyglot.log.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    client_logging::initialize(if args.verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    });

    let settings = ApiSettings {
        base_url: args.service.clone(),
        ..ApiSettings::default()
    };
    let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
    let snapshots = SnapshotStore::new(&args.output);
    let runner = EffectRunner::new(
        settings.clone(),
        Duration::from_secs(args.poll_interval.max(1)),
    )
    .map_err(|err| anyhow!("cannot reach the translation service: {err}"))?;

    // Seed the session, from disk or by uploading the document.
    let seed_msg = if args.restore {
        let snapshot = snapshots.load().context("no saved session to restore")?;
        log::info!(
            "Restoring session {} saved at {}",
            snapshot.session_id,
            snapshot.timestamp
        );
        restore_msg(snapshot)
    } else {
        let file = args
            .file
            .clone()
            .context("a document path is required unless --restore is given")?;
        upload_document(&runtime, &settings, &file, &args.language)?
    };

    let mut state = dispatch(AppState::new(), seed_msg, &runner);
    if state.session().is_none() {
        bail!("could not build a session from the document");
    }

    if !args.restore {
        state = dispatch(state, Msg::TranslateRequested, &runner);
        let view = state.view();
        log::info!(
            "Translating {} characters into {}; rough estimate {}s",
            view.total_chars,
            view.language,
            view.estimated_seconds
        );
        state = pump_until_terminal(state, &runner);
    }

    // Export whatever translations exist; partial output after a failure is
    // still usable.
    export_translations(&runtime, &settings, &state, &args.output)?;
    save_snapshot(&snapshots, &state)?;

    if state.view().job_status == JobStatus::Failed {
        bail!("translation job failed; partial output was kept");
    }
    Ok(())
}

/// Run one update step, execute its effects, and log render-worthy changes.
fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        render_progress(&state);
    }
    state
}

/// Drain controller events into the update loop until the job settles.
fn pump_until_terminal(mut state: AppState, runner: &EffectRunner) -> AppState {
    while state
        .session()
        .map(|session| session.job_status().is_active())
        .unwrap_or(false)
    {
        match runner.try_next_msg() {
            Some(msg) => state = dispatch(state, msg, runner),
            None => thread::sleep(Duration::from_millis(20)),
        }
    }
    state
}

fn render_progress(state: &AppState) {
    let view = state.view();
    if let Some(notice) = &view.notice {
        log::warn!("{}", describe_notice(notice));
    }
    if view.has_document {
        log::info!(
            "{:?}: {}/{} chapters translated",
            view.job_status,
            view.translated_count,
            view.chapter_count
        );
    }
}

fn describe_notice(notice: &Notice) -> String {
    match notice {
        Notice::NoDocument => "No document loaded".to_string(),
        Notice::InvalidDocument(detail) => format!("Document rejected: {detail}"),
        Notice::JobAlreadyRunning => "A translation job is already running".to_string(),
        Notice::JobStartFailed(detail) => format!("Could not start translation: {detail}"),
        Notice::TranslationFailed(detail) => format!("Translation failed: {detail}"),
        Notice::UnknownChapter(id) => format!("Ignoring update for unknown chapter {id}"),
    }
}

fn upload_document(
    runtime: &tokio::runtime::Runtime,
    settings: &ApiSettings,
    file: &Path,
    language: &str,
) -> anyhow::Result<Msg> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .context("document path has no file name")?
        .to_string();

    let uploader = HttpDocumentUploader::new(settings.clone())?;
    let document = runtime.block_on(uploader.upload(&file_name, bytes))?;
    log::info!(
        "Uploaded {} as session {} ({} chapters)",
        file_name,
        document.session_id,
        document.chapters.len()
    );

    Ok(Msg::DocumentLoaded {
        session_id: document.session_id,
        chapters: document.chapters.into_iter().map(seed_to_chapter).collect(),
        language: language.to_string(),
    })
}

fn seed_to_chapter(seed: ChapterSeed) -> Chapter {
    Chapter {
        id: seed.id,
        title: if seed.title.is_empty() {
            "Untitled".to_string()
        } else {
            seed.title
        },
        content: seed.content,
    }
}

fn restore_msg(snapshot: SessionSnapshot) -> Msg {
    Msg::SnapshotRestored {
        session_id: snapshot.session_id,
        chapters: snapshot
            .chapters
            .into_iter()
            .map(|chapter| Chapter {
                id: chapter.id,
                title: chapter.title,
                content: chapter.content,
            })
            .collect(),
        translated: snapshot
            .translated_chapters
            .into_iter()
            .map(|entry| ChapterUpdate {
                chapter_id: entry.id,
                content: entry.content,
            })
            .collect(),
        language: snapshot.selected_language,
    }
}

fn export_translations(
    runtime: &tokio::runtime::Runtime,
    settings: &ApiSettings,
    state: &AppState,
    output: &Path,
) -> anyhow::Result<()> {
    let Some(session) = state.session() else {
        return Ok(());
    };
    if session.translated().is_empty() {
        log::warn!("Nothing translated; skipping export");
        return Ok(());
    }

    // Chapters go out in document order, skipping untranslated ones.
    let chapters: Vec<ChapterPayload> = session
        .chapters()
        .iter()
        .filter_map(|chapter| {
            session.translation(&chapter.id).map(|entry| ChapterPayload {
                id: chapter.id.clone(),
                content: entry.content.clone(),
            })
        })
        .collect();

    let exporter = HttpDocumentExporter::new(settings.clone())?;
    let artifact = runtime.block_on(exporter.export(session.session_id(), &chapters))?;
    let path = OutputDir::new(output).write(DEFAULT_ARTIFACT_FILENAME, &artifact)?;
    log::info!("Exported {} chapters to {}", chapters.len(), path.display());
    Ok(())
}

fn save_snapshot(store: &SnapshotStore, state: &AppState) -> anyhow::Result<()> {
    let Some(session) = state.session() else {
        return Ok(());
    };
    if session.translated().is_empty() {
        return Ok(());
    }

    let snapshot = SessionSnapshot {
        session_id: session.session_id().to_string(),
        chapters: session
            .chapters()
            .iter()
            .map(|chapter| SnapshotChapter {
                id: chapter.id.clone(),
                title: chapter.title.clone(),
                content: chapter.content.clone(),
            })
            .collect(),
        translated_chapters: session
            .chapters()
            .iter()
            .filter_map(|chapter| {
                session
                    .translation(&chapter.id)
                    .map(|entry| SnapshotTranslation {
                        id: chapter.id.clone(),
                        content: entry.content.clone(),
                    })
            })
            .collect(),
        selected_language: session.language().to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    };
    let path = store.save(&snapshot)?;
    log::info!("Saved session to {}", path.display());
    Ok(())
}
