//! Per-run council transcripts in JSONL.
//!
//! Every `council_started` event opens a fresh file
//! `council-<YYYYmmdd-HHMMSSmmm>-<run>.jsonl` in the transcript directory,
//! so a chat session with several questions leaves one transcript per
//! question. Older transcripts beyond the configured retention are
//! removed when a new one is opened.

use council_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

const TRANSCRIPT_PREFIX: &str = "council-";
const TRANSCRIPT_EXT: &str = ".jsonl";

/// Event that starts a new transcript file
const RUN_START_EVENT: &str = "council_started";

/// Retention used when the config does not set one
pub const DEFAULT_KEEP_TRANSCRIPTS: usize = 20;

struct OpenTranscript {
    path: PathBuf,
    writer: BufWriter<File>,
}

#[derive(Default)]
struct TranscriptState {
    run: u64,
    current: Option<OpenTranscript>,
}

/// [`ConversationLogger`] writing one JSONL transcript per council run.
///
/// Each line carries the event payload plus `type`, `timestamp` and the
/// in-process `run` number.
pub struct JsonlTranscriptLogger {
    dir: PathBuf,
    keep: usize,
    state: Mutex<TranscriptState>,
}

impl JsonlTranscriptLogger {
    /// Prepare `dir` for transcripts, keeping at most `keep` files.
    ///
    /// Returns `None` when the directory cannot be created; the council
    /// then runs without transcripts.
    pub fn open(dir: impl Into<PathBuf>, keep: usize) -> Option<Self> {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Could not create transcript directory {}: {}", dir.display(), e);
            return None;
        }
        Some(Self {
            dir,
            keep: keep.max(1),
            state: Mutex::new(TranscriptState::default()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Transcript currently being written, if a run has started
    pub fn current_path(&self) -> Option<PathBuf> {
        let state = self.state.lock().ok()?;
        state.current.as_ref().map(|t| t.path.clone())
    }

    /// Existing transcripts in this directory, oldest first
    pub fn transcripts(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_transcript(path))
            .collect();
        // Timestamped names sort chronologically
        paths.sort();
        paths
    }

    fn start_run(&self, state: &mut TranscriptState) {
        if let Some(mut previous) = state.current.take() {
            let _ = previous.writer.flush();
        }

        state.run += 1;
        let name = format!(
            "{}{}-{:03}{}",
            TRANSCRIPT_PREFIX,
            chrono::Local::now().format("%Y%m%d-%H%M%S%3f"),
            state.run,
            TRANSCRIPT_EXT
        );
        let path = self.dir.join(name);

        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                debug!("Council transcript: {}", path.display());
                state.current = Some(OpenTranscript {
                    path,
                    writer: BufWriter::new(file),
                });
                self.prune();
            }
            Err(e) => warn!("Could not create transcript {}: {}", path.display(), e),
        }
    }

    /// Remove the oldest transcripts beyond the retention limit
    fn prune(&self) {
        let transcripts = self.transcripts();
        let excess = transcripts.len().saturating_sub(self.keep);
        for stale in &transcripts[..excess] {
            if let Err(e) = std::fs::remove_file(stale) {
                warn!("Could not remove old transcript {}: {}", stale.display(), e);
            }
        }
    }
}

impl ConversationLogger for JsonlTranscriptLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        if event.event_type == RUN_START_EVENT || state.current.is_none() {
            self.start_run(&mut state);
        }

        let run = state.run;
        let Some(transcript) = state.current.as_mut() else {
            return;
        };
        let Ok(line) = serde_json::to_string(&transcript_record(event, run)) else {
            return;
        };
        let _ = writeln!(transcript.writer, "{}", line);
        // Per-event flush keeps the transcript of an interrupted run
        let _ = transcript.writer.flush();
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock()
            && let Some(transcript) = state.current.as_mut()
        {
            let _ = transcript.writer.flush();
        }
    }
}

fn is_transcript(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(TRANSCRIPT_PREFIX) && name.ends_with(TRANSCRIPT_EXT))
}

/// Flatten an event into one transcript line
fn transcript_record(event: ConversationEvent, run: u64) -> Value {
    let mut record = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    record.insert("type".to_string(), Value::from(event.event_type));
    record.insert(
        "timestamp".to_string(),
        Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
    );
    record.insert("run".to_string(), Value::from(run));
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn started(question: &str) -> ConversationEvent {
        ConversationEvent::new(RUN_START_EVENT, json!({ "question": question }))
    }

    #[test]
    fn test_each_run_gets_its_own_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlTranscriptLogger::open(dir.path(), 10).unwrap();

        logger.log(started("first"));
        logger.log(ConversationEvent::new(
            "stage1_response",
            json!({ "model": "openai/gpt-5.1", "text": "Rust is a systems language." }),
        ));
        let first = logger.current_path().unwrap();

        logger.log(started("second"));
        logger.log(ConversationEvent::new(
            "stage3_synthesis",
            json!({ "model": "google/gemini-3-pro-preview", "text": "done" }),
        ));
        let second = logger.current_path().unwrap();
        drop(logger);

        assert_ne!(first, second);

        let run1 = lines(&first);
        assert_eq!(run1.len(), 2);
        assert_eq!(run1[0]["type"], "council_started");
        assert_eq!(run1[0]["question"], "first");
        assert_eq!(run1[1]["type"], "stage1_response");
        assert_eq!(run1[1]["model"], "openai/gpt-5.1");
        assert!(run1.iter().all(|v| v["run"] == 1 && v["timestamp"].is_string()));

        let run2 = lines(&second);
        assert_eq!(run2.len(), 2);
        assert_eq!(run2[1]["type"], "stage3_synthesis");
        assert!(run2.iter().all(|v| v["run"] == 2));
    }

    #[test]
    fn test_old_transcripts_are_rotated_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("council-00000000-000000000-001.jsonl"), "{}\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let logger = JsonlTranscriptLogger::open(dir.path(), 2).unwrap();
        for question in ["a", "b", "c"] {
            logger.log(started(question));
        }
        let current = logger.current_path().unwrap();

        let remaining = logger.transcripts();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining.last(), Some(&current));
        assert!(!dir.path().join("council-00000000-000000000-001.jsonl").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_event_before_start_opens_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlTranscriptLogger::open(dir.path().join("logs/nested"), 5).unwrap();
        assert!(logger.current_path().is_none());

        logger.log(ConversationEvent::new(
            "council_total_failure",
            json!("no survivors"),
        ));

        let path = logger.current_path().unwrap();
        assert!(path.starts_with(logger.dir()));
        let record = &lines(&path)[0];
        assert_eq!(record["type"], "council_total_failure");
        assert_eq!(record["data"], "no survivors");
    }

    #[test]
    fn test_open_fails_when_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlTranscriptLogger::open(blocker.join("logs"), 5).is_none());
    }
}
