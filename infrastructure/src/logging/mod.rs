//! Logging infrastructure: structured council transcripts.
//!
//! Provides [`JsonlTranscriptLogger`], which implements the
//! [`ConversationLogger`](council_application::ConversationLogger) port by
//! writing one rotated JSONL file per council run.

mod transcript;

pub use transcript::{DEFAULT_KEEP_TRANSCRIPTS, JsonlTranscriptLogger};
