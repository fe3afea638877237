use std::fs::OpenOptions;
use std::io::Write;

use crate::models::Intent;

/// Append-only record of each interaction. Strictly best-effort: a sink
/// failure must never change the response the caller hears.
pub trait TranscriptSink: Send + Sync {
    fn record(&self, utterance: &str, intent: Intent, response: &str);
}

pub struct FileTranscriptSink {
    path: String,
}

impl FileTranscriptSink {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

impl TranscriptSink for FileTranscriptSink {
    fn record(&self, utterance: &str, intent: Intent, response: &str) {
        let entry = format!(
            "User: {utterance}\nIntent: {}\nAI: {response}\n\n",
            intent.as_str()
        );
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));

        if let Err(e) = result {
            tracing::warn!(error = %e, path = %self.path, "failed to append transcript entry");
        }
    }
}
