//! Outbound Messaging Module
//!
//! Where chat lines go. Delivery is fire-and-forget: a sink never reports
//! back whether a line arrived.

use std::sync::Mutex;

use tracing::info;

// == Message Sink ==
/// Sends one line of text to a chat destination (a channel or a nick).
pub trait MessageSink: Send + Sync {
    fn send(&self, text: &str, destination: &str);
}

// == Log Sink ==
/// Writes chat lines to the log. Used when no chat connection is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn send(&self, text: &str, destination: &str) {
        info!(target: "troet_bridge::chat", destination, "{}", text);
    }
}

// == Memory Sink ==
/// Keeps every line it is handed, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(destination, text)` pairs sent so far.
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Lines sent to one destination.
    pub fn lines_to(&self, destination: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(dest, _)| dest == destination)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }
}

impl MessageSink for MemorySink {
    fn send(&self, text: &str, destination: &str) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((destination.to_string(), text.to_string()));
    }
}
