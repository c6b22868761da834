// ABOUTME: Carries relayed tracing records from the global subscriber to the console pane
// ABOUTME: The sink half is installed with the subscriber, the receiver half is drained by the App

use kitchen_logging::{LogRecord, LogSink};
use tokio::sync::mpsc;

pub type ConsoleLogReceiver = mpsc::UnboundedReceiver<LogRecord>;

/// Log sink whose records wait in a channel until the controller writes them to the console pane
#[derive(Clone)]
pub struct ConsoleLogSink {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl ConsoleLogSink {
    pub fn channel() -> (Self, ConsoleLogReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl LogSink for ConsoleLogSink {
    fn record(&self, record: LogRecord) {
        // The receiver is gone once the App has been dropped
        let _ = self.tx.send(record);
    }
}
