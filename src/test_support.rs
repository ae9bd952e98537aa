//! Helpers shared by the crate's test modules.

use crate::error::Result;
use crate::query::QueryCanceller;
use async_trait::async_trait;
use std::io;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::fmt::MakeWriter;

/// Canceller that forwards every cancelled id to a channel.
pub(crate) struct RecordingCanceller {
    pub(crate) tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl QueryCanceller for RecordingCanceller {
    async fn cancel_query(&self, query_id: &str) -> Result<()> {
        let _ = self.tx.send(query_id.to_string());
        Ok(())
    }
}

/// In-memory sink for formatted tracing output.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

/// Route this thread's tracing events into a [`CapturedLogs`] until the
/// guard drops.
pub(crate) fn capturing_subscriber() -> (tracing::subscriber::DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (guard, logs)
}
