//! # Snapshot Writer
//!
//! Background task that writes cart snapshots to durable storage.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Writer Flow                                 │
//! │                                                                         │
//! │  CartStore mutation                                                    │
//! │       │  enqueue(snapshot)        (serialize, send, return at once)    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  mpsc::UnboundedChannel<WriterMessage>                          │   │
//! │  │  [Save(v1)] [Save(v2)] [Flush(ack)] [Save(v3)]                  │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  writer task                                                    │   │
//! │  │  1. recv one message                                            │   │
//! │  │  2. drain the backlog, keep only the newest Save                │   │
//! │  │  3. write it (failure: warn!, no retry)                         │   │
//! │  │  4. ack every Flush seen                                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Stops when every SnapshotWriter handle is dropped.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use market_core::CartSnapshot;
use market_storage::CartSnapshotRepository;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

enum WriterMessage {
    Save(String),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background snapshot writer.
///
/// Cloning shares the same task.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
}

impl std::fmt::Debug for WriterMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterMessage::Save(json) => write!(f, "Save({} bytes)", json.len()),
            WriterMessage::Flush(_) => write!(f, "Flush"),
        }
    }
}

impl SnapshotWriter {
    /// Spawns the writer task on the current tokio runtime.
    pub fn spawn(repo: CartSnapshotRepository) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(repo, rx));
        info!("Snapshot writer started");
        SnapshotWriter { tx }
    }

    /// A writer with no task behind it. Every snapshot is dropped.
    pub fn disconnected() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        SnapshotWriter { tx }
    }

    /// Queues a snapshot for writing. Never blocks and never fails; encoding
    /// and delivery problems are logged.
    pub fn enqueue(&self, snapshot: &CartSnapshot) {
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };

        if self.tx.send(WriterMessage::Save(json)).is_err() {
            debug!("Snapshot writer not running, snapshot dropped");
        }
    }

    /// Waits until everything queued before this call has been written
    /// (or has failed and been logged).
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriterMessage::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }
}

async fn run(repo: CartSnapshotRepository, mut rx: mpsc::UnboundedReceiver<WriterMessage>) {
    while let Some(message) = rx.recv().await {
        let mut latest = None;
        let mut acks = Vec::new();

        let mut next = Some(message);
        while let Some(message) = next {
            match message {
                WriterMessage::Save(json) => latest = Some(json),
                WriterMessage::Flush(ack) => acks.push(ack),
            }
            next = rx.try_recv().ok();
        }

        if let Some(json) = latest {
            match repo.save_json(&json).await {
                Ok(()) => debug!(bytes = json.len(), "Cart snapshot written"),
                Err(e) => warn!(error = %e, "Failed to persist cart snapshot"),
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }

    info!("Snapshot writer stopped");
}
