//! Single-consumer event queue in front of a [`ScanSession`].
//!
//! One task owns the session and applies events strictly in order, so frame
//! analysis never overlaps. Observers only ever see the latest state.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::session::{Outcome, ScanEvent, ScanSession, ScanState};
use crate::ScanError;

pub struct FramePump {
    tx: mpsc::Sender<ScanEvent>,
    state: watch::Receiver<ScanState>,
    handle: JoinHandle<ScanSession>,
}

impl FramePump {
    /// Must be called inside a tokio runtime.
    pub fn spawn(queue_depth: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<ScanEvent>(queue_depth.max(1));
        let (state_tx, state) = watch::channel(ScanState::default());

        let handle = tokio::spawn(async move {
            let mut session = ScanSession::new();
            while let Some(ev) = rx.recv().await {
                match session.apply(ev) {
                    Ok(Outcome::Updated) => {
                        state_tx.send_replace(session.state().clone());
                    }
                    Ok(Outcome::Ignored) => {}
                    Err(e) => warn!("scan: event rejected: {}", e),
                }
            }
            debug!(
                "scan: pump stopped after {} frames ({} dropped while frozen)",
                session.frames_seen(),
                session.frames_dropped()
            );
            session
        });

        Self { tx, state, handle }
    }

    /// Queue an event, waiting for room. User events go through here.
    pub async fn send(&self, event: ScanEvent) -> Result<(), ScanError> {
        self.tx.send(event).await.map_err(|_| ScanError::PumpClosed)
    }

    /// Offer a camera frame without waiting. Returns false when the queue is
    /// full and the frame was dropped.
    pub fn offer_frame(&self, frame: Vec<shelf_proto::Detection>) -> Result<bool, ScanError> {
        match self.tx.try_send(ScanEvent::Frame(frame)) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(false),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ScanError::PumpClosed),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state.clone()
    }

    pub fn latest(&self) -> ScanState {
        self.state.borrow().clone()
    }

    /// Close the queue, let the task drain it, and return the final session.
    pub async fn shutdown(self) -> Result<ScanSession, ScanError> {
        drop(self.tx);
        Ok(self.handle.await?)
    }
}
