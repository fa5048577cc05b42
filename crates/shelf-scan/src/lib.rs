//! Scan-side collaborators: where detection snapshots come from and how the
//! user freezes and edits them before a comparison.

pub mod pump;
pub mod session;
pub mod source;

pub use pump::FramePump;
pub use session::{EditableObject, Outcome, ScanEvent, ScanSession, ScanState};
pub use source::{DetectionSource, FrameNormalizer, PixelBox, RawObject, ReplaySource};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("read frames: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame on line {line}: {source}")]
    Parse { line: usize, source: serde_json::Error },

    #[error("image size {width}x{height} cannot be normalized")]
    EmptyImage { width: u32, height: u32 },

    #[error("no object at index {index} (have {len})")]
    NoSuchObject { index: usize, len: usize },

    #[error("editing requires a frozen scan")]
    NotFrozen,

    #[error("frame pump is closed")]
    PumpClosed,

    #[error("frame pump task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Pending events the pump buffers before frames get dropped.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    /// Freeze automatically after this many frames when replaying.
    #[serde(default)]
    pub freeze_after_frames: Option<usize>,
}

fn default_queue_depth() -> usize {
    4
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { queue_depth: default_queue_depth(), freeze_after_frames: None }
    }
}
