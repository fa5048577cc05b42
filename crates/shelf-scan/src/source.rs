use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use shelf_proto::{Detection, NormRect};
use tracing::debug;

use crate::ScanError;

/// Yields the latest frame's detections, already in normalized coordinates.
/// `Ok(None)` means the source is exhausted.
pub trait DetectionSource {
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, ScanError>;
}

/// Object frame in image pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What an on-device detector reports for one object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObject {
    #[serde(default)]
    pub tracking_id: Option<u64>,
    pub frame: PixelBox,
    /// (text, confidence), best first.
    #[serde(default)]
    pub labels: Vec<(String, f32)>,
}

/// Converts detector output for an upright image of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct FrameNormalizer {
    width: f64,
    height: f64,
}

impl FrameNormalizer {
    pub fn new(width: u32, height: u32) -> Result<Self, ScanError> {
        if width == 0 || height == 0 {
            return Err(ScanError::EmptyImage { width, height });
        }
        Ok(Self { width: width as f64, height: height as f64 })
    }

    pub fn rect(&self, b: &PixelBox) -> NormRect {
        NormRect::from_origin_size(b.x / self.width, b.y / self.height, b.width / self.width, b.height / self.height)
    }

    /// Objects without a tracking id get `f<frame>-<n>`, unique within the frame.
    pub fn detections(&self, frame_index: u64, objects: &[RawObject]) -> Vec<Detection> {
        objects
            .iter()
            .enumerate()
            .map(|(n, o)| {
                let id = match o.tracking_id {
                    Some(t) => format!("t{t}"),
                    None => format!("f{frame_index}-{n}"),
                };
                let mut d = Detection::new(id, self.rect(&o.frame));
                if let Some((text, conf)) = o.labels.first() {
                    d = d.with_label(text.clone()).with_confidence(*conf);
                }
                d
            })
            .collect()
    }
}

/// Recorded frames, one JSON array per line. Blank lines are skipped.
///
/// Lines hold normalized [`Detection`]s, or raw detector [`RawObject`]s in
/// pixels when a [`FrameNormalizer`] is attached.
pub struct ReplaySource<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    normalizer: Option<FrameNormalizer>,
    frames: u64,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let file = File::open(path.as_ref())?;
        debug!("replay: opened {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line_no: 0, normalizer: None, frames: 0 }
    }

    pub fn with_normalizer(mut self, normalizer: FrameNormalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }
}

impl<R: BufRead> DetectionSource for ReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, ScanError> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parse = |source| ScanError::Parse { line: self.line_no, source };
            let frame = match &self.normalizer {
                Some(n) => {
                    let objects: Vec<RawObject> = serde_json::from_str(&line).map_err(parse)?;
                    n.detections(self.frames, &objects)
                }
                None => serde_json::from_str(&line).map_err(parse)?,
            };
            self.frames += 1;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}
