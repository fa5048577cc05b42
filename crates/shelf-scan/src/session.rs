//! Live/frozen scan state driven by discrete user and camera events.
//!
//! Live: every frame replaces the detection list.
//! Frozen: the last live detections become editable objects the user can
//! drag; incoming frames are ignored until `Resume`, which drops all edits.

use shelf_proto::{Detection, NormRect};
use tracing::debug;

use crate::ScanError;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Frame(Vec<Detection>),
    Freeze,
    Resume,
    DragStart(usize),
    /// Translation since `DragStart`, in normalized units.
    DragMove { dx: f64, dy: f64 },
    DragEnd,
}

impl ScanEvent {
    /// `DragMove` from a translation measured in preview points.
    pub fn drag_points(dx: f64, dy: f64, preview_width: f64, preview_height: f64) -> Self {
        ScanEvent::DragMove { dx: dx / preview_width, dy: dy / preview_height }
    }
}

/// A frozen detection plus the user's accumulated drag offset.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableObject {
    pub detection: Detection,
    pub offset: (f64, f64),
}

impl EditableObject {
    fn new(detection: Detection) -> Self {
        Self { detection, offset: (0.0, 0.0) }
    }

    pub fn rect(&self) -> NormRect {
        self.detection.bounding_box.translate(self.offset.0, self.offset.1)
    }

    /// The detection as it should be compared: same id and label, moved box.
    pub fn to_detection(&self) -> Detection {
        Detection { bounding_box: self.rect(), ..self.detection.clone() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub index: usize,
    base: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Live { detections: Vec<Detection> },
    Frozen { objects: Vec<EditableObject>, drag: Option<Drag> },
}

impl Default for ScanState {
    fn default() -> Self {
        ScanState::Live { detections: Vec::new() }
    }
}

impl ScanState {
    pub fn is_frozen(&self) -> bool {
        matches!(self, ScanState::Frozen { .. })
    }

    /// Detections to hand to the comparator.
    pub fn snapshot(&self) -> Vec<Detection> {
        match self {
            ScanState::Live { detections } => detections.clone(),
            ScanState::Frozen { objects, .. } => objects.iter().map(EditableObject::to_detection).collect(),
        }
    }
}

/// Whether an event changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    state: ScanState,
    frames_seen: u64,
    frames_dropped: u64,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    pub fn apply(&mut self, event: ScanEvent) -> Result<Outcome, ScanError> {
        match event {
            ScanEvent::Frame(next) => {
                self.frames_seen += 1;
                match &mut self.state {
                    ScanState::Live { detections } => {
                        *detections = next;
                        Ok(Outcome::Updated)
                    }
                    ScanState::Frozen { .. } => {
                        self.frames_dropped += 1;
                        Ok(Outcome::Ignored)
                    }
                }
            }
            ScanEvent::Freeze => {
                let ScanState::Live { detections } = &mut self.state else { return Ok(Outcome::Ignored) };
                let objects: Vec<EditableObject> = std::mem::take(detections).into_iter().map(EditableObject::new).collect();
                debug!("scan: frozen with {} objects", objects.len());
                self.state = ScanState::Frozen { objects, drag: None };
                Ok(Outcome::Updated)
            }
            ScanEvent::Resume => {
                if !self.state.is_frozen() {
                    return Ok(Outcome::Ignored);
                }
                debug!("scan: resumed, edits discarded");
                self.state = ScanState::default();
                Ok(Outcome::Updated)
            }
            ScanEvent::DragStart(index) => {
                let ScanState::Frozen { objects, drag } = &mut self.state else { return Err(ScanError::NotFrozen) };
                let obj = objects.get(index).ok_or(ScanError::NoSuchObject { index, len: objects.len() })?;
                *drag = Some(Drag { index, base: obj.offset });
                Ok(Outcome::Updated)
            }
            ScanEvent::DragMove { dx, dy } => {
                let ScanState::Frozen { objects, drag } = &mut self.state else { return Err(ScanError::NotFrozen) };
                let Some(d) = drag else { return Ok(Outcome::Ignored) };
                objects[d.index].offset = (d.base.0 + dx, d.base.1 + dy);
                Ok(Outcome::Updated)
            }
            ScanEvent::DragEnd => {
                let ScanState::Frozen { drag, .. } = &mut self.state else { return Err(ScanError::NotFrozen) };
                Ok(if drag.take().is_some() { Outcome::Updated } else { Outcome::Ignored })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(id: &str, left: f64) -> Detection {
        Detection::new(id, NormRect::new(left, 0.1, left + 0.2, 0.3)).with_label("Food")
    }

    fn frozen_session() -> ScanSession {
        let mut s = ScanSession::new();
        s.apply(ScanEvent::Frame(vec![det("a", 0.0), det("b", 0.5)])).unwrap();
        s.apply(ScanEvent::Freeze).unwrap();
        s
    }

    #[test]
    fn live_frames_replace_detections() {
        let mut s = ScanSession::new();
        s.apply(ScanEvent::Frame(vec![det("a", 0.0)])).unwrap();
        s.apply(ScanEvent::Frame(vec![det("b", 0.1), det("c", 0.4)])).unwrap();
        let ids: Vec<String> = s.state().snapshot().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(s.frames_seen(), 2);
    }

    #[test]
    fn frozen_ignores_frames() {
        let mut s = frozen_session();
        let out = s.apply(ScanEvent::Frame(vec![])).unwrap();
        assert_eq!(out, Outcome::Ignored);
        assert_eq!(s.frames_dropped(), 1);
        assert_eq!(s.state().snapshot().len(), 2);
    }

    #[test]
    fn drag_moves_one_object_relative_to_start() {
        let mut s = frozen_session();
        s.apply(ScanEvent::DragStart(1)).unwrap();
        s.apply(ScanEvent::DragMove { dx: 0.05, dy: 0.0 }).unwrap();
        s.apply(ScanEvent::DragMove { dx: 0.1, dy: 0.2 }).unwrap();
        s.apply(ScanEvent::DragEnd).unwrap();

        // second drag builds on the first
        s.apply(ScanEvent::DragStart(1)).unwrap();
        s.apply(ScanEvent::DragMove { dx: 0.1, dy: 0.0 }).unwrap();
        s.apply(ScanEvent::DragEnd).unwrap();

        let snap = s.state().snapshot();
        assert_eq!(snap[0].bounding_box, NormRect::new(0.0, 0.1, 0.2, 0.3));
        let moved = snap[1].bounding_box;
        assert!((moved.left - 0.7).abs() < 1e-9);
        assert!((moved.top - 0.3).abs() < 1e-9);
        assert_eq!(snap[1].id, "b");
        assert_eq!(snap[1].label(), Some("Food"));
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut s = frozen_session();
        assert_eq!(s.apply(ScanEvent::DragMove { dx: 0.3, dy: 0.3 }).unwrap(), Outcome::Ignored);
        assert_eq!(s.apply(ScanEvent::DragEnd).unwrap(), Outcome::Ignored);
    }

    #[test]
    fn resume_discards_edits() {
        let mut s = frozen_session();
        s.apply(ScanEvent::DragStart(0)).unwrap();
        s.apply(ScanEvent::DragMove { dx: 0.3, dy: 0.0 }).unwrap();
        s.apply(ScanEvent::Resume).unwrap();
        assert!(!s.state().is_frozen());
        assert!(s.state().snapshot().is_empty());
    }

    #[test]
    fn editing_requires_freeze() {
        let mut s = ScanSession::new();
        assert!(matches!(s.apply(ScanEvent::DragStart(0)), Err(ScanError::NotFrozen)));
        let mut s = frozen_session();
        assert!(matches!(s.apply(ScanEvent::DragStart(5)), Err(ScanError::NoSuchObject { index: 5, len: 2 })));
    }

    #[test]
    fn drag_points_scale_by_preview() {
        assert_eq!(ScanEvent::drag_points(30.0, 40.0, 300.0, 400.0), ScanEvent::DragMove { dx: 0.1, dy: 0.1 });
    }
}
