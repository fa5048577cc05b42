use serde::{Deserialize, Serialize};

/// Rectangle in normalized image coordinates (0..1 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl NormRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Build from an origin plus size, the way frame rects are usually reported.
    pub fn from_origin_size(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { left: x, top: y, right: x + w, bottom: y + h }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// True when all edges are finite, inside 0..1 and the rect has positive area.
    pub fn is_well_formed(&self) -> bool {
        let edges = [self.left, self.top, self.right, self.bottom];
        edges.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v))
            && self.width() > 0.0
            && self.height() > 0.0
    }
}

/// One detector result for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub id: String,
    pub bounding_box: NormRect,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(id: impl Into<String>, bounding_box: NormRect) -> Self {
        Self { id: id.into(), bounding_box, label: None, confidence: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Label if present and non-empty.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.is_empty())
    }

    pub fn center(&self) -> (f64, f64) {
        self.bounding_box.center()
    }
}
